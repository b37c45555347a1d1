//! 피벗(스윙) 고점/저점 탐지.
//!
//! 인덱스 `i`의 캔들이 좌우 `w`개 이웃 모두보다 고가가 엄격하게 높으면 고점 피벗,
//! 저가가 엄격하게 낮으면 저점 피벗입니다. 동일 값은 "엄격하게"를 만족하지 않으므로
//! 평평한 구간에서는 피벗이 생기지 않습니다. 한 캔들이 동시에 고점과 저점일 수 있습니다.

use dalal_core::{Candle, PivotConfig};
use serde::{Deserialize, Serialize};

/// 피벗 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotKind {
    High,
    Low,
}

/// 피벗 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pivot {
    /// 고점 피벗은 고가, 저점 피벗은 저가
    pub price: f64,
    /// 캔들 타임스탬프
    pub timestamp: i64,
    /// 원본 시계열에서의 캔들 위치
    pub index: usize,
    pub kind: PivotKind,
}

/// 대칭 윈도우 피벗 탐지기.
#[derive(Debug, Clone)]
pub struct PivotDetector {
    window: usize,
}

impl Default for PivotDetector {
    fn default() -> Self {
        Self::new(&PivotConfig::default())
    }
}

impl PivotDetector {
    pub fn new(config: &PivotConfig) -> Self {
        Self {
            window: config.window.max(1),
        }
    }

    /// 윈도우 반경.
    pub fn window(&self) -> usize {
        self.window
    }

    /// 피벗을 인덱스 순서로 반환합니다 (같은 캔들에서는 High가 먼저).
    ///
    /// 캔들이 `2w + 1`개보다 적으면 빈 벡터를 반환합니다.
    pub fn detect(&self, candles: &[Candle]) -> Vec<Pivot> {
        let w = self.window;
        let mut pivots = Vec::new();

        if candles.len() < w * 2 + 1 {
            return pivots;
        }

        for i in w..candles.len() - w {
            let current = &candles[i];
            let high = current.high_f64();
            let is_high = (i - w..i)
                .chain(i + 1..=i + w)
                .all(|j| high > candles[j].high_f64());
            if is_high {
                pivots.push(Pivot {
                    price: high,
                    timestamp: current.timestamp,
                    index: i,
                    kind: PivotKind::High,
                });
            }

            let low = current.low_f64();
            let is_low = (i - w..i)
                .chain(i + 1..=i + w)
                .all(|j| low < candles[j].low_f64());
            if is_low {
                pivots.push(Pivot {
                    price: low,
                    timestamp: current.timestamp,
                    index: i,
                    kind: PivotKind::Low,
                });
            }
        }

        pivots
    }
}
