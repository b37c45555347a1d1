//! 거래량 통계 계산.
//!
//! 이상치 임계값이 z-score로 정의되므로 모표준편차(N으로 나눔)를 사용합니다.

use dalal_core::Candle;
use serde::{Deserialize, Serialize};

/// 거래량 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeStats {
    /// 평균 거래량
    pub mean: f64,
    /// 모표준편차
    pub std_dev: f64,
    /// 중앙값
    pub median: f64,
}

impl VolumeStats {
    /// 캔들 거래량의 통계를 계산합니다. 빈 입력이면 모두 0입니다.
    pub fn from_candles(candles: &[Candle]) -> Self {
        let volumes: Vec<f64> = candles.iter().map(|c| c.volume_f64()).collect();
        Self::from_values(&volumes)
    }

    /// 임의의 값 배열에 대한 통계를 계산합니다.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            mean,
            std_dev: variance.sqrt(),
            median,
        }
    }

    /// 주어진 거래량의 z-score. 표준편차가 0이면 `None`.
    pub fn z_score(&self, volume: f64) -> Option<f64> {
        if self.std_dev == 0.0 {
            None
        } else {
            Some((volume - self.mean) / self.std_dev)
        }
    }
}

/// 캔들 거래량 평균. 빈 입력이면 0.
pub(crate) fn mean_volume(candles: &[Candle]) -> f64 {
    if candles.is_empty() {
        return 0.0;
    }
    candles.iter().map(|c| c.volume_f64()).sum::<f64>() / candles.len() as f64
}
