//! OBV (On-Balance Volume) 지표.
//!
//! OBV는 거래량을 이용하여 자금 흐름을 추적하는 누적 지표입니다.
//!
//! ## 계산 방식
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음
//!
//! ## 활용
//! - 가격 상승 + OBV 상승: 매집
//! - 가격 하락 + OBV 상승: 강세 다이버전스

use dalal_core::Candle;
use serde::{Deserialize, Serialize};

/// OBV 파라미터.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObvParams {
    /// 초기값 (기본: 0).
    pub initial_value: i64,
}

/// OBV 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObvResult {
    /// OBV 값.
    pub obv: i64,
    /// OBV 변화량 (직전 캔들 대비).
    pub change: i64,
}

/// OBV 계산기.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObvIndicator;

impl ObvIndicator {
    /// 새로운 OBV 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV 계산.
    ///
    /// # 인자
    /// * `candles` - 시간순 캔들
    /// * `params` - OBV 파라미터
    ///
    /// # 반환
    /// 각 캔들 시점의 OBV 값과 변화량 (빈 입력이면 빈 벡터)
    pub fn calculate(&self, candles: &[Candle], params: ObvParams) -> Vec<ObvResult> {
        let mut result = Vec::with_capacity(candles.len());
        let mut current_obv = params.initial_value;

        for (i, candle) in candles.iter().enumerate() {
            let change = if i == 0 {
                // 첫 번째 캔들은 변화 없음
                0
            } else {
                let volume = i64::try_from(candle.volume).unwrap_or(i64::MAX);
                match candle.close.cmp(&candles[i - 1].close) {
                    std::cmp::Ordering::Greater => volume,
                    std::cmp::Ordering::Less => -volume,
                    std::cmp::Ordering::Equal => 0,
                }
            };

            current_obv = current_obv.saturating_add(change);

            result.push(ObvResult {
                obv: current_obv,
                change,
            });
        }

        result
    }

    /// OBV 기울기: (마지막 - 처음) / 개수. 빈 입력이면 0.
    pub fn slope(&self, results: &[ObvResult]) -> f64 {
        match (results.first(), results.last()) {
            (Some(first), Some(last)) => {
                (last.obv as f64 - first.obv as f64) / results.len() as f64
            }
            _ => 0.0,
        }
    }
}
