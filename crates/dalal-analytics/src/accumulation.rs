//! 매집/분산 점수.
//!
//! 최근 윈도우(기본 10개)의 각 캔들에 대해 종가 위치(CLV)와 상대 거래량을 보고
//! 매수 측/매도 측 우위를 하나의 점수로 요약합니다.
//!
//! - CLV = (종가 - 저가) / (고가 - 저가), 범위가 0이면 0.5
//! - 거래량 배수 = 거래량 / 윈도우 평균 거래량 (평균이 0이면 0)
//! - CLV > 0.7 이고 양봉: `+CLV × 배수`
//! - CLV < 0.3 이고 음봉: `-(1 - CLV) × 배수`
//! - 최종 점수는 [-10, 10]으로 제한

use dalal_core::{AccumulationConfig, Candle};
use serde::{Deserialize, Serialize};

use crate::signal::Strength;
use crate::volume_stats::mean_volume;

/// 점수 상한/하한.
pub const SCORE_LIMIT: f64 = 10.0;

/// 매집/분산 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdTrend {
    Accumulation,
    Distribution,
    Neutral,
}

impl AdTrend {
    /// 점수 > 2 매집, < -2 분산, 그 외 중립.
    pub fn from_score(value: f64) -> Self {
        if value > 2.0 {
            AdTrend::Accumulation
        } else if value < -2.0 {
            AdTrend::Distribution
        } else {
            AdTrend::Neutral
        }
    }
}

/// 매집/분산 점수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulationDistributionScore {
    /// [-10, 10]
    pub value: f64,
    pub trend: AdTrend,
    pub strength: Strength,
    /// 거래량 배수가 기준을 넘은 신호 수
    pub strong_signals: usize,
    pub interpretation: String,
}

impl AccumulationDistributionScore {
    /// 데이터 부족 시의 중립 점수.
    pub fn neutral() -> Self {
        Self {
            value: 0.0,
            trend: AdTrend::Neutral,
            strength: Strength::Weak,
            strong_signals: 0,
            interpretation: "Insufficient data for accumulation/distribution analysis".to_string(),
        }
    }
}

/// 매집/분산 점수 계산기.
#[derive(Debug, Clone)]
pub struct AccumulationScorer {
    config: AccumulationConfig,
}

impl Default for AccumulationScorer {
    fn default() -> Self {
        Self::new(&AccumulationConfig::default())
    }
}

impl AccumulationScorer {
    pub fn new(config: &AccumulationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 최근 윈도우의 점수를 계산합니다.
    pub fn score(&self, candles: &[Candle]) -> AccumulationDistributionScore {
        let window = &candles[candles.len().saturating_sub(self.config.window)..];
        if window.is_empty() || window.len() < self.config.min_candles {
            return AccumulationDistributionScore::neutral();
        }

        let average = mean_volume(window);
        let mut score = 0.0;
        let mut strong_signals = 0;

        for candle in window {
            let range = candle.range_f64();
            let clv = if range == 0.0 {
                0.5
            } else {
                (candle.close_f64() - candle.low_f64()) / range
            };
            let multiplier = if average == 0.0 {
                0.0
            } else {
                candle.volume_f64() / average
            };
            let strong = multiplier > self.config.strong_volume_multiplier;

            if clv > 0.7 && candle.is_bullish() {
                score += clv * multiplier;
                strong_signals += usize::from(strong);
            } else if clv < 0.3 && candle.is_bearish() {
                score -= (1.0 - clv) * multiplier;
                strong_signals += usize::from(strong);
            }
        }

        let value = score.clamp(-SCORE_LIMIT, SCORE_LIMIT);
        let trend = AdTrend::from_score(value);
        let strength = if value.abs() > 5.0 || strong_signals >= 3 {
            Strength::Strong
        } else if value.abs() > 2.0 || strong_signals >= 2 {
            Strength::Moderate
        } else {
            Strength::Weak
        };

        AccumulationDistributionScore {
            value,
            trend,
            strength,
            strong_signals,
            interpretation: interpret(trend, strength, strong_signals),
        }
    }
}

fn interpret(trend: AdTrend, strength: Strength, strong_signals: usize) -> String {
    let body = match trend {
        AdTrend::Accumulation => "accumulation: buyers are closing sessions near the highs",
        AdTrend::Distribution => "distribution: sellers are closing sessions near the lows",
        AdTrend::Neutral => "neutral: no clear dominance between buyers and sellers",
    };
    format!(
        "{} {} with {} high-volume signal(s)",
        strength.as_str(),
        body,
        strong_signals
    )
}
