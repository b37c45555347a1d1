//! 매매 구간 추천.
//!
//! 현재가와 가장 가까운 지지/저항 레벨의 상대 거리로 구간을 분류합니다
//! (먼저 일치하는 규칙이 우선):
//!
//! 1. 두 레벨 모두 없음: 데이터 부족 (관망)
//! 2. 지지까지 거리 < 1%: 매수 구간
//! 3. 저항까지 거리 < 1%: 매도 구간
//! 4. 두 거리 모두 > 2%: 관망 (더 가까운 쪽 표시)
//! 5. 그 외: 일반 관망
//!
//! 복합 신호는 매집/분산 점수(가중치 2), 패턴 신뢰도 균형(/20),
//! 거래량 추세(±1)를 합산하여 5단계로 나눕니다.

use dalal_core::RecommendationConfig;
use serde::{Deserialize, Serialize};

use crate::accumulation::AccumulationDistributionScore;
use crate::levels::{nearest_resistance, nearest_support, Level};
use crate::volume_patterns::{VolumePattern, VolumeTrend};

/// 구간 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    InsufficientData,
    BuyZone,
    SellZone,
    HoldCloserToSupport,
    HoldCloserToResistance,
    Hold,
}

impl Zone {
    pub fn action(&self) -> Action {
        match self {
            Zone::BuyZone => Action::Buy,
            Zone::SellZone => Action::Sell,
            _ => Action::Hold,
        }
    }
}

/// 권장 행동.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

/// 거래 범위.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradingRange {
    pub low: f64,
    pub high: f64,
}

/// 매매 구간 추천.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub zone: Zone,
    pub action: Action,
    pub current_price: f64,
    pub nearest_support: Option<f64>,
    pub nearest_resistance: Option<f64>,
    /// (현재가 - 지지) / 현재가 × 100
    pub distance_to_support_pct: Option<f64>,
    /// (저항 - 현재가) / 현재가 × 100
    pub distance_to_resistance_pct: Option<f64>,
    pub trading_range: TradingRange,
    pub text: String,
}

/// 복합 신호 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalTier {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl SignalTier {
    /// 점수 > 4 StrongBuy, > 2 Buy, > -2 Hold, > -4 Sell, 그 외 StrongSell.
    pub fn from_score(score: f64) -> Self {
        if score > 4.0 {
            SignalTier::StrongBuy
        } else if score > 2.0 {
            SignalTier::Buy
        } else if score > -2.0 {
            SignalTier::Hold
        } else if score > -4.0 {
            SignalTier::Sell
        } else {
            SignalTier::StrongSell
        }
    }
}

/// 거래량 기반 복합 신호.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSignal {
    pub score: f64,
    pub tier: SignalTier,
    pub rationale: String,
}

/// 추천 생성기.
#[derive(Debug, Clone)]
pub struct RecommendationSynthesizer {
    config: RecommendationConfig,
}

impl Default for RecommendationSynthesizer {
    fn default() -> Self {
        Self::new(&RecommendationConfig::default())
    }
}

impl RecommendationSynthesizer {
    pub fn new(config: &RecommendationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 레벨 목록에서 가장 가까운 지지/저항을 찾아 추천을 생성합니다.
    pub fn from_levels(&self, current_price: f64, levels: &[Level]) -> Recommendation {
        self.synthesize(
            current_price,
            nearest_support(levels, current_price).map(|l| l.price),
            nearest_resistance(levels, current_price).map(|l| l.price),
        )
    }

    /// 현재가와 지지/저항 가격으로 추천을 생성합니다.
    pub fn synthesize(
        &self,
        current_price: f64,
        support: Option<f64>,
        resistance: Option<f64>,
    ) -> Recommendation {
        let ratio = self.config.range_fallback_ratio;
        let trading_range = TradingRange {
            low: support.unwrap_or(current_price * (1.0 - ratio)),
            high: resistance.unwrap_or(current_price * (1.0 + ratio)),
        };

        let valid_price = current_price > 0.0 && current_price.is_finite();
        let to_support = support
            .filter(|_| valid_price)
            .map(|s| (current_price - s) / current_price * 100.0);
        let to_resistance = resistance
            .filter(|_| valid_price)
            .map(|r| (r - current_price) / current_price * 100.0);

        let near = self.config.near_level_pct;
        let far = self.config.hold_distance_pct;

        let (zone, text) = match (to_support, to_resistance) {
            (None, None) => (
                Zone::InsufficientData,
                "Hold: insufficient data, no significant support or resistance levels found"
                    .to_string(),
            ),
            (Some(ds), _) if ds < near => (
                Zone::BuyZone,
                format!(
                    "Buy zone: price {:.2} is {:.2}% above support at {:.2}",
                    current_price,
                    ds,
                    support.unwrap_or_default()
                ),
            ),
            (_, Some(dr)) if dr < near => (
                Zone::SellZone,
                format!(
                    "Sell zone: price {:.2} is {:.2}% below resistance at {:.2}",
                    current_price,
                    dr,
                    resistance.unwrap_or_default()
                ),
            ),
            (Some(ds), Some(dr)) if ds > far && dr > far => {
                if ds <= dr {
                    (
                        Zone::HoldCloserToSupport,
                        format!(
                            "Hold: price is mid-range, closer to support at {:.2} ({:.2}% away) than resistance at {:.2}",
                            support.unwrap_or_default(),
                            ds,
                            resistance.unwrap_or_default()
                        ),
                    )
                } else {
                    (
                        Zone::HoldCloserToResistance,
                        format!(
                            "Hold: price is mid-range, closer to resistance at {:.2} ({:.2}% away) than support at {:.2}",
                            resistance.unwrap_or_default(),
                            dr,
                            support.unwrap_or_default()
                        ),
                    )
                }
            }
            _ => (
                Zone::Hold,
                format!(
                    "Hold: support at {}, resistance at {}",
                    format_level(support),
                    format_level(resistance)
                ),
            ),
        };

        Recommendation {
            zone,
            action: zone.action(),
            current_price,
            nearest_support: support,
            nearest_resistance: resistance,
            distance_to_support_pct: to_support,
            distance_to_resistance_pct: to_resistance,
            trading_range,
            text,
        }
    }

    /// 매집/분산 점수, 패턴, 거래량 추세를 하나의 복합 신호로 결합합니다.
    pub fn composite(
        &self,
        accumulation: &AccumulationDistributionScore,
        patterns: &[VolumePattern],
        volume_trend: VolumeTrend,
    ) -> CompositeSignal {
        let bullish: f64 = patterns
            .iter()
            .filter(|p| p.bullish == Some(true))
            .map(|p| f64::from(p.confidence))
            .sum();
        let bearish: f64 = patterns
            .iter()
            .filter(|p| p.bullish == Some(false))
            .map(|p| f64::from(p.confidence))
            .sum();

        let ad_part = accumulation.value * 2.0;
        let pattern_part = (bullish - bearish) / 20.0;
        let trend_part = volume_trend.contribution();
        let score = ad_part + pattern_part + trend_part;

        CompositeSignal {
            score,
            tier: SignalTier::from_score(score),
            rationale: format!(
                "A/D {:+.2} (x2 = {:+.2}), pattern balance {:+.2}, volume trend {:?} ({:+.0})",
                accumulation.value, ad_part, pattern_part, volume_trend, trend_part
            ),
        }
    }
}

fn format_level(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("{:.2}", p),
        None => "n/a".to_string(),
    }
}
