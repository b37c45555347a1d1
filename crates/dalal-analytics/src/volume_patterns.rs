//! 거래량 패턴 인식.
//!
//! 최근 5개/10개 캔들을 대상으로 다음 패턴을 찾습니다 (최소 5개 캔들 필요):
//!
//! | 패턴 | 조건 | 방향 | 신뢰도 |
//! |------|------|------|--------|
//! | Climax Volume | 마지막 거래량 > 평균 × 2.5 | 상승 캔들이면 약세 경고 | 85 |
//! | Strong Accumulation | OBV 상승 + 가격 상승 | 강세 | 80 |
//! | Strong Distribution | OBV 하락 + 가격 하락 | 약세 | 80 |
//! | Bullish Divergence | OBV 상승 + 가격 하락 | 강세 | 70 |
//! | Bearish Divergence | OBV 하락 + 가격 상승 | 약세 | 70 |
//! | Volume Expansion | 후반 평균 거래량 > 전반 × 1.2 | 가격 방향 | 70 |
//! | Volume Contraction | 후반 평균 거래량 < 전반 × 0.8 | 미정 | 65 |

use dalal_core::{Candle, PatternConfig};
use serde::{Deserialize, Serialize};

use crate::indicators::{ObvIndicator, ObvParams};
use crate::signal::Significance;
use crate::volume_stats::{mean_volume, VolumeStats};

/// 인식된 거래량 패턴.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumePattern {
    pub name: String,
    /// 신뢰도 (0-100)
    pub confidence: u8,
    /// 강세 여부 (`None`은 방향 미정)
    pub bullish: Option<bool>,
    pub significance: Significance,
    pub description: String,
}

impl VolumePattern {
    fn new(
        name: &str,
        confidence: u8,
        bullish: Option<bool>,
        significance: Significance,
        description: String,
    ) -> Self {
        Self {
            name: name.to_string(),
            confidence,
            bullish,
            significance,
            description,
        }
    }
}

/// 최근 윈도우의 거래량 추세 (전반/후반 평균 비교).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeTrend {
    Increasing,
    Decreasing,
    #[default]
    Stable,
}

impl VolumeTrend {
    /// 복합 신호 기여도 (+1 / -1 / 0).
    pub fn contribution(&self) -> f64 {
        match self {
            VolumeTrend::Increasing => 1.0,
            VolumeTrend::Decreasing => -1.0,
            VolumeTrend::Stable => 0.0,
        }
    }
}

/// 거래량 패턴 인식기.
#[derive(Debug, Clone)]
pub struct VolumePatternRecognizer {
    config: PatternConfig,
    obv: ObvIndicator,
}

impl Default for VolumePatternRecognizer {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

impl VolumePatternRecognizer {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            config: config.clone(),
            obv: ObvIndicator::new(),
        }
    }

    /// 패턴을 인식합니다. 캔들이 `short_window`개 미만이면 빈 벡터.
    ///
    /// `stats`는 전체 시계열의 거래량 통계이며 클라이맥스 판정의 기준입니다.
    pub fn recognize(&self, candles: &[Candle], stats: &VolumeStats) -> Vec<VolumePattern> {
        if candles.len() < self.config.short_window.max(1) {
            return Vec::new();
        }

        let window = tail(candles, self.config.long_window);
        let mut patterns = Vec::new();

        if let Some(climax) = self.climax(candles, stats) {
            patterns.push(climax);
        }
        if let Some(flow) = self.obv_flow(window) {
            patterns.push(flow);
        }
        if let Some(trend) = self.volume_trend_pattern(window) {
            patterns.push(trend);
        }

        patterns
    }

    /// 최근 `long_window`개 캔들의 거래량 추세.
    pub fn volume_trend(&self, candles: &[Candle]) -> VolumeTrend {
        let window = tail(candles, self.config.long_window);
        if window.len() < 2 {
            return VolumeTrend::Stable;
        }

        let (first, second) = window.split_at(window.len() / 2);
        let first_avg = mean_volume(first);
        if first_avg == 0.0 {
            return VolumeTrend::Stable;
        }

        let change = (mean_volume(second) - first_avg) / first_avg;
        if change > self.config.volume_trend_ratio {
            VolumeTrend::Increasing
        } else if change < -self.config.volume_trend_ratio {
            VolumeTrend::Decreasing
        } else {
            VolumeTrend::Stable
        }
    }

    fn climax(&self, candles: &[Candle], stats: &VolumeStats) -> Option<VolumePattern> {
        let last = candles.last()?;
        let threshold = stats.mean * self.config.climax_multiplier;
        if last.volume_f64() <= threshold {
            return None;
        }

        let change = last.change_pct();
        let up_move = change > self.config.climax_up_move_pct;
        let ratio = if stats.mean > 0.0 {
            last.volume_f64() / stats.mean
        } else {
            0.0
        };

        let description = if up_move {
            format!(
                "Climax volume ({:.1}x average) on a {:+.2}% up move: possible exhaustion, watch for a bearish reversal",
                ratio, change
            )
        } else {
            format!(
                "Climax volume ({:.1}x average) on a {:+.2}% session: possible capitulation, watch for a bullish reversal",
                ratio, change
            )
        };

        Some(VolumePattern::new(
            "Climax Volume",
            85,
            Some(!up_move),
            Significance::High,
            description,
        ))
    }

    fn obv_flow(&self, window: &[Candle]) -> Option<VolumePattern> {
        let (first, last) = (window.first()?, window.last()?);
        let obv = self.obv.calculate(window, ObvParams::default());
        let obv_slope = self.obv.slope(&obv);
        let price_slope = (last.close_f64() - first.close_f64()) / window.len() as f64;

        let obv_up = obv_slope > 0.0;
        let obv_down = obv_slope < 0.0;
        let price_up = price_slope > 0.0;
        let price_down = price_slope < 0.0;

        let pattern = if obv_up && price_up {
            VolumePattern::new(
                "Strong Accumulation",
                80,
                Some(true),
                Significance::High,
                "Rising OBV confirms the price advance: volume is flowing into the stock".to_string(),
            )
        } else if obv_down && price_down {
            VolumePattern::new(
                "Strong Distribution",
                80,
                Some(false),
                Significance::High,
                "Falling OBV confirms the price decline: volume is flowing out of the stock".to_string(),
            )
        } else if obv_up && price_down {
            VolumePattern::new(
                "Bullish Divergence",
                70,
                Some(true),
                Significance::Medium,
                "OBV is rising while price falls: buyers may be absorbing supply".to_string(),
            )
        } else if obv_down && price_up {
            VolumePattern::new(
                "Bearish Divergence",
                70,
                Some(false),
                Significance::Medium,
                "OBV is falling while price rises: the advance lacks volume support".to_string(),
            )
        } else {
            return None;
        };

        Some(pattern)
    }

    fn volume_trend_pattern(&self, window: &[Candle]) -> Option<VolumePattern> {
        match self.volume_trend(window) {
            VolumeTrend::Increasing => {
                let rising = match (window.first(), window.last()) {
                    (Some(first), Some(last)) => last.close > first.close,
                    _ => false,
                };
                Some(VolumePattern::new(
                    "Volume Expansion",
                    70,
                    Some(rising),
                    Significance::Medium,
                    format!(
                        "Volume expanding while price {}: participation is increasing",
                        if rising { "rises" } else { "does not rise" }
                    ),
                ))
            }
            VolumeTrend::Decreasing => Some(VolumePattern::new(
                "Volume Contraction",
                65,
                None,
                Significance::Medium,
                "Volume contracting: consolidation, a breakout may follow in either direction"
                    .to_string(),
            )),
            VolumeTrend::Stable => None,
        }
    }
}

fn tail(candles: &[Candle], n: usize) -> &[Candle] {
    &candles[candles.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(ts: i64, open: f64, close: f64, volume: u64) -> Candle {
        let high = open.max(close) + 0.5;
        let low = open.min(close) - 0.5;
        Candle::from_f64(ts, open, high, low, close, volume)
    }

    fn names(patterns: &[VolumePattern]) -> Vec<&str> {
        patterns.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_requires_five_candles() {
        let candles: Vec<Candle> = (0..4).map(|i| candle(i, 100.0, 101.0, 1_000)).collect();
        let stats = VolumeStats::from_candles(&candles);
        assert!(VolumePatternRecognizer::default()
            .recognize(&candles, &stats)
            .is_empty());
    }

    #[test]
    fn test_climax_on_up_move_is_bearish() {
        let mut candles: Vec<Candle> = (0..19).map(|i| candle(i, 100.0, 100.0, 1_000)).collect();
        candles.push(candle(19, 100.0, 103.0, 10_000));
        let stats = VolumeStats::from_candles(&candles);

        let patterns = VolumePatternRecognizer::default().recognize(&candles, &stats);
        let climax = patterns.iter().find(|p| p.name == "Climax Volume").unwrap();
        assert_eq!(climax.bullish, Some(false));
        assert_eq!(climax.confidence, 85);
        assert_eq!(climax.significance, Significance::High);
    }

    #[test]
    fn test_climax_on_down_move_is_bullish() {
        let mut candles: Vec<Candle> = (0..19).map(|i| candle(i, 100.0, 100.0, 1_000)).collect();
        candles.push(candle(19, 100.0, 97.0, 10_000));
        let stats = VolumeStats::from_candles(&candles);

        let patterns = VolumePatternRecognizer::default().recognize(&candles, &stats);
        let climax = patterns.iter().find(|p| p.name == "Climax Volume").unwrap();
        assert_eq!(climax.bullish, Some(true));
    }

    #[test]
    fn test_strong_accumulation() {
        let candles: Vec<Candle> = (0..10)
            .map(|i| {
                let open = 100.0 + i as f64;
                candle(i, open, open + 0.8, 1_000)
            })
            .collect();
        let stats = VolumeStats::from_candles(&candles);

        let patterns = VolumePatternRecognizer::default().recognize(&candles, &stats);
        assert_eq!(names(&patterns), vec!["Strong Accumulation"]);
        assert_eq!(patterns[0].bullish, Some(true));
    }

    #[test]
    fn test_bullish_divergence() {
        // 종가는 전체적으로 하락하지만 상승일의 거래량이 훨씬 큼
        let closes = [110.0, 111.0, 108.0, 109.0, 106.0, 107.0, 104.0, 105.0, 102.0, 103.0];
        let volumes = [1_000, 5_000, 1_000, 5_000, 1_000, 5_000, 1_000, 5_000, 1_000, 5_000];
        let candles: Vec<Candle> = closes
            .iter()
            .zip(volumes)
            .enumerate()
            .map(|(i, (&c, v))| candle(i as i64, c, c, v))
            .collect();
        let stats = VolumeStats::from_candles(&candles);

        let patterns = VolumePatternRecognizer::default().recognize(&candles, &stats);
        let divergence = patterns
            .iter()
            .find(|p| p.name == "Bullish Divergence")
            .unwrap();
        assert_eq!(divergence.confidence, 70);
        assert_eq!(divergence.significance, Significance::Medium);
    }

    #[test]
    fn test_volume_trend() {
        let recognizer = VolumePatternRecognizer::default();

        let expanding: Vec<Candle> = (0..10)
            .map(|i| candle(i, 100.0, 100.0, if i < 5 { 1_000 } else { 1_500 }))
            .collect();
        assert_eq!(recognizer.volume_trend(&expanding), VolumeTrend::Increasing);

        let contracting: Vec<Candle> = (0..10)
            .map(|i| candle(i, 100.0, 100.0, if i < 5 { 1_000 } else { 700 }))
            .collect();
        assert_eq!(recognizer.volume_trend(&contracting), VolumeTrend::Decreasing);
        let stats = VolumeStats::from_candles(&contracting);
        let patterns = recognizer.recognize(&contracting, &stats);
        assert_eq!(names(&patterns), vec!["Volume Contraction"]);
        assert_eq!(patterns[0].bullish, None);

        let steady: Vec<Candle> = (0..10)
            .map(|i| candle(i, 100.0, 100.0, if i < 5 { 1_000 } else { 1_100 }))
            .collect();
        assert_eq!(recognizer.volume_trend(&steady), VolumeTrend::Stable);
    }

    #[test]
    fn test_zero_first_half_is_stable() {
        let candles: Vec<Candle> = (0..10)
            .map(|i| candle(i, 100.0, 100.0, if i < 5 { 0 } else { 1_000 }))
            .collect();
        assert_eq!(
            VolumePatternRecognizer::default().volume_trend(&candles),
            VolumeTrend::Stable
        );
    }
}
