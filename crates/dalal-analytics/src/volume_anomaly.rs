//! 거래량 이상치 탐지.
//!
//! 각 캔들의 거래량 z-score가 임계값(기본 1.5) 이상이면 이상치로 표시합니다.
//! 표준편차가 0이면 어떤 캔들도 이상치가 아닙니다.

use dalal_core::{AnomalyConfig, Candle};
use serde::{Deserialize, Serialize};

use crate::signal::Significance;
use crate::volume_stats::VolumeStats;

/// 이상치 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// 평균보다 많은 거래량
    Spike,
    /// 평균보다 적은 거래량
    Drop,
}

/// 거래량 이상치.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAnomaly {
    pub timestamp: i64,
    /// 원본 시계열에서의 캔들 위치
    pub index: usize,
    pub volume: u64,
    pub z_score: f64,
    /// 평균 대비 편차 (%)
    pub percent_deviation_from_mean: f64,
    pub kind: AnomalyKind,
    pub significance: Significance,
    /// 당일 가격 변동률 (%)
    pub sameday_price_change_percent: f64,
    pub interpretation: String,
}

/// 거래량 이상치 탐지기.
#[derive(Debug, Clone)]
pub struct VolumeAnomalyDetector {
    config: AnomalyConfig,
}

impl Default for VolumeAnomalyDetector {
    fn default() -> Self {
        Self::new(&AnomalyConfig::default())
    }
}

impl VolumeAnomalyDetector {
    pub fn new(config: &AnomalyConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// z-score를 분류합니다. `|z|`가 임계값 미만이면 `None`.
    pub fn classify(&self, z: f64) -> Option<(AnomalyKind, Significance)> {
        if !z.is_finite() || z.abs() < self.config.z_threshold {
            return None;
        }
        let kind = if z > 0.0 {
            AnomalyKind::Spike
        } else {
            AnomalyKind::Drop
        };
        Some((kind, Significance::from_z_score(z)))
    }

    /// 이상치를 탐지하여 최근 `max_results`개를 시간순으로 반환합니다.
    pub fn detect(&self, candles: &[Candle], stats: &VolumeStats) -> Vec<VolumeAnomaly> {
        if stats.std_dev == 0.0 {
            return Vec::new();
        }

        let mut anomalies: Vec<VolumeAnomaly> = candles
            .iter()
            .enumerate()
            .filter_map(|(index, candle)| {
                let z = stats.z_score(candle.volume_f64())?;
                let (kind, significance) = self.classify(z)?;
                Some(self.build(index, candle, stats, z, kind, significance))
            })
            .collect();

        let excess = anomalies.len().saturating_sub(self.config.max_results);
        anomalies.drain(..excess);
        anomalies
    }

    fn build(
        &self,
        index: usize,
        candle: &Candle,
        stats: &VolumeStats,
        z_score: f64,
        kind: AnomalyKind,
        significance: Significance,
    ) -> VolumeAnomaly {
        let percent_deviation_from_mean = if stats.mean == 0.0 {
            0.0
        } else {
            (candle.volume_f64() - stats.mean) / stats.mean * 100.0
        };
        let price_change = candle.change_pct();

        VolumeAnomaly {
            timestamp: candle.timestamp,
            index,
            volume: candle.volume,
            z_score,
            percent_deviation_from_mean,
            kind,
            significance,
            sameday_price_change_percent: price_change,
            interpretation: self.interpret(kind, significance, percent_deviation_from_mean, price_change),
        }
    }

    fn interpret(
        &self,
        kind: AnomalyKind,
        significance: Significance,
        deviation: f64,
        price_change: f64,
    ) -> String {
        let threshold = self.config.conviction_move_pct;
        let sig = significance.as_str();

        match kind {
            AnomalyKind::Spike if price_change > threshold => format!(
                "{} volume spike ({:+.0}% vs average) with strong buying pressure: price rose {:.2}%, conviction behind the advance",
                sig, deviation, price_change
            ),
            AnomalyKind::Spike if price_change < -threshold => format!(
                "{} volume spike ({:+.0}% vs average) with heavy selling pressure: price fell {:.2}%, conviction behind the decline",
                sig, deviation, price_change.abs()
            ),
            AnomalyKind::Spike => format!(
                "{} volume spike ({:+.0}% vs average) with little price movement ({:+.2}%): indecision or absorption",
                sig, deviation, price_change
            ),
            AnomalyKind::Drop if price_change.abs() > threshold => format!(
                "{} volume drop ({:+.0}% vs average) while price moved {:+.2}%: move lacks participation",
                sig, deviation, price_change
            ),
            AnomalyKind::Drop => format!(
                "{} volume drop ({:+.0}% vs average) with a quiet session ({:+.2}%): lack of interest",
                sig, deviation, price_change
            ),
        }
    }
}
