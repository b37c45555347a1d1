//! 분석 파이프라인.
//!
//! 캔들 시계열 → {거래량 통계, 피벗} → {레벨, 추세선, 이상치, 패턴, 매집/분산}
//! → 추천 순서로 모든 구성 요소를 실행하여 [`AnalysisResult`]를 만듭니다.
//!
//! 분석은 실패하지 않습니다. 데이터가 부족한 기능은 빈 결과나 중립 값을 반환합니다.

use dalal_core::{AnalysisConfig, Candle, CandleSeries};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accumulation::{AccumulationDistributionScore, AccumulationScorer};
use crate::levels::{nearest_resistance, nearest_support, Level, LevelClusterer};
use crate::pivots::PivotDetector;
use crate::recommendation::{CompositeSignal, Recommendation, RecommendationSynthesizer, TradingRange};
use crate::trendlines::{Trendline, TrendlineFitter};
use crate::volume_anomaly::{VolumeAnomaly, VolumeAnomalyDetector};
use crate::volume_patterns::{VolumePattern, VolumePatternRecognizer, VolumeTrend};
use crate::volume_stats::VolumeStats;

/// 레벨/추세선/패턴/매집 분석에 필요한 최소 캔들 수.
pub const MIN_SERIES_LEN: usize = 5;

/// 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 마지막 종가 (빈 시계열이면 0)
    pub current_price: f64,
    pub candle_count: usize,
    pub pivot_count: usize,
    pub volume_stats: VolumeStats,
    /// 가격 내림차순
    pub levels: Vec<Level>,
    pub nearest_support: Option<Level>,
    pub nearest_resistance: Option<Level>,
    pub trading_range: TradingRange,
    pub trendlines: Vec<Trendline>,
    pub anomalies: Vec<VolumeAnomaly>,
    pub patterns: Vec<VolumePattern>,
    pub volume_trend: VolumeTrend,
    pub accumulation: AccumulationDistributionScore,
    pub recommendation: Recommendation,
    pub signal: CompositeSignal,
}

/// 기술적 분석기.
///
/// 설정만 보관하며 상태가 없으므로 여러 스레드에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct TechnicalAnalyzer {
    pivots: PivotDetector,
    levels: LevelClusterer,
    trendlines: TrendlineFitter,
    anomalies: VolumeAnomalyDetector,
    patterns: VolumePatternRecognizer,
    accumulation: AccumulationScorer,
    recommendation: RecommendationSynthesizer,
}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl TechnicalAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            pivots: PivotDetector::new(&config.pivot),
            levels: LevelClusterer::new(&config.levels),
            trendlines: TrendlineFitter::new(&config.trendline),
            anomalies: VolumeAnomalyDetector::new(&config.anomaly),
            patterns: VolumePatternRecognizer::new(&config.patterns),
            accumulation: AccumulationScorer::new(&config.accumulation),
            recommendation: RecommendationSynthesizer::new(&config.recommendation),
        }
    }

    /// 캔들 시계열을 분석합니다.
    pub fn analyze(&self, series: &CandleSeries) -> AnalysisResult {
        let _span =
            dalal_core::analysis_span!("technical_analysis", series.symbol(), series.timeframe())
                .entered();
        let result = self.analyze_candles(series.candles());
        debug!(
            symbol = %series.symbol(),
            timeframe = %series.timeframe(),
            levels = result.levels.len(),
            anomalies = result.anomalies.len(),
            zone = ?result.recommendation.zone,
            "분석 완료"
        );
        result
    }

    /// 검증된 시간순 캔들 배열을 분석합니다.
    pub fn analyze_candles(&self, candles: &[Candle]) -> AnalysisResult {
        let current_price = candles.last().map(|c| c.close_f64()).unwrap_or(0.0);
        let stats = VolumeStats::from_candles(candles);
        let enough = candles.len() >= MIN_SERIES_LEN;

        let pivots = if enough {
            self.pivots.detect(candles)
        } else {
            Vec::new()
        };
        let levels = self.levels.cluster(&pivots);
        let trendlines = self
            .trendlines
            .fit(&pivots, candles.len().saturating_sub(1));
        debug!(
            pivots = pivots.len(),
            levels = levels.len(),
            trendlines = trendlines.len(),
            "가격 구조 분석"
        );

        let anomalies = self.anomalies.detect(candles, &stats);
        let patterns = self.patterns.recognize(candles, &stats);
        let volume_trend = if enough {
            self.patterns.volume_trend(candles)
        } else {
            VolumeTrend::Stable
        };
        let accumulation = self.accumulation.score(candles);
        debug!(
            mean_volume = stats.mean,
            anomalies = anomalies.len(),
            patterns = patterns.len(),
            ad_score = accumulation.value,
            "거래량 분석"
        );

        let support = nearest_support(&levels, current_price).cloned();
        let resistance = nearest_resistance(&levels, current_price).cloned();
        let recommendation = self.recommendation.synthesize(
            current_price,
            support.as_ref().map(|l| l.price),
            resistance.as_ref().map(|l| l.price),
        );
        let signal = self
            .recommendation
            .composite(&accumulation, &patterns, volume_trend);

        AnalysisResult {
            current_price,
            candle_count: candles.len(),
            pivot_count: pivots.len(),
            volume_stats: stats,
            trading_range: recommendation.trading_range,
            levels,
            nearest_support: support,
            nearest_resistance: resistance,
            trendlines,
            anomalies,
            patterns,
            volume_trend,
            accumulation,
            recommendation,
            signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Zone;
    use dalal_core::{Symbol, Timeframe};

    /// 100 근처에서 반등하고 110 근처에서 저항받는 지그재그 시계열.
    fn ranging_candles() -> Vec<Candle> {
        let closes = [
            104.0, 102.0, 100.2, 102.5, 105.0, 108.0, 109.8, 107.5, 105.0, 102.0, 100.1, 102.5,
            105.0, 108.0, 110.0, 107.5, 105.0, 102.5,
        ];
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                Candle::from_f64(i as i64 * 86_400, c, c + 0.3, c - 0.3, c, 1_000 + i as u64 * 10)
            })
            .collect()
    }

    #[test]
    fn test_empty_series() {
        let series = CandleSeries::new(Symbol::nse("INFY"), Timeframe::D1, Vec::new()).unwrap();
        let result = TechnicalAnalyzer::default().analyze(&series);

        assert_eq!(result.current_price, 0.0);
        assert!(result.levels.is_empty());
        assert!(result.anomalies.is_empty());
        assert_eq!(result.recommendation.zone, Zone::InsufficientData);
    }

    #[test]
    fn test_ranging_series_finds_both_levels() {
        let candles = ranging_candles();
        let series = CandleSeries::new(Symbol::nse("INFY"), Timeframe::D1, candles).unwrap();
        let result = TechnicalAnalyzer::default().analyze(&series);

        assert_eq!(result.levels.len(), 2);
        let support = result.nearest_support.as_ref().unwrap();
        let resistance = result.nearest_resistance.as_ref().unwrap();
        assert!((support.price - 99.85).abs() < 1e-6);
        assert!((resistance.price - 110.2).abs() < 1e-6);
        assert_eq!(result.trading_range.low, support.price);
        assert_eq!(result.current_price, 102.5);
        assert_eq!(result.recommendation.zone, Zone::HoldCloserToSupport);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = TechnicalAnalyzer::default().analyze_candles(&ranging_candles());
        let json = serde_json::to_value(&result).unwrap();

        assert!(json.get("currentPrice").is_some());
        assert!(json.get("nearestSupport").is_some());
        assert!(json.get("tradingRange").is_some());
        assert!(json["levels"][0].get("firstTouch").is_some());
    }
}
