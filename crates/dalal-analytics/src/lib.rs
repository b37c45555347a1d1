//! 기술적 시장 분석 엔진.
//!
//! 이 크레이트는 시간순 OHLCV 캔들 시계열에서 다음을 계산합니다:
//! - 거래량 통계 (평균, 모표준편차, 중앙값)
//! - 피벗 고점/저점 탐지
//! - 지지/저항 레벨 클러스터링
//! - 최소제곱 추세선 적합 (결정계수 게이트)
//! - 거래량 이상치 (z-score)
//! - 거래량 패턴 (클라이맥스, OBV 다이버전스, 거래량 확장/수축)
//! - 매집/분산 점수
//! - 매매 구간 추천과 복합 신호
//!
//! 모든 계산은 동기적이며 입력 시계열의 순수 함수입니다. I/O, 캐시, 재시도는
//! 호출자(`dalal-data`)의 책임입니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use dalal_analytics::TechnicalAnalyzer;
//! use dalal_core::AnalysisConfig;
//!
//! let analyzer = TechnicalAnalyzer::new(AnalysisConfig::default());
//! let result = analyzer.analyze(&series);
//!
//! for level in &result.levels {
//!     println!("{:?} {:.2} ({} touches)", level.kind, level.price, level.touches);
//! }
//! println!("{}", result.recommendation.text);
//! ```

pub mod accumulation;
pub mod analyzer;
pub mod indicators;
pub mod levels;
pub mod pivots;
pub mod recommendation;
pub mod signal;
pub mod trendlines;
pub mod volume_anomaly;
pub mod volume_patterns;
pub mod volume_stats;

pub use accumulation::{AccumulationDistributionScore, AccumulationScorer, AdTrend};
pub use analyzer::{AnalysisResult, TechnicalAnalyzer, MIN_SERIES_LEN};
pub use indicators::{ObvIndicator, ObvParams, ObvResult};
pub use levels::{nearest_resistance, nearest_support, Level, LevelClusterer, LevelKind};
pub use pivots::{Pivot, PivotDetector, PivotKind};
pub use recommendation::{
    Action, CompositeSignal, Recommendation, RecommendationSynthesizer, SignalTier, TradingRange,
    Zone,
};
pub use signal::{Significance, Strength};
pub use trendlines::{fit_line, LineFit, TrendPoint, Trendline, TrendlineFitter, TrendlineKind};
pub use volume_anomaly::{AnomalyKind, VolumeAnomaly, VolumeAnomalyDetector};
pub use volume_patterns::{VolumePattern, VolumePatternRecognizer, VolumeTrend};
pub use volume_stats::VolumeStats;
