//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 분석 엔진의 모든 임계값은 [`AnalysisConfig`]에 모여 있으며,
//! 기본값은 엔진이 정의하는 표준 상수와 동일합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CoreResult;
use crate::logging::LogFormat;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데이터 수집/캐시 설정
    pub data: DataConfig,
    /// 분석 엔진 설정
    pub analysis: AnalysisConfig,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 레벨 필터 (예: "info", "dalal_data=debug,info")
    pub level: String,
    /// 출력 형식
    pub format: LogFormat,
    /// span 진입/종료 이벤트 기록 여부
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            span_events: false,
        }
    }
}

/// 캔들 데이터 제공자 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Yahoo Finance
    #[default]
    Yahoo,
    /// 로컬 JSON 파일
    File,
}

/// 데이터 관리 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 기본 캔들 제공자
    pub provider: ProviderKind,
    /// 파일 제공자가 읽을 디렉토리
    pub data_dir: String,
    /// 기본 제공자 실패 시 사용할 파일 디렉토리 (선택)
    pub fallback_dir: Option<String>,
    /// 캔들 조회 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 분석 결과 캐시 TTL (초)
    pub analysis_cache_ttl_secs: u64,
    /// 분석 결과 캐시 최대 항목 수
    pub analysis_cache_max_entries: usize,
    /// 기본 조회 캔들 수
    pub default_lookback: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Yahoo,
            data_dir: "./data".to_string(),
            fallback_dir: None,
            fetch_timeout_secs: 10,
            analysis_cache_ttl_secs: 300,
            analysis_cache_max_entries: 256,
            default_lookback: 120,
        }
    }
}

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 피벗 탐지
    pub pivot: PivotConfig,
    /// 지지/저항 레벨 클러스터링
    pub levels: LevelConfig,
    /// 추세선 적합
    pub trendline: TrendlineConfig,
    /// 거래량 이상치 탐지
    pub anomaly: AnomalyConfig,
    /// 거래량 패턴 인식
    pub patterns: PatternConfig,
    /// 매집/분산 점수
    pub accumulation: AccumulationConfig,
    /// 매매 추천
    pub recommendation: RecommendationConfig,
}

/// 피벗 탐지 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PivotConfig {
    /// 좌우 비교 캔들 수 (대칭 윈도우 반경)
    pub window: usize,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self { window: 2 }
    }
}

/// 레벨 클러스터링 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LevelConfig {
    /// 같은 레벨로 묶을 상대 거리 (0.015 = 1.5%)
    pub tolerance_ratio: f64,
    /// 레벨로 인정할 최소 터치 수
    pub min_touches: usize,
    /// 신뢰도 상한
    pub max_confidence: u8,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            tolerance_ratio: 0.015,
            min_touches: 2,
            max_confidence: 95,
        }
    }
}

/// 추세선 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrendlineConfig {
    /// 채택할 최소 결정계수 (초과해야 함)
    pub min_r_squared: f64,
    /// 적합에 필요한 최소 피벗 수
    pub min_points: usize,
    /// 표시용으로 첨부할 최근 피벗 수
    pub display_points: usize,
}

impl Default for TrendlineConfig {
    fn default() -> Self {
        Self {
            min_r_squared: 0.7,
            min_points: 2,
            display_points: 3,
        }
    }
}

/// 거래량 이상치 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// 이상치로 판정할 |z| 하한 (포함)
    pub z_threshold: f64,
    /// 반환할 최근 이상치 최대 개수
    pub max_results: usize,
    /// 확신/망설임을 가르는 당일 가격 변동률 (%)
    pub conviction_move_pct: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_threshold: 1.5,
            max_results: 10,
            conviction_move_pct: 2.0,
        }
    }
}

/// 거래량 패턴 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternConfig {
    /// 패턴 인식에 필요한 최소 캔들 수 (단기 윈도우)
    pub short_window: usize,
    /// OBV/거래량 추세 윈도우
    pub long_window: usize,
    /// 클라이맥스 거래량 배수 (평균 대비)
    pub climax_multiplier: f64,
    /// 클라이맥스 캔들을 상승으로 볼 당일 변동률 (%)
    pub climax_up_move_pct: f64,
    /// 거래량 확장/수축 판정 비율 (0.2 = 20%)
    pub volume_trend_ratio: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            short_window: 5,
            long_window: 10,
            climax_multiplier: 2.5,
            climax_up_move_pct: 1.0,
            volume_trend_ratio: 0.2,
        }
    }
}

/// 매집/분산 점수 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccumulationConfig {
    /// 분석 윈도우 (최근 캔들 수)
    pub window: usize,
    /// 계산에 필요한 최소 캔들 수
    pub min_candles: usize,
    /// 강한 신호로 볼 거래량 배수
    pub strong_volume_multiplier: f64,
}

impl Default for AccumulationConfig {
    fn default() -> Self {
        Self {
            window: 10,
            min_candles: 5,
            strong_volume_multiplier: 1.5,
        }
    }
}

/// 매매 추천 설정.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// 매수/매도 구간으로 볼 레벨 근접 거리 (%)
    pub near_level_pct: f64,
    /// 양쪽 레벨이 모두 이 거리(%)보다 멀면 관망
    pub hold_distance_pct: f64,
    /// 레벨이 없을 때 거래 범위를 만들 현재가 대비 비율 (0.05 = ±5%)
    pub range_fallback_ratio: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            near_level_pct: 1.0,
            hold_distance_pct: 2.0,
            range_fallback_ratio: 0.05,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `DALAL__DATA__FETCH_TIMEOUT_SECS=5` 형식으로 오버라이드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment());

        Ok(builder.build()?.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다. 파일이 없으면 기본값을 사용합니다.
    pub fn load_default() -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(Self::environment());

        Ok(builder.build()?.try_deserialize()?)
    }

    /// TOML 문자열에서 설정을 로드합니다.
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(content, config::FileFormat::Toml));

        Ok(builder.build()?.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("DALAL")
            .separator("__")
            .try_parsing(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_constants() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.pivot.window, 2);
        assert_eq!(config.analysis.levels.tolerance_ratio, 0.015);
        assert_eq!(config.analysis.levels.max_confidence, 95);
        assert_eq!(config.analysis.trendline.min_r_squared, 0.7);
        assert_eq!(config.analysis.anomaly.z_threshold, 1.5);
        assert_eq!(config.analysis.anomaly.max_results, 10);
        assert_eq!(config.analysis.patterns.climax_multiplier, 2.5);
        assert_eq!(config.analysis.accumulation.window, 10);
        assert_eq!(config.analysis.recommendation.near_level_pct, 1.0);
        assert_eq!(config.data.provider, ProviderKind::Yahoo);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [data]
            provider = "file"
            data_dir = "/tmp/candles"

            [analysis.levels]
            tolerance_ratio = 0.02
            "#,
        )
        .unwrap();

        assert_eq!(config.data.provider, ProviderKind::File);
        assert_eq!(config.data.data_dir, "/tmp/candles");
        assert_eq!(config.data.fetch_timeout_secs, 10);
        assert_eq!(config.analysis.levels.tolerance_ratio, 0.02);
        assert_eq!(config.analysis.levels.min_touches, 2);
        assert_eq!(config.analysis.pivot.window, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_shipped_default_toml_matches_defaults() {
        let config =
            AppConfig::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert_eq!(config.data.default_lookback, 120);
        assert_eq!(config.data.fallback_dir, None);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = AppConfig::from_toml_str("[data]\nprovider = \"carrier-pigeon\"");
        assert!(matches!(result, Err(crate::CoreError::Config(_))));
    }
}
