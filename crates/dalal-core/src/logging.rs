//! tracing 구독자 초기화.
//!
//! `[logging]` 설정 섹션 하나로 레벨, 출력 형식, span 이벤트를 정합니다.
//! `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선합니다.
//! 로그는 stderr로 출력되어 CLI의 보고서 출력(stdout)과 섞이지 않습니다.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 여러 줄, 색상 포함 (개발용)
    #[default]
    Pretty,
    /// 로그 수집기용 JSON
    Json,
    /// 한 줄 요약
    Compact,
}

/// 전역 tracing 구독자를 설치합니다.
///
/// 레벨 필터가 잘못되었거나 이미 구독자가 설치되어 있으면 `CoreError::Config`를 반환합니다.
pub fn init_logging(config: &LoggingConfig) -> CoreResult<()> {
    let filter = level_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(span_events);
    let layer = match config.format {
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Json => base.json().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(|e| CoreError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = ?config.format, level = %config.level, "로깅 초기화");
    Ok(())
}

fn level_filter(level: &str) -> CoreResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| CoreError::Config(format!("로그 레벨 '{}': {}", level, e))),
    }
}

/// 심볼/타임프레임 필드가 포함된 분석 span을 생성하는 매크로.
#[macro_export]
macro_rules! analysis_span {
    ($name:expr, $symbol:expr) => {
        tracing::info_span!($name, symbol = %$symbol)
    };
    ($name:expr, $symbol:expr, $timeframe:expr) => {
        tracing::info_span!($name, symbol = %$symbol, timeframe = %$timeframe)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_config() {
        let config = crate::AppConfig::from_toml_str(
            r#"
            [logging]
            level = "dalal_analytics=debug"
            format = "json"
            span_events = true
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.span_events);

        assert!(crate::AppConfig::from_toml_str("[logging]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig::default();
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(CoreError::Config(_))));
    }
}
