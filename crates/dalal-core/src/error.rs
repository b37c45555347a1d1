//! 분석 시스템의 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 파일 또는 환경 변수 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 캔들 불변식 위반 (시간 역순, 고가/저가 범위 밖 가격 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let err = config::Config::builder()
            .add_source(config::File::from_str("= broken", config::FileFormat::Toml))
            .build()
            .unwrap_err();
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Config(_)));
        assert!(core.to_string().starts_with("설정 에러"));
    }
}
