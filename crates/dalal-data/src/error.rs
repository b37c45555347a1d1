//! 데이터 모듈 오류 타입.

use dalal_core::ProviderError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 캔들 제공자 오류
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// 타임아웃 오류
    #[error("Operation timeout: {0}")]
    Timeout(String),

    /// 잘못된 요청 인자
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl DataError {
    /// 재시도 가능한 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            DataError::Timeout(_) => true,
            DataError::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
