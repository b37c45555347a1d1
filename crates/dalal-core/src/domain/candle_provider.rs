//! 캔들 데이터 제공자 추상화.
//!
//! 분석 엔진은 I/O를 하지 않습니다. 캔들 시계열 조회는 이 trait를 구현한
//! 외부 협력자가 담당하며, 타임아웃/재시도 정책도 호출자의 책임입니다.

use async_trait::async_trait;
use thiserror::Error;

use super::CandleSeries;
use crate::types::{Symbol, Timeframe};

/// CandleProvider 에러.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// API 에러
    #[error("API 에러: {0}")]
    Api(String),

    /// 데이터 없음
    #[error("데이터 없음: {0}")]
    NoData(String),

    /// 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 기타 에러
    #[error("기타 에러: {0}")]
    Other(String),
}

impl ProviderError {
    /// 재시도 가능한 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Network(_))
    }
}

/// 캔들 시계열 제공자 trait.
///
/// # 구현 예시
///
/// ```ignore
/// pub struct MyProvider { client: Client }
///
/// #[async_trait]
/// impl CandleProvider for MyProvider {
///     fn name(&self) -> &str { "my-provider" }
///
///     async fn fetch_candles(
///         &self,
///         symbol: &Symbol,
///         timeframe: Timeframe,
///         limit: usize,
///     ) -> Result<CandleSeries, ProviderError> {
///         // API 호출 후 CandleSeries::new로 검증
///     }
/// }
/// ```
#[async_trait]
pub trait CandleProvider: Send + Sync {
    /// 로그/진단용 제공자 이름.
    fn name(&self) -> &str;

    /// 최근 `limit`개 캔들을 시간 오름차순으로 조회합니다.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Network`: 네트워크 연결 실패
    /// - `ProviderError::Api`: 원격 API 에러
    /// - `ProviderError::NoData`: 심볼에 대한 데이터가 없음
    /// - `ProviderError::Parse`: 응답 형식 또는 캔들 불변식 위반
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError>;
}
