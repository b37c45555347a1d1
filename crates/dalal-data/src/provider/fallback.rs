//! 대체 소스 제공자.
//!
//! 기본 제공자가 실패하면 보조 제공자에서 조회하고, 그 결과에
//! `DataOrigin::Fallback` 태그를 붙여 호출자가 구분할 수 있게 합니다.

use async_trait::async_trait;
use dalal_core::{CandleProvider, CandleSeries, DataOrigin, ProviderError, Symbol, Timeframe};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// 기본/보조 제공자 조합.
pub struct FallbackProvider {
    primary: Arc<dyn CandleProvider>,
    secondary: Arc<dyn CandleProvider>,
    primary_timeout: Option<Duration>,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn CandleProvider>, secondary: Arc<dyn CandleProvider>) -> Self {
        Self {
            primary,
            secondary,
            primary_timeout: None,
        }
    }

    /// 기본 제공자 조회 제한 시간.
    ///
    /// 시간을 넘기면 기본 제공자 실패로 보고 보조 제공자로 넘어갑니다.
    pub fn with_primary_timeout(mut self, timeout: Duration) -> Self {
        self.primary_timeout = Some(timeout);
        self
    }

    async fn fetch_primary(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let fetch = self.primary.fetch_candles(symbol, timeframe, limit);
        match self.primary_timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch).await.map_err(|_| {
                ProviderError::Network(format!(
                    "{} 응답 없음 ({}초)",
                    self.primary.name(),
                    timeout.as_secs_f64()
                ))
            })?,
            None => fetch.await,
        }
    }
}

#[async_trait]
impl CandleProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let primary_error = match self.fetch_primary(symbol, timeframe, limit).await {
            Ok(series) => return Ok(series),
            Err(e) => e,
        };

        warn!(
            symbol = %symbol,
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = %primary_error,
            "기본 제공자 실패, 대체 소스 사용"
        );

        match self.secondary.fetch_candles(symbol, timeframe, limit).await {
            Ok(series) => Ok(series.with_origin(DataOrigin::Fallback)),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "대체 소스도 실패");
                Err(primary_error)
            }
        }
    }
}
