//! Yahoo Finance 캔들 제공자.
//!
//! NSE 종목은 `.NS`, BSE 종목은 `.BO` 접미사로 조회합니다.

use async_trait::async_trait;
use dalal_core::{Candle, CandleProvider, CandleSeries, ProviderError, Symbol, Timeframe};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

use super::build_series;

/// Yahoo Finance 기반 캔들 제공자.
pub struct YahooCandleProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooCandleProvider {
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| ProviderError::Network(format!("Yahoo Finance 연결 실패: {}", e)))?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl CandleProvider for YahooCandleProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    #[instrument(skip(self, symbol, timeframe), fields(symbol = %symbol, timeframe = %timeframe))]
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let ticker = symbol.yahoo_ticker();
        let interval = timeframe.to_yahoo_interval();
        let range = timeframe.yahoo_range(limit);

        debug!(ticker = %ticker, interval = interval, range = range, "Yahoo Finance API 호출");

        let response = self
            .connector
            .get_quote_range(&ticker, interval, range)
            .await
            .map_err(|e| ProviderError::Api(format!("Yahoo Finance API 오류 ({}): {}", ticker, e)))?;

        let quotes = response
            .quotes()
            .map_err(|e| ProviderError::Parse(format!("Quote 파싱 오류: {}", e)))?;

        let raw: Vec<Candle> = quotes
            .iter()
            .map(|q| {
                Candle::new(
                    q.timestamp as i64,
                    Decimal::from_f64_retain(q.open).unwrap_or_default(),
                    Decimal::from_f64_retain(q.high).unwrap_or_default(),
                    Decimal::from_f64_retain(q.low).unwrap_or_default(),
                    Decimal::from_f64_retain(q.close).unwrap_or_default(),
                    q.volume,
                )
            })
            .collect();

        debug!(ticker = %ticker, received = raw.len(), "Yahoo Finance 응답 수신");

        build_series(symbol, timeframe, raw, limit)
    }
}
