//! 로컬 JSON 파일 캔들 제공자.
//!
//! `{dir}/{EXCHANGE}_{TICKER}_{timeframe}.json` 파일에서 캔들 배열을 읽습니다.
//!
//! ```json
//! [
//!   { "timestamp": 1700000000, "open": "2450.5", "high": "2470", "low": "2441.1", "close": "2465", "volume": 5123400 }
//! ]
//! ```

use async_trait::async_trait;
use dalal_core::{Candle, CandleProvider, CandleSeries, ProviderError, Symbol, Timeframe};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use super::build_series;

/// JSON 파일 기반 캔들 제공자.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// 심볼/타임프레임에 해당하는 파일 경로.
    pub fn path_for(&self, symbol: &Symbol, timeframe: Timeframe) -> PathBuf {
        self.dir
            .join(format!(
                "{}_{}_{}.json",
                symbol.exchange.code(),
                symbol.ticker,
                timeframe.as_str()
            ))
    }
}

#[async_trait]
impl CandleProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self, symbol, timeframe), fields(symbol = %symbol, timeframe = %timeframe))]
    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let path = self.path_for(symbol, timeframe);

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ProviderError::NoData(format!("파일 없음: {}", path.display()))
            } else {
                ProviderError::Other(format!("파일 읽기 실패 ({}): {}", path.display(), e))
            }
        })?;

        let raw: Vec<Candle> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Parse(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), candles = raw.len(), "캔들 파일 로드");

        build_series(symbol, timeframe, raw, limit)
    }
}
