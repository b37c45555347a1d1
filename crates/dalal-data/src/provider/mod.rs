//! 캔들 데이터 제공자 구현.
//!
//! - [`YahooCandleProvider`]: Yahoo Finance (NSE `.NS`, BSE `.BO`)
//! - [`JsonFileProvider`]: 로컬 JSON 파일
//! - [`FallbackProvider`]: 기본 제공자 실패 시 대체 소스 사용 (출처 태그)

mod fallback;
mod file;
mod yahoo;

pub use fallback::FallbackProvider;
pub use file::JsonFileProvider;
pub use yahoo::YahooCandleProvider;

use std::sync::Arc;
use std::time::Duration;

use dalal_core::{
    Candle, CandleProvider, CandleSeries, DataConfig, DecimalExt, ProviderError, ProviderKind,
    Symbol, Timeframe,
};

use crate::error::Result;

/// 설정에 맞는 제공자를 생성합니다.
///
/// `fallback_dir`이 지정되어 있으면 기본 제공자를 [`FallbackProvider`]로 감쌉니다.
pub fn build_provider(config: &DataConfig) -> Result<Arc<dyn CandleProvider>> {
    let primary: Arc<dyn CandleProvider> = match config.provider {
        ProviderKind::Yahoo => Arc::new(YahooCandleProvider::new()?),
        ProviderKind::File => Arc::new(JsonFileProvider::new(&config.data_dir)),
    };

    Ok(match &config.fallback_dir {
        Some(dir) => Arc::new(
            FallbackProvider::new(primary, Arc::new(JsonFileProvider::new(dir)))
                .with_primary_timeout(primary_timeout(config)),
        ),
        None => primary,
    })
}

/// 대체 소스 조회 시간을 남기도록 전체 조회 타임아웃의 절반을 기본 제공자에 할당합니다.
fn primary_timeout(config: &DataConfig) -> Duration {
    Duration::from_secs(config.fetch_timeout_secs.max(1)) / 2
}

/// 원시 캔들을 정렬/정제한 뒤 최근 `limit`개로 시계열을 만듭니다.
///
/// - 가격이 0 이하인 캔들 제거
/// - 고가/저가를 시가/종가를 포함하도록 보정
/// - 같은 타임스탬프는 마지막 캔들만 유지
pub(crate) fn build_series(
    symbol: &Symbol,
    timeframe: Timeframe,
    raw: Vec<Candle>,
    limit: usize,
) -> std::result::Result<CandleSeries, ProviderError> {
    let mut candles: Vec<Candle> = raw
        .into_iter()
        .filter(|c| {
            [c.open, c.high, c.low, c.close]
                .iter()
                .all(|p| p.is_strictly_positive())
        })
        .map(|mut c| {
            c.high = c.high.max(c.open).max(c.close);
            c.low = c.low.min(c.open).min(c.close);
            c
        })
        .collect();

    candles.sort_by_key(|c| c.timestamp);
    candles.reverse();
    candles.dedup_by_key(|c| c.timestamp);
    candles.reverse();

    if candles.len() > limit {
        candles.drain(..candles.len() - limit);
    }

    if candles.is_empty() {
        return Err(ProviderError::NoData(format!("{} {}", symbol, timeframe)));
    }

    CandleSeries::new(symbol.clone(), timeframe, candles)
        .map_err(|e| ProviderError::Parse(e.to_string()))
}
