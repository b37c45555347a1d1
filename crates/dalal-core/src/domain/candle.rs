//! OHLCV 캔들과 검증된 캔들 시계열.
//!
//! - `Candle` - 하나의 시간 구간에 대한 시가/고가/저가/종가/거래량
//! - `CandleSeries` - 한 심볼/타임프레임의 시간순 캔들 배열 (생성 후 불변)
//! - `DataOrigin` - 시계열이 기본 제공자에서 왔는지, 대체 소스에서 왔는지

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{DecimalExt, Price, Symbol, Timeframe, Volume};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시각 (epoch, 한 시계열 안에서 단위가 일관되어야 함)
    pub timestamp: i64,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        timestamp: i64,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// `f64` 가격으로 캔들을 생성합니다. 표현할 수 없는 값은 0이 됩니다.
    pub fn from_f64(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: Volume) -> Self {
        let price = |v: f64| Decimal::from_f64(v).unwrap_or_default();
        Self::new(timestamp, price(open), price(high), price(low), price(close), volume)
    }

    /// 시가 (`f64`).
    pub fn open_f64(&self) -> f64 {
        self.open.as_f64()
    }

    /// 고가 (`f64`).
    pub fn high_f64(&self) -> f64 {
        self.high.as_f64()
    }

    /// 저가 (`f64`).
    pub fn low_f64(&self) -> f64 {
        self.low.as_f64()
    }

    /// 종가 (`f64`).
    pub fn close_f64(&self) -> f64 {
        self.close.as_f64()
    }

    /// 거래량 (`f64`).
    pub fn volume_f64(&self) -> f64 {
        self.volume as f64
    }

    /// 캔들 범위 (고가 - 저가).
    pub fn range_f64(&self) -> f64 {
        self.high_f64() - self.low_f64()
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 당일 가격 변동률 (%) = (종가 - 시가) / 시가 × 100. 시가가 0이면 0.
    pub fn change_pct(&self) -> f64 {
        let open = self.open_f64();
        if open == 0.0 {
            return 0.0;
        }
        (self.close_f64() - open) / open * 100.0
    }

    /// 가격 불변식을 검증합니다: 가격 > 0, low ≤ open,close ≤ high.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_strictly_positive() {
                return Err(CoreError::InvalidInput(format!(
                    "{} 가격은 양수여야 합니다: {} (timestamp {})",
                    name, value, self.timestamp
                )));
            }
        }

        if self.low > self.high {
            return Err(CoreError::InvalidInput(format!(
                "저가가 고가보다 큽니다: low {} > high {} (timestamp {})",
                self.low, self.high, self.timestamp
            )));
        }

        let within = |v: Decimal| v >= self.low && v <= self.high;
        if !within(self.open) || !within(self.close) {
            return Err(CoreError::InvalidInput(format!(
                "시가/종가가 고가-저가 범위를 벗어났습니다 (timestamp {})",
                self.timestamp
            )));
        }

        Ok(())
    }
}

/// 캔들 시계열의 출처.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// 기본 제공자에서 조회한 데이터
    #[default]
    Primary,
    /// 기본 제공자 실패로 대체 소스에서 조회한 데이터
    Fallback,
}

/// 한 심볼/타임프레임에 대한 검증된 캔들 시계열.
///
/// 생성 시 타임스탬프가 엄격하게 증가하는지와 각 캔들의 가격 불변식을 확인합니다.
/// 생성 이후에는 변경할 수 없습니다.
#[derive(Debug, Clone, Serialize)]
pub struct CandleSeries {
    symbol: Symbol,
    timeframe: Timeframe,
    origin: DataOrigin,
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 캔들 배열을 검증하여 시계열을 생성합니다.
    pub fn new(symbol: Symbol, timeframe: Timeframe, candles: Vec<Candle>) -> CoreResult<Self> {
        for candle in &candles {
            candle.validate()?;
        }

        if let Some(pair) = candles
            .windows(2)
            .find(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(CoreError::InvalidInput(format!(
                "타임스탬프가 증가하지 않습니다: {} -> {}",
                pair[0].timestamp, pair[1].timestamp
            )));
        }

        Ok(Self {
            symbol,
            timeframe,
            origin: DataOrigin::Primary,
            candles,
        })
    }

    /// 출처를 지정합니다.
    pub fn with_origin(mut self, origin: DataOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// 심볼.
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// 타임프레임.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 데이터 출처.
    pub fn origin(&self) -> DataOrigin {
        self.origin
    }

    /// 전체 캔들 (시간 오름차순).
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candle(ts: i64, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Candle {
        Candle::new(ts, open, high, low, close, 1_000)
    }

    #[test]
    fn test_change_pct() {
        let c = candle(1, dec!(100), dec!(106), dec!(99), dec!(105));
        assert!((c.change_pct() - 5.0).abs() < 1e-9);
        assert!(c.is_bullish());
        assert!(!c.is_bearish());
        assert!((c.range_f64() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let c = candle(1, dec!(100), dec!(99), dec!(101), dec!(100));
        assert!(matches!(c.validate(), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_rejects_close_outside_range() {
        let c = candle(1, dec!(100), dec!(102), dec!(98), dec!(103));
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_price() {
        let c = candle(1, dec!(0), dec!(1), dec!(0), dec!(1));
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_series_requires_increasing_timestamps() {
        let candles = vec![
            candle(10, dec!(100), dec!(101), dec!(99), dec!(100)),
            candle(10, dec!(100), dec!(101), dec!(99), dec!(100)),
        ];
        let result = CandleSeries::new(Symbol::nse("TCS"), Timeframe::D1, candles);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_accessors() {
        let candles = (0..6)
            .map(|i| candle(i, dec!(100), dec!(101), dec!(99), dec!(100)))
            .collect();
        let series = CandleSeries::new(Symbol::nse("TCS"), Timeframe::D1, candles)
            .unwrap()
            .with_origin(DataOrigin::Fallback);

        assert_eq!(series.len(), 6);
        assert_eq!(series.origin(), DataOrigin::Fallback);
        assert_eq!(series.candles()[5].timestamp, 5);
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = CandleSeries::new(Symbol::nse("TCS"), Timeframe::D1, Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.candles().is_empty());
    }
}
