//! 심볼 및 거래소 정의.
//!
//! - `Exchange` - 인도 증권거래소 (NSE, BSE)
//! - `Symbol` - 거래소에 상장된 종목

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 거래소.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    /// National Stock Exchange of India
    #[default]
    Nse,
    /// Bombay Stock Exchange
    Bse,
}

impl Exchange {
    /// Yahoo Finance 티커 접미사.
    pub fn yahoo_suffix(&self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
        }
    }

    /// 거래소 코드.
    pub fn code(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NSE" | "NS" => Ok(Exchange::Nse),
            "BSE" | "BO" => Ok(Exchange::Bse),
            other => Err(format!("Unknown exchange: {}", other)),
        }
    }
}

/// 거래소에 상장된 종목 심볼.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    /// 종목 티커 (예: RELIANCE, 500325)
    pub ticker: String,
    /// 상장 거래소
    pub exchange: Exchange,
}

impl Symbol {
    /// 새 심볼을 생성합니다.
    pub fn new(ticker: impl Into<String>, exchange: Exchange) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            exchange,
        }
    }

    /// NSE 심볼을 생성합니다.
    pub fn nse(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Exchange::Nse)
    }

    /// BSE 심볼을 생성합니다.
    pub fn bse(ticker: impl Into<String>) -> Self {
        Self::new(ticker, Exchange::Bse)
    }

    /// Yahoo Finance 티커 (예: "RELIANCE.NS").
    pub fn yahoo_ticker(&self) -> String {
        format!("{}{}", self.ticker, self.exchange.yahoo_suffix())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.exchange, self.ticker)
    }
}

/// `RELIANCE`, `RELIANCE.NS`, `500325.BO`, `NSE:TCS` 형식을 파싱합니다.
/// 거래소가 없으면 NSE로 간주합니다.
impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty symbol".to_string());
        }

        if let Some((exchange, ticker)) = s.split_once(':') {
            let exchange = exchange.parse::<Exchange>()?;
            return non_empty(ticker).map(|t| Symbol::new(t, exchange));
        }

        if let Some((ticker, suffix)) = s.rsplit_once('.') {
            if let Ok(exchange) = suffix.parse::<Exchange>() {
                return non_empty(ticker).map(|t| Symbol::new(t, exchange));
            }
        }

        Ok(Symbol::nse(s))
    }
}

fn non_empty(ticker: &str) -> Result<&str, String> {
    if ticker.trim().is_empty() {
        Err("Empty ticker".to_string())
    } else {
        Ok(ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_creation() {
        let symbol = Symbol::nse(" reliance ");
        assert_eq!(symbol.ticker, "RELIANCE");
        assert_eq!(symbol.exchange, Exchange::Nse);
        assert_eq!(symbol.to_string(), "NSE:RELIANCE");
    }

    #[test]
    fn test_yahoo_ticker() {
        assert_eq!(Symbol::nse("TCS").yahoo_ticker(), "TCS.NS");
        assert_eq!(Symbol::bse("500325").yahoo_ticker(), "500325.BO");
    }

    #[test]
    fn test_symbol_from_str() {
        assert_eq!("INFY".parse::<Symbol>().unwrap(), Symbol::nse("INFY"));
        assert_eq!("infy.ns".parse::<Symbol>().unwrap(), Symbol::nse("INFY"));
        assert_eq!("500325.BO".parse::<Symbol>().unwrap(), Symbol::bse("500325"));
        assert_eq!("BSE:500325".parse::<Symbol>().unwrap(), Symbol::bse("500325"));
        assert_eq!("M&M".parse::<Symbol>().unwrap(), Symbol::nse("M&M"));
    }

    #[test]
    fn test_symbol_from_str_rejects_garbage() {
        assert!("".parse::<Symbol>().is_err());
        assert!("NSE:".parse::<Symbol>().is_err());
        assert!("LSE:VOD".parse::<Symbol>().is_err());
    }
}
