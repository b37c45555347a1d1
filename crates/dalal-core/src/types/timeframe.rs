//! 캔들스틱 데이터를 위한 타임프레임 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 캔들스틱 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1분봉
    #[serde(rename = "1m")]
    M1,
    /// 5분봉
    #[serde(rename = "5m")]
    M5,
    /// 15분봉
    #[serde(rename = "15m")]
    M15,
    /// 30분봉
    #[serde(rename = "30m")]
    M30,
    /// 1시간봉
    #[serde(rename = "1h")]
    H1,
    /// 일봉
    #[serde(rename = "1d")]
    D1,
    /// 주봉
    #[serde(rename = "1w")]
    W1,
    /// 월봉
    #[serde(rename = "1mo")]
    MN1,
}

impl Timeframe {
    /// 이 타임프레임의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        match self {
            Timeframe::M1 => Duration::from_secs(60),
            Timeframe::M5 => Duration::from_secs(5 * 60),
            Timeframe::M15 => Duration::from_secs(15 * 60),
            Timeframe::M30 => Duration::from_secs(30 * 60),
            Timeframe::H1 => Duration::from_secs(60 * 60),
            Timeframe::D1 => Duration::from_secs(24 * 60 * 60),
            Timeframe::W1 => Duration::from_secs(7 * 24 * 60 * 60),
            Timeframe::MN1 => Duration::from_secs(30 * 24 * 60 * 60), // 근사값
        }
    }

    /// 이 타임프레임의 초 단위 값을 반환합니다.
    pub fn as_secs(&self) -> u64 {
        self.duration().as_secs()
    }

    /// 표준 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::D1 => "1d",
            Timeframe::W1 => "1w",
            Timeframe::MN1 => "1mo",
        }
    }

    /// Yahoo Finance 간격 문자열로 변환합니다.
    pub fn to_yahoo_interval(&self) -> &'static str {
        match self {
            Timeframe::W1 => "1wk",
            other => other.as_str(),
        }
    }

    /// `limit`개 캔들을 덮는 Yahoo Finance 조회 범위 문자열.
    ///
    /// 인도 시장은 하루 약 6시간 15분 거래하므로 장중 캔들 수는 이를 기준으로 계산합니다.
    pub fn yahoo_range(&self, limit: usize) -> &'static str {
        match self {
            Timeframe::M1 => {
                if limit <= 375 { "1d" } else { "5d" }
            }
            Timeframe::M5 | Timeframe::M15 | Timeframe::M30 => {
                let per_day = 375 / (self.as_secs() as usize / 60);
                let days = limit.div_ceil(per_day.max(1));
                if days <= 5 { "5d" } else if days <= 21 { "1mo" } else { "60d" }
            }
            Timeframe::H1 => {
                if limit <= 35 { "5d" } else if limit <= 140 { "1mo" } else if limit <= 420 { "3mo" } else { "2y" }
            }
            Timeframe::D1 => {
                if limit <= 5 { "5d" }
                else if limit <= 20 { "1mo" }
                else if limit <= 60 { "3mo" }
                else if limit <= 120 { "6mo" }
                else if limit <= 250 { "1y" }
                else if limit <= 500 { "2y" }
                else if limit <= 1250 { "5y" }
                else { "10y" }
            }
            Timeframe::W1 => {
                if limit <= 12 { "3mo" } else if limit <= 26 { "6mo" } else if limit <= 52 { "1y" } else if limit <= 104 { "2y" } else { "5y" }
            }
            Timeframe::MN1 => {
                if limit <= 12 { "1y" } else if limit <= 24 { "2y" } else if limit <= 60 { "5y" } else { "10y" }
            }
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Timeframe::M1),
            "5m" => Ok(Timeframe::M5),
            "15m" => Ok(Timeframe::M15),
            "30m" => Ok(Timeframe::M30),
            "1h" | "60m" => Ok(Timeframe::H1),
            "1d" => Ok(Timeframe::D1),
            "1w" | "1wk" => Ok(Timeframe::W1),
            "1mo" | "1M" => Ok(Timeframe::MN1),
            other => Err(format!("Invalid timeframe: {}", other)),
        }
    }
}
