//! 단일 종목 분석 명령어.

use anyhow::{anyhow, Result};
use dalal_core::{Symbol, Timeframe};
use dalal_data::AnalysisService;
use tracing::info;

use super::output::{render, OutputFormat};

/// 분석 명령어 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    pub limit: usize,
    pub format: OutputFormat,
}

impl AnalyzeConfig {
    /// CLI 인자 문자열을 검증된 설정으로 변환합니다.
    pub fn from_args(symbol: &str, timeframe: &str, limit: usize, format: &str) -> Result<Self> {
        Ok(Self {
            symbol: symbol.parse().map_err(|e: String| anyhow!(e))?,
            timeframe: timeframe.parse().map_err(|e: String| anyhow!(e))?,
            limit,
            format: OutputFormat::parse(format)?,
        })
    }
}

/// 분석을 실행하고 렌더링된 보고서를 반환합니다.
pub async fn run_analyze(service: &AnalysisService, config: &AnalyzeConfig) -> Result<String> {
    info!(
        symbol = %config.symbol,
        timeframe = %config.timeframe,
        limit = config.limit,
        "분석 시작"
    );

    let report = service
        .analyze(&config.symbol, config.timeframe, config.limit)
        .await?;

    render(&report, config.format)
}
