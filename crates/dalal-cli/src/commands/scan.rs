//! 여러 종목 동시 스캔 명령어.

use anyhow::{anyhow, Result};
use dalal_core::{Symbol, Timeframe};
use dalal_data::AnalysisService;
use tracing::{info, warn};

use super::output::summary_line;

/// 쉼표로 구분된 심볼 목록을 파싱합니다. 중복은 한 번만 남깁니다.
pub fn parse_symbols(list: &str) -> Result<Vec<Symbol>> {
    let mut symbols: Vec<Symbol> = Vec::new();
    for raw in list.split(',').filter(|s| !s.trim().is_empty()) {
        let symbol: Symbol = raw.parse().map_err(|e: String| anyhow!(e))?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(anyhow!("No symbols given"));
    }
    Ok(symbols)
}

/// 스캔 결과.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub lines: Vec<String>,
    pub failures: usize,
}

/// 모든 심볼을 동시에 분석하고 요약 줄을 입력 순서대로 모읍니다.
///
/// 개별 심볼 실패는 해당 줄에 기록하고 나머지는 계속 진행합니다.
pub async fn run_scan(
    service: &AnalysisService,
    symbols: &[Symbol],
    timeframe: Timeframe,
    limit: usize,
) -> ScanOutcome {
    info!(count = symbols.len(), timeframe = %timeframe, "스캔 시작");

    let mut outcome = ScanOutcome::default();
    for (symbol, result) in service.analyze_many(symbols, timeframe, limit).await {
        match result {
            Ok(report) => outcome.lines.push(summary_line(&report)),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "분석 실패");
                outcome.failures += 1;
                outcome.lines.push(format!("{:<16} ERROR: {}", symbol.to_string(), e));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols_dedups() {
        let symbols = parse_symbols("TCS, NSE:TCS,INFY.NS,500325.BO,").unwrap();
        assert_eq!(symbols.len(), 3);
        assert_eq!(symbols[0].to_string(), "NSE:TCS");
        assert_eq!(symbols[2].to_string(), "BSE:500325");
    }

    #[test]
    fn test_parse_symbols_empty() {
        assert!(parse_symbols(" , ").is_err());
        assert!(parse_symbols("XYZ:TCS").is_err());
    }
}
