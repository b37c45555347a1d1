//! 분석 보고서 출력 형식.

use anyhow::Result;
use dalal_analytics::Zone;
use dalal_data::AnalysisReport;
use std::fmt::{self, Write};

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: text, json", s)),
        }
    }
}

/// 보고서를 지정된 형식으로 렌더링합니다.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => render_text(report),
    }
}

/// 사람이 읽기 위한 텍스트 보고서.
pub fn render_text(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, report)?;
    Ok(out)
}

fn write_text(out: &mut String, report: &AnalysisReport) -> fmt::Result {
    let result = &report.result;

    writeln!(
        out,
        "{} [{}] @ {:.2}  ({} candles, generated {})",
        report.symbol,
        report.timeframe,
        result.current_price,
        result.candle_count,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    if report.is_fallback() {
        writeln!(out, "WARNING: derived from fallback data, not the primary provider")?;
    }

    writeln!(out, "\nRecommendation: {}", result.recommendation.text)?;
    writeln!(
        out,
        "Trading range: {:.2} - {:.2}",
        result.trading_range.low, result.trading_range.high
    )?;
    writeln!(
        out,
        "Volume signal: {:?} (score {:+.2}) {}",
        result.signal.tier, result.signal.score, result.signal.rationale
    )?;

    writeln!(out, "\nLevels:")?;
    if result.levels.is_empty() {
        writeln!(out, "  no significant levels found")?;
    }
    for level in &result.levels {
        writeln!(
            out,
            "  {:<10} {:>10.2}  touches {:<2} {:<8} confidence {}%",
            format!("{:?}", level.kind),
            level.price,
            level.touches,
            level.strength.as_str(),
            level.confidence
        )?;
    }

    writeln!(out, "\nTrendlines:")?;
    if result.trendlines.is_empty() {
        writeln!(out, "  none")?;
    }
    for line in &result.trendlines {
        writeln!(
            out,
            "  {:?}: slope {:+.4}, R² {:.3} ({}), projected {:.2}",
            line.kind,
            line.slope,
            line.goodness_of_fit,
            line.strength.as_str(),
            line.projected_price
        )?;
    }

    writeln!(out, "\nVolume anomalies:")?;
    if result.anomalies.is_empty() {
        writeln!(out, "  none")?;
    }
    for anomaly in &result.anomalies {
        writeln!(out, "  #{:<4} z {:+.2}  {}", anomaly.index, anomaly.z_score, anomaly.interpretation)?;
    }

    writeln!(out, "\nVolume patterns:")?;
    if result.patterns.is_empty() {
        writeln!(out, "  none")?;
    }
    for pattern in &result.patterns {
        writeln!(
            out,
            "  {} ({}%, {}): {}",
            pattern.name,
            pattern.confidence,
            pattern.significance.as_str(),
            pattern.description
        )?;
    }

    writeln!(
        out,
        "\nAccumulation/Distribution: {:+.2} {:?} - {}",
        result.accumulation.value, result.accumulation.trend, result.accumulation.interpretation
    )?;

    Ok(())
}

/// 스캔 결과 한 줄 요약.
pub fn summary_line(report: &AnalysisReport) -> String {
    let result = &report.result;
    let zone = match result.recommendation.zone {
        Zone::BuyZone => "BUY ZONE",
        Zone::SellZone => "SELL ZONE",
        Zone::InsufficientData => "NO DATA",
        _ => "HOLD",
    };
    let fallback = if report.is_fallback() { " (fallback)" } else { "" };

    format!(
        "{:<16} {:>10.2}  {:<9} {:<10} A/D {:+6.2}  levels {}{}",
        report.symbol.to_string(),
        result.current_price,
        zone,
        format!("{:?}", result.signal.tier),
        result.accumulation.value,
        result.levels.len(),
        fallback
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dalal_analytics::TechnicalAnalyzer;
    use dalal_core::{Candle, DataOrigin, Symbol, Timeframe};
    use rust_decimal_macros::dec;

    fn report(origin: DataOrigin) -> AnalysisReport {
        let candles: Vec<Candle> = (0..20)
            .map(|i| Candle::new(i, dec!(100), dec!(101), dec!(99), dec!(100.5), 1_000))
            .collect();
        AnalysisReport {
            symbol: Symbol::nse("TCS"),
            timeframe: Timeframe::D1,
            origin,
            generated_at: Utc::now(),
            result: TechnicalAnalyzer::default().analyze_candles(&candles),
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("text").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_text_mentions_empty_levels() {
        let text = render_text(&report(DataOrigin::Primary)).unwrap();
        assert!(text.starts_with("NSE:TCS [1d]"));
        assert!(text.contains("no significant levels found"));
        assert!(!text.contains("WARNING"));
    }

    #[test]
    fn test_fallback_is_flagged() {
        let report = report(DataOrigin::Fallback);
        assert!(render_text(&report).unwrap().contains("WARNING"));
        assert!(summary_line(&report).ends_with("(fallback)"));
    }

    #[test]
    fn test_json_output() {
        let json = render(&report(DataOrigin::Primary), OutputFormat::Json).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"origin\": \"primary\""));
    }
}
