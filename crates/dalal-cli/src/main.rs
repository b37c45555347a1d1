//! 기술적 분석 CLI 도구.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dalal_core::{init_logging, AppConfig, Timeframe};
use tracing::{error, info};

use dalal_cli::commands::{
    analyze::{run_analyze, AnalyzeConfig},
    build_service,
    scan::{parse_symbols, run_scan},
};

#[derive(Parser)]
#[command(name = "dalal")]
#[command(about = "Technical analysis for NSE/BSE equities", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로 (없으면 config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 단일 종목 분석
    Analyze {
        /// 심볼 (예: RELIANCE, TCS.NS, 500325.BO, NSE:INFY)
        #[arg(short, long)]
        symbol: String,

        /// 타임프레임 (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
        #[arg(short, long, default_value = "1d")]
        timeframe: String,

        /// 분석할 캔들 수 (기본: 설정의 default_lookback)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// JSON 캔들 파일 디렉토리 (지정 시 Yahoo 대신 사용)
        #[arg(long)]
        file_dir: Option<String>,

        /// 출력 형식 (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// 여러 종목 동시 스캔
    Scan {
        /// 쉼표로 구분된 심볼 목록
        #[arg(short, long)]
        symbols: String,

        /// 타임프레임
        #[arg(short, long, default_value = "1d")]
        timeframe: String,

        /// 분석할 캔들 수
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// JSON 캔들 파일 디렉토리
        #[arg(long)]
        file_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path).with_context(|| format!("설정 로드 실패: {}", path))?,
        None => AppConfig::load_default().context("기본 설정 로드 실패")?,
    };

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Analyze {
            symbol,
            timeframe,
            limit,
            file_dir,
            format,
        } => {
            let limit = limit.unwrap_or(config.data.default_lookback);
            let analyze_config = AnalyzeConfig::from_args(&symbol, &timeframe, limit, &format)?;
            let service = build_service(&config, file_dir.as_deref())?;

            match run_analyze(&service, &analyze_config).await {
                Ok(rendered) => println!("{}", rendered),
                Err(e) => {
                    error!("분석 실패: {}", e);
                    return Err(e);
                }
            }
        }

        Commands::Scan {
            symbols,
            timeframe,
            limit,
            file_dir,
        } => {
            let symbols = parse_symbols(&symbols)?;
            let timeframe: Timeframe = timeframe.parse().map_err(|e: String| anyhow!(e))?;
            let limit = limit.unwrap_or(config.data.default_lookback);
            let service = build_service(&config, file_dir.as_deref())?;

            let outcome = run_scan(&service, &symbols, timeframe, limit).await;
            for line in &outcome.lines {
                println!("{}", line);
            }

            info!(
                total = symbols.len(),
                failed = outcome.failures,
                "스캔 완료"
            );
            if outcome.failures == symbols.len() {
                return Err(anyhow!("모든 심볼 분석 실패"));
            }
        }
    }

    Ok(())
}
