//! CLI 명령어 구현 모듈.

pub mod analyze;
pub mod output;
pub mod scan;

use anyhow::{Context, Result};
use dalal_core::{AppConfig, ProviderKind};
use dalal_data::{build_provider, AnalysisService};

/// 설정으로 분석 서비스를 만듭니다.
///
/// `file_dir`이 주어지면 설정과 무관하게 해당 디렉토리의 JSON 파일 제공자를 사용합니다.
pub fn build_service(config: &AppConfig, file_dir: Option<&str>) -> Result<AnalysisService> {
    let mut data = config.data.clone();
    if let Some(dir) = file_dir {
        data.provider = ProviderKind::File;
        data.data_dir = dir.to_string();
    }

    let provider = build_provider(&data).context("캔들 제공자 생성 실패")?;
    Ok(AnalysisService::from_config(provider, config))
}
