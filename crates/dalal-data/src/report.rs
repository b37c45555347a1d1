//! 분석 보고서.

use chrono::{DateTime, Utc};
use dalal_analytics::AnalysisResult;
use dalal_core::{DataOrigin, Symbol, Timeframe};
use serde::{Deserialize, Serialize};

/// 한 번의 분석 요청에 대한 결과와 메타데이터.
///
/// 생성 후 변경되지 않으며 캐시에는 `Arc`로 공유됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
    /// 대체 소스 데이터로 만든 보고서인지 여부
    pub origin: DataOrigin,
    pub generated_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

impl AnalysisReport {
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}
