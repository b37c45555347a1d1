//! 캔들 데이터 수집과 분석 서비스.
//!
//! 이 crate는 분석 엔진 바깥의 협력자 계층을 제공합니다:
//! - 캔들 제공자 (Yahoo Finance, 로컬 JSON 파일, 대체 소스 연결)
//! - TTL 기반 분석 결과 캐시
//! - 조회 → 분석 → 캐시를 묶는 분석 서비스

pub mod cache;
pub mod error;
pub mod provider;
pub mod report;
pub mod service;

pub use cache::{AnalysisCache, CacheKey, CacheStats, TtlAnalysisCache};
pub use error::{DataError, Result};
pub use provider::{build_provider, FallbackProvider, JsonFileProvider, YahooCandleProvider};
pub use report::AnalysisReport;
pub use service::AnalysisService;
