//! 분석 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 단일 종목 분석 (텍스트/JSON 출력)
//! - 여러 종목 동시 스캔

pub mod commands;
