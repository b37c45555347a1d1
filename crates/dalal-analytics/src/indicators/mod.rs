//! 기술적 지표 모듈.
//!
//! 거래량 패턴 인식에 사용되는 보조 지표를 제공합니다.
//!
//! ## 거래량 지표 (Volume Indicators)
//! - **OBV**: 누적 거래량 (On-Balance Volume)

pub mod obv;

pub use obv::{ObvIndicator, ObvParams, ObvResult};
