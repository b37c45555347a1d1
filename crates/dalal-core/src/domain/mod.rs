//! 분석 대상 도메인 모델.

mod candle;
mod candle_provider;

pub use candle::*;
pub use candle_provider::*;
