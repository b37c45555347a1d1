//! 가격 타입 및 Decimal 유틸리티.
//!
//! 캔들 가격은 `Decimal`로 보관하고, 분석 엔진은 `f64`로 읽습니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입 (주식 수).
pub type Volume = u64;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 0보다 큰지 확인합니다.
    fn is_strictly_positive(&self) -> bool;

    /// `f64`로 변환합니다. 표현할 수 없으면 0.0을 반환합니다.
    fn as_f64(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn is_strictly_positive(&self) -> bool {
        *self > Decimal::ZERO
    }

    fn as_f64(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}
