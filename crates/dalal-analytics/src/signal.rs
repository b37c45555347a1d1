//! 여러 분석 결과가 공유하는 강도/중요도 등급.

use serde::{Deserialize, Serialize};

/// 레벨, 추세선, 매집/분산 점수의 강도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// 레벨 터치 수에 따른 강도 (4 이상 Strong, 3 Moderate, 그 외 Weak).
    pub fn from_touches(touches: usize) -> Self {
        match touches {
            t if t >= 4 => Strength::Strong,
            3 => Strength::Moderate,
            _ => Strength::Weak,
        }
    }

    /// 결정계수에 따른 추세선 강도 (0.9 초과 Strong, 0.8 초과 Moderate).
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > 0.9 {
            Strength::Strong
        } else if r_squared > 0.8 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Weak => "Weak",
            Strength::Moderate => "Moderate",
            Strength::Strong => "Strong",
        }
    }
}

/// 이상치/패턴의 중요도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Significance {
    Low,
    Medium,
    High,
}

impl Significance {
    /// |z-score|에 따른 중요도 (3 초과 High, 2 초과 Medium, 그 외 Low).
    pub fn from_z_score(z: f64) -> Self {
        let abs = z.abs();
        if abs > 3.0 {
            Significance::High
        } else if abs > 2.0 {
            Significance::Medium
        } else {
            Significance::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Significance::Low => "Low",
            Significance::Medium => "Medium",
            Significance::High => "High",
        }
    }
}
