//! 최소제곱 추세선 적합.
//!
//! 저점 피벗으로 지지 추세선을, 고점 피벗으로 저항 추세선을 적합합니다.
//! x축은 달력 시간이 아니라 원본 시계열에서의 캔들 위치입니다.
//!
//! 채택 조건:
//! - 지지 추세선: 기울기 > 0 이고 R² > 0.7
//! - 저항 추세선: 기울기 < 0 이고 R² > 0.7
//!
//! 적합에는 전체 피벗을 사용하고, 표시용으로 최근 3개 포인트만 첨부합니다.

use dalal_core::TrendlineConfig;
use serde::{Deserialize, Serialize};

use crate::pivots::{Pivot, PivotKind};
use crate::signal::Strength;

/// 추세선 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendlineKind {
    SupportTrend,
    ResistanceTrend,
}

/// 추세선 표시용 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub index: usize,
    pub price: f64,
    pub timestamp: i64,
}

/// 추세선.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trendline {
    pub kind: TrendlineKind,
    /// 최근 피벗 포인트 (시간순)
    pub points: Vec<TrendPoint>,
    pub slope: f64,
    pub intercept: f64,
    /// 결정계수 R² (0-1)
    pub goodness_of_fit: f64,
    pub strength: Strength,
    /// 마지막 캔들 위치에서의 추세선 가격
    pub projected_price: f64,
}

/// 단순 선형 회귀 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LineFit {
    pub fn value_at(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// `(x, y)` 포인트에 대한 최소제곱 직선과 결정계수.
///
/// 포인트가 2개 미만이거나 x가 모두 같으면 `None`.
/// 총변동(SStot)이 0이면 R²는 0으로 취급합니다.
pub fn fit_line(points: &[(f64, f64)]) -> Option<LineFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = points.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = points
        .iter()
        .map(|(x, y)| (y - (intercept + slope * x)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        0.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

/// 추세선 적합기.
#[derive(Debug, Clone)]
pub struct TrendlineFitter {
    config: TrendlineConfig,
}

impl Default for TrendlineFitter {
    fn default() -> Self {
        Self::new(&TrendlineConfig::default())
    }
}

impl TrendlineFitter {
    pub fn new(config: &TrendlineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 피벗에서 지지/저항 추세선을 적합합니다 (각 종류 최대 1개).
    ///
    /// `last_index`는 projected price를 계산할 마지막 캔들 위치입니다.
    pub fn fit(&self, pivots: &[Pivot], last_index: usize) -> Vec<Trendline> {
        [TrendlineKind::SupportTrend, TrendlineKind::ResistanceTrend]
            .into_iter()
            .filter_map(|kind| self.fit_kind(pivots, kind, last_index))
            .collect()
    }

    fn fit_kind(&self, pivots: &[Pivot], kind: TrendlineKind, last_index: usize) -> Option<Trendline> {
        let pivot_kind = match kind {
            TrendlineKind::SupportTrend => PivotKind::Low,
            TrendlineKind::ResistanceTrend => PivotKind::High,
        };
        let members: Vec<&Pivot> = pivots.iter().filter(|p| p.kind == pivot_kind).collect();
        if members.len() < self.config.min_points.max(2) {
            return None;
        }

        let points: Vec<(f64, f64)> = members.iter().map(|p| (p.index as f64, p.price)).collect();
        let fit = fit_line(&points)?;

        let slope_ok = match kind {
            TrendlineKind::SupportTrend => fit.slope > 0.0,
            TrendlineKind::ResistanceTrend => fit.slope < 0.0,
        };
        if !slope_ok || fit.r_squared <= self.config.min_r_squared {
            return None;
        }

        let start = members.len().saturating_sub(self.config.display_points);
        let display = members[start..]
            .iter()
            .map(|p| TrendPoint {
                index: p.index,
                price: p.price,
                timestamp: p.timestamp,
            })
            .collect();

        Some(Trendline {
            kind,
            points: display,
            slope: fit.slope,
            intercept: fit.intercept,
            goodness_of_fit: fit.r_squared,
            strength: Strength::from_r_squared(fit.r_squared),
            projected_price: fit.value_at(last_index as f64),
        })
    }
}
