//! 지지/저항 레벨 클러스터링.
//!
//! 피벗 가격을 도착 순서대로 순회하며, 중심가와의 상대 거리가 허용 오차 이내인
//! 첫 번째 클러스터에 합칩니다. 중심가는 멤버 가격의 누적 평균입니다.
//!
//! - 상대 거리: `|a - b| / min(a, b)` (대칭이므로 두 피벗의 병합 여부는 순서와 무관)
//! - 분류: 저점 피벗이 과반 이상이면 지지, 고점 피벗이 과반이면 저항 (동률은 지지)
//! - 신뢰도: `min(95, 50 + 10 × touches)`
//! - 결과는 가격 내림차순 정렬

use dalal_core::LevelConfig;
use serde::{Deserialize, Serialize};

use crate::pivots::{Pivot, PivotKind};
use crate::signal::Strength;

/// 레벨 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    Support,
    Resistance,
}

/// 지지/저항 레벨.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// 클러스터 중심가
    pub price: f64,
    pub kind: LevelKind,
    /// 멤버 피벗 수
    pub touches: usize,
    pub strength: Strength,
    /// 가장 이른 멤버 피벗의 타임스탬프
    pub first_touch: i64,
    /// 가장 늦은 멤버 피벗의 타임스탬프
    pub last_touch: i64,
    /// 신뢰도 (0-95)
    pub confidence: u8,
    pub description: String,
}

#[derive(Debug)]
struct Cluster {
    sum: f64,
    members: Vec<Pivot>,
}

impl Cluster {
    fn centroid(&self) -> f64 {
        self.sum / self.members.len() as f64
    }
}

/// 레벨 클러스터러.
#[derive(Debug, Clone)]
pub struct LevelClusterer {
    config: LevelConfig,
}

impl Default for LevelClusterer {
    fn default() -> Self {
        Self::new(&LevelConfig::default())
    }
}

impl LevelClusterer {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 두 가격이 같은 레벨로 묶일 만큼 가까운지 확인합니다.
    pub fn within_tolerance(&self, a: f64, b: f64) -> bool {
        let base = a.min(b);
        if base <= 0.0 {
            return a == b;
        }
        (a - b).abs() / base <= self.config.tolerance_ratio
    }

    /// 피벗을 레벨로 묶습니다. 피벗이 없으면 빈 벡터를 반환합니다.
    pub fn cluster(&self, pivots: &[Pivot]) -> Vec<Level> {
        let mut clusters: Vec<Cluster> = Vec::new();

        for pivot in pivots {
            match clusters
                .iter_mut()
                .find(|c| self.within_tolerance(c.centroid(), pivot.price))
            {
                Some(cluster) => {
                    cluster.sum += pivot.price;
                    cluster.members.push(*pivot);
                }
                None => clusters.push(Cluster {
                    sum: pivot.price,
                    members: vec![*pivot],
                }),
            }
        }

        let min_touches = self.config.min_touches.max(1);
        let mut levels: Vec<Level> = clusters
            .into_iter()
            .filter(|c| c.members.len() >= min_touches)
            .map(|c| self.to_level(&c))
            .collect();

        levels.sort_by(|a, b| b.price.total_cmp(&a.price));
        levels
    }

    fn to_level(&self, cluster: &Cluster) -> Level {
        let touches = cluster.members.len();
        let lows = cluster
            .members
            .iter()
            .filter(|p| p.kind == PivotKind::Low)
            .count();
        let highs = touches - lows;
        let kind = if lows >= highs {
            LevelKind::Support
        } else {
            LevelKind::Resistance
        };

        let first_touch = cluster.members.iter().map(|p| p.timestamp).min().unwrap_or(0);
        let last_touch = cluster.members.iter().map(|p| p.timestamp).max().unwrap_or(0);

        let strength = Strength::from_touches(touches);
        let confidence = (50 + touches.saturating_mul(10)).min(self.config.max_confidence as usize) as u8;
        let price = cluster.centroid();

        let label = match kind {
            LevelKind::Support => "Support",
            LevelKind::Resistance => "Resistance",
        };

        Level {
            price,
            kind,
            touches,
            strength,
            first_touch,
            last_touch,
            confidence,
            description: format!(
                "{} {} level at {:.2}, tested {} times",
                strength.as_str(),
                label.to_lowercase(),
                price,
                touches
            ),
        }
    }
}

/// 현재가 이하에서 가장 가까운 레벨 (종류 무관).
pub fn nearest_support(levels: &[Level], price: f64) -> Option<&Level> {
    levels
        .iter()
        .filter(|l| l.price <= price)
        .max_by(|a, b| a.price.total_cmp(&b.price))
}

/// 현재가 초과에서 가장 가까운 레벨 (종류 무관).
pub fn nearest_resistance(levels: &[Level], price: f64) -> Option<&Level> {
    levels
        .iter()
        .filter(|l| l.price > price)
        .min_by(|a, b| a.price.total_cmp(&b.price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pivot(price: f64, index: usize, kind: PivotKind) -> Pivot {
        Pivot {
            price,
            timestamp: index as i64 * 60,
            index,
            kind,
        }
    }

    #[test]
    fn test_empty_pivots() {
        assert!(LevelClusterer::default().cluster(&[]).is_empty());
    }

    #[test]
    fn test_single_member_clusters_are_discarded() {
        let pivots = [pivot(100.0, 2, PivotKind::Low), pivot(120.0, 5, PivotKind::High)];
        assert!(LevelClusterer::default().cluster(&pivots).is_empty());
    }

    #[test]
    fn test_merges_within_tolerance() {
        let pivots = [
            pivot(100.0, 2, PivotKind::Low),
            pivot(110.0, 4, PivotKind::High),
            pivot(101.0, 7, PivotKind::Low),
            pivot(100.5, 9, PivotKind::High),
            pivot(110.5, 12, PivotKind::High),
        ];
        let levels = LevelClusterer::default().cluster(&pivots);

        assert_eq!(levels.len(), 2);

        // 가격 내림차순
        assert_eq!(levels[0].kind, LevelKind::Resistance);
        assert!((levels[0].price - 110.25).abs() < 1e-9);
        assert_eq!(levels[0].touches, 2);
        assert_eq!(levels[0].strength, Strength::Weak);
        assert_eq!(levels[0].confidence, 70);

        assert_eq!(levels[1].kind, LevelKind::Support);
        assert!((levels[1].price - 100.5).abs() < 1e-9);
        assert_eq!(levels[1].touches, 3);
        assert_eq!(levels[1].strength, Strength::Moderate);
        assert_eq!(levels[1].first_touch, 120);
        assert_eq!(levels[1].last_touch, 540);
    }

    #[test]
    fn test_tie_breaks_to_support() {
        let pivots = [pivot(100.0, 2, PivotKind::High), pivot(100.2, 5, PivotKind::Low)];
        let levels = LevelClusterer::default().cluster(&pivots);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].kind, LevelKind::Support);
    }

    #[test]
    fn test_confidence_is_capped() {
        let pivots: Vec<Pivot> = (0..6).map(|i| pivot(50.0, i * 3, PivotKind::Low)).collect();
        let levels = LevelClusterer::default().cluster(&pivots);
        assert_eq!(levels[0].touches, 6);
        assert_eq!(levels[0].strength, Strength::Strong);
        assert_eq!(levels[0].confidence, 95);
    }

    #[test]
    fn test_nearest_levels_ignore_kind() {
        let pivots = [
            pivot(100.0, 2, PivotKind::High),
            pivot(100.0, 5, PivotKind::High),
            pivot(110.0, 8, PivotKind::Low),
            pivot(110.0, 11, PivotKind::Low),
        ];
        let levels = LevelClusterer::default().cluster(&pivots);

        let support = nearest_support(&levels, 105.0).map(|l| l.price);
        let resistance = nearest_resistance(&levels, 105.0).map(|l| l.price);
        assert_eq!(support, Some(100.0));
        assert_eq!(resistance, Some(110.0));
        assert!(nearest_resistance(&levels, 120.0).is_none());
        assert!(nearest_support(&levels, 90.0).is_none());
    }
}
