//! 분석 결과 캐시.
//!
//! 분석 엔진은 캐시를 알지 못합니다. 서비스 계층이 `(symbol, timeframe)` 키로
//! 보고서를 짧은 기간 보관하며, 구현은 [`AnalysisCache`] trait로 주입합니다.
//!
//! # 정책
//!
//! - **TTL**: 저장 후 TTL이 지나면 조회되지 않고 제거됨
//! - **용량**: 최대 항목 수를 넘으면 가장 오래된 항목부터 제거

use async_trait::async_trait;
use dalal_core::{Symbol, Timeframe};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::report::AnalysisReport;

/// 캐시 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: Symbol,
    pub timeframe: Timeframe,
}

impl CacheKey {
    pub fn new(symbol: Symbol, timeframe: Timeframe) -> Self {
        Self { symbol, timeframe }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.symbol, self.timeframe)
    }
}

/// 캐시 통계.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// 분석 결과 캐시 trait.
#[async_trait]
pub trait AnalysisCache: Send + Sync {
    /// 유효한 보고서를 조회합니다.
    async fn get(&self, key: &CacheKey) -> Option<Arc<AnalysisReport>>;

    /// 보고서를 저장합니다.
    async fn put(&self, key: CacheKey, report: Arc<AnalysisReport>);

    /// 항목을 제거합니다.
    async fn invalidate(&self, key: &CacheKey);

    /// 모든 항목을 제거합니다.
    async fn clear(&self);

    /// 조회 통계.
    fn stats(&self) -> CacheStats;
}

struct Entry {
    report: Arc<AnalysisReport>,
    inserted_at: Instant,
}

/// 메모리 TTL 캐시.
pub struct TtlAnalysisCache {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<CacheKey, Entry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TtlAnalysisCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries: max_entries.max(1),
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 현재 저장된 항목 수 (만료되었지만 아직 제거되지 않은 항목 포함).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_fresh(&self, entry: &Entry, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) < self.ttl
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl AnalysisCache for TtlAnalysisCache {
    async fn get(&self, key: &CacheKey) -> Option<Arc<AnalysisReport>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if self.is_fresh(entry, now) => {
                    self.record(true);
                    return Some(entry.report.clone());
                }
                None => {
                    self.record(false);
                    return None;
                }
                Some(_) => {}
            }
        }

        // 만료된 항목 제거
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| !self.is_fresh(entry, now))
        {
            entries.remove(key);
            debug!(key = %key, "만료된 분석 캐시 제거");
        }
        self.record(false);
        None
    }

    async fn put(&self, key: CacheKey, report: Arc<AnalysisReport>) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);

        if !entries.contains_key(&key) && entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                debug!(key = %oldest, "용량 초과로 분석 캐시 제거");
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            Entry {
                report,
                inserted_at: now,
            },
        );
    }

    async fn invalidate(&self, key: &CacheKey) {
        self.entries.write().await.remove(key);
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
        }
    }
}
