//! 분석 서비스.
//!
//! # 동작 흐름
//!
//! ```text
//! 요청 (symbol, timeframe, limit)
//!         │
//!         ▼
//! ┌───────────────────┐
//! │ 1. 캐시 조회       │ ── hit ──▶ 캐시된 보고서 반환
//! └─────────┬─────────┘
//!           │ miss
//! ┌─────────▼─────────┐
//! │ 2. 키별 Lock 획득  │ ← 같은 심볼+TF 동시 요청은 한 번만 조회
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ 3. 캔들 조회       │ ← 타임아웃 적용, 실패는 그대로 호출자에게
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ 4. 분석 엔진 실행  │
//! └─────────┬─────────┘
//!           │
//! ┌─────────▼─────────┐
//! │ 5. 캐시 저장       │ ← 대체 소스 데이터 보고서는 저장하지 않음
//! └───────────────────┘
//! ```

use chrono::Utc;
use dalal_analytics::TechnicalAnalyzer;
use dalal_core::{AppConfig, CandleProvider, DataOrigin, Symbol, Timeframe};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::cache::{AnalysisCache, CacheKey, TtlAnalysisCache};
use crate::error::{DataError, Result};
use crate::report::AnalysisReport;

/// 심볼+타임프레임별 조회 상태를 추적하는 Lock 맵.
type FetchLockMap = Arc<RwLock<HashMap<CacheKey, Arc<RwLock<()>>>>>;

/// 기본 캔들 조회 타임아웃.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// 조회 → 분석 → 캐시를 묶는 서비스.
pub struct AnalysisService {
    provider: Arc<dyn CandleProvider>,
    analyzer: TechnicalAnalyzer,
    cache: Option<Arc<dyn AnalysisCache>>,
    fetch_timeout: Duration,
    fetch_locks: FetchLockMap,
}

impl AnalysisService {
    /// 캐시 없이 서비스를 생성합니다.
    pub fn new(provider: Arc<dyn CandleProvider>, analyzer: TechnicalAnalyzer) -> Self {
        Self {
            provider,
            analyzer,
            cache: None,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            fetch_locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 설정에서 분석기, TTL 캐시, 타임아웃을 구성합니다.
    pub fn from_config(provider: Arc<dyn CandleProvider>, config: &AppConfig) -> Self {
        let cache = TtlAnalysisCache::new(
            Duration::from_secs(config.data.analysis_cache_ttl_secs),
            config.data.analysis_cache_max_entries,
        );

        Self::new(provider, TechnicalAnalyzer::new(config.analysis.clone()))
            .with_cache(Arc::new(cache))
            .with_timeout(Duration::from_secs(config.data.fetch_timeout_secs))
    }

    /// 분석 결과 캐시 설정.
    pub fn with_cache(mut self, cache: Arc<dyn AnalysisCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// 캔들 조회 타임아웃 설정.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// 한 심볼을 분석합니다.
    ///
    /// # Errors
    ///
    /// - `DataError::Provider`: 제공자가 실패함
    /// - `DataError::Timeout`: 조회 타임아웃
    /// - `DataError::InvalidRequest`: `limit`이 0
    ///
    /// 조회 실패를 중립적인 분석 결과로 바꾸지 않습니다.
    #[instrument(skip(self, symbol, timeframe), fields(symbol = %symbol, timeframe = %timeframe))]
    pub async fn analyze(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Arc<AnalysisReport>> {
        if limit == 0 {
            return Err(DataError::InvalidRequest(format!(
                "{} {}: 캔들 수는 1 이상이어야 함",
                symbol, timeframe
            )));
        }
        let key = CacheKey::new(symbol.clone(), timeframe);

        if let Some(report) = self.cached(&key).await {
            debug!("분석 캐시 적중");
            return Ok(report);
        }

        // 동시성 제어: 같은 키는 한 번만 조회
        let lock = self.get_or_create_lock(&key).await;
        let _guard = lock.write().await;

        if let Some(report) = self.cached(&key).await {
            debug!("대기 중 다른 요청이 캐시를 채움");
            return Ok(report);
        }

        let series = tokio::time::timeout(
            self.fetch_timeout,
            self.provider.fetch_candles(symbol, timeframe, limit),
        )
        .await
        .map_err(|_| {
            DataError::Timeout(format!(
                "{} {} 캔들 조회 ({}초)",
                symbol,
                timeframe,
                self.fetch_timeout.as_secs_f64()
            ))
        })??;

        let result = self.analyzer.analyze(&series);
        let report = Arc::new(AnalysisReport {
            symbol: symbol.clone(),
            timeframe,
            origin: series.origin(),
            generated_at: Utc::now(),
            result,
        });

        info!(
            provider = self.provider.name(),
            candles = series.len(),
            origin = ?series.origin(),
            zone = ?report.result.recommendation.zone,
            "분석 완료"
        );

        if let Some(cache) = &self.cache {
            if series.origin() == DataOrigin::Primary {
                cache.put(key, report.clone()).await;
            }
        }

        Ok(report)
    }

    /// 여러 심볼을 동시에 분석합니다. 결과는 입력 순서를 따릅니다.
    pub async fn analyze_many(
        &self,
        symbols: &[Symbol],
        timeframe: Timeframe,
        limit: usize,
    ) -> Vec<(Symbol, Result<Arc<AnalysisReport>>)> {
        let tasks = symbols.iter().map(|symbol| async move {
            (symbol.clone(), self.analyze(symbol, timeframe, limit).await)
        });
        join_all(tasks).await
    }

    /// 주입된 분석 캐시.
    pub fn cache(&self) -> Option<&Arc<dyn AnalysisCache>> {
        self.cache.as_ref()
    }

    async fn cached(&self, key: &CacheKey) -> Option<Arc<AnalysisReport>> {
        match &self.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    /// 동시성 제어를 위한 Lock 획득 또는 생성.
    async fn get_or_create_lock(&self, key: &CacheKey) -> Arc<RwLock<()>> {
        let locks = self.fetch_locks.read().await;
        if let Some(lock) = locks.get(key) {
            return lock.clone();
        }
        drop(locks);

        let mut locks = self.fetch_locks.write().await;
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }
}
