//! 분석 서비스 통합 테스트 (캐시, 타임아웃, 대체 소스 태그).

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dalal_analytics::TechnicalAnalyzer;
use dalal_core::{
    Candle, CandleProvider, CandleSeries, DataOrigin, ProviderError, Symbol, Timeframe,
};
use dalal_data::{AnalysisCache, AnalysisService, DataError, FallbackProvider, TtlAnalysisCache};

/// 호출 횟수를 세는 테스트용 제공자. 지연이나 실패를 지정할 수 있음.
struct MockProvider {
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl MockProvider {
    fn healthy() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: None,
            fail: false,
        })
    }

    fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: Some(delay),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay: None,
            fail: true,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CandleProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_candles(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(ProviderError::Network("connection reset".to_string()));
        }

        let candles = (0..limit as i64)
            .map(|i| {
                let base = Decimal::from(100 + (i % 7) * 2);
                Candle::new(i * 86_400, base, base + Decimal::ONE, base - Decimal::ONE, base, 1_000 + i as u64)
            })
            .collect();
        CandleSeries::new(symbol.clone(), timeframe, candles).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

fn cache() -> Arc<TtlAnalysisCache> {
    Arc::new(TtlAnalysisCache::new(Duration::from_secs(300), 16))
}

#[tokio::test(start_paused = true)]
async fn cached_report_is_reused_until_ttl() {
    let provider = MockProvider::healthy();
    let cache = cache();
    let service = AnalysisService::new(provider.clone(), TechnicalAnalyzer::default())
        .with_cache(cache.clone());
    let symbol = Symbol::nse("TCS");

    let first = service.analyze(&symbol, Timeframe::D1, 40).await.unwrap();
    let second = service.analyze(&symbol, Timeframe::D1, 40).await.unwrap();
    assert_eq!(provider.calls(), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.origin, DataOrigin::Primary);
    assert_eq!(first.result.candle_count, 40);

    tokio::time::advance(Duration::from_secs(301)).await;
    service.analyze(&symbol, Timeframe::D1, 40).await.unwrap();
    assert_eq!(provider.calls(), 2);
    assert_eq!(cache.stats().hits, 1);
}

#[tokio::test(start_paused = true)]
async fn timeframes_are_cached_separately() {
    let provider = MockProvider::healthy();
    let service =
        AnalysisService::new(provider.clone(), TechnicalAnalyzer::default()).with_cache(cache());
    let symbol = Symbol::nse("INFY");

    service.analyze(&symbol, Timeframe::D1, 30).await.unwrap();
    service.analyze(&symbol, Timeframe::W1, 30).await.unwrap();
    assert_eq!(provider.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_provider_times_out() {
    let provider = MockProvider::slow(Duration::from_secs(60));
    let service = AnalysisService::new(provider.clone(), TechnicalAnalyzer::default())
        .with_timeout(Duration::from_secs(5));

    let result = service.analyze(&Symbol::nse("SBIN"), Timeframe::D1, 30).await;
    assert!(matches!(result, Err(DataError::Timeout(_))));
}

#[tokio::test]
async fn provider_failure_is_surfaced_and_not_cached() {
    let provider = MockProvider::failing();
    let cache = cache();
    let service = AnalysisService::new(provider.clone(), TechnicalAnalyzer::default())
        .with_cache(cache.clone());
    let symbol = Symbol::nse("HDFCBANK");

    let result = service.analyze(&symbol, Timeframe::D1, 30).await;
    assert!(matches!(result, Err(DataError::Provider(ProviderError::Network(_)))));

    let again = service.analyze(&symbol, Timeframe::D1, 30).await;
    assert!(again.is_err());
    assert_eq!(provider.calls(), 2);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn fallback_reports_are_tagged_and_not_cached() {
    let primary = MockProvider::failing();
    let secondary = MockProvider::healthy();
    let provider = Arc::new(FallbackProvider::new(primary.clone(), secondary.clone()));
    let cache = cache();
    let service =
        AnalysisService::new(provider, TechnicalAnalyzer::default()).with_cache(cache.clone());
    let symbol = Symbol::nse("ITC");

    let report = service.analyze(&symbol, Timeframe::D1, 30).await.unwrap();
    assert_eq!(report.origin, DataOrigin::Fallback);
    assert!(report.is_fallback());

    service.analyze(&symbol, Timeframe::D1, 30).await.unwrap();
    assert_eq!(secondary.calls(), 2);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn fallback_returns_primary_error_when_both_fail() {
    let provider = FallbackProvider::new(MockProvider::failing(), MockProvider::failing());
    let result = provider
        .fetch_candles(&Symbol::nse("ITC"), Timeframe::D1, 10)
        .await;
    assert!(matches!(result, Err(ProviderError::Network(_))));
}

#[tokio::test(start_paused = true)]
async fn hanging_primary_falls_back_within_service_timeout() {
    let primary = MockProvider::slow(Duration::from_secs(3600));
    let secondary = MockProvider::healthy();
    let provider = Arc::new(
        FallbackProvider::new(primary.clone(), secondary.clone())
            .with_primary_timeout(Duration::from_secs(5)),
    );
    let service = AnalysisService::new(provider, TechnicalAnalyzer::default())
        .with_timeout(Duration::from_secs(10));

    let report = service
        .analyze(&Symbol::nse("ITC"), Timeframe::D1, 30)
        .await
        .unwrap();
    assert!(report.is_fallback());
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn primary_timeout_is_reported_when_secondary_fails() {
    let provider = FallbackProvider::new(
        MockProvider::slow(Duration::from_secs(3600)),
        MockProvider::failing(),
    )
    .with_primary_timeout(Duration::from_secs(2));

    let result = provider
        .fetch_candles(&Symbol::nse("ITC"), Timeframe::D1, 10)
        .await;
    match result {
        Err(ProviderError::Network(msg)) => assert!(msg.contains("mock")),
        other => panic!("unexpected: {:?}", other.map(|s| s.len())),
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_requests_for_same_key_fetch_once() {
    let provider = MockProvider::slow(Duration::from_millis(200));
    let service =
        AnalysisService::new(provider.clone(), TechnicalAnalyzer::default()).with_cache(cache());
    let symbol = Symbol::nse("WIPRO");

    let (a, b) = tokio::join!(
        service.analyze(&symbol, Timeframe::D1, 30),
        service.analyze(&symbol, Timeframe::D1, 30)
    );
    assert!(a.is_ok() && b.is_ok());
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn zero_limit_is_rejected_before_fetch() {
    let provider = MockProvider::healthy();
    let service = AnalysisService::new(provider.clone(), TechnicalAnalyzer::default());

    let result = service.analyze(&Symbol::nse("TCS"), Timeframe::D1, 0).await;
    assert!(matches!(result, Err(DataError::InvalidRequest(_))));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn analyze_many_keeps_input_order() {
    let provider = MockProvider::healthy();
    let service = AnalysisService::new(provider.clone(), TechnicalAnalyzer::default());
    let symbols = vec![Symbol::nse("TCS"), Symbol::nse("INFY"), Symbol::bse("500325")];

    let results = service.analyze_many(&symbols, Timeframe::D1, 25).await;

    assert_eq!(results.len(), 3);
    for ((symbol, result), expected) in results.iter().zip(&symbols) {
        assert_eq!(symbol, expected);
        assert_eq!(&result.as_ref().unwrap().symbol, expected);
    }
    assert_eq!(provider.calls(), 3);
}
