use chrono::{Datelike, Local};
use laborviz::market::domain::YearRange;
use laborviz::market::providers::{MarketDataProvider, MarketDataset, ProviderError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

/// PNAD Contínua starts publishing sector series in 2012.
pub(crate) const EARLIEST_YEAR: i32 = 2012;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dashboard: Arc<DashboardService>,
}

/// Owns the session dataset: fetches lazily on first use and keeps it in
/// memory until an explicit refresh. Nothing is persisted across restarts.
pub(crate) struct DashboardService {
    provider: Arc<dyn MarketDataProvider>,
    cache: Mutex<Option<Arc<MarketDataset>>>,
}

impl DashboardService {
    pub(crate) fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            cache: Mutex::new(None),
        }
    }

    /// Widest window ever shown; requests narrow it client-side via filters.
    pub(crate) fn fetch_window() -> YearRange {
        let current_year = Local::now().year();
        YearRange::new(EARLIEST_YEAR, current_year.max(EARLIEST_YEAR))
            .expect("window bounds are ordered")
    }

    pub(crate) async fn dataset(&self) -> Result<Arc<MarketDataset>, ProviderError> {
        let mut guard = self.cache.lock().await;
        if let Some(dataset) = guard.as_ref() {
            return Ok(Arc::clone(dataset));
        }

        let fetched = Arc::new(self.provider.fetch(Self::fetch_window()).await?);
        *guard = Some(Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Drops the cached dataset and refetches from the providers.
    pub(crate) async fn refresh(&self) -> Result<Arc<MarketDataset>, ProviderError> {
        let fetched = Arc::new(self.provider.fetch(Self::fetch_window()).await?);
        *self.cache.lock().await = Some(Arc::clone(&fetched));
        Ok(fetched)
    }
}
