use crate::access::{AccessGate, Session};
use crate::cache::FeedCache;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::filters::{closer_options, Selection};
use crate::loader::FeedLoader;
use crate::schema::FeedSnapshot;
use crate::{DashboardProcessor, DashboardReport};
use log::info;
use std::sync::Arc;

/// Everything the presentation shell calls into: the access gate, the cached
/// feeds and the per-render pipeline.
pub struct DashboardService {
    loader: FeedLoader,
    cache: FeedCache,
    gate: AccessGate,
}

impl DashboardService {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: FeedLoader::from_config(config),
            cache: FeedCache::new(config.cache_ttl()),
            gate: AccessGate::from_config(config),
        })
    }

    pub fn with_loader(mut self, loader: FeedLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn cache(&self) -> &FeedCache {
        &self.cache
    }

    /// Cached feeds, reloading them when the TTL has run out.
    pub async fn snapshot(&self) -> Arc<FeedSnapshot> {
        self.cache.get_or_refresh(|| self.loader.load()).await
    }

    /// Manual refresh: the next render refetches both feeds.
    pub async fn refresh(&self) {
        info!("Manual refresh requested");
        self.cache.invalidate().await;
    }

    pub async fn closer_options(&self, session: &Session) -> Result<Vec<String>> {
        session.require_access()?;
        Ok(closer_options(&self.snapshot().await.sales))
    }

    pub async fn render(&self, session: &Session, selection: &Selection) -> Result<DashboardReport> {
        session.require_access()?;
        let snapshot = self.snapshot().await;
        DashboardProcessor::build(&snapshot, selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::filters::DateRange;
    use chrono::NaiveDate;

    fn offline_config() -> DashboardConfig {
        DashboardConfig::new(
            "http://127.0.0.1:1/ventas.csv",
            "http://127.0.0.1:1/gastos.csv",
            "secret",
        )
    }

    fn selection() -> Selection {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        Selection::new(DateRange::single_day(day), "Todos")
    }

    #[tokio::test]
    async fn test_render_requires_access() {
        let service = DashboardService::new(&offline_config()).unwrap();
        let session = Session::new();

        let result = service.render(&session, &selection()).await;
        assert!(matches!(result, Err(DashboardError::AccessDenied)));
        assert!(!service.cache().is_fresh().await);
    }

    #[tokio::test]
    async fn test_render_without_sales_halts() {
        let service = DashboardService::new(&offline_config()).unwrap();
        let mut session = Session::new();
        service.gate().submit(&mut session, "secret");

        let result = service.render(&session, &selection()).await;
        match result {
            Err(DashboardError::NoSalesData(message)) => {
                assert!(message.contains("Error cargando Ventas"));
            }
            other => panic!("expected NoSalesData, got {:?}", other.map(|_| ())),
        }

        assert!(service.cache().is_fresh().await);
        service.refresh().await;
        assert!(!service.cache().is_fresh().await);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DashboardConfig::new("", "b", "c");
        assert!(DashboardService::new(&config).is_err());
    }
}
