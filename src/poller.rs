use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};
use tracing::Instrument;

use crate::error::Result;
use crate::exchange::{ListingSource, PairConfig};
use crate::observability;
use crate::sampler::PriceSampler;
use crate::storage::RateStore;
use crate::types::RateRecord;

/// Drives the sampling pipeline: fetch the book for each configured
/// pair, reduce it to a median, persist the observation.
pub struct RatePoller {
    source: Arc<dyn ListingSource>,
    store: Arc<dyn RateStore>,
    sampler: PriceSampler,
    pairs: Vec<PairConfig>,
}

/// Outcome counts for one pass over the pair list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pairs: usize,
    pub recorded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RatePoller {
    pub fn new(
        source: Arc<dyn ListingSource>,
        store: Arc<dyn RateStore>,
        sampler: PriceSampler,
        pairs: Vec<PairConfig>,
    ) -> Self {
        RatePoller {
            source,
            store,
            sampler,
            pairs,
        }
    }

    /// One pass over all enabled pairs. A pair that fails is logged
    /// and never blocks the pairs after it.
    pub async fn run_once(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        for pair in &self.pairs {
            if !pair.enabled {
                tracing::debug!(
                    "Pair {} -> {} disabled, skipping",
                    pair.from_currency,
                    pair.to_currency
                );
                continue;
            }
            summary.pairs += 1;

            let span = observability::tracing::trace_pair_sampling(pair);
            match self.sample_pair(pair).instrument(span).await {
                Ok(Some(median_price)) => {
                    summary.recorded += 1;
                    tracing::info!(
                        "Recorded {} -> {} median price: {} (payment method {})",
                        pair.from_currency,
                        pair.to_currency,
                        median_price,
                        pair.payment_method_id
                    );
                }
                Ok(None) => {
                    summary.skipped += 1;
                    tracing::warn!(
                        "No usable listings for {} -> {}, nothing recorded",
                        pair.from_currency,
                        pair.to_currency
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        "Sampling {} -> {} failed: {}",
                        pair.from_currency,
                        pair.to_currency,
                        e
                    );
                }
            }
        }

        summary
    }

    /// Polls on a fixed interval until a shutdown signal arrives.
    pub async fn run(&self, poll_interval: Duration) -> Result<()> {
        let mut ticker = interval(poll_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = self.run_once().await;
                    tracing::info!(
                        "Pass complete: {} recorded, {} skipped, {} failed of {} pairs",
                        summary.recorded,
                        summary.skipped,
                        summary.failed,
                        summary.pairs
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping poller");
                    return Ok(());
                }
            }
        }
    }

    async fn sample_pair(&self, pair: &PairConfig) -> Result<Option<f64>> {
        let listings = self.source.fetch_listings(pair).await?;
        tracing::debug!(
            "Fetched {} listings from {}",
            listings.len(),
            self.source.source_id()
        );

        let median_price = match self.sampler.compute(&listings) {
            Some(price) => price,
            None => return Ok(None),
        };

        let record = RateRecord {
            from_currency: pair.from_currency.clone(),
            to_currency: pair.to_currency.clone(),
            amount: pair.amount.clone(),
            payment_method_id: pair.payment_method_id.clone(),
            median_price,
            observed_at: Utc::now(),
        };
        self.store.append(&record).await?;

        Ok(Some(median_price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::exchange::Side;
    use crate::sampler::SampleWindow;
    use crate::types::Listing;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        Source {}

        #[async_trait]
        impl ListingSource for Source {
            async fn fetch_listings(&self, pair: &PairConfig) -> Result<Vec<Listing>>;
            fn source_id(&self) -> &str;
        }
    }

    mock! {
        Store {}

        #[async_trait]
        impl RateStore for Store {
            async fn append(&self, record: &RateRecord) -> Result<()>;
            async fn latest(
                &self,
                from_currency: &str,
                to_currency: &str,
            ) -> Result<Option<RateRecord>>;
            async fn recent(
                &self,
                from_currency: &str,
                to_currency: &str,
                limit: u32,
            ) -> Result<Vec<RateRecord>>;
        }
    }

    fn pair(from: &str, to: &str) -> PairConfig {
        PairConfig {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            side: Side::Sell,
            amount: "10000".to_string(),
            payment_method_id: "581".to_string(),
            enabled: true,
        }
    }

    fn book(prices: &[&str]) -> Vec<Listing> {
        prices.iter().copied().map(Listing::new).collect()
    }

    fn sampler() -> PriceSampler {
        PriceSampler::new(SampleWindow::new(0, 10))
    }

    #[tokio::test]
    async fn test_run_once_records_median() {
        let mut source = MockSource::new();
        source
            .expect_fetch_listings()
            .times(1)
            .returning(|_| Ok(book(&["100", "90", "95", "85", "92"])));
        source.expect_source_id().return_const("mock".to_string());

        let mut store = MockStore::new();
        store
            .expect_append()
            .withf(|record: &RateRecord| {
                record.from_currency == "RUB"
                    && record.to_currency == "USDT"
                    && record.median_price == 92.0
            })
            .times(1)
            .returning(|_| Ok(()));

        let poller = RatePoller::new(
            Arc::new(source),
            Arc::new(store),
            sampler(),
            vec![pair("RUB", "USDT")],
        );

        let summary = poller.run_once().await;
        assert_eq!(
            summary,
            RunSummary {
                pairs: 1,
                recorded: 1,
                skipped: 0,
                failed: 0
            }
        );
    }

    #[tokio::test]
    async fn test_failing_pair_does_not_block_the_rest() {
        let mut source = MockSource::new();
        source
            .expect_fetch_listings()
            .times(2)
            .returning(|pair| {
                if pair.from_currency == "RUB" {
                    Err(Error::ApiError {
                        code: 10001,
                        message: "params error".to_string(),
                    })
                } else {
                    Ok(book(&["2.70", "2.71"]))
                }
            });
        source.expect_source_id().return_const("mock".to_string());

        let mut store = MockStore::new();
        store
            .expect_append()
            .withf(|record: &RateRecord| record.from_currency == "GEL")
            .times(1)
            .returning(|_| Ok(()));

        let poller = RatePoller::new(
            Arc::new(source),
            Arc::new(store),
            sampler(),
            vec![pair("RUB", "USDT"), pair("GEL", "USDT")],
        );

        let summary = poller.run_once().await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.recorded, 1);
    }

    #[tokio::test]
    async fn test_empty_sample_skips_persistence() {
        let mut source = MockSource::new();
        source
            .expect_fetch_listings()
            .times(1)
            .returning(|_| Ok(book(&["n/a", ""])));
        source.expect_source_id().return_const("mock".to_string());

        let mut store = MockStore::new();
        store.expect_append().times(0);

        let poller = RatePoller::new(
            Arc::new(source),
            Arc::new(store),
            sampler(),
            vec![pair("RUB", "USDT")],
        );

        let summary = poller.run_once().await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.recorded, 0);
    }

    #[tokio::test]
    async fn test_disabled_pair_is_not_fetched() {
        let mut source = MockSource::new();
        source.expect_fetch_listings().times(0);
        source.expect_source_id().return_const("mock".to_string());

        let store = MockStore::new();

        let mut disabled = pair("RUB", "USDT");
        disabled.enabled = false;

        let poller = RatePoller::new(
            Arc::new(source),
            Arc::new(store),
            sampler(),
            vec![disabled],
        );

        let summary = poller.run_once().await;
        assert_eq!(summary, RunSummary::default());
    }

    #[tokio::test]
    async fn test_store_failure_counts_as_failed() {
        let mut source = MockSource::new();
        source
            .expect_fetch_listings()
            .times(1)
            .returning(|_| Ok(book(&["100"])));
        source.expect_source_id().return_const("mock".to_string());

        let mut store = MockStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Err(Error::StorageError(sqlx::Error::PoolClosed)));

        let poller = RatePoller::new(
            Arc::new(source),
            Arc::new(store),
            sampler(),
            vec![pair("RUB", "USDT")],
        );

        let summary = poller.run_once().await;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.recorded, 0);
    }
}
