use std::{
    future::Future,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

use crate::models::propertymodel::Property;

#[derive(Debug)]
struct Snapshot {
    generation: u64,
    records: Arc<Vec<Property>>,
    fetched_at: Option<Instant>,
}

/// In-memory copy of the listing table that the search endpoint filters.
///
/// Every refresh draws a generation number before it starts fetching. A fetch
/// result only replaces the installed snapshot when its generation is newer,
/// so a slow fetch that finishes late cannot overwrite a fresher list.
#[derive(Debug)]
pub struct Catalog {
    ttl: Duration,
    next_generation: AtomicU64,
    // Snapshots at or below this generation were fetched before the last write.
    invalidated_through: AtomicU64,
    snapshot: RwLock<Snapshot>,
}

impl Catalog {
    pub fn new(ttl: Duration) -> Self {
        Catalog {
            ttl,
            next_generation: AtomicU64::new(0),
            invalidated_through: AtomicU64::new(0),
            snapshot: RwLock::new(Snapshot {
                generation: 0,
                records: Arc::new(Vec::new()),
                fetched_at: None,
            }),
        }
    }

    /// Draws the generation for a fetch about to start.
    pub fn begin_refresh(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Installs `records` if `generation` is newer than the current snapshot.
    /// Returns whether the records were installed.
    pub async fn install(&self, generation: u64, records: Vec<Property>) -> bool {
        let mut snapshot = self.snapshot.write().await;

        if generation <= snapshot.generation {
            tracing::debug!(
                "Discarding catalog fetch {} (installed: {})",
                generation,
                snapshot.generation
            );
            return false;
        }

        snapshot.generation = generation;
        snapshot.records = Arc::new(records);
        snapshot.fetched_at = Some(Instant::now());
        true
    }

    /// Marks the installed snapshot stale. Fetches that began before this
    /// call may still be installed but will not count as fresh.
    pub fn invalidate(&self) {
        let latest = self.next_generation.load(Ordering::SeqCst);
        self.invalidated_through.fetch_max(latest, Ordering::SeqCst);
    }

    #[cfg(test)]
    pub async fn is_fresh(&self) -> bool {
        let snapshot = self.snapshot.read().await;
        self.snapshot_is_fresh(&snapshot)
    }

    fn snapshot_is_fresh(&self, snapshot: &Snapshot) -> bool {
        match snapshot.fetched_at {
            Some(fetched_at) => {
                snapshot.generation > self.invalidated_through.load(Ordering::SeqCst)
                    && fetched_at.elapsed() < self.ttl
            }
            None => false,
        }
    }

    /// Current records, fetched again through `fetch` when stale.
    pub async fn records_with<F, Fut, E>(&self, fetch: F) -> Result<Arc<Vec<Property>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Property>, E>>,
    {
        {
            let snapshot = self.snapshot.read().await;
            if self.snapshot_is_fresh(&snapshot) {
                return Ok(snapshot.records.clone());
            }
        }

        self.refresh_with(fetch).await
    }

    /// Fetches unconditionally and returns whichever snapshot is newest once
    /// the fetch lands.
    pub async fn refresh_with<F, Fut, E>(&self, fetch: F) -> Result<Arc<Vec<Property>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Property>, E>>,
    {
        let generation = self.begin_refresh();
        let records = fetch().await?;
        self.install(generation, records).await;

        Ok(self.snapshot.read().await.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::service::fixtures::property;

    fn titles(records: &[Property]) -> Vec<String> {
        records.iter().map(|p| p.title.clone()).collect()
    }

    #[tokio::test]
    async fn late_stale_fetch_is_discarded() {
        let catalog = Catalog::new(Duration::from_secs(30));

        let first = catalog.begin_refresh();
        let second = catalog.begin_refresh();

        assert!(catalog.install(second, vec![property("Fresh", "Lahore", 1)]).await);
        assert!(!catalog.install(first, vec![property("Stale", "Lahore", 1)]).await);

        let records = catalog
            .records_with(|| async { Ok::<_, Infallible>(Vec::new()) })
            .await
            .unwrap();
        assert_eq!(titles(&records), vec!["Fresh"]);
    }

    #[tokio::test]
    async fn concurrent_refreshes_keep_the_newest_fetch() {
        let catalog = Catalog::new(Duration::from_secs(30));

        let slow = catalog.refresh_with(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, Infallible>(vec![property("Old", "Karachi", 1)])
        });
        let fast = catalog.refresh_with(|| async {
            Ok::<_, Infallible>(vec![property("New", "Karachi", 1)])
        });

        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(titles(&fast.unwrap()), vec!["New"]);
        assert_eq!(titles(&slow.unwrap()), vec!["New"]);
    }

    #[tokio::test]
    async fn fresh_snapshot_skips_the_fetch() {
        let catalog = Catalog::new(Duration::from_secs(30));

        catalog
            .refresh_with(|| async { Ok::<_, Infallible>(vec![property("Cached", "Multan", 1)]) })
            .await
            .unwrap();
        assert!(catalog.is_fresh().await);

        let records = catalog
            .records_with(|| async { Ok::<_, Infallible>(vec![property("Refetched", "Multan", 1)]) })
            .await
            .unwrap();
        assert_eq!(titles(&records), vec!["Cached"]);
    }

    #[tokio::test]
    async fn invalidate_forces_the_next_read_to_fetch() {
        let catalog = Catalog::new(Duration::from_secs(30));

        catalog
            .refresh_with(|| async { Ok::<_, Infallible>(vec![property("Before", "Multan", 1)]) })
            .await
            .unwrap();
        catalog.invalidate();
        assert!(!catalog.is_fresh().await);

        let records = catalog
            .records_with(|| async { Ok::<_, Infallible>(vec![property("After", "Multan", 1)]) })
            .await
            .unwrap();
        assert_eq!(titles(&records), vec!["After"]);
        assert!(catalog.is_fresh().await);
    }

    #[tokio::test]
    async fn zero_ttl_always_refetches() {
        let catalog = Catalog::new(Duration::ZERO);

        catalog
            .refresh_with(|| async { Ok::<_, Infallible>(vec![property("One", "Sialkot", 1)]) })
            .await
            .unwrap();

        let records = catalog
            .records_with(|| async { Ok::<_, Infallible>(vec![property("Two", "Sialkot", 1)]) })
            .await
            .unwrap();
        assert_eq!(titles(&records), vec!["Two"]);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_the_snapshot_alone() {
        let catalog = Catalog::new(Duration::from_secs(30));

        catalog
            .refresh_with(|| async { Ok::<_, String>(vec![property("Kept", "Quetta", 1)]) })
            .await
            .unwrap();
        catalog.invalidate();

        let err = catalog
            .records_with(|| async { Err::<Vec<Property>, _>("database down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "database down");

        let snapshot = catalog.snapshot.read().await;
        assert_eq!(titles(&snapshot.records), vec!["Kept"]);
    }
}
