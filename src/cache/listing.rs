//! Last-known resource listing.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

use crate::backend::types::BackendView;

/// Advisory snapshot of the backend's listing.
///
/// Never authoritative: any successful provisioning or teardown
/// invalidates it wholesale, forcing the next read to re-query the
/// backend. The cache is swapped, never updated in place, so concurrent
/// readers keep whichever snapshot they already hold.
#[derive(Clone, Default)]
pub struct ListingCache {
    inner: Arc<ArcSwapOption<Vec<BackendView>>>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot, if one is cached.
    pub fn get(&self) -> Option<Arc<Vec<BackendView>>> {
        self.inner.load_full()
    }

    /// Replace the snapshot with a freshly fetched listing, returning
    /// the stored snapshot.
    pub fn store(&self, views: Vec<BackendView>) -> Arc<Vec<BackendView>> {
        let snapshot = Arc::new(views);
        self.inner.store(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// Drop the snapshot. The next read must re-fetch.
    pub fn invalidate(&self) {
        self.inner.store(None);
        tracing::debug!("listing cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::{BucketId, ResourceIdentity};

    fn view(name: &str) -> BackendView {
        BackendView {
            identity: ResourceIdentity::Bucket(BucketId::from(name)),
            name: name.to_string(),
            owner: "5alice".to_string(),
            root: "0xaa".to_string(),
            private: false,
        }
    }

    #[test]
    fn test_store_and_invalidate() {
        let cache = ListingCache::new();
        assert!(cache.get().is_none());

        cache.store(vec![view("docs")]);
        assert_eq!(cache.get().unwrap().len(), 1);

        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let cache = ListingCache::new();
        cache.store(vec![view("docs")]);

        let snapshot = cache.get().unwrap();
        cache.invalidate();

        // The held snapshot survives invalidation.
        assert_eq!(snapshot[0].name, "docs");
        assert!(cache.get().is_none());
    }
}
