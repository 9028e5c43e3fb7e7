//! In-memory snapshot cache with explicit invalidation.
//!
//! Memoizes one [`JoinGraph`] per schema identity. Population is
//! at-most-once per schema: concurrent requests for the same uncached schema
//! share a single in-flight build instead of triggering redundant
//! introspection passes. Snapshots are immutable and handed out as `Arc`s,
//! so invalidation never disturbs readers that already hold one.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::graph::JoinGraph;
use crate::metadata::{MetadataError, MetadataResult, SchemaProvider};

type Slot = Arc<OnceCell<Arc<JoinGraph>>>;

/// Cache of join-graph snapshots keyed by schema identity.
///
/// # Example
///
/// ```ignore
/// use trellis::cache::SnapshotCache;
///
/// let cache = SnapshotCache::new();
/// let graph = cache.get_or_build("shop", &provider).await?;
/// // ... schema changed externally ...
/// cache.invalidate("shop");
/// let rebuilt = cache.get_or_build("shop", &provider).await?;
/// ```
#[derive(Debug, Default)]
pub struct SnapshotCache {
    snapshots: DashMap<String, Slot>,
}

impl SnapshotCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `schema`, building it from `provider`
    /// on first request.
    ///
    /// The build (one introspection pass plus graph construction) runs at
    /// most once per schema identity; concurrent callers await the same
    /// initialization. A failed build leaves the slot empty, so the next
    /// caller retries.
    pub async fn get_or_build(
        &self,
        schema: &str,
        provider: &dyn SchemaProvider,
    ) -> MetadataResult<Arc<JoinGraph>> {
        // Clone the slot out of the map entry so no shard lock is held
        // across the await below.
        let slot: Slot = self.snapshots.entry(schema.to_string()).or_default().clone();

        let graph = slot
            .get_or_try_init(|| async {
                let metadata = provider.fetch_metadata().await?;
                Ok::<_, MetadataError>(Arc::new(JoinGraph::build(&metadata)))
            })
            .await?;
        Ok(Arc::clone(graph))
    }

    /// Snapshot for `schema` if one is already built, without triggering a
    /// build.
    pub fn get(&self, schema: &str) -> Option<Arc<JoinGraph>> {
        self.snapshots
            .get(schema)
            .and_then(|slot| slot.get().cloned())
    }

    /// Drop the cached snapshot for `schema`, forcing a rebuild on the next
    /// request. Returns whether a slot existed.
    ///
    /// Safe to call concurrently with in-flight reads: readers holding an
    /// `Arc` keep using the snapshot they obtained, and an in-flight build
    /// finishes against the removed slot while subsequent requests get a
    /// fresh one.
    pub fn invalidate(&self, schema: &str) -> bool {
        self.snapshots.remove(schema).is_some()
    }

    /// Drop every cached snapshot.
    pub fn clear(&self) {
        self.snapshots.clear();
    }

    /// Number of schemas with a cache slot (built or in flight).
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the cache holds no slots.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
