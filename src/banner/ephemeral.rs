//! Items that remove themselves after a fixed TTL.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Unordered set of items keyed by a time-derived id, each with its own expiry timer.
///
/// Ids are epoch milliseconds at insertion, bumped by one when two inserts land
/// in the same millisecond, so they are unique and increase with insertion order.
/// Inserting spawns a tokio task and therefore needs a running runtime.
#[derive(Debug)]
pub struct EphemeralList<T> {
    items: Arc<DashMap<u64, T>>,
    ttl: Duration,
    last_id: AtomicU64,
}

impl<T> EphemeralList<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            ttl,
            last_id: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn next_id(&self) -> u64 {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let mut last = self.last_id.load(Ordering::Relaxed);
        loop {
            let id = now.max(last + 1);
            match self
                .last_id
                .compare_exchange_weak(last, id, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return id,
                Err(current) => last = current,
            }
        }
    }

    /// Insert the item built from its id and schedule its removal after the TTL.
    pub fn insert_with(&self, build: impl FnOnce(u64) -> T) -> T {
        let id = self.next_id();
        let item = build(id);
        self.items.insert(id, item.clone());

        let items = Arc::clone(&self.items);
        let ttl = self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if items.remove(&id).is_some() {
                tracing::trace!(id, "Ephemeral item expired");
            }
        });

        item
    }

    /// Remove an item early. Removing an absent id is a no-op.
    pub fn remove(&self, id: u64) -> Option<T> {
        self.items.remove(&id).map(|(_, item)| item)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    /// Live items, newest first.
    pub fn items(&self) -> Vec<T> {
        let mut entries: Vec<(u64, T)> = self
            .items
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        entries.into_iter().map(|(_, item)| item).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
