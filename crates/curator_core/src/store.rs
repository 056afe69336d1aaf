use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::{error::CoreError, gateway::CollectionSource};

type LoadOutcome<T> = Result<Vec<T>, CoreError>;

/// Cached copy of one backend collection. `load` always replaces the whole
/// snapshot atomically; partial or merged updates are forbidden. On failure
/// the previous snapshot is retained and the error surfaces to the caller,
/// with no automatic retry.
pub struct EntityStore<T> {
    source: Arc<dyn CollectionSource<T>>,
    inner: Mutex<StoreInner<T>>,
}

struct StoreInner<T> {
    snapshot: Vec<T>,
    last_applied_seq: u64,
    next_seq: u64,
    inflight: Option<watch::Receiver<Option<LoadOutcome<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityStore<T> {
    pub fn new(source: Arc<dyn CollectionSource<T>>) -> Self {
        Self {
            source,
            inner: Mutex::new(StoreInner {
                snapshot: Vec::new(),
                last_applied_seq: 0,
                next_seq: 0,
                inflight: None,
            }),
        }
    }

    /// Last successfully applied snapshot; empty before the first load.
    pub async fn current(&self) -> Vec<T> {
        self.inner.lock().await.snapshot.clone()
    }

    /// Fetches the full collection and replaces the snapshot.
    ///
    /// At most one fetch is outstanding per store: a `load` issued while one
    /// is pending awaits that same outcome instead of issuing a duplicate
    /// request. Each issued fetch carries a monotonic sequence number, and a
    /// fetch that would apply out of order is discarded rather than
    /// overwriting a newer snapshot. On success the returned rows equal the
    /// post-apply snapshot, so `current()` matches the return value exactly.
    pub async fn load(&self) -> LoadOutcome<T> {
        let (seq, tx) = {
            let mut inner = self.inner.lock().await;
            if let Some(rx) = inner.inflight.clone() {
                drop(inner);
                debug!("store: load already in flight; awaiting shared outcome");
                return self.await_inflight(rx).await;
            }
            inner.next_seq += 1;
            let (tx, rx) = watch::channel(None);
            inner.inflight = Some(rx);
            (inner.next_seq, tx)
        };

        let fetched = self.source.fetch_all().await.map_err(CoreError::load);

        let outcome = {
            let mut inner = self.inner.lock().await;
            inner.inflight = None;
            match fetched {
                Ok(rows) => {
                    if seq > inner.last_applied_seq {
                        inner.last_applied_seq = seq;
                        inner.snapshot = rows;
                        debug!(seq, rows = inner.snapshot.len(), "store: snapshot replaced");
                    } else {
                        warn!(
                            seq,
                            applied = inner.last_applied_seq,
                            "store: discarding stale reload"
                        );
                    }
                    Ok(inner.snapshot.clone())
                }
                Err(err) => Err(err),
            }
        };

        let _ = tx.send(Some(outcome.clone()));
        outcome
    }

    async fn await_inflight(&self, mut rx: watch::Receiver<Option<LoadOutcome<T>>>) -> LoadOutcome<T> {
        loop {
            let settled = rx.borrow_and_update().clone();
            if let Some(outcome) = settled {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // The owning load was dropped before settling. Clear the dead
                // guard so the next load can issue a fresh fetch.
                let mut inner = self.inner.lock().await;
                if inner
                    .inflight
                    .as_ref()
                    .is_some_and(|current| current.same_channel(&rx))
                {
                    inner.inflight = None;
                }
                return Err(CoreError::Load {
                    message: "in-flight load dropped before completing".to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
