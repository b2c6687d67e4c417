//! In-process keyed lock serializing operations on the same app id.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per app id, created on first use.
///
/// Different ids never contend. Entries are kept for the life of the
/// process; the id space is the catalog, so the map stays small.
#[derive(Default)]
pub struct AppLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl AppLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `app_id`. Released when the guard drops.
    pub async fn acquire(&self, app_id: &str) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(app_id.to_string()).or_default().clone();
        lock.lock_owned().await
    }
}
