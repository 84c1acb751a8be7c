//! Implements a struct that holds the state of the dashboard server.

use std::sync::{Arc, RwLock};

use crate::{
    Error,
    aggregation::BucketOrder,
    snapshot::{Snapshot, SnapshotSource},
};

/// The default number of transactions listed in the recent transactions panel.
pub const DEFAULT_RECENT_COUNT: usize = 3;

/// Settings that control how the dashboard is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    /// The order of the buckets in the income and expenses chart.
    pub bucket_order: BucketOrder,
    /// The number of transactions listed in the recent transactions panel.
    pub recent_count: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            bucket_order: BucketOrder::default(),
            recent_count: DEFAULT_RECENT_COUNT,
        }
    }
}

/// The state of the dashboard server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The snapshot currently being displayed.
    ///
    /// Handlers clone the inner [Arc] and work on that, so a reload never
    /// changes a snapshot while a request is using it.
    pub snapshot: Arc<RwLock<Arc<Snapshot>>>,

    /// Where snapshots are read from.
    pub source: Arc<dyn SnapshotSource>,

    /// The display settings for the dashboard.
    pub settings: DashboardSettings,
}

impl AppState {
    /// Create a new [AppState] and load the first snapshot from `source`.
    ///
    /// # Errors
    /// Returns an error if the snapshot could not be read or is not a JSON array.
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        settings: DashboardSettings,
    ) -> Result<Self, Error> {
        let snapshot = Snapshot::load(source.as_ref())?;

        Ok(Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            source,
            settings,
        })
    }

    /// Create a new [AppState] that displays `snapshot`.
    ///
    /// `source` is only read when the snapshot is reloaded.
    pub fn with_snapshot(
        snapshot: Snapshot,
        source: Arc<dyn SnapshotSource>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
            source,
            settings,
        }
    }

    /// Get the snapshot currently being displayed.
    ///
    /// # Errors
    /// Returns [Error::SnapshotLockError] if the lock is poisoned.
    pub fn current_snapshot(&self) -> Result<Arc<Snapshot>, Error> {
        current_snapshot(&self.snapshot)
    }

    /// Read the source again and replace the current snapshot.
    ///
    /// The current snapshot is kept if the source could not be read.
    ///
    /// # Errors
    /// Returns an error if the source could not be read or the lock is poisoned.
    pub fn reload(&self) -> Result<Arc<Snapshot>, Error> {
        reload_snapshot(&self.snapshot, self.source.as_ref())
    }
}

pub(crate) fn current_snapshot(lock: &RwLock<Arc<Snapshot>>) -> Result<Arc<Snapshot>, Error> {
    lock.read()
        .map(|snapshot| Arc::clone(&snapshot))
        .inspect_err(|error| tracing::error!("could not acquire snapshot lock: {error}"))
        .map_err(|_| Error::SnapshotLockError)
}

pub(crate) fn reload_snapshot(
    lock: &RwLock<Arc<Snapshot>>,
    source: &dyn SnapshotSource,
) -> Result<Arc<Snapshot>, Error> {
    let snapshot = Arc::new(Snapshot::load(source)?);

    let mut current = lock
        .write()
        .inspect_err(|error| tracing::error!("could not acquire snapshot lock: {error}"))
        .map_err(|_| Error::SnapshotLockError)?;
    *current = Arc::clone(&snapshot);

    Ok(snapshot)
}
