//! LegendsService - owns the published World and runs loads

use arc_swap::ArcSwapOption;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::core::config::LoaderConfig;
use crate::core::error::{LegendsError, Result};
use crate::load::decode::decode_file;
use crate::load::progress::{Progress, ProgressSnapshot};
use crate::load::slot::WorldSlot;
use crate::model::{LoadStats, World};
use crate::query::Query;

struct Inner {
    config: LoaderConfig,
    slot: WorldSlot,
    progress: Progress,
    loading: AtomicBool,
    last_stats: ArcSwapOption<LoadStats>,
}

/// Clears the loading flag however the load ends, panics included. A load
/// that never reached finish or fail is reported as failed.
struct LoadingGuard<'a>(&'a Inner);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.0.progress.is_reading() {
            tracing::error!("Load ended without completing");
            self.0.progress.fail("Load aborted");
        }
        self.0.loading.store(false, Ordering::SeqCst);
    }
}

/// Entry point for hosts: start loads, read progress, query the current
/// World. Cheap to clone; clones share state.
///
/// At most one load runs at a time. A second request while one is running
/// is rejected with [`LegendsError::LoadInProgress`]. A World is published
/// only when its load succeeds, so a failed reload leaves the previous one
/// in place.
#[derive(Clone)]
pub struct LegendsService {
    inner: Arc<Inner>,
}

impl LegendsService {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                slot: WorldSlot::new(),
                progress: Progress::new(),
                loading: AtomicBool::new(false),
                last_stats: ArcSwapOption::empty(),
            }),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Set the loading flag, or fail if it is already set
    fn begin(&self) -> Result<()> {
        self.inner
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| {
                tracing::info!("Load already in progress, rejecting request");
                LegendsError::LoadInProgress
            })
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::SeqCst)
    }

    /// Start loading `path` on the blocking pool of the current tokio
    /// runtime. Returns immediately; poll [`progress`](Self::progress) or
    /// await the handle.
    pub fn start_load(&self, path: impl Into<PathBuf>) -> Result<JoinHandle<Result<LoadStats>>> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| LegendsError::TaskFailed(e.to_string()))?;
        self.begin()?;

        let path = path.into();
        let service = self.clone();
        Ok(handle.spawn_blocking(move || {
            let _guard = LoadingGuard(&service.inner);
            service.run(&path)
        }))
    }

    /// Start a load and wait for it
    pub async fn load(&self, path: impl Into<PathBuf>) -> Result<LoadStats> {
        self.start_load(path)?
            .await
            .map_err(|e| LegendsError::TaskFailed(e.to_string()))?
    }

    /// Load on the calling thread
    pub fn load_blocking(&self, path: &Path) -> Result<LoadStats> {
        self.begin()?;
        let _guard = LoadingGuard(&self.inner);
        self.run(path)
    }

    fn run(&self, path: &Path) -> Result<LoadStats> {
        let inner = &self.inner;
        match decode_file(path, &inner.config, &inner.progress) {
            Ok((world, stats)) => {
                inner.slot.publish(world);
                inner.last_stats.store(Some(Arc::new(stats.clone())));
                inner.progress.finish(format!(
                    "Loaded {} records from {}",
                    stats.total_records(),
                    path.display()
                ));
                Ok(stats)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Load failed");
                inner.progress.fail(format!("Failed to load {}: {}", path.display(), e));
                Err(e)
            }
        }
    }

    /// The currently published World, if any load has succeeded
    pub fn world(&self) -> Option<Arc<World>> {
        self.inner.slot.get()
    }

    /// Query view over the World published right now
    pub fn query(&self) -> Query {
        Query::new(self.world())
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.inner.progress.snapshot()
    }

    /// Stats of the load that produced the current World
    pub fn last_stats(&self) -> Option<Arc<LoadStats>> {
        self.inner.last_stats.load_full()
    }
}
