//! Regeneration watcher
//!
//! Keeps the metadata index (and the generated artifact) in sync with the
//! content directory.
//!
//! ```text
//!            startup / content event
//!   ┌──────┐ ─────────────────────────▶ ┌──────────┐
//!   │ Idle │                            │ Building │ ── events ignored
//!   └──────┘ ◀───────────────────────── └──────────┘
//!              run finished (ok or err)
//! ```
//!
//! Events that arrive while a build is running are dropped, not queued. A
//! change landing mid-build shows up only after the next triggering event.

use crate::config::SiteConfig;
use crate::core::MetadataIndex;
use crate::error::{FolioError, Result};
use crate::extract::Extractor;
use crate::io::{ArtifactWriter, ContentResolver, ResolverConfig};
use crate::sitemap::Sitemap;
use arc_swap::ArcSwap;
use log::{debug, error, info, warn};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often the event loop checks for a stop request
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The build function run on every trigger
pub trait Generate: Send + Sync {
    fn generate(&self) -> Result<MetadataIndex>;
}

impl Generate for Extractor {
    fn generate(&self) -> Result<MetadataIndex> {
        Extractor::generate(self)
    }
}

impl<F> Generate for F
where
    F: Fn() -> Result<MetadataIndex> + Send + Sync,
{
    fn generate(&self) -> Result<MetadataIndex> {
        self()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Building,
}

/// Files written after each successful run
#[derive(Debug, Clone, Default)]
pub struct Outputs {
    pub metadata: Option<PathBuf>,
    pub sitemap: Option<PathBuf>,
    pub domain: String,
}

impl Outputs {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            metadata: Some(config.output.metadata.clone()),
            sitemap: config.output.sitemap.clone(),
            domain: config.domain().to_string(),
        }
    }
}

/// Clears the building flag however the run ends
struct BuildGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Owns the current index snapshot and the re-entrancy guard around rebuilds
pub struct Regenerator {
    generator: Box<dyn Generate>,
    index: Arc<ArcSwap<MetadataIndex>>,
    outputs: Outputs,
    writer: ArtifactWriter,
    building: AtomicBool,
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl Regenerator {
    /// Start from an empty index
    pub fn new(generator: impl Generate + 'static) -> Self {
        Self {
            generator: Box::new(generator),
            index: Arc::new(ArcSwap::from_pointee(MetadataIndex::empty())),
            outputs: Outputs::default(),
            writer: ArtifactWriter::new(),
            building: AtomicBool::new(false),
            completed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn with_outputs(mut self, outputs: Outputs) -> Self {
        self.outputs = outputs;
        self
    }

    /// The current snapshot
    pub fn index(&self) -> Arc<MetadataIndex> {
        self.index.load_full()
    }

    /// Handle for readers that should always see the latest snapshot
    pub fn shared_index(&self) -> Arc<ArcSwap<MetadataIndex>> {
        Arc::clone(&self.index)
    }

    pub fn state(&self) -> WatchState {
        if self.building.load(Ordering::Acquire) {
            WatchState::Building
        } else {
            WatchState::Idle
        }
    }

    /// Number of runs that replaced the index
    pub fn completed_runs(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Number of runs that failed and left the index untouched
    pub fn failed_runs(&self) -> usize {
        self.failed.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> bool {
        self.building
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Start a run on a background thread
    ///
    /// Returns `None`, doing nothing, if a run is already in flight.
    pub fn trigger(self: &Arc<Self>, reason: &str) -> Option<JoinHandle<()>> {
        if !self.try_begin() {
            debug!("Build in progress, ignoring: {}", reason);
            return None;
        }

        let this = Arc::clone(self);
        let reason = reason.to_string();
        let spawned = thread::Builder::new()
            .name("folio-regenerate".to_string())
            .spawn(move || {
                let _guard = BuildGuard { flag: &this.building };
                // Failures are logged inside; the watcher keeps going
                let _ = this.rebuild(&reason);
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Could not start regeneration thread: {}", e);
                self.building.store(false, Ordering::Release);
                None
            }
        }
    }

    /// Run on the calling thread
    ///
    /// Returns `None` if a run is already in flight.
    pub fn run_now(&self, reason: &str) -> Option<Result<()>> {
        if !self.try_begin() {
            debug!("Build in progress, ignoring: {}", reason);
            return None;
        }
        let _guard = BuildGuard { flag: &self.building };
        Some(self.rebuild(reason))
    }

    fn rebuild(&self, reason: &str) -> Result<()> {
        info!("{}, regenerating metadata...", reason);
        let started = Instant::now();

        let result = self
            .generator
            .generate()
            .and_then(|index| self.write_outputs(&index).map(|_| index));

        match result {
            Ok(index) => {
                let posts = index.len();
                self.index.store(Arc::new(index));
                self.completed.fetch_add(1, Ordering::AcqRel);
                info!("Metadata regenerated ({} posts) in {:?}", posts, started.elapsed());
                Ok(())
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::AcqRel);
                error!("Error regenerating metadata, keeping previous index: {}", e);
                if let FolioError::Multiple { errors } = &e {
                    for inner in errors {
                        error!("  {}", inner);
                    }
                }
                Err(e)
            }
        }
    }

    fn write_outputs(&self, index: &MetadataIndex) -> Result<()> {
        if let Some(path) = &self.outputs.metadata {
            let result = self.writer.write_artifact(index, path)?;
            if result.modified {
                info!("Wrote {}", path.display());
            }
        }
        if let Some(path) = &self.outputs.sitemap {
            let xml = Sitemap::from_index(index, &self.outputs.domain).to_xml();
            self.writer.write_text(path, &xml)?;
        }
        Ok(())
    }
}

/// Watches the content root and triggers the [`Regenerator`]
pub struct ContentWatcher {
    regenerator: Arc<Regenerator>,
    root: PathBuf,
    resolver: ContentResolver,
    debounce: Duration,
    stop: Arc<AtomicBool>,
}

impl ContentWatcher {
    pub fn new(regenerator: Arc<Regenerator>, config: &SiteConfig) -> Self {
        Self {
            regenerator,
            root: config.content.root.clone(),
            resolver: ContentResolver::with_config(ResolverConfig::from(&config.content)),
            debounce: Duration::from_millis(config.watch.debounce_ms),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn regenerator(&self) -> &Arc<Regenerator> {
        &self.regenerator
    }

    /// Setting the returned flag makes [`run`](Self::run) return
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Add, change, or remove of a content file under the root
    pub fn is_content_event(&self, event: &Event) -> bool {
        self.is_content_event_under(&self.root, event)
    }

    fn is_content_event_under(&self, root: &Path, event: &Event) -> bool {
        let relevant_kind = match event.kind {
            EventKind::Create(_) | EventKind::Remove(_) => true,
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            _ => false,
        };

        relevant_kind
            && event
                .paths
                .iter()
                .filter_map(|p| p.strip_prefix(root).ok())
                .any(|relative| self.resolver.is_content_file(relative))
    }

    /// Run the startup build, then watch until stopped
    pub fn run(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(FolioError::file_not_found(&self.root));
        }
        // Paths reported by notify are absolute
        let root = self.root.canonicalize()?;

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        info!("Watching {} for content changes", root.display());

        let _ = self.regenerator.trigger("Watcher started");

        while !self.stop.load(Ordering::Acquire) {
            let event = match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => event,
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                    continue;
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            if !self.is_content_event_under(&root, &event) {
                continue;
            }

            // Let an editor's burst of writes settle before deciding
            let deadline = Instant::now() + self.debounce;
            while let Some(left) = deadline.checked_duration_since(Instant::now()) {
                if rx.recv_timeout(left).is_err() {
                    break;
                }
            }

            let changed = event
                .paths
                .first()
                .and_then(|p| p.strip_prefix(&root).ok())
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let _ = self
                .regenerator
                .trigger(&format!("Blog content changed ({})", changed));
        }

        info!("Stopped watching {}", root.display());
        Ok(())
    }
}
