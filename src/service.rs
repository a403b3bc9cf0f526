//! Live aggregation of the backend's topology snapshots.
//!
//! One service instance owns the shared view: the latest interface list
//! plus connection and error state, always written as a single unit.  At
//! start it fetches once so the first read is never artificially empty,
//! then either drains the backend's push channel or, when push cannot be
//! established, re-fetches on a fixed interval.  Every ingest replaces the
//! list wholesale; concurrent fetches cannot mix batches, the last writer
//! simply wins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::interval;

use crate::bridge::{Backend, TopologyEvent};
use crate::normalize::normalize;
use crate::types::InterfaceSnapshot;

/// The exposed view, cloned out to consumers as one consistent unit.
///
/// The snapshot list is replaced wholesale on every update; no per-item
/// identity is stable across updates.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub interfaces: Vec<InterfaceSnapshot>,
    /// True until the first fetch or push event settles.
    pub loading: bool,
    pub error: Option<String>,
    pub ws_connected: bool,
    pub ws_error: Option<String>,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            interfaces: Vec::new(),
            loading: true,
            error: None,
            ws_connected: false,
            ws_error: None,
        }
    }
}

/// How the running service receives updates, decided once at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    /// The backend push subscription is active; no poll timer exists.
    Push,
    /// Push was unavailable; a fixed-interval poll is running.
    Poll,
}

struct Ingest {
    mode: IngestMode,
    task: JoinHandle<()>,
}

struct Inner {
    bridge: Arc<dyn Backend>,
    state: RwLock<NetworkState>,
    /// Gates every state write; results resolving after stop are dropped.
    running: AtomicBool,
    ingest: Mutex<Option<Ingest>>,
    poll_interval: Duration,
}

/// The network state aggregator.  Cheap to clone; all clones share one view.
#[derive(Clone)]
pub struct NetworkService {
    inner: Arc<Inner>,
}

impl NetworkService {
    pub fn new(bridge: Arc<dyn Backend>, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                bridge,
                state: RwLock::new(NetworkState::default()),
                running: AtomicBool::new(false),
                ingest: Mutex::new(None),
                poll_interval,
            }),
        }
    }

    /// Current view, cloned out as one consistent unit.
    pub async fn state(&self) -> NetworkState {
        self.inner.state.read().await.clone()
    }

    /// How updates are currently delivered, if the service is running.
    pub async fn ingest_mode(&self) -> Option<IngestMode> {
        self.inner.ingest.lock().await.as_ref().map(|i| i.mode)
    }

    /// Starts ingestion: one immediate fetch, then push subscription with a
    /// polling fallback.  Calling `start` again without an intervening
    /// [`stop`](Self::stop) is a no-op; at most one ingest task ever runs.
    pub async fn start(&self) {
        let mut ingest = self.inner.ingest.lock().await;
        if ingest.is_some() {
            debug!("Network service already running");
            return;
        }
        self.inner.running.store(true, Ordering::SeqCst);

        fetch_once(&self.inner).await;

        *ingest = Some(match self.inner.bridge.subscribe().await {
            Ok(events) => {
                info!("Topology push subscription established");
                Ingest {
                    mode: IngestMode::Push,
                    task: tokio::spawn(run_push(Arc::clone(&self.inner), events)),
                }
            }
            Err(e) => {
                warn!(
                    "Push subscription unavailable ({}), falling back to polling every {:?}",
                    e, self.inner.poll_interval
                );
                Ingest {
                    mode: IngestMode::Poll,
                    task: tokio::spawn(run_poll(Arc::clone(&self.inner))),
                }
            }
        });
    }

    /// Stops ingestion.  No handler runs afterwards; backend calls already
    /// in flight are not cancelled but their resolutions are discarded.
    /// Idempotent.
    pub async fn stop(&self) {
        let mut ingest = self.inner.ingest.lock().await;
        self.inner.running.store(false, Ordering::SeqCst);
        if let Some(ingest) = ingest.take() {
            ingest.task.abort();
            debug!("Stopped {:?} ingest", ingest.mode);
        }
    }

    /// Forces one immediate out-of-band fetch with the same semantics as
    /// the ingest paths, without disturbing the active subscription or the
    /// poll timer's schedule.  Safe concurrently with in-flight ingests:
    /// whichever resolves last determines the visible state.  On a stopped
    /// service this performs no fetch.
    pub async fn refresh(&self) {
        if !self.inner.running.load(Ordering::SeqCst) {
            debug!("Refresh ignored, service not running");
            return;
        }
        fetch_once(&self.inner).await;
    }
}

async fn run_push(inner: Arc<Inner>, mut events: mpsc::Receiver<TopologyEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            TopologyEvent::Update(raw) => apply_snapshot(&inner, normalize(raw)).await,
            TopologyEvent::Error(message) => apply_push_error(&inner, message).await,
        }
    }
    warn!("Topology push channel closed, no further updates will arrive");
}

async fn run_poll(inner: Arc<Inner>) {
    let mut ticker = interval(inner.poll_interval);
    // The first tick completes immediately; start already fetched.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        fetch_once(&inner).await;
    }
}

async fn fetch_once(inner: &Inner) {
    match inner.bridge.fetch_network_info().await {
        Ok(raw) => apply_snapshot(inner, normalize(raw)).await,
        Err(e) => apply_fetch_failure(inner, e.to_string()).await,
    }
}

async fn apply_snapshot(inner: &Inner, snapshots: Vec<InterfaceSnapshot>) {
    if !inner.running.load(Ordering::SeqCst) {
        debug!("Dropping snapshot that resolved after stop");
        return;
    }
    let mut state = inner.state.write().await;
    state.interfaces = snapshots;
    state.loading = false;
    state.error = None;
    state.ws_connected = true;
    state.ws_error = None;
}

/// A failed fetch means the bridge itself is broken: nothing trustworthy
/// remains, so the list is cleared rather than shown stale next to the
/// error.
async fn apply_fetch_failure(inner: &Inner, message: String) {
    if !inner.running.load(Ordering::SeqCst) {
        debug!("Dropping fetch failure that resolved after stop");
        return;
    }
    let mut state = inner.state.write().await;
    state.interfaces.clear();
    state.loading = false;
    state.error = Some(message.clone());
    state.ws_connected = false;
    state.ws_error = Some(message);
}

/// A pushed error means the backend is alive but reporting trouble
/// downstream: the last consistent snapshot stays visible.
async fn apply_push_error(inner: &Inner, message: String) {
    if !inner.running.load(Ordering::SeqCst) {
        return;
    }
    let mut state = inner.state.write().await;
    state.loading = false;
    state.error = Some(message.clone());
    state.ws_connected = false;
    state.ws_error = Some(message);
}
