//! Coalescing track synchronizer.
//!
//! State machine per cycle: idle -> fetching cover -> rendering -> idle.
//! Only one cycle runs at a time. Snapshots arriving while a cycle is in
//! flight are recorded but not processed individually; when the cycle
//! completes, only the latest recorded snapshot is considered.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use deezbar_protocol::TrackSnapshot;
use futures_util::future::BoxFuture;
use tokio::sync::{Mutex, mpsc};

use crate::renderer::Renderer;
use crate::source::{CoverSource, resolve_cover};
use crate::track::CurrentTrack;

/// Result of a finished cycle, handed back to [`Synchronizer::complete`].
#[derive(Debug)]
pub struct CompletedCycle {
    snapshot: TrackSnapshot,
    track: CurrentTrack,
}

impl CompletedCycle {
    /// The snapshot this cycle rendered.
    pub fn snapshot(&self) -> &TrackSnapshot {
        &self.snapshot
    }
}

/// One in-flight cover-fetch-and-rebuild cycle.
///
/// Owns everything it touches, so the synchronizer keeps accepting
/// snapshots while the cycle is suspended on the network.
pub struct UpdateCycle {
    fut: BoxFuture<'static, CompletedCycle>,
}

impl Future for UpdateCycle {
    type Output = CompletedCycle;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.fut.as_mut().poll(cx)
    }
}

/// Reconciles the snapshot stream with the tray menu.
pub struct Synchronizer<R: Renderer + 'static> {
    /// Last snapshot accepted for processing; drives duplicate suppression.
    last_snapshot: Option<TrackSnapshot>,
    /// Update gate: a cycle is in flight.
    updating: bool,
    /// One-shot: pop the menu open on the next render.
    reveal_pending: bool,
    current: CurrentTrack,
    covers: Arc<dyn CoverSource>,
    renderer: Arc<Mutex<R>>,
}

impl<R: Renderer + 'static> Synchronizer<R> {
    pub fn new(covers: Arc<dyn CoverSource>, renderer: R) -> Self {
        Self {
            last_snapshot: None,
            updating: false,
            reveal_pending: false,
            current: CurrentTrack::loading(),
            covers,
            renderer: Arc::new(Mutex::new(renderer)),
        }
    }

    /// The state last installed by a completed cycle. A cycle in flight
    /// never shows through: text and cover are swapped together.
    pub fn current(&self) -> &CurrentTrack {
        &self.current
    }

    /// Returns `true` while a cycle holds the gate.
    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// Renders the loading state before any snapshot arrives.
    pub async fn render_initial(&self) {
        let mut renderer = self.renderer.lock().await;
        renderer.rebuild(&self.current, false).await;
    }

    /// Handles one snapshot from the page.
    ///
    /// Returns the cycle to drive when the snapshot acquired the gate, or
    /// `None` if it was a repeat or a cycle is already in flight.
    pub fn on_snapshot(&mut self, snapshot: TrackSnapshot) -> Option<UpdateCycle> {
        if self.last_snapshot.as_ref() == Some(&snapshot) {
            tracing::trace!("duplicate snapshot ignored");
            return None;
        }

        if self.last_snapshot.is_none() && snapshot.has_artist() {
            self.reveal_pending = true;
        }

        // Recorded even when the gate is held, so later repeats are still caught.
        self.last_snapshot = Some(snapshot.clone());

        if self.updating {
            tracing::debug!(title = ?snapshot.title, "update in flight, snapshot deferred");
            return None;
        }

        Some(self.start_cycle(snapshot))
    }

    /// Installs a finished cycle and releases the gate.
    ///
    /// If a newer snapshot was recorded while the cycle ran, a cycle for
    /// that latest snapshot is started and returned.
    pub fn complete(&mut self, done: CompletedCycle) -> Option<UpdateCycle> {
        self.current = done.track;
        self.updating = false;

        let latest = self.last_snapshot.as_ref()?;
        if *latest == done.snapshot {
            return None;
        }
        let latest = latest.clone();
        tracing::debug!(title = ?latest.title, "processing snapshot recorded during update");
        Some(self.start_cycle(latest))
    }

    fn start_cycle(&mut self, snapshot: TrackSnapshot) -> UpdateCycle {
        self.updating = true;

        let reveal = std::mem::take(&mut self.reveal_pending);
        let mut track = self.current.clone();
        track.apply_text(&snapshot);
        let covers = Arc::clone(&self.covers);
        let renderer = Arc::clone(&self.renderer);

        let fut = async move {
            track.cover = resolve_cover(covers.as_ref(), snapshot.cover_url.as_deref()).await;
            {
                let mut renderer = renderer.lock().await;
                renderer.rebuild(&track, reveal).await;
            }
            CompletedCycle { snapshot, track }
        };

        UpdateCycle { fut: Box::pin(fut) }
    }

    /// Processes snapshots until the channel closes.
    ///
    /// Snapshots keep being received while a cycle is suspended on the
    /// cover download.
    pub async fn run(mut self, mut snapshots: mpsc::Receiver<TrackSnapshot>) {
        self.render_initial().await;

        let mut in_flight: Option<UpdateCycle> = None;
        loop {
            tokio::select! {
                maybe = snapshots.recv() => match maybe {
                    Some(snapshot) => {
                        if let Some(cycle) = self.on_snapshot(snapshot) {
                            in_flight = Some(cycle);
                        }
                    }
                    None => break,
                },
                done = settle(&mut in_flight) => {
                    in_flight = self.complete(done);
                }
            }
        }

        // Let the last cycle finish so the gate is not left held.
        while let Some(cycle) = in_flight.take() {
            let done = cycle.await;
            in_flight = self.complete(done);
        }
        tracing::info!("snapshot channel closed, synchronizer stopped");
    }
}

/// Waits for the in-flight cycle, or forever when there is none.
async fn settle(cycle: &mut Option<UpdateCycle>) -> CompletedCycle {
    match cycle {
        Some(cycle) => cycle.await,
        None => std::future::pending().await,
    }
}
