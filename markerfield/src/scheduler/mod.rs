//! Update scheduling: throttling viewport events and dispatching
//! reconciliation scans off the render-owning context.
//!
//! # Execution model
//!
//! ```text
//! render-owning context                         worker context
//! ─────────────────────                         ──────────────
//! on_viewport_changed ──► debug outline (always)
//!         │ throttle admits
//!         └── spawn_blocking ─────────────────► scan positions vs box
//!                                                      │
//! apply_completions ◄───── mpsc channel ◄──────────────┘
//!   drop stale generations, apply diff, record timestamp
//! ```
//!
//! The worker receives an immutable snapshot of marker positions and
//! produces a [`VisibilityDiff`]; all store and surface mutation happens
//! when the diff is applied back on the render-owning context. No locks
//! are involved. Dispatch is fire-and-forget and non-cancellable: a
//! viewport change mid-scan never aborts the in-flight scan.
//!
//! Each dispatch carries a monotonic generation. Completions arrive in
//! completion order, not dispatch order, so a slow scan can finish after
//! a fresher one; [`UpdateScheduler::apply_completions`] discards any diff
//! older than the last applied generation instead of letting it overwrite
//! newer state.

mod throttle;

pub use throttle::ThrottleGate;

use std::sync::Arc;
use std::time::Instant;

use rand::RngCore;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::geo::{self, GeoBounds, GeoPoint, ViewQuad};
use crate::reconciler::{self, VisibilityDiff, VisibilityStrategy};
use crate::store::{MarkerId, MarkerStore};
use crate::surface::{RenderSurface, SurfaceError};

/// Camera state delivered by the map surface on every movement.
#[derive(Debug, Clone, Copy)]
pub struct CameraSnapshot {
    /// The camera's center target.
    pub target: GeoPoint,
    /// The visible-region corners reported by the projection.
    pub visible_region: ViewQuad,
}

/// Counters for harness reporting and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Scans dispatched to the worker context.
    pub dispatched: u64,
    /// Viewport events dropped by the throttle.
    pub dropped: u64,
    /// Diffs applied to the render surface.
    pub applied: u64,
    /// Completions discarded for carrying a stale generation.
    pub stale_dropped: u64,
}

/// Throttles viewport-change events and moves the O(N) containment scan
/// off the render-owning context.
///
/// All methods must be called from the render-owning context; only the
/// scan closure runs elsewhere.
pub struct UpdateScheduler {
    positions: Arc<[(MarkerId, GeoPoint)]>,
    throttle: ThrottleGate,
    runtime: Handle,
    completion_tx: mpsc::UnboundedSender<VisibilityDiff>,
    completion_rx: mpsc::UnboundedReceiver<VisibilityDiff>,
    next_generation: u64,
    last_applied: Option<u64>,
    in_flight: usize,
    stats: SchedulerStats,
}

impl UpdateScheduler {
    /// Create a scheduler over an immutable position snapshot.
    pub fn new(
        positions: Arc<[(MarkerId, GeoPoint)]>,
        min_interval: std::time::Duration,
        runtime: Handle,
    ) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            positions,
            throttle: ThrottleGate::new(min_interval),
            runtime,
            completion_tx,
            completion_rx,
            next_generation: 0,
            last_applied: None,
            in_flight: 0,
            stats: SchedulerStats::default(),
        }
    }

    /// Handle a viewport-change event.
    ///
    /// The debug outline is redrawn unconditionally; the reconciliation
    /// scan is dispatched only if the throttle admits the event. Returns
    /// whether a scan was dispatched.
    pub fn on_viewport_changed(
        &mut self,
        camera: CameraSnapshot,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        let (quad, bounds) = geo::compute_view_box(camera.target, &camera.visible_region);
        surface.draw_debug_outline(&quad);

        if !self.throttle.admit(Instant::now()) {
            self.stats.dropped += 1;
            trace!("viewport event dropped by throttle");
            return false;
        }

        self.dispatch(bounds);
        true
    }

    fn dispatch(&mut self, bounds: GeoBounds) {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.in_flight += 1;
        self.stats.dispatched += 1;

        let positions = Arc::clone(&self.positions);
        let tx = self.completion_tx.clone();
        debug!(generation, "dispatching reconciliation scan");
        self.runtime.spawn_blocking(move || {
            let entries = reconciler::scan(&positions, &bounds);
            // A closed channel means the scheduler is gone; the result
            // has nowhere to go.
            let _ = tx.send(VisibilityDiff {
                generation,
                bounds,
                entries,
            });
        });
    }

    /// Drain completed scans and apply them to the store and surface.
    ///
    /// Must run on the render-owning context; this is the only place
    /// render state and visual handles are mutated. Stale completions
    /// (generation older than the last applied) are discarded. Returns
    /// the number of diffs applied.
    pub fn apply_completions(
        &mut self,
        store: &mut MarkerStore,
        strategy: &dyn VisibilityStrategy,
        surface: &mut dyn RenderSurface,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SurfaceError> {
        let mut applied = 0;
        while let Ok(diff) = self.completion_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if self.last_applied.is_some_and(|last| diff.generation <= last) {
                self.stats.stale_dropped += 1;
                warn!(
                    generation = diff.generation,
                    "discarding stale reconciliation result"
                );
                continue;
            }

            let stats = strategy.apply(&diff, store, surface, rng)?;
            debug!(
                generation = diff.generation,
                shown = stats.shown,
                hidden = stats.hidden,
                skipped = stats.skipped,
                "applied reconciliation diff"
            );
            self.last_applied = Some(diff.generation);
            self.throttle.record(Instant::now());
            self.stats.applied += 1;
            applied += 1;
        }
        Ok(applied)
    }

    /// Whether at least one reconciliation is currently in flight.
    pub fn is_reconcile_in_flight(&self) -> bool {
        self.in_flight > 0
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }
}
