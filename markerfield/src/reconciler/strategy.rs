//! The two competing reconciliation strategies.
//!
//! [`MaterializeStrategy`] allocates and releases drawables on every pass:
//! higher per-update cost, lower steady-state memory when few markers are
//! on screen. [`OpacityStrategy`] allocates every drawable once at startup
//! and only flips opacity afterwards: lower per-update cost, constant
//! memory for all N markers.
//!
//! Both are idempotent: applying the same diff twice leaves every record
//! in the same final state.

use rand::RngCore;
use tracing::warn;

use crate::store::{MarkerStore, RenderState};
use crate::surface::{ColorHint, RenderSurface, SurfaceError};

use super::VisibilityDiff;

/// Counters from one diff application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Markers newly shown by this pass.
    pub shown: usize,
    /// Markers newly hidden by this pass.
    pub hidden: usize,
    /// Show transitions skipped because the drawable pool was exhausted;
    /// these retry naturally on the next reconciliation.
    pub skipped: usize,
}

/// A reconciliation policy, selected at construction time.
///
/// `initialize` establishes the strategy's initial handle condition on a
/// freshly seeded store; `apply` consumes a scan result on the
/// render-owning context. Both strategies decide visibility identically —
/// only the handle lifecycle differs.
pub trait VisibilityStrategy: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Establish the initial handle/render-state condition.
    ///
    /// A failure here is fatal to engine construction; no partial state
    /// is usable afterwards.
    fn initialize(
        &self,
        store: &mut MarkerStore,
        surface: &mut dyn RenderSurface,
        rng: &mut dyn RngCore,
    ) -> Result<(), SurfaceError>;

    /// Apply a reconciliation diff on the render-owning context.
    fn apply(
        &self,
        diff: &VisibilityDiff,
        store: &mut MarkerStore,
        surface: &mut dyn RenderSurface,
        rng: &mut dyn RngCore,
    ) -> Result<ApplyStats, SurfaceError>;
}

/// Selects which strategy the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Create/destroy drawables per reconciliation (strategy A).
    Materialize,
    /// Keep all drawables allocated and toggle opacity (strategy B).
    OpacityToggle,
}

impl StrategyKind {
    /// Construct the boxed strategy for this kind.
    pub fn build(self) -> Box<dyn VisibilityStrategy> {
        match self {
            StrategyKind::Materialize => Box::new(MaterializeStrategy),
            StrategyKind::OpacityToggle => Box::new(OpacityStrategy),
        }
    }
}

/// Strategy A: markers entering the box get a freshly allocated drawable
/// (with a new random color), markers leaving it have theirs destroyed.
#[derive(Debug, Default)]
pub struct MaterializeStrategy;

impl VisibilityStrategy for MaterializeStrategy {
    fn name(&self) -> &'static str {
        "materialize"
    }

    fn initialize(
        &self,
        _store: &mut MarkerStore,
        _surface: &mut dyn RenderSurface,
        _rng: &mut dyn RngCore,
    ) -> Result<(), SurfaceError> {
        // All candidates start hidden with no drawable; the first
        // reconciliation materializes whatever is on screen.
        Ok(())
    }

    fn apply(
        &self,
        diff: &VisibilityDiff,
        store: &mut MarkerStore,
        surface: &mut dyn RenderSurface,
        rng: &mut dyn RngCore,
    ) -> Result<ApplyStats, SurfaceError> {
        let mut stats = ApplyStats::default();
        for entry in &diff.entries {
            let Some(record) = store.get_mut(entry.id) else {
                continue;
            };
            if entry.inside {
                if record.handle.is_none() {
                    match surface.create_marker_handle(record.position, ColorHint::random(rng)) {
                        Ok(handle) => {
                            record.handle = Some(handle);
                            record.render_state = RenderState::Visible;
                            stats.shown += 1;
                        }
                        Err(SurfaceError::HandlePoolExhausted) => {
                            stats.skipped += 1;
                            warn!(
                                id = %entry.id,
                                "drawable pool exhausted, show deferred to next reconciliation"
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
            } else if let Some(handle) = record.handle.take() {
                surface.destroy_marker_handle(handle)?;
                record.render_state = RenderState::Hidden;
                stats.hidden += 1;
            }
        }
        Ok(stats)
    }
}

/// Strategy B: every marker keeps a permanently allocated drawable for the
/// whole session; reconciliation only flips opacity between 1.0 and 0.0.
///
/// Render state and handles are untouched after initialization.
#[derive(Debug, Default)]
pub struct OpacityStrategy;

impl VisibilityStrategy for OpacityStrategy {
    fn name(&self) -> &'static str {
        "opacity-toggle"
    }

    fn initialize(
        &self,
        store: &mut MarkerStore,
        surface: &mut dyn RenderSurface,
        rng: &mut dyn RngCore,
    ) -> Result<(), SurfaceError> {
        let ids: Vec<_> = store.iter().map(|record| record.id).collect();
        for id in ids {
            let Some(record) = store.get_mut(id) else {
                continue;
            };
            let handle = surface.create_marker_handle(record.position, ColorHint::random(rng))?;
            record.handle = Some(handle);
            record.render_state = RenderState::Visible;
        }
        Ok(())
    }

    fn apply(
        &self,
        diff: &VisibilityDiff,
        store: &mut MarkerStore,
        surface: &mut dyn RenderSurface,
        _rng: &mut dyn RngCore,
    ) -> Result<ApplyStats, SurfaceError> {
        let mut stats = ApplyStats::default();
        for entry in &diff.entries {
            let Some(record) = store.get(entry.id) else {
                continue;
            };
            let Some(handle) = record.handle else {
                continue;
            };
            if entry.inside {
                surface.set_handle_opacity(handle, 1.0)?;
                stats.shown += 1;
            } else {
                surface.set_handle_opacity(handle, 0.0)?;
                stats.hidden += 1;
            }
        }
        Ok(stats)
    }
}
