//! Engine facade tying the store, strategy, and scheduler together.
//!
//! [`MarkerEngine`] is what a host embeds: it owns the candidate markers,
//! the selected visibility strategy, and the update scheduler. The host
//! forwards viewport events from its map surface and calls
//! [`MarkerEngine::pump`] once per frame on the render-owning context to
//! apply completed reconciliations.
//!
//! # Example
//!
//! ```ignore
//! use markerfield::{CameraSnapshot, EngineConfig, HeadlessSurface, MarkerEngine};
//!
//! let runtime = tokio::runtime::Runtime::new()?;
//! let mut surface = HeadlessSurface::new();
//! let mut engine = MarkerEngine::new(
//!     EngineConfig::default(),
//!     runtime.handle().clone(),
//!     &mut surface,
//! )?;
//!
//! // Per frame, on the render-owning context:
//! engine.on_viewport_changed(camera, &mut surface);
//! engine.pump(&mut surface)?;
//! ```

mod error;

pub use error::EngineError;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;
use tracing::info;

use crate::config::EngineConfig;
use crate::geo::GeoPoint;
use crate::reconciler::VisibilityStrategy;
use crate::scheduler::{CameraSnapshot, SchedulerStats, UpdateScheduler};
use crate::store::{MarkerStore, RenderState};
use crate::surface::RenderSurface;

/// Viewport-driven marker visibility engine.
///
/// All methods must be called from the render-owning context; the engine
/// internally offloads only the containment scan.
pub struct MarkerEngine {
    store: MarkerStore,
    strategy: Box<dyn VisibilityStrategy>,
    scheduler: UpdateScheduler,
    rng: StdRng,
}

impl MarkerEngine {
    /// Create an engine with randomly seeded candidate markers.
    pub fn new(
        config: EngineConfig,
        runtime: Handle,
        surface: &mut dyn RenderSurface,
    ) -> Result<Self, EngineError> {
        Self::with_rng(config, runtime, surface, StdRng::from_os_rng())
    }

    /// Create an engine seeding markers from the given RNG, for
    /// deterministic runs.
    pub fn with_rng(
        config: EngineConfig,
        runtime: Handle,
        surface: &mut dyn RenderSurface,
        mut rng: StdRng,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let store = MarkerStore::seed_random(&config.seed_bounds, config.marker_count, &mut rng);
        Self::build(config, runtime, surface, store, rng)
    }

    /// Create an engine over externally sourced marker positions; the
    /// configured marker count and seed bounds are ignored.
    pub fn from_positions(
        config: EngineConfig,
        runtime: Handle,
        surface: &mut dyn RenderSurface,
        positions: Vec<GeoPoint>,
    ) -> Result<Self, EngineError> {
        if positions.is_empty() {
            return Err(crate::config::ConfigError::InvalidMarkerCount.into());
        }
        let store = MarkerStore::from_positions(positions);
        Self::build(config, runtime, surface, store, StdRng::from_os_rng())
    }

    fn build(
        config: EngineConfig,
        runtime: Handle,
        surface: &mut dyn RenderSurface,
        mut store: MarkerStore,
        mut rng: StdRng,
    ) -> Result<Self, EngineError> {
        let strategy = config.strategy.build();
        strategy.initialize(&mut store, surface, &mut rng)?;
        info!(
            markers = store.len(),
            strategy = strategy.name(),
            min_interval_ms = config.min_interval.as_millis() as u64,
            "marker engine initialized"
        );
        let scheduler =
            UpdateScheduler::new(store.positions_snapshot(), config.min_interval, runtime);
        Ok(Self {
            store,
            strategy,
            scheduler,
            rng,
        })
    }

    /// Inbound viewport-change event from the map surface.
    ///
    /// Always redraws the debug outline; dispatches a reconciliation scan
    /// unless throttled. Returns whether a scan was dispatched.
    pub fn on_viewport_changed(
        &mut self,
        camera: CameraSnapshot,
        surface: &mut dyn RenderSurface,
    ) -> bool {
        self.scheduler.on_viewport_changed(camera, surface)
    }

    /// Inbound tap event; pass-through logging only, not part of
    /// visibility logic.
    pub fn on_surface_tapped(&self, point: GeoPoint) {
        info!(lat = point.lat, lon = point.lon, "surface tapped");
    }

    /// Apply completed reconciliations on the render-owning context.
    ///
    /// Call once per frame; returns the number of diffs applied.
    pub fn pump(&mut self, surface: &mut dyn RenderSurface) -> Result<usize, EngineError> {
        let applied = self.scheduler.apply_completions(
            &mut self.store,
            self.strategy.as_ref(),
            surface,
            &mut self.rng,
        )?;
        Ok(applied)
    }

    /// Number of candidate markers.
    pub fn marker_count(&self) -> usize {
        self.store.len()
    }

    /// Number of records currently in the `Visible` render state.
    ///
    /// Meaningful under the materialize strategy; under opacity-toggle
    /// every record stays `Visible` and shown-ness lives in drawable
    /// opacity on the surface.
    pub fn shown_count(&self) -> usize {
        self.store
            .iter()
            .filter(|record| record.render_state == RenderState::Visible)
            .count()
    }

    /// Whether a reconciliation is currently in flight.
    pub fn is_reconcile_in_flight(&self) -> bool {
        self.scheduler.is_reconcile_in_flight()
    }

    /// Scheduler counters for reporting.
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Read access to the candidate store.
    pub fn store(&self) -> &MarkerStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::geo::{GeoBounds, ViewQuad};
    use crate::reconciler::StrategyKind;
    use crate::surface::HeadlessSurface;
    use std::time::Duration;

    #[tokio::test]
    async fn test_invalid_config_creates_no_state() {
        let mut surface = HeadlessSurface::new();
        let config = EngineConfig::default().with_marker_count(0);

        let result = MarkerEngine::new(config, Handle::current(), &mut surface);

        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidMarkerCount))
        ));
        assert_eq!(surface.handle_count(), 0);
    }

    #[tokio::test]
    async fn test_opacity_strategy_allocates_all_handles_up_front() {
        let mut surface = HeadlessSurface::new();
        let config = EngineConfig::default()
            .with_marker_count(25)
            .with_strategy(StrategyKind::OpacityToggle);

        let engine = MarkerEngine::new(config, Handle::current(), &mut surface).unwrap();

        assert_eq!(engine.marker_count(), 25);
        assert_eq!(surface.handle_count(), 25);
        assert_eq!(engine.shown_count(), 25);
    }

    #[tokio::test]
    async fn test_materialize_strategy_starts_empty() {
        let mut surface = HeadlessSurface::new();
        let config = EngineConfig::default()
            .with_marker_count(25)
            .with_strategy(StrategyKind::Materialize);

        let engine = MarkerEngine::new(config, Handle::current(), &mut surface).unwrap();

        assert_eq!(surface.handle_count(), 0);
        assert_eq!(engine.shown_count(), 0);
    }

    #[tokio::test]
    async fn test_from_positions_rejects_empty_input() {
        let mut surface = HeadlessSurface::new();
        let result = MarkerEngine::from_positions(
            EngineConfig::default(),
            Handle::current(),
            &mut surface,
            Vec::new(),
        );
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidMarkerCount))
        ));
    }

    #[tokio::test]
    async fn test_viewport_event_pump_roundtrip() {
        let mut surface = HeadlessSurface::new();
        let config = EngineConfig::default()
            .with_strategy(StrategyKind::OpacityToggle)
            .with_min_interval(Duration::from_millis(0));
        let mut engine = MarkerEngine::from_positions(
            config,
            Handle::current(),
            &mut surface,
            vec![
                GeoPoint::new(1.0, 1.0),
                GeoPoint::new(5.0, 5.0),
                GeoPoint::new(9.0, 9.0),
            ],
        )
        .unwrap();

        let camera = CameraSnapshot {
            target: GeoPoint::new(3.0, 3.0),
            visible_region: ViewQuad::new(
                GeoPoint::new(-3.0, -3.0),
                GeoPoint::new(9.0, -3.0),
                GeoPoint::new(9.0, 9.0),
                GeoPoint::new(-3.0, 9.0),
            ),
        };
        assert!(engine.on_viewport_changed(camera, &mut surface));

        let mut applied = 0;
        for _ in 0..200 {
            applied = engine.pump(&mut surface).unwrap();
            if applied > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(applied, 1);
        // The inner view box is [0,6]×[0,6]: two of three markers shown.
        assert_eq!(surface.visible_handle_count(), 2);
        assert_eq!(surface.handle_count(), 3);

        // Bounds check on the debug outline the event drew.
        let outline = surface.last_outline().copied().unwrap();
        let envelope = GeoBounds::from_quad(&outline);
        assert_eq!(envelope, GeoBounds::new(0.0, 6.0, 0.0, 6.0));
    }
}
