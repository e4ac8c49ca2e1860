//! MarkerField - viewport-driven marker visibility for 2D map surfaces.
//!
//! Renders a large, fixed set of point markers on a pannable/zoomable map
//! by deciding, per viewport change, which markers should be shown. The
//! engine derives a query box from the camera state, tests every candidate
//! position against it, reconciles the result against previously rendered
//! state under one of two strategies, and throttles how often that
//! reconciliation may run so it cannot starve the rendering thread.
//!
//! The map widget itself is an external collaborator consumed through the
//! [`surface::RenderSurface`] trait; this crate performs no drawing.

pub mod config;
pub mod engine;
pub mod geo;
pub mod reconciler;
pub mod scheduler;
pub mod store;
pub mod surface;

pub use config::{ConfigError, EngineConfig};
pub use engine::{EngineError, MarkerEngine};
pub use geo::{GeoBounds, GeoPoint, ViewQuad};
pub use reconciler::{StrategyKind, VisibilityStrategy};
pub use scheduler::{CameraSnapshot, SchedulerStats};
pub use store::{MarkerId, MarkerRecord, MarkerStore, RenderState};
pub use surface::{ColorHint, HandleId, HeadlessSurface, RenderSurface, SurfaceError};

/// Crate version, for banners and logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
