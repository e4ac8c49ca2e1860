//! Render surface collaborator boundary.
//!
//! The engine never draws anything itself. All visual-handle lifecycle and
//! the debug view-box outline go through the [`RenderSurface`] trait, which
//! a host implements on top of its actual map widget. Every method is only
//! ever invoked from the render-owning context; implementations do not need
//! to be thread-safe.
//!
//! [`HeadlessSurface`] is an in-memory implementation used by the stress
//! harness and tests.

mod headless;

pub use headless::HeadlessSurface;

use rand::Rng;
use thiserror::Error;

use crate::geo::{GeoPoint, ViewQuad};

/// Opaque reference to a drawable owned by the render surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

/// Display color hint for a marker icon.
///
/// Hue in `[0, 1)` at full saturation and brightness, mimicking the
/// randomized pin colors of a busy map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorHint {
    pub hue: f32,
}

impl ColorHint {
    /// A uniformly random hue.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            hue: rng.random_range(0.0..1.0),
        }
    }
}

/// Errors reported by a render surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The drawable pool has no capacity for another marker handle.
    #[error("drawable pool exhausted")]
    HandlePoolExhausted,

    /// A handle was used after being destroyed, or never existed.
    #[error("unknown drawable handle {0}")]
    UnknownHandle(u64),
}

/// The single-threaded collaborator that owns all visual handles.
///
/// Covers the full outbound boundary of the engine: marker drawable
/// lifecycle, opacity, and the debug outline of the current view box.
pub trait RenderSurface {
    /// Allocate a drawable for a marker at the given position.
    ///
    /// Fails with [`SurfaceError::HandlePoolExhausted`] when the surface
    /// cannot allocate another drawable.
    fn create_marker_handle(
        &mut self,
        position: GeoPoint,
        color: ColorHint,
    ) -> Result<HandleId, SurfaceError>;

    /// Release a previously created drawable.
    fn destroy_marker_handle(&mut self, handle: HandleId) -> Result<(), SurfaceError>;

    /// Set a drawable's opacity; `0.0` is fully hidden, `1.0` fully shown.
    fn set_handle_opacity(&mut self, handle: HandleId, opacity: f64) -> Result<(), SurfaceError>;

    /// Redraw the debug outline of the current view box.
    ///
    /// Purely a visual aid; called on every viewport change regardless of
    /// throttling.
    fn draw_debug_outline(&mut self, quad: &ViewQuad);
}
