//! In-memory render surface for harness runs and tests.
//!
//! Tracks drawable handles, their opacity, and the number of debug
//! outlines drawn, without touching any real rendering backend. An
//! optional capacity limit makes drawable-pool exhaustion reproducible.

use std::collections::HashMap;

use crate::geo::{GeoPoint, ViewQuad};

use super::{ColorHint, HandleId, RenderSurface, SurfaceError};

#[derive(Debug, Clone)]
struct HandleEntry {
    position: GeoPoint,
    color: ColorHint,
    opacity: f64,
}

/// Render surface that records everything in memory.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    handles: HashMap<u64, HandleEntry>,
    next_handle: u64,
    capacity: Option<usize>,
    outlines_drawn: u64,
    last_outline: Option<ViewQuad>,
}

impl HeadlessSurface {
    /// Create a surface with an unbounded drawable pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface that refuses to allocate more than `capacity`
    /// live handles at once.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// Number of currently live handles.
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Opacity of a live handle, or `None` if it does not exist.
    pub fn opacity_of(&self, handle: HandleId) -> Option<f64> {
        self.handles.get(&handle.0).map(|entry| entry.opacity)
    }

    /// Position a live handle was created at.
    pub fn position_of(&self, handle: HandleId) -> Option<GeoPoint> {
        self.handles.get(&handle.0).map(|entry| entry.position)
    }

    /// Color a live handle was created with.
    pub fn color_of(&self, handle: HandleId) -> Option<ColorHint> {
        self.handles.get(&handle.0).map(|entry| entry.color)
    }

    /// Number of live handles with non-zero opacity.
    pub fn visible_handle_count(&self) -> usize {
        self.handles
            .values()
            .filter(|entry| entry.opacity > 0.0)
            .count()
    }

    /// How many debug outlines have been drawn so far.
    pub fn outlines_drawn(&self) -> u64 {
        self.outlines_drawn
    }

    /// The most recently drawn debug outline.
    pub fn last_outline(&self) -> Option<&ViewQuad> {
        self.last_outline.as_ref()
    }
}

impl RenderSurface for HeadlessSurface {
    fn create_marker_handle(
        &mut self,
        position: GeoPoint,
        color: ColorHint,
    ) -> Result<HandleId, SurfaceError> {
        if let Some(capacity) = self.capacity {
            if self.handles.len() >= capacity {
                return Err(SurfaceError::HandlePoolExhausted);
            }
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.handles.insert(
            id,
            HandleEntry {
                position,
                color,
                // A freshly created drawable is fully shown.
                opacity: 1.0,
            },
        );
        Ok(HandleId(id))
    }

    fn destroy_marker_handle(&mut self, handle: HandleId) -> Result<(), SurfaceError> {
        self.handles
            .remove(&handle.0)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownHandle(handle.0))
    }

    fn set_handle_opacity(&mut self, handle: HandleId, opacity: f64) -> Result<(), SurfaceError> {
        let entry = self
            .handles
            .get_mut(&handle.0)
            .ok_or(SurfaceError::UnknownHandle(handle.0))?;
        entry.opacity = opacity;
        Ok(())
    }

    fn draw_debug_outline(&mut self, quad: &ViewQuad) {
        self.outlines_drawn += 1;
        self.last_outline = Some(*quad);
    }
}
