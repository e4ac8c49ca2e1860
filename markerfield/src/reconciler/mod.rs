//! Visibility reconciliation: deciding which candidate markers should be
//! shown for a given bounding box.
//!
//! A reconciliation has two halves:
//!
//! 1. [`scan`] — a pure O(N) containment pass over all candidate
//!    positions, safe to run off the render-owning context because it
//!    reads positions only, never render state.
//! 2. A [`VisibilityStrategy`] applying the resulting [`VisibilityDiff`]
//!    back on the render-owning context, where all handle and store
//!    mutation lives.
//!
//! The linear scan is deliberate and appropriate at the target scale of
//! hundreds of markers. At larger N a spatial index (uniform grid or
//! quad-tree) could replace it behind the same signature without changing
//! the external contract.

mod strategy;

pub use strategy::{
    ApplyStats, MaterializeStrategy, OpacityStrategy, StrategyKind, VisibilityStrategy,
};

use crate::geo::{GeoBounds, GeoPoint};
use crate::store::MarkerId;

/// Containment verdict for a single marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerVisibility {
    pub id: MarkerId,
    /// Whether the marker position lies inside the query box
    /// (boundary inclusive).
    pub inside: bool,
}

/// The result of one reconciliation scan, produced on the worker context
/// and applied atomically on the render-owning context.
#[derive(Debug, Clone)]
pub struct VisibilityDiff {
    /// Monotonic dispatch generation; completions older than the last
    /// applied generation are discarded.
    pub generation: u64,
    /// The query box the scan was evaluated against.
    pub bounds: GeoBounds,
    /// One verdict per candidate marker, in id order.
    pub entries: Vec<MarkerVisibility>,
}

/// Test every candidate position against the query box.
///
/// Pure function over an immutable position snapshot; O(N) in the
/// candidate count.
pub fn scan(positions: &[(MarkerId, GeoPoint)], bounds: &GeoBounds) -> Vec<MarkerVisibility> {
    positions
        .iter()
        .map(|&(id, position)| MarkerVisibility {
            id,
            inside: bounds.contains(position),
        })
        .collect()
}
