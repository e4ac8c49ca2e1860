//! Candidate marker records and the store that owns them.
//!
//! The store is populated once at startup and the candidate set is fixed
//! for the process lifetime; only each record's render state and drawable
//! handle change afterwards. `render_state` is the single source of truth
//! for what is currently shown under the materialize strategy.
//!
//! Identity is a dense integer assigned at initialization, never derived
//! from formatted coordinates.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::geo::{GeoBounds, GeoPoint};
use crate::surface::HandleId;

/// Stable identity of a candidate marker, assigned once at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Whether a candidate marker is currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Hidden,
    Visible,
}

/// One candidate marker: position, drawable handle, and render state.
#[derive(Debug, Clone)]
pub struct MarkerRecord {
    pub id: MarkerId,
    pub position: GeoPoint,
    /// Drawable owned by the render surface, if one is currently allocated.
    pub handle: Option<HandleId>,
    pub render_state: RenderState,
}

/// Owns the full set of candidate markers.
///
/// Ids are dense indices into the backing vector, so lookup is O(1).
/// Every id present at initialization remains present for the process
/// lifetime.
#[derive(Debug, Default)]
pub struct MarkerStore {
    records: Vec<MarkerRecord>,
}

impl MarkerStore {
    /// Create one record per position, initially hidden with no handle.
    ///
    /// The selected visibility strategy establishes the actual initial
    /// condition (the opacity strategy materializes every handle up
    /// front).
    pub fn from_positions(positions: Vec<GeoPoint>) -> Self {
        let records = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| MarkerRecord {
                id: MarkerId(index as u32),
                position,
                handle: None,
                render_state: RenderState::Hidden,
            })
            .collect();
        Self { records }
    }

    /// Seed `count` uniformly random candidate positions inside `bounds`.
    pub fn seed_random<R: Rng + ?Sized>(bounds: &GeoBounds, count: usize, rng: &mut R) -> Self {
        let positions = (0..count)
            .map(|_| {
                GeoPoint::new(
                    rng.random_range(bounds.min_lat..=bounds.max_lat),
                    rng.random_range(bounds.min_lon..=bounds.max_lon),
                )
            })
            .collect();
        Self::from_positions(positions)
    }

    /// Look up a record by id.
    pub fn get(&self, id: MarkerId) -> Option<&MarkerRecord> {
        self.records.get(id.0 as usize)
    }

    /// Mutable lookup; restricted to diff application on the
    /// render-owning context.
    pub(crate) fn get_mut(&mut self, id: MarkerId) -> Option<&mut MarkerRecord> {
        self.records.get_mut(id.0 as usize)
    }

    /// Iterate over all records in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.records.iter()
    }

    /// Number of candidate markers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids of all records currently in the `Visible` render state.
    pub fn shown_ids(&self) -> Vec<MarkerId> {
        self.records
            .iter()
            .filter(|record| record.render_state == RenderState::Visible)
            .map(|record| record.id)
            .collect()
    }

    /// Immutable snapshot of (id, position) pairs for worker-side scans.
    ///
    /// Positions never change after initialization, so the snapshot stays
    /// valid for the session. Workers read positions only; render state
    /// is never shared across the thread boundary.
    pub fn positions_snapshot(&self) -> Arc<[(MarkerId, GeoPoint)]> {
        self.records
            .iter()
            .map(|record| (record.id, record.position))
            .collect::<Vec<_>>()
            .into()
    }
}
