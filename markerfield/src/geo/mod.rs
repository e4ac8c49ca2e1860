//! Geographic primitives and view-box derivation.
//!
//! Provides the point, quadrilateral, and bounding-box types used by the
//! visibility engine, plus the conversion from a camera/projection snapshot
//! into the query region markers are tested against.
//!
//! The visible region reported by the map surface is shrunk to 50% of its
//! linear extent around the camera target before its axis-aligned envelope
//! is taken. Markers therefore materialize slightly before they reach the
//! true edge of the screen, trading a larger hidden buffer for fewer
//! perceptible pop-ins.

use std::fmt;

/// A geographic point in degrees (WGS84 latitude/longitude).
///
/// Equality is exact floating-point equality; coordinates are never
/// normalized or wrapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// The four corners of the visible-region trapezoid reported by the map
/// surface, ordered near-left, far-left, far-right, near-right.
///
/// Derived per viewport-change event and discarded after use; never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewQuad {
    pub near_left: GeoPoint,
    pub far_left: GeoPoint,
    pub far_right: GeoPoint,
    pub near_right: GeoPoint,
}

impl ViewQuad {
    /// Create a quad from its four corners.
    pub fn new(
        near_left: GeoPoint,
        far_left: GeoPoint,
        far_right: GeoPoint,
        near_right: GeoPoint,
    ) -> Self {
        Self {
            near_left,
            far_left,
            far_right,
            near_right,
        }
    }

    /// The corners in near-left, far-left, far-right, near-right order.
    pub fn corners(&self) -> [GeoPoint; 4] {
        [self.near_left, self.far_left, self.far_right, self.near_right]
    }
}

/// Axis-aligned geographic bounding box.
///
/// Containment is inclusive on all four edges: a point exactly on a
/// boundary is inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude.
    pub min_lat: f64,
    /// Maximum (northernmost) latitude.
    pub max_lat: f64,
    /// Minimum (westernmost) longitude.
    pub min_lon: f64,
    /// Maximum (easternmost) longitude.
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Create a bounding box from a single point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            min_lat: point.lat,
            max_lat: point.lat,
            min_lon: point.lon,
            max_lon: point.lon,
        }
    }

    /// The axis-aligned envelope of a quad's four corners.
    pub fn from_quad(quad: &ViewQuad) -> Self {
        let corners = quad.corners();
        let mut bounds = Self::from_point(corners[0]);
        for corner in &corners[1..] {
            bounds.expand(*corner);
        }
        bounds
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lon = self.max_lon.max(point.lon);
    }

    /// Whether a point lies inside the box, boundary inclusive.
    #[inline]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Get the width of the bounds in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Get the height of the bounds in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Midpoint of two scalar coordinates.
#[inline]
pub fn interpolate(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}

/// Midpoint of two geographic points, interpolated independently on
/// latitude and longitude.
#[inline]
pub fn midpoint(a: GeoPoint, b: GeoPoint) -> GeoPoint {
    GeoPoint::new(interpolate(a.lat, b.lat), interpolate(a.lon, b.lon))
}

/// Derive the visibility query region from the current camera state.
///
/// Each corner of the visible region is pulled halfway toward the camera
/// target, producing the inner quad used as the visibility test region,
/// and the quad's axis-aligned bounding box.
///
/// Inputs are always well-formed camera state from the map surface; there
/// are no error conditions.
pub fn compute_view_box(camera_target: GeoPoint, visible_region: &ViewQuad) -> (ViewQuad, GeoBounds) {
    let quad = ViewQuad::new(
        midpoint(visible_region.near_left, camera_target),
        midpoint(visible_region.far_left, camera_target),
        midpoint(visible_region.far_right, camera_target),
        midpoint(visible_region.near_right, camera_target),
    );
    let bounds = GeoBounds::from_quad(&quad);
    (quad, bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_quad(min: f64, max: f64) -> ViewQuad {
        ViewQuad::new(
            GeoPoint::new(min, min),
            GeoPoint::new(max, min),
            GeoPoint::new(max, max),
            GeoPoint::new(min, max),
        )
    }

    #[test]
    fn test_interpolate_is_midpoint() {
        assert_eq!(interpolate(10.0, 20.0), 15.0);
        assert_eq!(interpolate(-4.0, 4.0), 0.0);
    }

    #[test]
    fn test_inner_quad_corner_is_halfway_to_target() {
        let target = GeoPoint::new(0.0, 0.0);
        let region = square_quad(-10.0, 10.0);

        let (quad, _) = compute_view_box(target, &region);

        assert_eq!(quad.near_left, GeoPoint::new(-5.0, -5.0));
        assert_eq!(quad.far_right, GeoPoint::new(5.0, 5.0));
    }

    #[test]
    fn test_view_box_bounds_cover_inner_quad() {
        let target = GeoPoint::new(2.0, 2.0);
        let region = square_quad(-10.0, 10.0);

        let (quad, bounds) = compute_view_box(target, &region);

        for corner in quad.corners() {
            assert!(bounds.contains(corner), "corner {} outside bounds", corner);
        }
    }

    #[test]
    fn test_contains_is_boundary_inclusive() {
        let bounds = GeoBounds::new(0.0, 6.0, 0.0, 6.0);

        assert!(bounds.contains(GeoPoint::new(0.0, 0.0)));
        assert!(bounds.contains(GeoPoint::new(6.0, 6.0)));
        assert!(bounds.contains(GeoPoint::new(0.0, 6.0)));
        assert!(bounds.contains(GeoPoint::new(3.0, 3.0)));
        assert!(!bounds.contains(GeoPoint::new(6.000001, 3.0)));
        assert!(!bounds.contains(GeoPoint::new(3.0, -0.000001)));
    }

    #[test]
    fn test_from_quad_takes_envelope() {
        // Trapezoid: narrower near edge than far edge
        let quad = ViewQuad::new(
            GeoPoint::new(0.0, 2.0),
            GeoPoint::new(5.0, 0.0),
            GeoPoint::new(5.0, 10.0),
            GeoPoint::new(0.0, 8.0),
        );

        let bounds = GeoBounds::from_quad(&quad);

        assert_eq!(bounds.min_lat, 0.0);
        assert_eq!(bounds.max_lat, 5.0);
        assert_eq!(bounds.min_lon, 0.0);
        assert_eq!(bounds.max_lon, 10.0);
    }

    #[test]
    fn test_expand_grows_bounds() {
        let mut bounds = GeoBounds::from_point(GeoPoint::new(53.5, 9.7));
        bounds.expand(GeoPoint::new(54.0, 10.5));

        assert!((bounds.min_lat - 53.5).abs() < 0.0001);
        assert!((bounds.max_lat - 54.0).abs() < 0.0001);
        assert!((bounds.min_lon - 9.7).abs() < 0.0001);
        assert!((bounds.max_lon - 10.5).abs() < 0.0001);
    }

    #[test]
    fn test_center_width_height() {
        let bounds = GeoBounds::new(53.0, 54.0, 9.0, 11.0);

        let center = bounds.center();
        assert!((center.lat - 53.5).abs() < 0.0001);
        assert!((center.lon - 10.0).abs() < 0.0001);
        assert!((bounds.width() - 2.0).abs() < 0.0001);
        assert!((bounds.height() - 1.0).abs() < 0.0001);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_contains_matches_range_checks(
                lat in -85.0..85.0_f64,
                lon in -180.0..180.0_f64,
                min_lat in -85.0..85.0_f64,
                min_lon in -180.0..180.0_f64,
                lat_extent in 0.0..20.0_f64,
                lon_extent in 0.0..20.0_f64,
            ) {
                let bounds = GeoBounds::new(
                    min_lat,
                    min_lat + lat_extent,
                    min_lon,
                    min_lon + lon_extent,
                );
                let point = GeoPoint::new(lat, lon);

                let expected = (bounds.min_lat..=bounds.max_lat).contains(&lat)
                    && (bounds.min_lon..=bounds.max_lon).contains(&lon);
                prop_assert_eq!(bounds.contains(point), expected);
            }

            #[test]
            fn test_interpolate_lies_between_endpoints(
                a in -180.0..180.0_f64,
                b in -180.0..180.0_f64,
            ) {
                let mid = interpolate(a, b);
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(mid >= lo && mid <= hi);
            }

            #[test]
            fn test_inner_quad_halves_distance_to_target(
                target_lat in -40.0..40.0_f64,
                target_lon in -40.0..40.0_f64,
                corner_lat in -40.0..40.0_f64,
                corner_lon in -40.0..40.0_f64,
            ) {
                let target = GeoPoint::new(target_lat, target_lon);
                let corner = GeoPoint::new(corner_lat, corner_lon);
                let region = ViewQuad::new(corner, corner, corner, corner);

                let (quad, _) = compute_view_box(target, &region);

                let expected_lat = (corner_lat + target_lat) / 2.0;
                let expected_lon = (corner_lon + target_lon) / 2.0;
                prop_assert!((quad.near_left.lat - expected_lat).abs() < 1e-12);
                prop_assert!((quad.near_left.lon - expected_lon).abs() < 1e-12);
            }

            #[test]
            fn test_quad_envelope_contains_all_corners(
                lats in prop::array::uniform4(-85.0..85.0_f64),
                lons in prop::array::uniform4(-180.0..180.0_f64),
            ) {
                let quad = ViewQuad::new(
                    GeoPoint::new(lats[0], lons[0]),
                    GeoPoint::new(lats[1], lons[1]),
                    GeoPoint::new(lats[2], lons[2]),
                    GeoPoint::new(lats[3], lons[3]),
                );
                let bounds = GeoBounds::from_quad(&quad);
                for corner in quad.corners() {
                    prop_assert!(bounds.contains(corner));
                }
            }
        }
    }
}
