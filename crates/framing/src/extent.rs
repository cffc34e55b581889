//! Bounding volumes for geographic features.

use foundation::bounds::{BoundingSphere, GeoRect};
use foundation::math::{Ecef, Geodetic};

use crate::features::{GeoCoordinate, GeoJson, coord_all};

/// What the camera should frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BoundingVolume {
    Sphere(BoundingSphere),
    /// Two opposite corners, framed as their two-point bounding sphere.
    Rectangle([Ecef; 2]),
}

impl BoundingVolume {
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            BoundingVolume::Sphere(sphere) => *sphere,
            BoundingVolume::Rectangle([a, b]) => BoundingSphere::new(a.midpoint(*b), 0.5 * a.distance(*b)),
        }
    }
}

impl From<BoundingSphere> for BoundingVolume {
    fn from(sphere: BoundingSphere) -> Self {
        BoundingVolume::Sphere(sphere)
    }
}

/// Whether heights are honored, decided from the first coordinate alone.
///
/// Mixed collections are not validated: the first tuple's arity is applied
/// to every point.
pub fn has_height(coords: &[GeoCoordinate]) -> bool {
    coords.first().is_some_and(GeoCoordinate::has_height)
}

/// Convert positions to ECEF.
///
/// With `use_height == false` every point sits on the ellipsoid; otherwise a
/// point without its own height uses 0.
pub fn to_cartesian(coords: &[GeoCoordinate], use_height: bool) -> Vec<Ecef> {
    coords
        .iter()
        .map(|c| {
            let h = if use_height {
                c.height_m.unwrap_or(0.0)
            } else {
                0.0
            };
            Geodetic::from_degrees(c.lon_deg, c.lat_deg, h).to_ecef()
        })
        .collect()
}

/// Enclosing sphere of every coordinate in `features`.
///
/// `None` when the input has no coordinates; callers treat that as nothing
/// to frame.
pub fn compute_extent(features: &GeoJson) -> Option<BoundingSphere> {
    let coords = coord_all(features);
    let points = to_cartesian(&coords, has_height(&coords));
    BoundingSphere::from_points(&points)
}

/// North-west and south-east corners of a flat bounding box, on the ellipsoid.
pub fn compute_rectangle_corners(rect: GeoRect) -> [Ecef; 2] {
    let north_west = Geodetic::from_degrees(rect.west, rect.north, 0.0).to_ecef();
    let south_east = Geodetic::from_degrees(rect.east, rect.south, 0.0).to_ecef();
    [north_west, south_east]
}
