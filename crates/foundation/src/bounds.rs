use crate::math::Ecef;

/// Flat geographic bounding box in degrees, `[west, south, east, north]` order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoRect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoRect {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    /// Grow to include a `(lon, lat)` position.
    pub fn extend(&mut self, lon_deg: f64, lat_deg: f64) {
        self.west = self.west.min(lon_deg);
        self.south = self.south.min(lat_deg);
        self.east = self.east.max(lon_deg);
        self.north = self.north.max(lat_deg);
    }
}

/// Sphere enclosing a set of ECEF points.
///
/// Invariant: `radius >= 0` and every source point lies within `radius` of
/// `center` (up to floating-point rounding).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Ecef,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Ecef, radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Enclosing sphere of `points`, or `None` when there are none.
    ///
    /// Ritter's sphere seeded from the widest pair of axis extremes. The
    /// center starts at the midpoint of two input points and each growth
    /// step moves it toward an input point, so it stays inside the convex
    /// hull of `points`.
    pub fn from_points(points: &[Ecef]) -> Option<Self> {
        let first = *points.first()?;
        if points.len() == 1 {
            return Some(Self::new(first, 0.0));
        }

        // Extreme points per axis: (min, max) for x, y, z.
        let mut extremes = [(first, first); 3];
        for &p in points {
            let a = p.as_array();
            for (axis, (lo, hi)) in extremes.iter_mut().enumerate() {
                if a[axis] < lo.as_array()[axis] {
                    *lo = p;
                }
                if a[axis] > hi.as_array()[axis] {
                    *hi = p;
                }
            }
        }

        let (mut lo, mut hi) = extremes[0];
        let mut widest = lo.distance_squared(hi);
        for &(a, b) in &extremes[1..] {
            let span = a.distance_squared(b);
            if span > widest {
                widest = span;
                lo = a;
                hi = b;
            }
        }

        let mut center = lo.midpoint(hi);
        let mut radius = widest.sqrt() * 0.5;

        for &p in points {
            let dist = p.distance(center);
            if dist > radius {
                let grown = 0.5 * (radius + dist);
                // Slide the center toward `p` so the far side stays put.
                let toward = dist - grown;
                center = (center * grown + p * toward) * (1.0 / dist);
                radius = grown;
            }
        }

        Some(Self::new(center, radius))
    }

    pub fn contains(&self, point: Ecef, epsilon: f64) -> bool {
        point.distance(self.center) <= self.radius + epsilon
    }

    /// Same center, radius multiplied by `factor` (clamped at zero).
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.center, self.radius * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundingSphere, GeoRect};
    use crate::math::Ecef;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn empty_input_has_no_sphere() {
        assert_eq!(BoundingSphere::from_points(&[]), None);
    }

    #[test]
    fn single_point_has_zero_radius() {
        let p = Ecef::new(1.0, -2.0, 3.0);
        let sphere = BoundingSphere::from_points(&[p]).unwrap();
        assert_eq!(sphere.center, p);
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn repeated_point_has_zero_radius() {
        let p = Ecef::new(5.0, 5.0, 5.0);
        let sphere = BoundingSphere::from_points(&[p, p, p]).unwrap();
        assert_eq!(sphere.center, p);
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn two_points_share_the_midpoint() {
        let a = Ecef::new(-4.0, 0.0, 0.0);
        let b = Ecef::new(4.0, 0.0, 0.0);
        let sphere = BoundingSphere::from_points(&[a, b]).unwrap();
        assert_eq!(sphere.center, Ecef::new(0.0, 0.0, 0.0));
        assert_close(sphere.radius, 4.0, 1e-12);
    }

    #[test]
    fn collinear_points_are_contained() {
        let points: Vec<Ecef> = (0..7)
            .map(|i| Ecef::new(i as f64 * 3.0, i as f64 * -1.5, 10.0))
            .collect();
        let sphere = BoundingSphere::from_points(&points).unwrap();
        for p in &points {
            assert!(sphere.contains(*p, 1e-9), "{p:?} outside {sphere:?}");
        }
        let span = points[0].distance(points[6]);
        assert_close(sphere.radius, span * 0.5, 1e-9);
    }

    #[test]
    fn scattered_points_are_contained() {
        let mut points = Vec::new();
        for i in 0..50 {
            let t = i as f64;
            points.push(Ecef::new(
                (t * 1.7).sin() * 1_000.0 + 6_378_137.0,
                (t * 0.3).cos() * 2_500.0,
                (t * 2.9).sin() * 700.0 - t,
            ));
        }
        let sphere = BoundingSphere::from_points(&points).unwrap();
        for p in &points {
            assert!(sphere.contains(*p, 1e-6), "{p:?} outside {sphere:?}");
        }
    }

    #[test]
    fn scaled_keeps_center() {
        let sphere = BoundingSphere::new(Ecef::new(1.0, 1.0, 1.0), 10.0);
        let wide = sphere.scaled(2.0);
        assert_eq!(wide.center, sphere.center);
        assert_eq!(wide.radius, 20.0);
        assert_eq!(sphere.scaled(-1.0).radius, 0.0);
    }

    #[test]
    fn center_stays_between_the_points() {
        // Corners of a right triangle in the z = 0 plane.
        let points = [
            Ecef::new(0.0, 0.0, 0.0),
            Ecef::new(10.0, 0.0, 0.0),
            Ecef::new(0.0, 10.0, 0.0),
        ];
        let sphere = BoundingSphere::from_points(&points).unwrap();
        let c = sphere.center;
        assert_close(c.z, 0.0, 1e-12);
        assert!(c.x >= -1e-12 && c.y >= -1e-12 && c.x + c.y <= 10.0 + 1e-12, "{c:?}");
        for p in &points {
            assert!(sphere.contains(*p, 1e-9));
        }
    }

    #[test]
    fn geo_rect_extends() {
        let mut rect = GeoRect::new(10.0, 10.0, 10.0, 10.0);
        rect.extend(-5.0, 20.0);
        assert_eq!(rect.as_array(), [-5.0, 10.0, 10.0, 20.0]);
    }
}
