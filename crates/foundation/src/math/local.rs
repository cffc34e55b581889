use super::{Ecef, Geodetic, ecef_to_geodetic};

/// Local East-North-Up coordinates (meters).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    /// Unit look direction for a camera heading (clockwise from north) and
    /// pitch (negative looks down), both in radians.
    pub fn from_heading_pitch(heading_rad: f64, pitch_rad: f64) -> Self {
        let cos_pitch = pitch_rad.cos();
        Self::new(
            heading_rad.sin() * cos_pitch,
            heading_rad.cos() * cos_pitch,
            pitch_rad.sin(),
        )
    }

    pub fn scaled(self, s: f64) -> Self {
        Self::new(self.east * s, self.north * s, self.up * s)
    }
}

/// Rotate an ENU vector at `origin` into an ECEF-aligned offset (no translation).
pub fn enu_vector_to_ecef(enu: Enu, origin: Geodetic) -> Ecef {
    let sin_lat = origin.lat_rad.sin();
    let cos_lat = origin.lat_rad.cos();
    let sin_lon = origin.lon_rad.sin();
    let cos_lon = origin.lon_rad.cos();

    let dx = -sin_lon * enu.east - sin_lat * cos_lon * enu.north + cos_lat * cos_lon * enu.up;
    let dy = cos_lon * enu.east - sin_lat * sin_lon * enu.north + cos_lat * sin_lon * enu.up;
    let dz = cos_lat * enu.north + sin_lat * enu.up;

    Ecef::new(dx, dy, dz)
}

/// Offset `anchor` by an ENU vector expressed in the frame at `anchor` itself.
///
/// The translation is the exact ECEF anchor, so only the frame orientation
/// goes through the geodetic inversion.
pub fn offset_in_local_frame(anchor: Ecef, enu: Enu) -> Ecef {
    anchor + enu_vector_to_ecef(enu, ecef_to_geodetic(anchor))
}
