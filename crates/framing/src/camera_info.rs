use serde::Serialize;

use crate::viewer::Viewer;

/// Camera orientation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraOrientation {
    #[serde(rename = "head")]
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

/// Snapshot of where the camera is, in geographic terms.
///
/// Serialized field names match what map front-ends already consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraInfo {
    #[serde(rename = "lng")]
    pub longitude_deg: f64,
    #[serde(rename = "lat")]
    pub latitude_deg: f64,
    #[serde(rename = "h")]
    pub height_m: f64,
    #[serde(rename = "mat")]
    pub orientation: CameraOrientation,
    #[serde(rename = "cartesian3Position")]
    pub position: [f64; 3],
}

/// Round to six decimal places (about 0.1 m of latitude).
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Read the viewer's current camera pose.
pub fn camera_info<V: Viewer + ?Sized>(viewer: &V) -> CameraInfo {
    let pose = viewer.camera_pose();
    let geo = pose.cartographic();
    CameraInfo {
        longitude_deg: round6(geo.lon_deg()),
        latitude_deg: round6(geo.lat_deg()),
        height_m: geo.alt_m,
        orientation: CameraOrientation {
            heading: pose.heading,
            pitch: pose.pitch,
            roll: pose.roll,
        },
        position: pose.position.as_array(),
    }
}
