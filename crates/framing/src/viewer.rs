use foundation::bounds::BoundingSphere;
use foundation::math::{Ecef, Geodetic, ecef_to_geodetic};

/// Identifies one flight issued to a viewer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightId(pub u64);

/// How a flight ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    Cancelled,
}

/// Camera offset from the framed sphere's center.
///
/// Angles are radians; `range_m == 0` lets the viewer pick a range that fits
/// the sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingPitchRange {
    pub heading: f64,
    pub pitch: f64,
    pub range_m: f64,
}

impl HeadingPitchRange {
    pub fn new(heading: f64, pitch: f64, range_m: f64) -> Self {
        Self {
            heading,
            pitch,
            range_m,
        }
    }
}

/// Invoked exactly once per accepted flight.
pub type FlightCallback = Box<dyn FnOnce(TransitionOutcome)>;

pub struct FlightOptions {
    pub duration_s: f64,
    pub offset: HeadingPitchRange,
    pub on_outcome: FlightCallback,
}

impl std::fmt::Debug for FlightOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightOptions")
            .field("duration_s", &self.duration_s)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

/// Camera position (ECEF) and orientation (radians).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Ecef,
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl CameraPose {
    pub fn new(position: Ecef, heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            position,
            heading,
            pitch,
            roll,
        }
    }

    /// Position as longitude/latitude in radians and height in meters.
    pub fn cartographic(&self) -> Geodetic {
        ecef_to_geodetic(self.position)
    }
}

/// The viewer a camera transition is issued to.
///
/// Contract: every flight accepted by [`Viewer::fly_to_bounding_sphere`]
/// has its `on_outcome` invoked exactly once, either when the camera
/// arrives or when the flight is cancelled. A viewer may cancel a running
/// flight on its own, e.g. when a newer flight supersedes it or the viewer
/// is torn down.
pub trait Viewer {
    fn camera_pose(&self) -> CameraPose;

    fn fly_to_bounding_sphere(&mut self, sphere: BoundingSphere, options: FlightOptions) -> FlightId;

    /// Cancel `id` if it is still in flight; otherwise do nothing.
    fn cancel_flight(&mut self, id: FlightId);
}
