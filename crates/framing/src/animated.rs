//! Frame-driven reference viewer.
//!
//! `AnimatedCamera` implements [`Viewer`] without a renderer: each flight is
//! advanced by [`AnimatedCamera::update`] from the single-threaded frame loop
//! and resolved there. Newer flights supersede older ones and tearing the
//! viewer down cancels whatever is in flight.

use std::f64::consts::{PI, TAU};

use foundation::bounds::BoundingSphere;
use foundation::math::{Enu, Geodetic, WGS84_A, ecef_to_geodetic, offset_in_local_frame};
use runtime::frame::Frame;

use crate::config::CameraConfig;
use crate::viewer::{
    CameraPose, FlightCallback, FlightId, FlightOptions, HeadingPitchRange, TransitionOutcome,
    Viewer,
};

struct Flight {
    id: FlightId,
    from: CameraPose,
    to: CameraPose,
    duration_s: f64,
    elapsed_s: f64,
    on_outcome: FlightCallback,
}

pub struct AnimatedCamera {
    config: CameraConfig,
    pose: CameraPose,
    flight: Option<Flight>,
    next_id: u64,
    destroyed: bool,
}

impl Default for AnimatedCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl AnimatedCamera {
    /// Starts high above Africa, looking straight down.
    pub fn new(config: CameraConfig) -> Self {
        let start = Geodetic::from_degrees(20.0, 5.0, 2.0 * WGS84_A).to_ecef();
        Self::with_pose(config, CameraPose::new(start, 0.0, -PI / 2.0, 0.0))
    }

    pub fn with_pose(config: CameraConfig, pose: CameraPose) -> Self {
        Self {
            config,
            pose,
            flight: None,
            next_id: 1,
            destroyed: false,
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn active_flight(&self) -> Option<FlightId> {
        self.flight.as_ref().map(|f| f.id)
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Distance that fits `radius` inside the vertical field of view.
    pub fn fit_range(&self, radius: f64) -> f64 {
        let half_fov = (self.config.fov_y_deg.to_radians() * 0.5).clamp(1e-3, PI / 2.0);
        (radius / half_fov.sin()).max(self.config.min_range_m)
    }

    /// Where a flight to `sphere` with `offset` ends.
    pub fn destination(&self, sphere: BoundingSphere, offset: HeadingPitchRange) -> CameraPose {
        let range = if offset.range_m > 0.0 {
            offset.range_m
        } else {
            self.fit_range(sphere.radius)
        };
        // The camera sits behind the sphere center along its look direction.
        let look = Enu::from_heading_pitch(offset.heading, offset.pitch);
        let position = offset_in_local_frame(sphere.center, look.scaled(-range));
        CameraPose::new(position, offset.heading, offset.pitch, 0.0)
    }

    /// Advance the active flight by one frame.
    pub fn update(&mut self, frame: Frame) {
        let Some(flight) = self.flight.as_mut() else {
            return;
        };
        flight.elapsed_s += frame.dt_s.max(0.0);

        if flight.elapsed_s < flight.duration_s {
            let t = smoothstep(flight.elapsed_s / flight.duration_s);
            self.pose = interpolate(&flight.from, &flight.to, t);
            return;
        }

        if let Some(flight) = self.flight.take() {
            self.pose = flight.to;
            tracing::trace!(
                flight = flight.id.0,
                frame = frame.index,
                time_s = frame.time.0,
                "camera flight arrived"
            );
            (flight.on_outcome)(TransitionOutcome::Completed);
        }
    }

    /// Tear the viewer down. The active flight and every later one resolve
    /// as cancelled.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        if let Some(flight) = self.flight.take() {
            (flight.on_outcome)(TransitionOutcome::Cancelled);
        }
    }
}

impl Viewer for AnimatedCamera {
    fn camera_pose(&self) -> CameraPose {
        self.pose
    }

    fn fly_to_bounding_sphere(&mut self, sphere: BoundingSphere, options: FlightOptions) -> FlightId {
        let id = FlightId(self.next_id);
        self.next_id += 1;

        if self.destroyed {
            (options.on_outcome)(TransitionOutcome::Cancelled);
            return id;
        }

        if let Some(previous) = self.flight.take() {
            (previous.on_outcome)(TransitionOutcome::Cancelled);
        }

        let to = self.destination(sphere, options.offset);
        self.flight = Some(Flight {
            id,
            from: self.pose,
            to,
            duration_s: options.duration_s.max(0.0),
            elapsed_s: 0.0,
            on_outcome: options.on_outcome,
        });
        id
    }

    fn cancel_flight(&mut self, id: FlightId) {
        if self.flight.as_ref().is_some_and(|f| f.id == id) {
            if let Some(flight) = self.flight.take() {
                (flight.on_outcome)(TransitionOutcome::Cancelled);
            }
        }
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Signed shortest angular difference `to - from`, in `[-PI, PI)`.
fn angle_delta(from: f64, to: f64) -> f64 {
    (to - from + PI).rem_euclid(TAU) - PI
}

fn interpolate(from: &CameraPose, to: &CameraPose, t: f64) -> CameraPose {
    let a = ecef_to_geodetic(from.position);
    let b = ecef_to_geodetic(to.position);
    let position = Geodetic::new(
        a.lat_rad + (b.lat_rad - a.lat_rad) * t,
        a.lon_rad + angle_delta(a.lon_rad, b.lon_rad) * t,
        a.alt_m + (b.alt_m - a.alt_m) * t,
    )
    .to_ecef();
    CameraPose::new(
        position,
        from.heading + angle_delta(from.heading, to.heading) * t,
        from.pitch + (to.pitch - from.pitch) * t,
        from.roll + angle_delta(from.roll, to.roll) * t,
    )
}
