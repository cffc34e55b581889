//! Camera framing for a geospatial viewer.
//!
//! Features go in, a bounding sphere comes out ([`extent`]), and a
//! [`CameraTransition`] flies a [`Viewer`] to it.

pub mod animated;
pub mod camera_info;
pub mod config;
pub mod extent;
pub mod features;
pub mod transition;
pub mod viewer;

pub use animated::AnimatedCamera;
pub use camera_info::{CameraInfo, camera_info};
pub use config::{CameraConfig, ConfigError, FramingConfig};
pub use extent::{BoundingVolume, compute_extent, compute_rectangle_corners};
pub use features::{Feature, FeatureCollection, FeatureError, GeoCoordinate, GeoJson, Geometry, bbox, coord_all};
pub use transition::{CameraTransition, CompletionCallback, FramingError, FramingOptions, TransitionRequest};
pub use viewer::{CameraPose, FlightId, FlightOptions, HeadingPitchRange, TransitionOutcome, Viewer};
