//! Camera transitions that frame a bounding volume.
//!
//! Fail-soft by default: [`CameraTransition::fly_to`] and friends never
//! return an error. Guards, cancellations and the completed-without-callback
//! case are handed to the [`DiagnosticSink`]. The `try_*` variants expose the
//! same guards as a typed [`FramingError`] for callers that want one.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::bounds::BoundingSphere;
use foundation::math::Ecef;
use runtime::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
use serde::{Deserialize, Serialize};

use crate::extent::{BoundingVolume, compute_extent, compute_rectangle_corners};
use crate::features::{GeoJson, bbox};
use crate::viewer::{FlightCallback, FlightId, FlightOptions, HeadingPitchRange, TransitionOutcome, Viewer};

/// Scales below this are treated as degenerate.
pub const MIN_SCALE: f64 = 0.1;
/// Replacement for a degenerate scale.
pub const FALLBACK_SCALE: f64 = 1.0;

/// Orientation and pacing of a transition. Angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingOptions {
    pub heading_deg: f64,
    /// -90 looks straight down.
    pub pitch_deg: f64,
    /// 0 lets the viewer choose a range that fits the volume.
    pub range_m: f64,
    /// Multiplies the framed sphere's radius.
    pub scale: f64,
    pub duration_s: f64,
}

impl Default for FramingOptions {
    fn default() -> Self {
        Self {
            heading_deg: 0.0,
            pitch_deg: -90.0,
            range_m: 0.0,
            scale: 2.0,
            duration_s: 1.0,
        }
    }
}

impl FramingOptions {
    /// `scale` with values below [`MIN_SCALE`] (and NaN) replaced by
    /// [`FALLBACK_SCALE`]. Large values pass through unchanged.
    pub fn effective_scale(&self) -> f64 {
        if self.scale >= MIN_SCALE {
            self.scale
        } else {
            FALLBACK_SCALE
        }
    }

    pub fn effective_duration(&self) -> f64 {
        self.duration_s.max(0.0)
    }

    /// The viewer-facing offset, in radians.
    pub fn offset(&self) -> HeadingPitchRange {
        HeadingPitchRange::new(
            self.heading_deg.to_radians(),
            self.pitch_deg.to_radians(),
            self.range_m.max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRequest {
    pub target: BoundingVolume,
    pub options: FramingOptions,
}

impl TransitionRequest {
    pub fn new(target: impl Into<BoundingVolume>) -> Self {
        Self {
            target: target.into(),
            options: FramingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FramingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn heading(mut self, heading_deg: f64) -> Self {
        self.options.heading_deg = heading_deg;
        self
    }

    pub fn pitch(mut self, pitch_deg: f64) -> Self {
        self.options.pitch_deg = pitch_deg;
        self
    }

    pub fn range(mut self, range_m: f64) -> Self {
        self.options.range_m = range_m;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.options.scale = scale;
        self
    }

    pub fn duration(mut self, duration_s: f64) -> Self {
        self.options.duration_s = duration_s;
        self
    }

    /// The sphere actually handed to the viewer.
    pub fn framed_sphere(&self) -> BoundingSphere {
        self.target
            .bounding_sphere()
            .scaled(self.options.effective_scale())
    }
}

/// Runs after the camera arrives.
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Why a transition was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    ViewerNotInitialized,
    InvalidFramingRange,
    EmptyExtent,
}

impl FramingError {
    pub fn kind(self) -> DiagnosticKind {
        match self {
            FramingError::ViewerNotInitialized => DiagnosticKind::ViewerNotInitialized,
            FramingError::InvalidFramingRange => DiagnosticKind::InvalidFramingRange,
            FramingError::EmptyExtent => DiagnosticKind::EmptyExtent,
        }
    }
}

impl std::fmt::Display for FramingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind().message())
    }
}

impl std::error::Error for FramingError {}

impl From<FramingError> for Diagnostic {
    fn from(err: FramingError) -> Self {
        Diagnostic::new(err.kind())
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveFlight {
    ticket: u64,
    /// Address of the viewer the flight was issued to.
    viewer: usize,
    /// `None` until the viewer has returned from issuing the flight.
    id: Option<FlightId>,
}

#[derive(Debug, Default)]
struct Slot {
    next_ticket: u64,
    active: Option<ActiveFlight>,
}

/// Issues camera transitions and owns the single in-flight slot.
///
/// At most one transition issued through a `CameraTransition` is in flight
/// per viewer: issuing a new one first asks the viewer to cancel the previous
/// one. A transition is normally paired with a single viewer; when a flight is
/// issued to a different viewer the earlier flight is left to its own viewer
/// and only the newest one is tracked.
pub struct CameraTransition {
    sink: Rc<dyn DiagnosticSink>,
    slot: Rc<RefCell<Slot>>,
    defaults: FramingOptions,
}

impl Default for CameraTransition {
    fn default() -> Self {
        Self::new(Rc::new(TracingSink))
    }
}

impl CameraTransition {
    pub fn new(sink: Rc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            slot: Rc::new(RefCell::new(Slot::default())),
            defaults: FramingOptions::default(),
        }
    }

    /// Options used by [`CameraTransition::fly_to_features`].
    pub fn with_defaults(mut self, defaults: FramingOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> FramingOptions {
        self.defaults
    }

    /// The flight currently owned by this transition, if any.
    pub fn active_flight(&self) -> Option<FlightId> {
        self.slot.borrow().active.and_then(|a| a.id)
    }

    /// Frame `request.target`. Outcomes arrive later through the viewer.
    pub fn fly_to<V: Viewer + ?Sized>(
        &self,
        viewer: Option<&mut V>,
        request: TransitionRequest,
        on_complete: Option<CompletionCallback>,
    ) {
        if let Err(err) = self.try_fly_to(viewer, request, on_complete) {
            self.sink.report(err.into());
        }
    }

    pub fn try_fly_to<V: Viewer + ?Sized>(
        &self,
        viewer: Option<&mut V>,
        request: TransitionRequest,
        on_complete: Option<CompletionCallback>,
    ) -> Result<FlightId, FramingError> {
        let viewer = viewer.ok_or(FramingError::ViewerNotInitialized)?;
        Ok(self.issue(viewer, request, on_complete))
    }

    /// Frame the full extent of `features`.
    ///
    /// `corners` only has to be present; the framed volume is always the
    /// point-cloud sphere of every coordinate in `features`.
    pub fn fly_to_rectangle<V: Viewer + ?Sized>(
        &self,
        viewer: Option<&mut V>,
        corners: Option<&[Ecef]>,
        features: &GeoJson,
        on_complete: Option<CompletionCallback>,
        options: FramingOptions,
    ) {
        if let Err(err) = self.try_fly_to_rectangle(viewer, corners, features, on_complete, options) {
            self.sink.report(err.into());
        }
    }

    pub fn try_fly_to_rectangle<V: Viewer + ?Sized>(
        &self,
        viewer: Option<&mut V>,
        corners: Option<&[Ecef]>,
        features: &GeoJson,
        on_complete: Option<CompletionCallback>,
        options: FramingOptions,
    ) -> Result<FlightId, FramingError> {
        let viewer = viewer.ok_or(FramingError::ViewerNotInitialized)?;
        corners.ok_or(FramingError::InvalidFramingRange)?;
        let sphere = compute_extent(features).ok_or(FramingError::EmptyExtent)?;
        let request = TransitionRequest::new(sphere).with_options(options);
        Ok(self.issue(viewer, request, on_complete))
    }

    /// Frame `features` with the configured default options.
    pub fn fly_to_features<V: Viewer + ?Sized>(
        &self,
        viewer: Option<&mut V>,
        features: &GeoJson,
        on_complete: Option<CompletionCallback>,
    ) {
        let Some(viewer) = viewer else {
            self.sink.report(FramingError::ViewerNotInitialized.into());
            return;
        };
        let Some(rect) = bbox(features) else {
            self.sink.report(FramingError::EmptyExtent.into());
            return;
        };
        let corners = compute_rectangle_corners(rect);
        self.fly_to_rectangle(Some(viewer), Some(&corners[..]), features, on_complete, self.defaults);
    }

    fn issue<V: Viewer + ?Sized>(
        &self,
        viewer: &mut V,
        request: TransitionRequest,
        on_complete: Option<CompletionCallback>,
    ) -> FlightId {
        let key = viewer_key(&*viewer);
        let previous = self.slot.borrow_mut().active.take();
        match previous {
            Some(ActiveFlight { id: Some(id), viewer: owner, .. }) if owner == key => {
                tracing::debug!(flight = id.0, "superseding in-flight camera transition");
                viewer.cancel_flight(id);
            }
            Some(ActiveFlight { id: Some(id), .. }) => {
                tracing::debug!(flight = id.0, "in-flight transition belongs to another viewer");
            }
            _ => {}
        }

        let ticket = {
            let mut slot = self.slot.borrow_mut();
            let ticket = slot.next_ticket;
            slot.next_ticket += 1;
            slot.active = Some(ActiveFlight {
                ticket,
                viewer: key,
                id: None,
            });
            ticket
        };

        let sphere = request.framed_sphere();
        let options = FlightOptions {
            duration_s: request.options.effective_duration(),
            offset: request.options.offset(),
            on_outcome: self.outcome_handler(ticket, on_complete),
        };
        let id = viewer.fly_to_bounding_sphere(sphere, options);

        // The viewer may already have resolved the flight re-entrantly.
        let mut slot = self.slot.borrow_mut();
        if let Some(active) = slot.active.as_mut().filter(|a| a.ticket == ticket) {
            active.id = Some(id);
        }
        tracing::debug!(
            flight = id.0,
            radius_m = sphere.radius,
            duration_s = request.options.effective_duration(),
            "camera transition issued"
        );
        id
    }

    fn outcome_handler(&self, ticket: u64, on_complete: Option<CompletionCallback>) -> FlightCallback {
        let sink = Rc::clone(&self.sink);
        let slot = Rc::clone(&self.slot);
        Box::new(move |outcome| {
            {
                let mut slot = slot.borrow_mut();
                if slot.active.is_some_and(|a| a.ticket == ticket) {
                    slot.active = None;
                }
            }
            match outcome {
                TransitionOutcome::Completed => match on_complete {
                    Some(callback) => callback(),
                    None => sink.report(DiagnosticKind::PositioningFailed.into()),
                },
                TransitionOutcome::Cancelled => {
                    sink.report(DiagnosticKind::TransitionCancelled.into());
                }
            }
        })
    }
}

fn viewer_key<V: Viewer + ?Sized>(viewer: &V) -> usize {
    viewer as *const V as *const () as usize
}
