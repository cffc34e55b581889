//! Diagnostics reported by the framing layer.
//!
//! Framing never propagates failures to its caller; every guard, anomaly and
//! cancellation is handed to an injectable [`DiagnosticSink`] instead.

use std::fmt;

/// What happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// `fly_to` was called without a live viewer.
    ViewerNotInitialized,
    /// The framing corners were missing.
    InvalidFramingRange,
    /// The features held no coordinates; framing was skipped.
    EmptyExtent,
    /// A flight completed but nobody asked to be told.
    PositioningFailed,
    /// A flight was superseded or the viewer went away.
    TransitionCancelled,
}

impl DiagnosticKind {
    pub fn message(self) -> &'static str {
        match self {
            DiagnosticKind::ViewerNotInitialized => "viewer not initialized",
            DiagnosticKind::InvalidFramingRange => "invalid framing range",
            DiagnosticKind::EmptyExtent => "nothing to frame",
            DiagnosticKind::PositioningFailed => "positioning failed",
            DiagnosticKind::TransitionCancelled => "positioning cancelled",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::ViewerNotInitialized => "viewer_not_initialized",
            DiagnosticKind::InvalidFramingRange => "invalid_framing_range",
            DiagnosticKind::EmptyExtent => "empty_extent",
            DiagnosticKind::PositioningFailed => "positioning_failed",
            DiagnosticKind::TransitionCancelled => "transition_cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl From<DiagnosticKind> for Diagnostic {
    fn from(kind: DiagnosticKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Receiver for framing diagnostics.
pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Copy, Clone)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind.as_str();
        match diagnostic.kind {
            DiagnosticKind::ViewerNotInitialized
            | DiagnosticKind::InvalidFramingRange
            | DiagnosticKind::PositioningFailed => {
                tracing::warn!(kind, "{}", diagnostic.message);
            }
            DiagnosticKind::TransitionCancelled => {
                tracing::info!(kind, "{}", diagnostic.message);
            }
            DiagnosticKind::EmptyExtent => {
                tracing::debug!(kind, "{}", diagnostic.message);
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Copy, Clone)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}
