use std::cell::RefCell;

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};

/// A recorded diagnostic, numbered in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub sequence: u64,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Recording [`DiagnosticSink`].
///
/// Interior mutability keeps `report(&self)` usable from flight callbacks
/// that only hold a shared handle. Single-threaded by construction.
#[derive(Debug, Default)]
pub struct EventBus {
    events: RefCell<Vec<Event>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, kind: DiagnosticKind, message: impl Into<String>) {
        let mut events = self.events.borrow_mut();
        let sequence = events.len() as u64;
        events.push(Event {
            sequence,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.events.borrow().iter().map(|e| e.kind).collect()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.events.borrow().iter().filter(|e| e.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl DiagnosticSink for EventBus {
    fn report(&self, diagnostic: Diagnostic) {
        self.emit(diagnostic.kind, diagnostic.message);
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use crate::diagnostics::{DiagnosticKind, DiagnosticSink};

    #[test]
    fn records_events_in_order() {
        let bus = EventBus::new();
        bus.report(DiagnosticKind::InvalidFramingRange.into());
        bus.emit(DiagnosticKind::TransitionCancelled, "superseded");
        let events = bus.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 0);
        assert_eq!(events[0].message, "invalid framing range");
        assert_eq!(events[1].sequence, 1);
        assert_eq!(bus.count(DiagnosticKind::TransitionCancelled), 1);
    }
}
