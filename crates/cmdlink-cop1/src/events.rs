//! FARM-1 event reporting.
//!
//! The engine never logs directly. It hands every protocol event to an
//! [`EventSink`] supplied at construction, so hosts can route events to
//! their own event service and tests can capture them.

use std::sync::Mutex;

use tracing::Level;

use crate::error::Rejection;

/// Something FARM-1 did with a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Farm1Event {
    /// Sequence-controlled frame accepted and V(R) advanced.
    FrameAccepted { seq: u8, report: u8, bytes: u16 },
    /// Bypass data frame accepted.
    BypassAccepted { bytes: u16, farm_b_counter: u8 },
    /// Unlock directive executed.
    Unlocked { farm_b_counter: u8 },
    /// Set V(R) directive executed.
    VrSet { report: u8 },
    /// Frame rejected by the acceptance procedure.
    Rejected(Rejection),
    /// Frame failed channel validation.
    InvalidFrame { spacecraft_id: u16, vc_id: u8 },
}

impl Farm1Event {
    /// Severity used when the event is logged.
    pub fn level(&self) -> Level {
        match self {
            Self::FrameAccepted { .. } | Self::BypassAccepted { .. } => Level::DEBUG,
            Self::Unlocked { .. } | Self::VrSet { .. } => Level::INFO,
            Self::Rejected(Rejection::NegativeWindow { .. }) => Level::INFO,
            Self::Rejected(Rejection::LockoutEntered { .. } | Rejection::SetVrWhileLocked) => {
                Level::ERROR
            }
            Self::Rejected(_) | Self::InvalidFrame { .. } => Level::WARN,
        }
    }
}

/// Receives FARM-1 events.
pub trait EventSink {
    /// Report an event for virtual channel `vc_id`.
    fn emit(&self, vc_id: u8, event: &Farm1Event);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, vc_id: u8, event: &Farm1Event) {
        (**self).emit(vc_id, event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl EventSink for TracingEvents {
    fn emit(&self, vc_id: u8, event: &Farm1Event) {
        let level = event.level();
        if level == Level::ERROR {
            tracing::error!(vc_id, ?event, "FARM-1 event");
        } else if level == Level::WARN {
            tracing::warn!(vc_id, ?event, "FARM-1 event");
        } else if level == Level::INFO {
            tracing::info!(vc_id, ?event, "FARM-1 event");
        } else {
            tracing::debug!(vc_id, ?event, "FARM-1 event");
        }
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEvents;

impl EventSink for NoopEvents {
    fn emit(&self, _vc_id: u8, _event: &Farm1Event) {}
}

/// Keeps events in memory until taken.
#[derive(Debug, Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<(u8, Farm1Event)>>,
}

impl RecordingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<(u8, Farm1Event)> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.lock().map_or(0, |events| events.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for RecordingEvents {
    fn emit(&self, vc_id: u8, event: &Farm1Event) {
        match self.events.lock() {
            Ok(mut events) => events.push((vc_id, event.clone())),
            Err(poisoned) => poisoned.into_inner().push((vc_id, event.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(
            Farm1Event::FrameAccepted {
                seq: 0,
                report: 1,
                bytes: 4
            }
            .level(),
            Level::DEBUG
        );
        assert_eq!(Farm1Event::VrSet { report: 3 }.level(), Level::INFO);
        assert_eq!(
            Farm1Event::Rejected(Rejection::NegativeWindow {
                seq: 0,
                expected: 1
            })
            .level(),
            Level::INFO
        );
        assert_eq!(
            Farm1Event::Rejected(Rejection::PositiveWindow {
                seq: 2,
                expected: 1
            })
            .level(),
            Level::WARN
        );
        assert_eq!(
            Farm1Event::Rejected(Rejection::SetVrWhileLocked).level(),
            Level::ERROR
        );
    }

    #[test]
    fn recording_sink_takes_events() {
        let sink = RecordingEvents::new();
        sink.emit(3, &Farm1Event::Unlocked { farm_b_counter: 1 });
        (&sink).emit(3, &Farm1Event::VrSet { report: 9 });
        assert_eq!(sink.len(), 2);

        let events = sink.take();
        assert_eq!(events[0], (3, Farm1Event::Unlocked { farm_b_counter: 1 }));
        assert!(sink.is_empty());
    }

    #[test]
    fn tracing_sink_accepts_every_level() {
        let sink = TracingEvents;
        sink.emit(0, &Farm1Event::Rejected(Rejection::Lockout));
        sink.emit(0, &Farm1Event::Rejected(Rejection::SetVrWhileLocked));
        sink.emit(0, &Farm1Event::Unlocked { farm_b_counter: 0 });
        sink.emit(
            0,
            &Farm1Event::BypassAccepted {
                bytes: 0,
                farm_b_counter: 1,
            },
        );
    }
}
