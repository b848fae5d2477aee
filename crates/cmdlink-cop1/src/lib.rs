//! COP-1 receiver side: the Command Link Control Word and FARM-1.
//!
//! [`Farm1`] takes one decoded transfer frame at a time, updates the
//! channel's [`Clcw`] and either extracts the payload or rejects the frame.
//! Rejections are ordinary protocol outcomes; ground learns about them from
//! the CLCW flags it receives in telemetry.

pub mod clcw;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod farm;

pub use clcw::{init_clcw, Clcw, FarmState};
pub use command::ControlCommand;
pub use config::{Farm1Config, WindowPosition, DEFAULT_WINDOW_WIDTH};
pub use error::{Cop1Error, Rejection, Result};
pub use events::{EventSink, Farm1Event, NoopEvents, RecordingEvents, TracingEvents};
pub use farm::{process_frame, Farm1};
