//! CCSDS telecommand link primitives for a spacecraft command receiver.
//!
//! # Crate Structure
//!
//! - [`tctf`]: transfer frame view, channel service table entry, frame encoder
//!   and stream adapters
//! - [`cop1`]: CLCW model and the FARM-1 acceptance engine
//!
//! The C-ABI lives in the separate `cmdlink-ffi` crate.

/// Re-export transfer frame types.
pub mod tctf {
    pub use cmdlink_tctf::*;
}

/// Re-export COP-1 types.
pub mod cop1 {
    pub use cmdlink_cop1::*;
}
