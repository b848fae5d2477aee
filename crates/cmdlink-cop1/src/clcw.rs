//! Command Link Control Word.
//!
//! Wire layout (4 octets, downlinked verbatim in telemetry):
//! ```text
//! Status   T VV SSS CC   control word type, version, status, COP in effect
//! Channel  IIIIII --     virtual channel id
//! Flags    R B L W T FF -  no RF, no bitlock, lockout, wait, retransmit, FARM-B counter
//! Report   NNNNNNNN      V(R)
//! ```
//!
//! All access goes through named accessors. The free functions at the bottom
//! take the word as an `Option` and keep the absent-argument contract of the
//! flight software interface: getters read 0, setters do nothing.

use std::fmt;

use modular_bitfield_msb::prelude::*;

use crate::error::{Cop1Error, Result};

/// Packed wire layout, most significant bit first.
#[bitfield(bytes = 4)]
#[derive(Clone, Copy)]
struct ClcwBits {
    control_word_type: B1,
    version: B2,
    status: B3,
    cop_in_effect: B2,
    vc_id: B6,
    #[skip]
    __: B2,
    no_rf: B1,
    no_bitlock: B1,
    lockout: B1,
    wait: B1,
    retransmit: B1,
    farm_b_counter: B2,
    #[skip]
    __: B1,
    report: B8,
}

/// COP-1 state as seen from the CLCW flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FarmState {
    /// Accepting frames in sequence.
    Open,
    /// Receiver has no buffer space; ground should hold off.
    Wait,
    /// All sequence-controlled frames are rejected until unlocked.
    Lockout,
}

impl FarmState {
    /// Lowercase name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Wait => "wait",
            Self::Lockout => "lockout",
        }
    }
}

impl fmt::Display for FarmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Command Link Control Word for one virtual channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Clcw([u8; 4]);

impl Clcw {
    /// A freshly initialised word for `vc_id`. Same as [`Clcw::init`].
    pub fn new(vc_id: u8) -> Self {
        let mut clcw = Self::default();
        clcw.init(vc_id);
        clcw
    }

    /// Wrap raw octets in wire order.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw octets in wire order.
    pub fn to_bytes(self) -> [u8; 4] {
        self.0
    }

    /// Borrow the raw octets.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Decode from a big-endian 32-bit word.
    pub fn from_u32(word: u32) -> Self {
        Self(word.to_be_bytes())
    }

    /// Encode as a big-endian 32-bit word.
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }

    /// Reset the word for channel start-up.
    ///
    /// Status becomes `0x01` (COP-1 in effect), every flag and the report
    /// value are cleared, and `vc_id` is masked to its 6-bit field.
    pub fn init(&mut self, vc_id: u8) {
        self.0 = ClcwBits::new()
            .with_cop_in_effect(1)
            .with_vc_id(vc_id & 0x3F)
            .into_bytes();
    }

    fn bits(&self) -> ClcwBits {
        ClcwBits::from_bytes(self.0)
    }

    // Generated setters panic on out-of-range values; callers mask first.
    fn update(&mut self, f: impl FnOnce(&mut ClcwBits)) {
        let mut bits = self.bits();
        f(&mut bits);
        self.0 = bits.into_bytes();
    }

    /// Control word type (0 for a CLCW).
    pub fn control_word_type(&self) -> u8 {
        self.bits().control_word_type()
    }

    /// CLCW version number.
    pub fn version(&self) -> u8 {
        self.bits().version()
    }

    /// Status field (mission specific).
    pub fn status(&self) -> u8 {
        self.bits().status()
    }

    /// COP in effect (1 for COP-1).
    pub fn cop_in_effect(&self) -> u8 {
        self.bits().cop_in_effect()
    }

    /// Virtual channel id.
    pub fn vc_id(&self) -> u8 {
        self.bits().vc_id()
    }

    /// No RF available.
    pub fn no_rf(&self) -> bool {
        self.bits().no_rf() != 0
    }

    /// No bit lock.
    pub fn no_bitlock(&self) -> bool {
        self.bits().no_bitlock() != 0
    }

    /// Lockout.
    pub fn lockout(&self) -> bool {
        self.bits().lockout() != 0
    }

    /// Wait.
    pub fn wait(&self) -> bool {
        self.bits().wait() != 0
    }

    /// Retransmit.
    pub fn retransmit(&self) -> bool {
        self.bits().retransmit() != 0
    }

    /// FARM-B counter (0..=3).
    pub fn farm_b_counter(&self) -> u8 {
        self.bits().farm_b_counter()
    }

    /// Report value V(R), the next expected sequence number.
    pub fn report(&self) -> u8 {
        self.bits().report()
    }

    /// Set the control word type. Wider values are masked.
    pub fn set_control_word_type(&mut self, value: u8) {
        self.update(|bits| bits.set_control_word_type(value & 0x01));
    }

    /// Set the CLCW version number. Wider values are masked.
    pub fn set_version(&mut self, value: u8) {
        self.update(|bits| bits.set_version(value & 0x03));
    }

    /// Set the status field. Wider values are masked.
    pub fn set_status(&mut self, value: u8) {
        self.update(|bits| bits.set_status(value & 0x07));
    }

    /// Set COP in effect. Wider values are masked.
    pub fn set_cop_in_effect(&mut self, value: u8) {
        self.update(|bits| bits.set_cop_in_effect(value & 0x03));
    }

    /// Set the virtual channel id. Wider values are masked.
    pub fn set_vc_id(&mut self, value: u8) {
        self.update(|bits| bits.set_vc_id(value & 0x3F));
    }

    /// Set or clear no RF available.
    pub fn set_no_rf(&mut self, value: bool) {
        self.update(|bits| bits.set_no_rf(u8::from(value)));
    }

    /// Set or clear no bit lock.
    pub fn set_no_bitlock(&mut self, value: bool) {
        self.update(|bits| bits.set_no_bitlock(u8::from(value)));
    }

    /// Set or clear lockout.
    pub fn set_lockout(&mut self, value: bool) {
        self.update(|bits| bits.set_lockout(u8::from(value)));
    }

    /// Set or clear wait.
    pub fn set_wait(&mut self, value: bool) {
        self.update(|bits| bits.set_wait(u8::from(value)));
    }

    /// Set or clear retransmit.
    pub fn set_retransmit(&mut self, value: bool) {
        self.update(|bits| bits.set_retransmit(u8::from(value)));
    }

    /// Set the FARM-B counter. Wider values are masked.
    pub fn set_farm_b_counter(&mut self, value: u8) {
        self.update(|bits| bits.set_farm_b_counter(value & 0x03));
    }

    /// Set the report value V(R).
    pub fn set_report(&mut self, value: u8) {
        self.update(|bits| bits.set_report(value));
    }

    /// Advance the FARM-B counter modulo 4.
    pub fn increment_farm_b_counter(&mut self) {
        self.set_farm_b_counter(self.farm_b_counter().wrapping_add(1));
    }

    /// Clear lockout, wait and retransmit.
    pub(crate) fn clear_flags(&mut self) {
        self.set_lockout(false);
        self.set_wait(false);
        self.set_retransmit(false);
    }

    /// Derived protocol state. Lockout takes precedence over wait.
    pub fn farm_state(&self) -> FarmState {
        if self.lockout() {
            FarmState::Lockout
        } else if self.wait() {
            FarmState::Wait
        } else {
            FarmState::Open
        }
    }
}

impl From<[u8; 4]> for Clcw {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl From<Clcw> for [u8; 4] {
    fn from(clcw: Clcw) -> Self {
        clcw.0
    }
}

impl fmt::Display for Clcw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08X}", self.to_u32())
    }
}

/// Initialise a CLCW. Fails with `BadInput` when the word is absent.
pub fn init_clcw(clcw: Option<&mut Clcw>, vc_id: u8) -> Result<()> {
    let clcw = clcw.ok_or(Cop1Error::BadInput("CLCW is required"))?;
    clcw.init(vc_id);
    Ok(())
}

macro_rules! clcw_accessors {
    ($($get:ident / $set:ident => $method:ident, $setter:ident : $ty:ty;)*) => {
        $(
            #[doc = concat!("Read `", stringify!($method), "`, or the zero value when absent.")]
            pub fn $get(clcw: Option<&Clcw>) -> $ty {
                clcw.map_or(<$ty>::default(), Clcw::$method)
            }

            #[doc = concat!("Write `", stringify!($method), "`. No-op when absent.")]
            pub fn $set(clcw: Option<&mut Clcw>, value: $ty) {
                if let Some(clcw) = clcw {
                    clcw.$setter(value);
                }
            }
        )*
    };
}

clcw_accessors! {
    get_control_word_type / set_control_word_type => control_word_type, set_control_word_type: u8;
    get_version / set_version => version, set_version: u8;
    get_status / set_status => status, set_status: u8;
    get_cop_in_effect / set_cop_in_effect => cop_in_effect, set_cop_in_effect: u8;
    get_vc_id / set_vc_id => vc_id, set_vc_id: u8;
    get_no_rf / set_no_rf => no_rf, set_no_rf: bool;
    get_no_bitlock / set_no_bitlock => no_bitlock, set_no_bitlock: bool;
    get_lockout / set_lockout => lockout, set_lockout: bool;
    get_wait / set_wait => wait, set_wait: bool;
    get_retransmit / set_retransmit => retransmit, set_retransmit: bool;
    get_farm_b_counter / set_farm_b_counter => farm_b_counter, set_farm_b_counter: u8;
    get_report / set_report => report, set_report: u8;
}

/// Advance the FARM-B counter. No-op when absent.
pub fn increment_farm_b_counter(clcw: Option<&mut Clcw>) {
    if let Some(clcw) = clcw {
        clcw.increment_farm_b_counter();
    }
}
