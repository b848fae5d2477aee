//! FARM-1 frame acceptance and reporting.
//!
//! The protocol state lives entirely in the channel's [`Clcw`]: the lockout,
//! wait and retransmit flags plus V(R) in the report octet. The engine holds
//! only static configuration and the event sink, so one engine can serve any
//! number of channels. Callers serialise calls per channel.

use cmdlink_tctf::{ChannelService, TransferFrame};

use crate::clcw::Clcw;
use crate::command::ControlCommand;
use crate::config::{Farm1Config, WindowPosition};
use crate::error::{Cop1Error, Rejection, Result};
use crate::events::{EventSink, Farm1Event, TracingEvents};

/// FARM-1 engine.
#[derive(Debug, Clone, Default)]
pub struct Farm1<E = TracingEvents> {
    config: Farm1Config,
    events: E,
}

impl Farm1<TracingEvents> {
    /// Engine that logs events through `tracing`.
    pub fn new(config: Farm1Config) -> Self {
        Self::with_events(config, TracingEvents)
    }
}

impl<E: EventSink> Farm1<E> {
    /// Engine that reports events to `events`.
    pub fn with_events(config: Farm1Config, events: E) -> Self {
        Self { config, events }
    }

    /// Window configuration.
    pub fn config(&self) -> &Farm1Config {
        &self.config
    }

    /// Event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// Run one received frame through FARM-1.
    ///
    /// On success returns the number of payload octets written to `dest`
    /// (0 for control commands). The CLCW is updated in place.
    ///
    /// A missing frame or CLCW fails with `BadInput` before anything is
    /// touched. A frame that does not match `service` (or a missing
    /// `service`) fails with `InvalidTransferFrame`, also without changes.
    /// An in-sequence Type-AD frame with no room in `dest` advances V(R)
    /// before failing with `BadInput`.
    pub fn process_frame(
        &self,
        dest: Option<&mut [u8]>,
        clcw: Option<&mut Clcw>,
        tf: Option<&TransferFrame<'_>>,
        service: Option<&ChannelService>,
    ) -> Result<u16> {
        let (Some(clcw), Some(tf)) = (clcw, tf) else {
            return Err(Cop1Error::BadInput("transfer frame and CLCW are required"));
        };

        let Some(service) = service.filter(|service| tf.is_valid(service)) else {
            self.events.emit(
                clcw.vc_id(),
                &Farm1Event::InvalidFrame {
                    spacecraft_id: tf.spacecraft_id(),
                    vc_id: tf.vc_id(),
                },
            );
            return Err(Cop1Error::InvalidTransferFrame);
        };

        if tf.bypass_flag() {
            self.bypass(dest, clcw, tf, service)
        } else {
            self.accept(dest, clcw, tf, service)
        }
    }

    fn bypass(
        &self,
        dest: Option<&mut [u8]>,
        clcw: &mut Clcw,
        tf: &TransferFrame<'_>,
        service: &ChannelService,
    ) -> Result<u16> {
        if !tf.ctl_cmd_flag() {
            let copied = dest.map_or(0, |dest| tf.copy_data(dest, service));
            clcw.increment_farm_b_counter();
            self.events.emit(
                clcw.vc_id(),
                &Farm1Event::BypassAccepted {
                    bytes: copied,
                    farm_b_counter: clcw.farm_b_counter(),
                },
            );
            return Ok(copied);
        }

        let command = ControlCommand::parse(tf.data_field())
            .map_err(|rejection| self.reject(clcw, rejection))?;

        match command {
            ControlCommand::Unlock => {
                clcw.clear_flags();
                clcw.increment_farm_b_counter();
                self.events.emit(
                    clcw.vc_id(),
                    &Farm1Event::Unlocked {
                        farm_b_counter: clcw.farm_b_counter(),
                    },
                );
                Ok(0)
            }
            ControlCommand::SetVr(_) if clcw.lockout() => {
                clcw.set_lockout(true);
                clcw.set_retransmit(true);
                clcw.increment_farm_b_counter();
                Err(self.reject(clcw, Rejection::SetVrWhileLocked))
            }
            ControlCommand::SetVr(report) => {
                clcw.set_report(report);
                clcw.clear_flags();
                clcw.increment_farm_b_counter();
                self.events
                    .emit(clcw.vc_id(), &Farm1Event::VrSet { report });
                Ok(0)
            }
        }
    }

    fn accept(
        &self,
        dest: Option<&mut [u8]>,
        clcw: &mut Clcw,
        tf: &TransferFrame<'_>,
        service: &ChannelService,
    ) -> Result<u16> {
        if clcw.lockout() {
            return Err(self.reject(clcw, Rejection::Lockout));
        }

        let seq = tf.seq_num();
        let expected = clcw.report();

        match self.config.classify(seq, expected) {
            WindowPosition::Expected => {
                clcw.set_report(expected.wrapping_add(1));
                clcw.set_wait(false);
                clcw.set_retransmit(false);

                let payload_len = usize::from(tf.payload_length(service));
                let Some(dest) = dest.filter(|dest| dest.len() >= payload_len) else {
                    return Err(Cop1Error::BadInput(
                        "destination buffer missing or too small",
                    ));
                };

                let copied = tf.copy_data(dest, service);
                self.events.emit(
                    clcw.vc_id(),
                    &Farm1Event::FrameAccepted {
                        seq,
                        report: clcw.report(),
                        bytes: copied,
                    },
                );
                Ok(copied)
            }
            WindowPosition::Positive => {
                clcw.set_retransmit(true);
                Err(self.reject(clcw, Rejection::PositiveWindow { seq, expected }))
            }
            WindowPosition::Negative => {
                Err(self.reject(clcw, Rejection::NegativeWindow { seq, expected }))
            }
            WindowPosition::Lockout => {
                clcw.set_lockout(true);
                Err(self.reject(clcw, Rejection::LockoutEntered { seq, expected }))
            }
        }
    }

    fn reject(&self, clcw: &Clcw, rejection: Rejection) -> Cop1Error {
        self.events
            .emit(clcw.vc_id(), &Farm1Event::Rejected(rejection));
        Cop1Error::Farm1(rejection)
    }
}

/// Run one frame through FARM-1 with the default window and `tracing` events.
pub fn process_frame(
    dest: Option<&mut [u8]>,
    clcw: Option<&mut Clcw>,
    tf: Option<&TransferFrame<'_>>,
    service: Option<&ChannelService>,
) -> Result<u16> {
    Farm1::new(Farm1Config::default()).process_frame(dest, clcw, tf, service)
}
