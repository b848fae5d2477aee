use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use cmdlink_tctf::{ChannelService, SequenceFlags, ServiceKind};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod clcw;
pub mod decode;
pub mod encode;
pub mod process;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the header fields of each frame.
    Decode(DecodeArgs),
    /// Run frames through FARM-1 for one channel.
    Process(ProcessArgs),
    /// Decode a packed 4-octet CLCW.
    Clcw(ClcwArgs),
    /// Build a transfer frame.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Process(args) => process::run(args, format),
        Command::Clcw(args) => clcw::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where frames come from.
#[derive(Args, Debug)]
pub struct FrameInput {
    /// Binary file of back-to-back frames ('-' for stdin).
    #[arg(conflicts_with = "hex")]
    pub file: Option<PathBuf>,
    /// One hex-encoded frame (repeatable).
    #[arg(long, value_name = "HEX")]
    pub hex: Vec<String>,
}

/// Static configuration of the channel frames are checked against.
#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Service type (mapp, vcp, mapa, vca, vcf, mcf).
    #[arg(long, default_value = "vcp")]
    pub service: ServiceKind,
    /// Spacecraft id (10 bits).
    #[arg(long, value_parser = clap::value_parser!(u16).range(0..1024))]
    pub scid: u16,
    /// Virtual channel id (6 bits).
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..64))]
    pub vc: u8,
    /// MAP id (6 bits). Implies a segment header.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..64))]
    pub map: Option<u8>,
    /// Frames carry a segment header.
    #[arg(long)]
    pub segmented: bool,
    /// Frames end with 2 octets of frame error control.
    #[arg(long)]
    pub fec: bool,
}

impl ChannelArgs {
    pub fn to_service(&self) -> ChannelService {
        let mut service = ChannelService::new(self.service, self.scid, self.vc);
        if let Some(map_id) = self.map {
            service = service.with_map_id(map_id);
        }
        if self.segmented {
            service = service.with_segment_header(true);
        }
        service.with_frame_error_control(self.fec)
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: FrameInput,
    /// Frames carry a segment header.
    #[arg(long)]
    pub segmented: bool,
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub input: FrameInput,
    #[command(flatten)]
    pub channel: ChannelArgs,
    /// Initial V(R).
    #[arg(long, default_value = "0")]
    pub report: u8,
    /// FARM-1 window width W (even).
    #[arg(long, default_value_t = cmdlink_cop1::DEFAULT_WINDOW_WIDTH)]
    pub window: u8,
    /// Start in lockout.
    #[arg(long)]
    pub lockout: bool,
    /// Exit 1 if any frame was rejected.
    #[arg(long)]
    pub fail_on_reject: bool,
}

#[derive(Args, Debug)]
pub struct ClcwArgs {
    /// Packed word as 8 hex digits, e.g. 01080000.
    pub word: String,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FrameKind {
    Ad,
    Bd,
    Bc,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SeqFlagsArg {
    Continuing,
    First,
    Last,
    Unsegmented,
}

impl From<SeqFlagsArg> for SequenceFlags {
    fn from(flags: SeqFlagsArg) -> Self {
        match flags {
            SeqFlagsArg::Continuing => SequenceFlags::Continuing,
            SeqFlagsArg::First => SequenceFlags::First,
            SeqFlagsArg::Last => SequenceFlags::Last,
            SeqFlagsArg::Unsegmented => SequenceFlags::Unsegmented,
        }
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Frame type.
    #[arg(long = "type", value_name = "TYPE", default_value = "ad")]
    pub kind: FrameKind,
    /// Spacecraft id. Range is checked by the encoder.
    #[arg(long)]
    pub scid: u16,
    /// Virtual channel id. Range is checked by the encoder.
    #[arg(long)]
    pub vc: u8,
    /// Frame sequence number N(S). Only meaningful for AD frames.
    #[arg(long, default_value = "0")]
    pub seq: u8,
    /// Add a segment header with this MAP id.
    #[arg(long)]
    pub map: Option<u8>,
    /// Segment header sequence flags. Ignored without --map.
    #[arg(long, default_value = "unsegmented")]
    pub seq_flags: SeqFlagsArg,
    /// Data field as hex.
    #[arg(long, conflicts_with_all = ["unlock", "set_vr"])]
    pub data: Option<String>,
    /// BC frame carrying the Unlock directive.
    #[arg(long, conflicts_with_all = ["data", "set_vr"])]
    pub unlock: bool,
    /// BC frame carrying Set V(R) to this value.
    #[arg(long, value_name = "VR", conflicts_with_all = ["data", "unlock"])]
    pub set_vr: Option<u8>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
