use bytes::BytesMut;
use cmdlink_cop1::ControlCommand;
use cmdlink_tctf::{encode_frame, FrameHeader, FrameWriter, SequenceFlags};
use serde::Serialize;

use crate::cmd::{EncodeArgs, FrameKind};
use crate::exit::{hex_error, tctf_error, CliError, CliResult, SUCCESS, USAGE};
use crate::input::parse_hex;
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    frame_type: &'static str,
    length: usize,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let header = build_header(&args);
    let payload = resolve_payload(&args)?;

    if matches!(format, OutputFormat::Raw) {
        let mut writer = FrameWriter::new(std::io::stdout().lock());
        writer
            .send(&header, &payload)
            .map_err(|err| tctf_error("encode failed", err))?;
        return Ok(SUCCESS);
    }

    let mut buf = BytesMut::new();
    encode_frame(&header, &payload, &mut buf).map_err(|err| tctf_error("encode failed", err))?;

    let out = EncodeOutput {
        frame_type: kind_name(args.kind),
        length: buf.len(),
        frame: hex::encode_upper(&buf),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => {
            println!("{}", out.frame)
        }
    }

    Ok(SUCCESS)
}

fn build_header(args: &EncodeArgs) -> FrameHeader {
    let header = match args.kind {
        FrameKind::Ad => FrameHeader::ad(args.scid, args.vc, args.seq),
        FrameKind::Bd => FrameHeader::bd(args.scid, args.vc),
        FrameKind::Bc => FrameHeader::bc(args.scid, args.vc),
    };
    match args.map {
        Some(map_id) => header.with_segment(SequenceFlags::from(args.seq_flags), map_id),
        None => header,
    }
}

fn resolve_payload(args: &EncodeArgs) -> CliResult<Vec<u8>> {
    let command = if args.unlock {
        Some(ControlCommand::Unlock)
    } else {
        args.set_vr.map(ControlCommand::SetVr)
    };

    match (command, args.kind) {
        (Some(command), FrameKind::Bc) => Ok(command.to_bytes()),
        (Some(command), _) => Err(CliError::new(
            USAGE,
            format!("{} is only valid with --type bc", command.name()),
        )),
        (None, _) => match &args.data {
            Some(text) => parse_hex(text).map_err(|err| hex_error("invalid --data", err)),
            None => Ok(Vec::new()),
        },
    }
}

fn kind_name(kind: FrameKind) -> &'static str {
    match kind {
        FrameKind::Ad => "AD",
        FrameKind::Bd => "BD",
        FrameKind::Bc => "BC",
    }
}
