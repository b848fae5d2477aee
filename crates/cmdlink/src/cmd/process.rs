use cmdlink_cop1::{Clcw, Cop1Error, Farm1, Farm1Config};
use cmdlink_tctf::{TransferFrame, MAX_FRAME_LENGTH};
use serde::Serialize;

use crate::cmd::ProcessArgs;
use crate::exit::{cop1_error, CliResult, FAILURE, SUCCESS};
use crate::input::load_frames;
use crate::output::{new_table, pretty_clcw, print_json, print_raw, ClcwSummary, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Status {
    Accepted,
    Rejected,
    Invalid,
}

#[derive(Debug, Serialize)]
struct FrameOutcome {
    index: usize,
    frame_type: Option<&'static str>,
    seq_num: Option<u8>,
    status: Status,
    bytes: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    clcw: String,
}

#[derive(Debug, Serialize)]
struct ProcessOutput {
    accepted: usize,
    rejected: usize,
    invalid: usize,
    frames: Vec<FrameOutcome>,
    clcw: ClcwSummary,
}

pub fn run(args: ProcessArgs, format: OutputFormat) -> CliResult<i32> {
    let config =
        Farm1Config::new(args.window).map_err(|err| cop1_error("invalid --window", err))?;
    let service = args.channel.to_service();
    let farm = Farm1::new(config);

    let mut clcw = Clcw::new(service.virtual_channel_id);
    clcw.set_report(args.report);
    clcw.set_lockout(args.lockout);

    let frames = load_frames(&args.input)?;
    tracing::debug!(
        frames = frames.len(),
        service = %service.service,
        scid = service.spacecraft_id,
        vc = service.virtual_channel_id,
        "processing frames"
    );

    let mut dest = [0u8; MAX_FRAME_LENGTH];
    let mut outcomes = Vec::with_capacity(frames.len());
    let mut delivered = Vec::new();

    for (index, bytes) in frames.iter().enumerate() {
        let tf = match TransferFrame::new(bytes) {
            Ok(tf) => tf,
            Err(err) => {
                outcomes.push(FrameOutcome {
                    index,
                    frame_type: None,
                    seq_num: None,
                    status: Status::Invalid,
                    bytes: 0,
                    payload: None,
                    detail: Some(err.to_string()),
                    clcw: clcw.to_string(),
                });
                continue;
            }
        };

        let result =
            farm.process_frame(Some(&mut dest), Some(&mut clcw), Some(&tf), Some(&service));
        let (status, bytes, detail) = match result {
            Ok(copied) => (Status::Accepted, copied, None),
            Err(err @ Cop1Error::Farm1(_)) => (Status::Rejected, 0, Some(err.to_string())),
            Err(err) => (Status::Invalid, 0, Some(err.to_string())),
        };

        let payload = (status == Status::Accepted && bytes > 0).then(|| {
            let data = &dest[..usize::from(bytes)];
            delivered.extend_from_slice(data);
            hex::encode_upper(data)
        });

        outcomes.push(FrameOutcome {
            index,
            frame_type: Some(tf.frame_type().name()),
            seq_num: Some(tf.seq_num()),
            status,
            bytes,
            payload,
            detail,
            clcw: clcw.to_string(),
        });
    }

    let count = |status: Status| outcomes.iter().filter(|o| o.status == status).count();
    let output = ProcessOutput {
        accepted: count(Status::Accepted),
        rejected: count(Status::Rejected),
        invalid: count(Status::Invalid),
        frames: outcomes,
        clcw: ClcwSummary::from(&clcw),
    };

    print_output(&output, &delivered, format);

    if args.fail_on_reject && output.rejected + output.invalid > 0 {
        return Ok(FAILURE);
    }
    Ok(SUCCESS)
}

fn print_output(output: &ProcessOutput, delivered: &[u8], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut table =
                new_table(vec!["#", "TYPE", "SEQ", "STATUS", "BYTES", "CLCW", "DETAIL"]);
            for o in &output.frames {
                table.add_row(vec![
                    o.index.to_string(),
                    o.frame_type.unwrap_or("-").to_string(),
                    o.seq_num.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    status_name(o.status).to_string(),
                    o.bytes.to_string(),
                    o.clcw.clone(),
                    o.detail.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
            println!("{}", pretty_clcw(&output.clcw));
        }
        OutputFormat::Pretty => {
            for o in &output.frames {
                let mut line = format!(
                    "#{} {} seq={} {} bytes={} clcw={}",
                    o.index,
                    o.frame_type.unwrap_or("-"),
                    o.seq_num.map_or_else(|| "-".to_string(), |s| s.to_string()),
                    status_name(o.status),
                    o.bytes,
                    o.clcw
                );
                if let Some(detail) = &o.detail {
                    line.push_str(&format!(" ({detail})"));
                }
                println!("{line}");
            }
            println!(
                "accepted={} rejected={} invalid={}",
                output.accepted, output.rejected, output.invalid
            );
            println!("{}", pretty_clcw(&output.clcw));
        }
        OutputFormat::Raw => print_raw(delivered),
    }
}

fn status_name(status: Status) -> &'static str {
    match status {
        Status::Accepted => "accepted",
        Status::Rejected => "rejected",
        Status::Invalid => "invalid",
    }
}
