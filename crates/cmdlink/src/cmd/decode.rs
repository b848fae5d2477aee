use cmdlink_tctf::TransferFrame;

use crate::cmd::DecodeArgs;
use crate::exit::{tctf_error, CliResult, SUCCESS};
use crate::input::load_frames;
use crate::output::{new_table, optional, print_json, print_raw, FrameSummary, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let frames = load_frames(&args.input)?;

    let mut summaries = Vec::with_capacity(frames.len());
    for (index, bytes) in frames.iter().enumerate() {
        let tf = TransferFrame::new(bytes)
            .map_err(|err| tctf_error(&format!("frame {index}"), err))?;
        if matches!(format, OutputFormat::Raw) {
            print_raw(tf.data_field());
            continue;
        }
        summaries.push(FrameSummary::new(index, &tf, args.segmented));
    }

    match format {
        OutputFormat::Json => summaries.iter().for_each(print_json),
        OutputFormat::Table => {
            let mut table = new_table(vec![
                "#", "TYPE", "SCID", "VC", "SEQ", "LEN", "FLAGS", "MAP", "DATA",
            ]);
            for s in &summaries {
                table.add_row(vec![
                    s.index.to_string(),
                    s.frame_type.to_string(),
                    format!("0x{:03X}", s.spacecraft_id),
                    s.vc_id.to_string(),
                    s.seq_num.to_string(),
                    s.length.to_string(),
                    optional(s.seq_flags),
                    optional(s.map_id),
                    s.data.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for s in &summaries {
                println!(
                    "#{} {} scid=0x{:03X} vc={} seq={} len={} map={} data={}",
                    s.index,
                    s.frame_type,
                    s.spacecraft_id,
                    s.vc_id,
                    s.seq_num,
                    s.length,
                    optional(s.map_id),
                    s.data
                );
            }
        }
        OutputFormat::Raw => {}
    }

    Ok(SUCCESS)
}
