use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use cmdlink_cop1::Clcw;
use cmdlink_tctf::TransferFrame;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Header fields of one frame as printed by `decode`.
#[derive(Debug, Serialize)]
pub struct FrameSummary {
    pub index: usize,
    pub version: u8,
    pub bypass: bool,
    pub control_command: bool,
    pub frame_type: &'static str,
    pub spacecraft_id: u16,
    pub vc_id: u8,
    pub length: u16,
    pub seq_num: u8,
    pub seq_flags: Option<u8>,
    pub map_id: Option<u8>,
    pub data: String,
}

impl FrameSummary {
    pub fn new(index: usize, tf: &TransferFrame<'_>, segmented: bool) -> Self {
        let (seq_flags, map_id) = if segmented {
            (tf.seg_hdr_seq_flags(), tf.seg_hdr_map_id())
        } else {
            (None, None)
        };
        Self {
            index,
            version: tf.version(),
            bypass: tf.bypass_flag(),
            control_command: tf.ctl_cmd_flag(),
            frame_type: tf.frame_type().name(),
            spacecraft_id: tf.spacecraft_id(),
            vc_id: tf.vc_id(),
            length: tf.length(),
            seq_num: tf.seq_num(),
            seq_flags,
            map_id,
            data: hex::encode_upper(tf.data_field()),
        }
    }
}

/// Every CLCW field, plus the packed word.
#[derive(Debug, Serialize)]
pub struct ClcwSummary {
    pub word: String,
    pub state: &'static str,
    pub control_word_type: u8,
    pub version: u8,
    pub status: u8,
    pub cop_in_effect: u8,
    pub vc_id: u8,
    pub no_rf: bool,
    pub no_bitlock: bool,
    pub lockout: bool,
    pub wait: bool,
    pub retransmit: bool,
    pub farm_b_counter: u8,
    pub report: u8,
}

impl From<&Clcw> for ClcwSummary {
    fn from(clcw: &Clcw) -> Self {
        Self {
            word: clcw.to_string(),
            state: clcw.farm_state().name(),
            control_word_type: clcw.control_word_type(),
            version: clcw.version(),
            status: clcw.status(),
            cop_in_effect: clcw.cop_in_effect(),
            vc_id: clcw.vc_id(),
            no_rf: clcw.no_rf(),
            no_bitlock: clcw.no_bitlock(),
            lockout: clcw.lockout(),
            wait: clcw.wait(),
            retransmit: clcw.retransmit(),
            farm_b_counter: clcw.farm_b_counter(),
            report: clcw.report(),
        }
    }
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn print_clcw(clcw: &Clcw, format: OutputFormat) {
    let summary = ClcwSummary::from(clcw);
    match format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            let mut table = new_table(vec!["FIELD", "VALUE"]);
            for (field, value) in clcw_rows(&summary) {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", pretty_clcw(&summary)),
        OutputFormat::Raw => print_raw(clcw.as_bytes()),
    }
}

pub fn pretty_clcw(summary: &ClcwSummary) -> String {
    format!(
        "clcw={} state={} vc={} report={} lockout={} wait={} retransmit={} farm_b={}",
        summary.word,
        summary.state,
        summary.vc_id,
        summary.report,
        u8::from(summary.lockout),
        u8::from(summary.wait),
        u8::from(summary.retransmit),
        summary.farm_b_counter
    )
}

fn clcw_rows(summary: &ClcwSummary) -> Vec<(&'static str, String)> {
    vec![
        ("word", summary.word.clone()),
        ("state", summary.state.to_string()),
        ("control word type", summary.control_word_type.to_string()),
        ("version", summary.version.to_string()),
        ("status", summary.status.to_string()),
        ("cop in effect", summary.cop_in_effect.to_string()),
        ("vc id", summary.vc_id.to_string()),
        ("no rf", summary.no_rf.to_string()),
        ("no bitlock", summary.no_bitlock.to_string()),
        ("lockout", summary.lockout.to_string()),
        ("wait", summary.wait.to_string()),
        ("retransmit", summary.retransmit.to_string()),
        ("farm-b counter", summary.farm_b_counter.to_string()),
        ("report V(R)", summary.report.to_string()),
    ]
}

pub fn optional(value: Option<u8>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
