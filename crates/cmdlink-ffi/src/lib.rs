//! cmdlink-ffi: C-ABI exports for the TC frame decoder and FARM-1 engine.

mod args;
mod cop1;
mod error;
mod tctf;
mod types;

use std::panic::AssertUnwindSafe;

pub use cop1::{
    cmdlink_clcw_get_cop_in_effect, cmdlink_clcw_get_ctrl_word_type,
    cmdlink_clcw_get_farm_b_counter, cmdlink_clcw_get_lockout, cmdlink_clcw_get_no_bitlock,
    cmdlink_clcw_get_no_rf, cmdlink_clcw_get_report, cmdlink_clcw_get_retransmit,
    cmdlink_clcw_get_status, cmdlink_clcw_get_vc_id, cmdlink_clcw_get_version,
    cmdlink_clcw_get_wait, cmdlink_clcw_increment_farm_b_counter, cmdlink_clcw_init,
    cmdlink_clcw_set_cop_in_effect, cmdlink_clcw_set_ctrl_word_type,
    cmdlink_clcw_set_farm_b_counter, cmdlink_clcw_set_lockout, cmdlink_clcw_set_no_bitlock,
    cmdlink_clcw_set_no_rf, cmdlink_clcw_set_report, cmdlink_clcw_set_retransmit,
    cmdlink_clcw_set_status, cmdlink_clcw_set_vc_id, cmdlink_clcw_set_version,
    cmdlink_clcw_set_wait, cmdlink_process_frame,
};
pub use tctf::{
    cmdlink_tf_copy_data, cmdlink_tf_get_bypass_flag, cmdlink_tf_get_ctl_cmd_flag,
    cmdlink_tf_get_length, cmdlink_tf_get_payload_length, cmdlink_tf_get_seg_hdr_map_id,
    cmdlink_tf_get_seg_hdr_seq_flags, cmdlink_tf_get_seq_num, cmdlink_tf_get_spacecraft_id,
    cmdlink_tf_get_vc_id, cmdlink_tf_get_version, cmdlink_tf_is_valid,
};
pub use types::{
    CmdlinkChannelService, CmdlinkClcw, CmdlinkResult, CMDLINK_ERR_BAD_INPUT, CMDLINK_ERR_FARM1,
    CMDLINK_ERR_INTERNAL, CMDLINK_ERR_INVALID_TF, CMDLINK_MAX_FRAME_LENGTH, CMDLINK_NO_SEGHDR,
    CMDLINK_OK,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

#[no_mangle]
pub extern "C" fn cmdlink_init() -> CmdlinkResult {
    ffi_boundary(CmdlinkResult::Internal, || {
        error::clear_error_state();
        CmdlinkResult::Ok
    })
}

#[no_mangle]
pub extern "C" fn cmdlink_cleanup() {
    ffi_boundary((), || {
        error::clear_error_state();
    });
}

/// Message for the most recent failure on this thread, or an empty string.
///
/// The pointer stays valid until the next `cmdlink_*` call on the same thread.
#[no_mangle]
pub extern "C" fn cmdlink_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}
