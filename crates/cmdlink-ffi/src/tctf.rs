use cmdlink_tctf::NO_SEGHDR;

use crate::args;
use crate::error;
use crate::types::CmdlinkChannelService;

macro_rules! frame_getter {
    ($(#[$doc:meta])* $name:ident => $getter:path, $ty:ty, $sentinel:expr) => {
        $(#[$doc])*
        ///
        /// # Safety
        /// `frame` must be null or readable for `len` bytes.
        #[no_mangle]
        pub unsafe extern "C" fn $name(frame: *const u8, len: usize) -> $ty {
            crate::ffi_boundary($sentinel, || {
                error::clear_error_state();
                // SAFETY: Forwarded caller contract.
                let tf = unsafe { args::frame_arg(frame, len) };
                $getter(tf.as_ref())
            })
        }
    };
}

frame_getter!(
    /// Transfer frame version number, or 0 for a null frame.
    cmdlink_tf_get_version => cmdlink_tctf::get_version, u8, 0
);
frame_getter!(
    /// Bypass flag, or false for a null frame.
    cmdlink_tf_get_bypass_flag => cmdlink_tctf::get_bypass_flag, bool, false
);
frame_getter!(
    /// Control command flag, or false for a null frame.
    cmdlink_tf_get_ctl_cmd_flag => cmdlink_tctf::get_ctl_cmd_flag, bool, false
);
frame_getter!(
    /// Spacecraft id, or 0 for a null frame.
    cmdlink_tf_get_spacecraft_id => cmdlink_tctf::get_spacecraft_id, u16, 0
);
frame_getter!(
    /// Virtual channel id, or 0 for a null frame.
    cmdlink_tf_get_vc_id => cmdlink_tctf::get_vc_id, u8, 0
);
frame_getter!(
    /// Total frame length, or 0 for a null frame.
    cmdlink_tf_get_length => cmdlink_tctf::get_length, u16, 0
);
frame_getter!(
    /// Frame sequence number, or 0 for a null frame.
    cmdlink_tf_get_seq_num => cmdlink_tctf::get_seq_num, u8, 0
);
frame_getter!(
    /// Segment header sequence flags, or `CMDLINK_NO_SEGHDR`.
    cmdlink_tf_get_seg_hdr_seq_flags => cmdlink_tctf::get_seg_hdr_seq_flags, u8, NO_SEGHDR
);
frame_getter!(
    /// Segment header MAP id, or `CMDLINK_NO_SEGHDR`.
    cmdlink_tf_get_seg_hdr_map_id => cmdlink_tctf::get_seg_hdr_map_id, u8, NO_SEGHDR
);

/// Payload length for the channel, or 0 when either argument is null.
///
/// # Safety
/// `frame` must be null or readable for `len` bytes. `service` must be null
/// or point to a valid `CmdlinkChannelService`.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_tf_get_payload_length(
    frame: *const u8,
    len: usize,
    service: *const CmdlinkChannelService,
) -> u16 {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        // SAFETY: Forwarded caller contract.
        let tf = unsafe { args::frame_arg(frame, len) };
        // SAFETY: Forwarded caller contract.
        let service = unsafe { args::service_arg(service) };
        cmdlink_tctf::get_payload_length(tf.as_ref(), service.as_ref())
    })
}

/// Copy the payload into `dest`. Returns the number of octets copied.
///
/// # Safety
/// `dest` must be null or writable for `dest_len` bytes. `frame` must be null
/// or readable for `len` bytes. `service` must be null or point to a valid
/// `CmdlinkChannelService`.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_tf_copy_data(
    dest: *mut u8,
    dest_len: usize,
    frame: *const u8,
    len: usize,
    service: *const CmdlinkChannelService,
) -> u16 {
    crate::ffi_boundary(0, || {
        error::clear_error_state();
        // SAFETY: Forwarded caller contract.
        let dest = unsafe { args::bytes_mut_arg(dest, dest_len) };
        // SAFETY: Forwarded caller contract.
        let tf = unsafe { args::frame_arg(frame, len) };
        // SAFETY: Forwarded caller contract.
        let service = unsafe { args::service_arg(service) };
        cmdlink_tctf::copy_data(dest, tf.as_ref(), service.as_ref())
    })
}

/// Validate a frame against a channel service. False when either argument is null.
///
/// # Safety
/// `frame` must be null or readable for `len` bytes. `service` must be null
/// or point to a valid `CmdlinkChannelService`.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_tf_is_valid(
    frame: *const u8,
    len: usize,
    service: *const CmdlinkChannelService,
) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        // SAFETY: Forwarded caller contract.
        let tf = unsafe { args::frame_arg(frame, len) };
        // SAFETY: Forwarded caller contract.
        let service = unsafe { args::service_arg(service) };
        cmdlink_tctf::is_valid_tf(tf.as_ref(), service.as_ref())
    })
}
