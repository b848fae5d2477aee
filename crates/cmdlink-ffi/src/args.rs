use cmdlink_cop1::Clcw;
use cmdlink_tctf::{ChannelService, TransferFrame};

use crate::error;
use crate::types::{CmdlinkChannelService, CmdlinkClcw};

/// Convert an optional byte pointer + length into a slice.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
pub(crate) unsafe fn bytes_arg<'a>(data: *const u8, len: usize, name: &str) -> Option<&'a [u8]> {
    if len == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        let _ = error::set_bad_input(format!("{name} cannot be null when len > 0"));
        return None;
    }

    // SAFETY: Pointer and length are validated above and owned by caller for the call duration.
    Some(unsafe { std::slice::from_raw_parts(data, len) })
}

/// Convert an optional output buffer into a mutable slice. Null means absent.
///
/// # Safety
/// If `data` is non-null it must be writable for `len` bytes and not aliased.
pub(crate) unsafe fn bytes_mut_arg<'a>(data: *mut u8, len: usize) -> Option<&'a mut [u8]> {
    if data.is_null() {
        return None;
    }

    // SAFETY: Non-null pointer is writable for `len` bytes per the caller contract.
    Some(unsafe { std::slice::from_raw_parts_mut(data, len) })
}

/// Wrap a received frame. Null or unparseable frames are treated as absent.
///
/// # Safety
/// `data` must be null or readable for `len` bytes.
pub(crate) unsafe fn frame_arg<'a>(data: *const u8, len: usize) -> Option<TransferFrame<'a>> {
    if data.is_null() {
        let _ = error::set_bad_input("frame cannot be null");
        return None;
    }

    // SAFETY: Forwarded caller contract.
    let bytes = unsafe { bytes_arg(data, len, "frame") }?;
    match TransferFrame::new(bytes) {
        Ok(tf) => Some(tf),
        Err(err) => {
            let _ = error::set_bad_input(err.to_string());
            None
        }
    }
}

/// Read a channel service entry. Null or unknown service codes are treated as absent.
///
/// # Safety
/// `service` must be null or point to a valid `CmdlinkChannelService`.
pub(crate) unsafe fn service_arg(service: *const CmdlinkChannelService) -> Option<ChannelService> {
    if service.is_null() {
        return None;
    }

    // SAFETY: Pointer validity is guaranteed by the caller.
    let raw = unsafe { *service };
    let converted = raw.to_service();
    if converted.is_none() {
        error::set_error_message(format!("unknown service code {}", raw.service));
    }
    converted
}

/// Copy a CLCW out of caller memory.
///
/// # Safety
/// `clcw` must be null or point to a valid `CmdlinkClcw`.
pub(crate) unsafe fn clcw_arg(clcw: *const CmdlinkClcw) -> Option<Clcw> {
    if clcw.is_null() {
        return None;
    }

    // SAFETY: Pointer validity is guaranteed by the caller.
    Some(Clcw::from(unsafe { *clcw }))
}

/// Update a caller CLCW in place through `f`. Does nothing when `clcw` is null.
///
/// # Safety
/// `clcw` must be null or point to a valid, writable `CmdlinkClcw`.
pub(crate) unsafe fn with_clcw_mut<T>(
    clcw: *mut CmdlinkClcw,
    on_null: T,
    f: impl FnOnce(&mut Clcw) -> T,
) -> T {
    if clcw.is_null() {
        return on_null;
    }

    let raw = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *clcw }
    };
    let mut word = Clcw::from(*raw);
    let result = f(&mut word);
    *raw = CmdlinkClcw::from(word);
    result
}
