use cmdlink_cop1::Clcw;

use crate::args;
use crate::error;
use crate::types::{CmdlinkChannelService, CmdlinkClcw, CmdlinkResult};

/// Initialise a CLCW for virtual channel `vc_id`.
///
/// # Safety
/// `clcw` must be null or point to a valid, writable `CmdlinkClcw`.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_clcw_init(clcw: *mut CmdlinkClcw, vc_id: u8) -> CmdlinkResult {
    crate::ffi_boundary(CmdlinkResult::Internal, || {
        error::clear_error_state();
        if clcw.is_null() {
            return error::set_bad_input("clcw cannot be null");
        }

        // SAFETY: Non-null, and valid per the caller contract.
        unsafe {
            args::with_clcw_mut(clcw, CmdlinkResult::Internal, |word| {
                word.init(vc_id);
                CmdlinkResult::Ok
            })
        }
    })
}

macro_rules! clcw_field {
    ($get:ident, $set:ident => $getter:ident, $setter:ident, u8) => {
        #[doc = concat!("Read `", stringify!($getter), "`, or 0 for a null CLCW.")]
        ///
        /// # Safety
        /// `clcw` must be null or point to a valid `CmdlinkClcw`.
        #[no_mangle]
        pub unsafe extern "C" fn $get(clcw: *const CmdlinkClcw) -> u8 {
            crate::ffi_boundary(0, || {
                // SAFETY: Forwarded caller contract.
                let word = unsafe { args::clcw_arg(clcw) };
                word.as_ref().map_or(0, Clcw::$getter)
            })
        }

        #[doc = concat!("Write `", stringify!($getter), "`. No-op for a null CLCW.")]
        ///
        /// # Safety
        /// `clcw` must be null or point to a valid, writable `CmdlinkClcw`.
        #[no_mangle]
        pub unsafe extern "C" fn $set(clcw: *mut CmdlinkClcw, value: u8) {
            crate::ffi_boundary((), || {
                // SAFETY: Forwarded caller contract.
                unsafe { args::with_clcw_mut(clcw, (), |word| word.$setter(value)) }
            })
        }
    };
    ($get:ident, $set:ident => $getter:ident, $setter:ident, flag) => {
        #[doc = concat!("Read `", stringify!($getter), "` as 0 or 1, or 0 for a null CLCW.")]
        ///
        /// # Safety
        /// `clcw` must be null or point to a valid `CmdlinkClcw`.
        #[no_mangle]
        pub unsafe extern "C" fn $get(clcw: *const CmdlinkClcw) -> u8 {
            crate::ffi_boundary(0, || {
                // SAFETY: Forwarded caller contract.
                let word = unsafe { args::clcw_arg(clcw) };
                word.as_ref().map_or(0, |word| u8::from(word.$getter()))
            })
        }

        #[doc = concat!("Write `", stringify!($getter), "` (any non-zero value sets it). No-op for a null CLCW.")]
        ///
        /// # Safety
        /// `clcw` must be null or point to a valid, writable `CmdlinkClcw`.
        #[no_mangle]
        pub unsafe extern "C" fn $set(clcw: *mut CmdlinkClcw, value: u8) {
            crate::ffi_boundary((), || {
                // SAFETY: Forwarded caller contract.
                unsafe { args::with_clcw_mut(clcw, (), |word| word.$setter(value != 0)) }
            })
        }
    };
}

clcw_field!(cmdlink_clcw_get_ctrl_word_type, cmdlink_clcw_set_ctrl_word_type => control_word_type, set_control_word_type, u8);
clcw_field!(cmdlink_clcw_get_version, cmdlink_clcw_set_version => version, set_version, u8);
clcw_field!(cmdlink_clcw_get_status, cmdlink_clcw_set_status => status, set_status, u8);
clcw_field!(cmdlink_clcw_get_cop_in_effect, cmdlink_clcw_set_cop_in_effect => cop_in_effect, set_cop_in_effect, u8);
clcw_field!(cmdlink_clcw_get_vc_id, cmdlink_clcw_set_vc_id => vc_id, set_vc_id, u8);
clcw_field!(cmdlink_clcw_get_no_rf, cmdlink_clcw_set_no_rf => no_rf, set_no_rf, flag);
clcw_field!(cmdlink_clcw_get_no_bitlock, cmdlink_clcw_set_no_bitlock => no_bitlock, set_no_bitlock, flag);
clcw_field!(cmdlink_clcw_get_lockout, cmdlink_clcw_set_lockout => lockout, set_lockout, flag);
clcw_field!(cmdlink_clcw_get_wait, cmdlink_clcw_set_wait => wait, set_wait, flag);
clcw_field!(cmdlink_clcw_get_retransmit, cmdlink_clcw_set_retransmit => retransmit, set_retransmit, flag);
clcw_field!(cmdlink_clcw_get_farm_b_counter, cmdlink_clcw_set_farm_b_counter => farm_b_counter, set_farm_b_counter, u8);
clcw_field!(cmdlink_clcw_get_report, cmdlink_clcw_set_report => report, set_report, u8);

/// Advance the FARM-B counter modulo 4. No-op for a null CLCW.
///
/// # Safety
/// `clcw` must be null or point to a valid, writable `CmdlinkClcw`.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_clcw_increment_farm_b_counter(clcw: *mut CmdlinkClcw) {
    crate::ffi_boundary((), || {
        // SAFETY: Forwarded caller contract.
        unsafe { args::with_clcw_mut(clcw, (), Clcw::increment_farm_b_counter) }
    })
}

/// Run one received frame through FARM-1 with the default window.
///
/// Returns the number of payload octets written to `dest` (>= 0), or a
/// negative `CmdlinkResult`. The CLCW is updated in place, including on
/// FARM-1 rejections.
///
/// # Safety
/// `dest` must be null or writable for `dest_len` bytes. `clcw` must be null
/// or point to a valid, writable `CmdlinkClcw`. `frame` must be null or
/// readable for `frame_len` bytes. `service` must be null or point to a valid
/// `CmdlinkChannelService`. None of the buffers may overlap.
#[no_mangle]
pub unsafe extern "C" fn cmdlink_process_frame(
    dest: *mut u8,
    dest_len: usize,
    clcw: *mut CmdlinkClcw,
    frame: *const u8,
    frame_len: usize,
    service: *const CmdlinkChannelService,
) -> i32 {
    crate::ffi_boundary(CmdlinkResult::Internal as i32, || {
        error::clear_error_state();
        if clcw.is_null() {
            return error::set_bad_input("clcw cannot be null") as i32;
        }

        // SAFETY: Forwarded caller contract.
        let dest = unsafe { args::bytes_mut_arg(dest, dest_len) };
        // SAFETY: Forwarded caller contract.
        let tf = unsafe { args::frame_arg(frame, frame_len) };
        // SAFETY: Forwarded caller contract.
        let service = unsafe { args::service_arg(service) };

        // SAFETY: Non-null, and valid per the caller contract.
        let result = unsafe {
            args::with_clcw_mut(clcw, Ok(0), |word| {
                cmdlink_cop1::process_frame(dest, Some(word), tf.as_ref(), service.as_ref())
            })
        };

        match result {
            Ok(copied) => i32::from(copied),
            Err(err) => error::map_cop1_error(&err) as i32,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VCID: u8 = 3;

    fn service() -> CmdlinkChannelService {
        CmdlinkChannelService {
            service: 1,
            spacecraft_id: 0x42,
            virtual_channel_id: VCID,
            ..CmdlinkChannelService::default()
        }
    }

    fn ad_frame(seq: u8) -> [u8; 8] {
        [0x00, 0x42, VCID << 2, 0x07, seq, 0xAA, 0xBB, 0xCC]
    }

    fn new_clcw() -> CmdlinkClcw {
        let mut raw = CmdlinkClcw::default();
        // SAFETY: `raw` is a live local.
        assert_eq!(unsafe { cmdlink_clcw_init(&mut raw, VCID) }, CmdlinkResult::Ok);
        raw
    }

    #[test]
    fn init_packs_word() {
        let mut raw = CmdlinkClcw {
            status: 0xFE,
            channel: 0x03,
            flags: 0xFF,
            report: 0xFF,
        };
        // SAFETY: `raw` is a live local.
        assert_eq!(unsafe { cmdlink_clcw_init(&mut raw, 0xFF) }, CmdlinkResult::Ok);
        assert_eq!(
            raw,
            CmdlinkClcw {
                status: 0x01,
                channel: 0xFC,
                flags: 0,
                report: 0
            }
        );
        // SAFETY: Null is part of the contract.
        assert_eq!(
            unsafe { cmdlink_clcw_init(std::ptr::null_mut(), 0) },
            CmdlinkResult::BadInput
        );
    }

    #[test]
    fn field_accessors() {
        let mut raw = new_clcw();
        // SAFETY: `raw` is a live local.
        unsafe {
            cmdlink_clcw_set_lockout(&mut raw, 1);
            cmdlink_clcw_set_report(&mut raw, 0x99);
            cmdlink_clcw_increment_farm_b_counter(&mut raw);
            assert_eq!(cmdlink_clcw_get_lockout(&raw), 1);
            assert_eq!(cmdlink_clcw_get_wait(&raw), 0);
            assert_eq!(cmdlink_clcw_get_report(&raw), 0x99);
            assert_eq!(cmdlink_clcw_get_farm_b_counter(&raw), 1);
            assert_eq!(cmdlink_clcw_get_vc_id(&raw), VCID);
            assert_eq!(cmdlink_clcw_get_cop_in_effect(&raw), 1);
        }
        assert_eq!(raw.flags, 0x22);
    }

    #[test]
    fn null_clcw_accessors() {
        // SAFETY: Null is part of the contract.
        unsafe {
            assert_eq!(cmdlink_clcw_get_report(std::ptr::null()), 0);
            assert_eq!(cmdlink_clcw_get_lockout(std::ptr::null()), 0);
            cmdlink_clcw_set_report(std::ptr::null_mut(), 1);
            cmdlink_clcw_increment_farm_b_counter(std::ptr::null_mut());
        }
    }

    #[test]
    fn process_accepts_expected_frame() {
        let mut raw = new_clcw();
        let frame = ad_frame(0);
        let svc = service();
        let mut dest = [0u8; 1024];

        // SAFETY: All pointers refer to live locals of the given lengths.
        let rc = unsafe {
            cmdlink_process_frame(
                dest.as_mut_ptr(),
                dest.len(),
                &mut raw,
                frame.as_ptr(),
                frame.len(),
                &svc,
            )
        };
        assert_eq!(rc, 3);
        assert_eq!(&dest[..3], &[0xAA, 0xBB, 0xCC]);
        assert_eq!(raw.report, 1);
    }

    #[test]
    fn process_rejection_updates_clcw() {
        let mut raw = new_clcw();
        let frame = ad_frame(64);
        let svc = service();
        let mut dest = [0u8; 1024];

        // SAFETY: All pointers refer to live locals of the given lengths.
        let rc = unsafe {
            cmdlink_process_frame(
                dest.as_mut_ptr(),
                dest.len(),
                &mut raw,
                frame.as_ptr(),
                frame.len(),
                &svc,
            )
        };
        assert_eq!(rc, CmdlinkResult::Farm1Error as i32);
        assert_eq!(raw.flags & 0x20, 0x20);
        assert!(crate::tests::last_error_text().contains("lockout"));
    }

    #[test]
    fn process_null_arguments() {
        let mut raw = new_clcw();
        let before = raw;
        let frame = ad_frame(0);
        let svc = service();

        // SAFETY: Null pointers are part of the contract; others are live locals.
        unsafe {
            assert_eq!(
                cmdlink_process_frame(
                    std::ptr::null_mut(),
                    0,
                    std::ptr::null_mut(),
                    frame.as_ptr(),
                    frame.len(),
                    &svc
                ),
                CmdlinkResult::BadInput as i32
            );
            assert_eq!(
                cmdlink_process_frame(
                    std::ptr::null_mut(),
                    0,
                    &mut raw,
                    std::ptr::null(),
                    0,
                    &svc
                ),
                CmdlinkResult::BadInput as i32
            );
            assert_eq!(raw, before);
            assert_eq!(
                cmdlink_process_frame(
                    std::ptr::null_mut(),
                    0,
                    &mut raw,
                    frame.as_ptr(),
                    frame.len(),
                    std::ptr::null()
                ),
                CmdlinkResult::InvalidTransferFrame as i32
            );
            assert_eq!(raw, before);
        }
    }
}
