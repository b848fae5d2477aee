use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use cmdlink_cop1::Cop1Error;

use crate::types::CmdlinkResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let sanitized = message.into().replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_bad_input(message: impl Into<String>) -> CmdlinkResult {
    set_error_message(message);
    CmdlinkResult::BadInput
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_cop1_error(err: &Cop1Error) -> CmdlinkResult {
    set_error_message(err.to_string());
    match err {
        Cop1Error::BadInput(_) => CmdlinkResult::BadInput,
        Cop1Error::InvalidTransferFrame => CmdlinkResult::InvalidTransferFrame,
        Cop1Error::Farm1(_) => CmdlinkResult::Farm1Error,
        Cop1Error::InvalidConfig(_) => CmdlinkResult::BadInput,
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}
