// src/ffi/mod.rs
// ============================================================================
// C ABI for the mobile shell.
//
// Memory ownership: every `*mut c_char` handed out by this library must be
// released with `inspection_free_string`, exactly once. Input strings are
// borrowed for the duration of the call only.
//
// Status-returning functions yield an `ErrorCode` (0 on success). On failure
// the full error is available as JSON through `inspection_last_error`.
// ============================================================================

use serde::Serialize;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};

use crate::ffi::error::{clear_last_error, set_last_error, ErrorCode, FFIError};

pub mod core;
pub mod error;
pub mod store;

pub use error::FFIResult;

/// Error handling helper for FFI boundaries (returns error code)
pub fn handle_status_result<F>(func: F) -> c_int
where
    F: FnOnce() -> FFIResult<()>,
{
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(func))
        .unwrap_or_else(|payload| Err(panic_error(payload)));

    match result {
        Ok(()) => {
            clear_last_error();
            ErrorCode::Success as c_int
        }
        Err(e) => {
            log::error!("FFI call failed: {}", e);
            set_last_error(&e);
            e.code as c_int
        }
    }
}

/// Serialize `Ok(T)` or the `FFIError` to JSON and hand it over as a C string.
/// Never returns null unless the error JSON itself cannot be built.
pub fn handle_json_result<F, T>(func: F) -> *mut c_char
where
    F: FnOnce() -> FFIResult<T>,
    T: Serialize,
{
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(func))
        .unwrap_or_else(|payload| Err(panic_error(payload)));

    let json = match result {
        Ok(value) => {
            clear_last_error();
            serde_json::to_string(&value).map_err(FFIError::from)
        }
        Err(e) => {
            set_last_error(&e);
            serde_json::to_string(&e).map_err(FFIError::from)
        }
    };

    let json = json.unwrap_or_else(|e| {
        log::error!("Failed to serialize FFI result: {}", e);
        format!(
            "{{\"code\":\"{:?}\",\"message\":\"Failed to serialize result\",\"details\":null}}",
            ErrorCode::InternalError
        )
    });

    CString::new(json).map_or(std::ptr::null_mut(), CString::into_raw)
}

fn panic_error(payload: Box<dyn std::any::Any + Send>) -> FFIError {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Panicked during FFI call, but panic message is not a string".to_string()
    };
    log::error!("Panic in FFI call: {}", message);
    FFIError::new(ErrorCode::Panic, &message)
}

/// Borrow a C string argument as UTF-8
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the returned lifetime.
pub unsafe fn c_str_arg<'a>(ptr: *const c_char, name: &str) -> FFIResult<&'a str> {
    if ptr.is_null() {
        return Err(FFIError::null_pointer(name));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| FFIError::new(ErrorCode::InvalidUtf8, &format!("{} is not valid UTF-8", name)))
}

/// Serialize `value` into a newly allocated C string stored in `*out`
///
/// # Safety
/// `out` must be null or a valid, writable pointer.
pub unsafe fn write_json_out<T: Serialize>(out: *mut *mut c_char, value: &T) -> FFIResult<()> {
    if out.is_null() {
        return Err(FFIError::null_pointer("result"));
    }
    let json = serde_json::to_string(value)?;
    *out = CString::new(json)?.into_raw();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    #[test]
    fn test_status_result_records_last_error() {
        let code = handle_status_result(|| Err(DomainError::InvalidPatch("bad".into()).into()));
        assert_eq!(code, ErrorCode::InvalidPatch as c_int);
        assert_eq!(error::last_error().unwrap().code, ErrorCode::InvalidPatch);

        assert_eq!(handle_status_result(|| Ok(())), 0);
        assert!(error::last_error().is_none());
    }

    #[test]
    fn test_panics_become_errors() {
        let code = handle_status_result(|| panic!("boom"));
        assert_eq!(code, ErrorCode::Panic as c_int);
        assert_eq!(error::last_error().unwrap().message, "boom");
        error::clear_last_error();
    }

    #[test]
    fn test_json_result() {
        let ptr = handle_json_result(|| Ok(vec![1, 2, 3]));
        let json = unsafe { CString::from_raw(ptr) }.into_string().unwrap();
        assert_eq!(json, "[1,2,3]");

        let ptr = handle_json_result::<_, ()>(|| Err(FFIError::invalid_argument("nope")));
        let json = unsafe { CString::from_raw(ptr) }.into_string().unwrap();
        let error: FFIError = serde_json::from_str(&json).unwrap();
        assert_eq!(error.code, ErrorCode::InvalidArgument);
        error::clear_last_error();
    }

    #[test]
    fn test_c_str_arg() {
        let owned = CString::new("{\"type\":\"resetAll\"}").unwrap();
        assert_eq!(
            unsafe { c_str_arg(owned.as_ptr(), "command") }.unwrap(),
            "{\"type\":\"resetAll\"}"
        );
        let err = unsafe { c_str_arg(std::ptr::null(), "command") }.unwrap_err();
        assert_eq!(err.code, ErrorCode::NullPointer);
    }
}
