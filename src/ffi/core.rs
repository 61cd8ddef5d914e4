// src/ffi/core.rs
// ============================================================================
// Library lifecycle: initialize, flush, shutdown, strings and errors
// ============================================================================

use std::ffi::CString;
use std::os::raw::{c_char, c_int};

use crate::config::StoreConfig;
use crate::ffi::error::FFIError;
use crate::ffi::{c_str_arg, handle_status_result};
use crate::globals;

/// Open the inspection store. `db_url` may be null, in which case the
/// `INSPECTION_*` environment (and `.env`) decide.
/// Returns 0 on success, non-zero on error
///
/// # Safety
/// `db_url` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_initialize(db_url: *const c_char) -> c_int {
    handle_status_result(|| unsafe {
        let mut config = StoreConfig::from_env()?;
        if !db_url.is_null() {
            let url = c_str_arg(db_url, "db_url")?;
            if !url.starts_with("sqlite:") {
                return Err(FFIError::invalid_argument(
                    "db_url must be a SQLite URL starting with 'sqlite:', not a file path",
                ));
            }
            config.database_url = url.to_string();
        }
        globals::block_on_async(globals::initialize(config))?
    })
}

/// Write any unsaved changes now
#[unsafe(no_mangle)]
pub extern "C" fn inspection_flush() -> c_int {
    handle_status_result(|| {
        let store = globals::get_store()?;
        globals::block_on_async(async move { store.flush().await })??;
        Ok(())
    })
}

/// Save and release the store. Call when the app is about to terminate.
#[unsafe(no_mangle)]
pub extern "C" fn inspection_shutdown() -> c_int {
    handle_status_result(|| globals::block_on_async(globals::shutdown())?)
}

/// Frees a C string that was allocated by Rust and passed over FFI.
///
/// # Safety
/// `ptr` must come from this library and must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        let _ = CString::from_raw(ptr);
    }
}

/// Get last error on the calling thread as JSON
/// Returns allocated string that must be freed with inspection_free_string(), or null if no error
#[unsafe(no_mangle)]
pub extern "C" fn inspection_last_error() -> *mut c_char {
    crate::ffi::error::get_last_error_message()
}

/// Returns allocated string that must be freed with inspection_free_string()
#[unsafe(no_mangle)]
pub extern "C" fn inspection_library_version() -> *mut c_char {
    CString::new(env!("CARGO_PKG_VERSION")).map_or(std::ptr::null_mut(), CString::into_raw)
}
