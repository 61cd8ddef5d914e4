// src/ffi/store.rs
// ============================================================================
// Commands and queries against the live tree.
//
// JSON contracts:
//   inspection_dispatch   {"type": "updateStep", "form": "siteGrounds", "step": 2, "patch": {...}}
//                         -> {"applied": true, "id": "..."}
//   inspection_query      {"type": "formProgress", "form": "mechanicalSystems"}
//   inspection_active_assessment / inspection_snapshot take no payload.
// ----------------------------------------------------------------------------

use std::os::raw::{c_char, c_int};

use crate::domains::command::StoreQuery;
use crate::ffi::{c_str_arg, handle_status_result, write_json_out};
use crate::globals;

/// Apply one `StoreCommand`; writes a `CommandOutcome` to `result`
///
/// # Safety
/// `command_json` must be a valid NUL-terminated string and `result` a
/// writable pointer. The string stored in `*result` is freed with
/// `inspection_free_string`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_dispatch(command_json: *const c_char, result: *mut *mut c_char) -> c_int {
    handle_status_result(|| unsafe {
        let json = c_str_arg(command_json, "command_json")?;
        let service = globals::get_command_service()?;
        let outcome = service.execute_json(json)?;
        write_json_out(result, &outcome)
    })
}

/// Answer one `StoreQuery`; writes the JSON answer to `result`
///
/// # Safety
/// Same contract as [`inspection_dispatch`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_query(query_json: *const c_char, result: *mut *mut c_char) -> c_int {
    handle_status_result(|| unsafe {
        let json = c_str_arg(query_json, "query_json")?;
        let service = globals::get_command_service()?;
        let answer = service.query_json(json)?;
        write_json_out(result, &answer)
    })
}

unsafe fn run_query(query: StoreQuery, result: *mut *mut c_char) -> c_int {
    handle_status_result(|| unsafe {
        let service = globals::get_command_service()?;
        let answer = service.query(&query)?;
        write_json_out(result, &answer)
    })
}

/// The active assessment as JSON
///
/// # Safety
/// `result` must be a writable pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_active_assessment(result: *mut *mut c_char) -> c_int {
    run_query(StoreQuery::ActiveAssessment, result)
}

/// The whole tree (every assessment plus the active pointer) as JSON
///
/// # Safety
/// `result` must be a writable pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_snapshot(result: *mut *mut c_char) -> c_int {
    run_query(StoreQuery::Snapshot, result)
}

/// Autosave health as JSON
///
/// # Safety
/// `result` must be a writable pointer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn inspection_health(result: *mut *mut c_char) -> c_int {
    run_query(StoreQuery::Health, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::core::{inspection_free_string, inspection_initialize, inspection_shutdown};
    use crate::ffi::error::ErrorCode;
    use std::ffi::{CStr, CString};

    unsafe fn take_string(ptr: *mut c_char) -> String {
        let value = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        inspection_free_string(ptr);
        value
    }

    // The only test that touches the process-wide store
    #[test]
    fn test_dispatch_and_query_through_c_abi() {
        let dir = tempfile::tempdir().unwrap();
        let url = CString::new(format!("sqlite://{}?mode=rwc", dir.path().join("ffi.sqlite").display())).unwrap();

        unsafe {
            assert_eq!(inspection_initialize(url.as_ptr()), 0);

            let command = CString::new(
                r#"{"type": "updateStep", "form": "projectSummary", "step": 1, "patch": {"projectName": "Oak Tower"}}"#,
            )
            .unwrap();
            let mut out: *mut c_char = std::ptr::null_mut();
            assert_eq!(inspection_dispatch(command.as_ptr(), &mut out), 0);
            let outcome: serde_json::Value = serde_json::from_str(&take_string(out)).unwrap();
            assert_eq!(outcome["applied"], serde_json::json!(true));

            let mut out: *mut c_char = std::ptr::null_mut();
            assert_eq!(inspection_active_assessment(&mut out), 0);
            let active: serde_json::Value = serde_json::from_str(&take_string(out)).unwrap();
            assert_eq!(active["projectSummary"]["step1"]["projectName"], "Oak Tower");

            let bad = CString::new(r#"{"type": "navigate", "form": "nowhere", "action": "next"}"#).unwrap();
            let mut out: *mut c_char = std::ptr::null_mut();
            assert_eq!(inspection_dispatch(bad.as_ptr(), &mut out), ErrorCode::InvalidPatch as c_int);
            assert!(out.is_null());

            assert_eq!(inspection_shutdown(), 0);
            let mut out: *mut c_char = std::ptr::null_mut();
            assert_eq!(inspection_snapshot(&mut out), ErrorCode::NotInitialized as c_int);
        }
    }
}
