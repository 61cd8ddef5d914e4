use serde::{Deserialize, Serialize};
use serde_json::json;
use std::cell::RefCell;
use std::ffi::CString;
use std::fmt;
use std::os::raw::c_char;

use crate::errors::{DomainError, PersistenceError, ServiceError, ValidationError};

/// Error codes for FFI boundary
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Success (no error)
    Success = 0,

    // General errors (1-99)
    Unknown = 1,
    InvalidArgument = 2,
    NullPointer = 3,
    InvalidUtf8 = 4,
    InvalidUuid = 5,
    InternalError = 6,
    Panic = 7,

    // Persistence errors (100-199)
    DatabaseGeneral = 100,
    SnapshotCorrupt = 101,
    UnsupportedSchemaVersion = 102,
    SerializationFailed = 103,
    WorkerStopped = 104,
    LockPoisoned = 105,

    // Domain errors (200-299)
    DomainGeneral = 200,
    AssessmentNotFound = 201,
    DuplicateAssessment = 202,
    ValidationFailed = 204,
    InvalidStatusTransition = 205,
    CollectionFull = 206,
    InvalidStep = 207,
    UnknownCollection = 208,
    InvalidPatch = 209,

    // Service errors (300-399)
    ServiceGeneral = 300,
    ConfigurationError = 310,
    NotInitialized = 311,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, *self as i32)
    }
}

/// Error type for FFI boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FFIError {
    /// Error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (JSON string)
    pub details: Option<String>,
}

impl fmt::Display for FFIError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "{}: {} ({})", self.code, self.message, details)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for FFIError {}

impl FFIError {
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: &str, details: serde_json::Value) -> Self {
        Self {
            code,
            message: message.to_string(),
            details: Some(details.to_string()),
        }
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    pub fn null_pointer(argument: &str) -> Self {
        Self::new(ErrorCode::NullPointer, &format!("Null pointer provided for {}", argument))
    }

    pub fn internal(message: String) -> Self {
        Self::new(ErrorCode::InternalError, &message)
    }

    pub fn not_initialized() -> Self {
        ServiceError::NotInitialized.into()
    }
}

impl From<DomainError> for FFIError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::Validation(val_err) => val_err.into(),
            DomainError::InvalidUuid(value) => {
                Self::with_details(ErrorCode::InvalidUuid, &message, json!({ "uuid": value }))
            }
            DomainError::AssessmentNotFound(id) => Self::with_details(
                ErrorCode::AssessmentNotFound,
                &message,
                json!({ "assessmentId": id }),
            ),
            DomainError::DuplicateAssessment(id) => Self::with_details(
                ErrorCode::DuplicateAssessment,
                &message,
                json!({ "assessmentId": id }),
            ),
            DomainError::InvalidStatusTransition { from, to } => Self::with_details(
                ErrorCode::InvalidStatusTransition,
                &message,
                json!({ "from": from, "to": to }),
            ),
            DomainError::CollectionBounds(bounds) => Self::with_details(
                ErrorCode::CollectionFull,
                &message,
                json!({ "collection": bounds.collection, "max": bounds.max }),
            ),
            DomainError::InvalidStep { form, step } => Self::with_details(
                ErrorCode::InvalidStep,
                &message,
                json!({ "form": form, "step": step }),
            ),
            DomainError::UnknownCollection(_) => Self::new(ErrorCode::UnknownCollection, &message),
            DomainError::InvalidPatch(_) => Self::new(ErrorCode::InvalidPatch, &message),
            DomainError::Internal(_) => Self::new(ErrorCode::InternalError, &message),
        }
    }
}

impl From<PersistenceError> for FFIError {
    fn from(err: PersistenceError) -> Self {
        let message = err.to_string();
        match err {
            PersistenceError::Database(_) => Self::new(ErrorCode::DatabaseGeneral, &message),
            PersistenceError::Serialization(_) => Self::new(ErrorCode::SerializationFailed, &message),
            PersistenceError::Corrupt { key, .. } => {
                Self::with_details(ErrorCode::SnapshotCorrupt, &message, json!({ "key": key }))
            }
            PersistenceError::UnsupportedSchemaVersion { found, supported } => Self::with_details(
                ErrorCode::UnsupportedSchemaVersion,
                &message,
                json!({ "found": found, "supported": supported }),
            ),
            PersistenceError::WorkerStopped => Self::new(ErrorCode::WorkerStopped, &message),
            PersistenceError::LockPoisoned => Self::new(ErrorCode::LockPoisoned, &message),
        }
    }
}

impl From<ServiceError> for FFIError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(domain_err) => domain_err.into(),
            ServiceError::Persistence(persistence_err) => persistence_err.into(),
            ServiceError::Configuration(msg) => Self::new(ErrorCode::ConfigurationError, &msg),
            ServiceError::NotInitialized => Self::new(
                ErrorCode::NotInitialized,
                "Inspection store not initialized; call inspection_initialize first",
            ),
        }
    }
}

impl From<ValidationError> for FFIError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        let details = match &err {
            ValidationError::Required { field } => json!({ "field": field, "type": "required" }),
            ValidationError::MaxLength { field, max } => {
                json!({ "field": field, "type": "max_length", "max": max })
            }
            ValidationError::Range { field, min, max } => {
                json!({ "field": field, "type": "range", "min": min, "max": max })
            }
            ValidationError::Format { field, reason } => {
                json!({ "field": field, "type": "format", "reason": reason })
            }
            ValidationError::InvalidValue { field, reason } => {
                json!({ "field": field, "type": "invalid_value", "reason": reason })
            }
        };
        Self::with_details(ErrorCode::ValidationFailed, &message, details)
    }
}

impl From<std::ffi::NulError> for FFIError {
    fn from(_: std::ffi::NulError) -> Self {
        Self::new(ErrorCode::InvalidUtf8, "String contains null bytes, cannot create CString")
    }
}

impl From<serde_json::Error> for FFIError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationFailed, &err.to_string())
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<FFIError>> = const { RefCell::new(None) };
}

/// Remember `error` for [`get_last_error_message`] on this thread
pub fn set_last_error(error: &FFIError) {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(error.clone()));
}

pub fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

pub fn last_error() -> Option<FFIError> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Last error on this thread as a JSON C string, or null.
/// The caller frees it with `inspection_free_string`.
pub fn get_last_error_message() -> *mut c_char {
    let Some(error) = last_error() else {
        return std::ptr::null_mut();
    };
    let json = serde_json::to_string(&error).unwrap_or_else(|_| error.to_string());
    CString::new(json).map_or(std::ptr::null_mut(), CString::into_raw)
}

// Result type alias for FFI functions
pub type FFIResult<T> = Result<T, FFIError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CollectionBoundsError;
    use crate::types::{AssessmentStatus, FormType};

    #[test]
    fn test_domain_errors_map_to_codes() {
        let err: FFIError = DomainError::InvalidStatusTransition {
            from: AssessmentStatus::Draft,
            to: AssessmentStatus::Synced,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        let details: serde_json::Value = serde_json::from_str(err.details.as_deref().unwrap()).unwrap();
        assert_eq!(details, json!({ "from": "draft", "to": "synced" }));

        let err: FFIError = ServiceError::Domain(DomainError::CollectionBounds(CollectionBoundsError {
            collection: "passengerElevators".into(),
            max: 5,
        }))
        .into();
        assert_eq!(err.code, ErrorCode::CollectionFull);

        let err: FFIError = DomainError::InvalidStep {
            form: FormType::SiteGrounds,
            step: 8,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidStep);
        assert_eq!(err.code as i32, 207);
    }

    #[test]
    fn test_validation_details_are_json() {
        let err: FFIError = ValidationError::format("localUri", "must be a \"local\" file URI").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details: serde_json::Value = serde_json::from_str(err.details.as_deref().unwrap()).unwrap();
        assert_eq!(details["reason"], json!("must be a \"local\" file URI"));
    }

    #[test]
    fn test_last_error_slot() {
        clear_last_error();
        assert!(get_last_error_message().is_null());

        set_last_error(&PersistenceError::WorkerStopped.into());
        assert_eq!(last_error().unwrap().code, ErrorCode::WorkerStopped);

        let ptr = get_last_error_message();
        assert!(!ptr.is_null());
        let json = unsafe { CString::from_raw(ptr) }.into_string().unwrap();
        assert!(json.contains("WorkerStopped"));
        clear_last_error();
    }
}
