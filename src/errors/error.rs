use std::fmt;
use serde::Serialize;
use thiserror::Error;

use crate::types::{AssessmentId, AssessmentStatus, FormType};

/// A bounded dynamic collection refused an insert
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[error("Collection '{collection}' already holds the maximum of {max} records")]
pub struct CollectionBoundsError {
    pub collection: String,
    pub max: usize,
}

/// Domain-level errors raised by the state tree
#[derive(Debug, Error, Clone, Serialize)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Assessment not found: {0}")]
    AssessmentNotFound(AssessmentId),

    #[error("Assessment already exists: {0}")]
    DuplicateAssessment(AssessmentId),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AssessmentStatus,
        to: AssessmentStatus,
    },

    #[error(transparent)]
    CollectionBounds(#[from] CollectionBoundsError),

    #[error("Form {form} has no step {step}")]
    InvalidStep {
        form: FormType,
        step: u8,
    },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(error: serde_json::Error) -> Self {
        DomainError::InvalidPatch(error.to_string())
    }
}

/// Durable storage errors. None of these affect the in-memory tree.
#[derive(Debug, Error, Clone, Serialize)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot '{key}' is corrupt: {reason}")]
    Corrupt {
        key: String,
        reason: String,
    },

    #[error("Snapshot schema version {found} is newer than supported version {supported}")]
    UnsupportedSchemaVersion {
        found: u32,
        supported: u32,
    },

    #[error("Autosave worker is not running")]
    WorkerStopped,

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<sqlx::Error> for PersistenceError {
    fn from(error: sqlx::Error) -> Self {
        PersistenceError::Database(error.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(error: serde_json::Error) -> Self {
        PersistenceError::Serialization(error.to_string())
    }
}

/// Service-level errors (store handle and FFI facing)
#[derive(Debug, Error, Clone, Serialize)]
pub enum ServiceError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Inspection store not initialized")]
    NotInitialized,
}

impl From<ValidationError> for ServiceError {
    fn from(error: ValidationError) -> Self {
        ServiceError::Domain(DomainError::Validation(error))
    }
}

/// Validation errors
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required {
        field: String,
    },

    #[error("Field '{field}' cannot exceed {max} characters")]
    MaxLength {
        field: String,
        max: usize,
    },

    #[error("Field '{field}' must be between {min} and {max}")]
    Range {
        field: String,
        min: String,
        max: String,
    },

    #[error("Field '{field}' contains invalid format: {reason}")]
    Format {
        field: String,
        reason: String,
    },

    #[error("Field '{field}' contains an invalid value: {reason}")]
    InvalidValue {
        field: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        Self::Required {
            field: field.to_string(),
        }
    }

    pub fn max_length(field: &str, max: usize) -> Self {
        Self::MaxLength {
            field: field.to_string(),
            max,
        }
    }

    pub fn range<T: fmt::Display>(field: &str, min: T, max: T) -> Self {
        Self::Range {
            field: field.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn format(field: &str, reason: &str) -> Self {
        Self::Format {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
