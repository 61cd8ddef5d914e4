mod error;

pub use error::{CollectionBoundsError, DomainError, PersistenceError, ServiceError, ValidationError};

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
