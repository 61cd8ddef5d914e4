pub mod repository;
pub mod service;
pub mod types;
pub mod worker;

pub use repository::{InMemorySnapshotRepository, SnapshotRepository, SqliteSnapshotRepository};
pub use service::InspectionStore;
pub use types::{PersistenceHealth, SavePolicy, SnapshotEnvelope, CURRENT_SCHEMA_VERSION};
