//! Offline state tree for building-condition field inspections.
//!
//! The tree (assessments, their five questionnaires and photos) lives in
//! memory behind an [`InspectionStore`](domains::persistence::InspectionStore)
//! and is snapshotted to SQLite in the background. The mobile shell talks to
//! it through the C ABI in [`ffi`].

pub mod config;
pub mod domains;
pub mod errors;
pub mod ffi;
pub mod globals;
pub mod types;
pub mod validation;

pub use config::StoreConfig;
pub use domains::command::{CommandOutcome, CommandService, StoreCommand, StoreQuery};
pub use domains::persistence::InspectionStore;
