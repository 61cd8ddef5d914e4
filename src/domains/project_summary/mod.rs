pub mod store;
pub mod types;

pub use store::ProjectSummary;
pub use types::*;
