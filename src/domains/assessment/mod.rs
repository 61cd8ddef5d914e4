pub mod types;

pub use types::{Assessment, RepairEstimate};
