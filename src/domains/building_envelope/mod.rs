pub mod store;
pub mod types;

pub use store::BuildingEnvelope;
pub use types::*;
