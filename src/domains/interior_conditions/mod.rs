pub mod store;
pub mod types;

pub use store::InteriorConditions;
pub use types::*;
