pub mod store;
pub mod types;

pub use store::MechanicalSystems;
pub use types::*;
