pub mod store;
pub mod types;

pub use store::SiteGrounds;
pub use types::*;
