pub mod store;
pub mod types;

pub use store::PhotoCollection;
pub use types::{step_count, NewPhoto, PhotoRecord};
