pub mod collection;
pub mod session;

pub use collection::RootCollection;
pub use session::{BootstrapOutcome, Session};
