pub mod service;
pub mod types;

pub use service::{answer, apply, CommandService};
pub use types::{
    CollectionKind, CommandOutcome, FormProgress, NavigationAction, StepRef, StoreCommand, StoreQuery,
};
