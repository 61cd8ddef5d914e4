pub mod core;

pub mod building_envelope;
pub mod interior_conditions;
pub mod mechanical_systems;
pub mod project_summary;
pub mod site_grounds;

pub mod assessment;
pub mod photo;
pub mod root;

pub mod command;
pub mod persistence;

pub use assessment::{Assessment, RepairEstimate};
pub use root::{RootCollection, Session};
