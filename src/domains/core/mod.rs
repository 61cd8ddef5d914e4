pub mod assessment;
pub mod clock;
pub mod collection;
pub mod form;
pub mod navigation;
pub mod section;
pub mod step;

// Re-export the building blocks every form domain is assembled from
pub use assessment::{AssessmentPatch, AssessmentTriple, Checklist, ChecklistItem, Condition, RepairStatus, YesNo};
pub use collection::{AtMost, CollectionBound, Keyed, Record, RecordCollection, Unbounded};
pub use form::FormStore;
pub use navigation::{StepCursor, StepIndex, StepKey};
pub use section::Section;
pub use step::StepNode;

pub(crate) use form::form_store;
pub(crate) use section::section;
