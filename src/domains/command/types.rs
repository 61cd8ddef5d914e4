use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domains::photo::NewPhoto;
use crate::errors::DomainResult;
use crate::types::{AssessmentId, FormType, PhotoId, RecordId, UploadStatus};

/// A step addressed either by its 1-based position or by its label
/// (`"step2"`, `"waterHeaters"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepRef {
    Ordinal(u8),
    Label(String),
}

impl From<u8> for StepRef {
    fn from(ordinal: u8) -> Self {
        StepRef::Ordinal(ordinal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavigationAction {
    Next,
    Previous,
    Set(StepRef),
}

/// Record collections addressable by command, named as they serialize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    PersonnelInterviewed,
    Tenants,
    UnitManufacturers,
    WaterHeaters,
    PassengerElevators,
    FreightElevators,
    TenantSpaces,
}

impl CollectionKind {
    pub fn form(&self) -> FormType {
        match self {
            CollectionKind::PersonnelInterviewed | CollectionKind::Tenants => FormType::ProjectSummary,
            CollectionKind::UnitManufacturers
            | CollectionKind::WaterHeaters
            | CollectionKind::PassengerElevators
            | CollectionKind::FreightElevators => FormType::MechanicalSystems,
            CollectionKind::TenantSpaces => FormType::InteriorConditions,
        }
    }
}

/// Write operations accepted from the presentation layer. All of them act on
/// the active assessment except the ones that change which assessment is
/// active.
///
/// ```json
/// {"type": "updateStep", "form": "siteGrounds", "step": 3, "patch": {"signage": {"notApplicable": true}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StoreCommand {
    StartAssessment,
    SetActiveAssessment {
        assessment_id: AssessmentId,
    },
    UpdateStep {
        form: FormType,
        step: StepRef,
        patch: Value,
    },
    Navigate {
        form: FormType,
        action: NavigationAction,
    },
    TouchStep {
        form: FormType,
        step: StepRef,
    },
    ClearForm {
        form: FormType,
    },
    AddRecord {
        collection: CollectionKind,
        #[serde(default = "empty_object")]
        fields: Value,
    },
    UpdateRecord {
        collection: CollectionKind,
        id: RecordId,
        patch: Value,
    },
    RemoveRecord {
        collection: CollectionKind,
        id: RecordId,
    },
    AddPhoto {
        photo: NewPhoto,
    },
    UpdatePhotoUploadStatus {
        id: PhotoId,
        status: UploadStatus,
        #[serde(default)]
        storage_path: Option<String>,
    },
    UpdatePhotoNotes {
        id: PhotoId,
        notes: String,
    },
    RemovePhoto {
        id: PhotoId,
    },
    MarkSubmitted,
    MarkSynced,
    ResetAll,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl StoreCommand {
    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// True for commands that edit the active assessment's content
    pub fn edits_active(&self) -> bool {
        !matches!(
            self,
            StoreCommand::StartAssessment
                | StoreCommand::SetActiveAssessment { .. }
                | StoreCommand::ResetAll
        )
    }
}

/// Result of a command. `applied` is false when the target did not exist or
/// the request changed nothing (navigating past the last step, re-submitting).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    pub applied: bool,
    /// Id of the assessment, record or photo the command created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl CommandOutcome {
    pub fn applied(applied: bool) -> Self {
        Self { applied, id: None }
    }

    pub fn created(id: impl ToString) -> Self {
        Self {
            applied: true,
            id: Some(id.to_string()),
        }
    }
}

/// Read requests answered with JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StoreQuery {
    /// The whole tree in its persisted shape
    Snapshot,
    ActiveAssessment,
    AssessmentIds,
    FormProgress {
        form: FormType,
    },
    CompletionStatus,
    RepairEstimate,
    PhotosForStep {
        form: FormType,
        step: u8,
    },
    PendingUploadCount,
    Health,
}

impl StoreQuery {
    pub fn from_json(json: &str) -> DomainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Navigation state of one form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormProgress {
    pub form: FormType,
    pub current_step: u8,
    pub current_label: String,
    pub step_count: u8,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub progress: f64,
    pub completed_steps: usize,
}
