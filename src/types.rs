use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::DomainError;

/// Generate a fresh identifier. Every id in the tree (assessments, collection
/// records, photos) comes from here.
///
/// UUID v4 carries 122 random bits, so ids stay unique for the lifetime of an
/// install without any coordination.
pub fn generate_id() -> Uuid {
    Uuid::new_v4()
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(generate_id())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| DomainError::InvalidUuid(s.to_string()))
            }
        }
    };
}

define_id!(
    /// Identifier of one inspection in the root collection
    AssessmentId
);
define_id!(
    /// Identifier of a record inside a dynamic collection (personnel, elevators, ...)
    RecordId
);
define_id!(
    /// Identifier of a captured photo
    PhotoId
);

/// The five questionnaires that make up an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormType {
    ProjectSummary,
    SiteGrounds,
    BuildingEnvelope,
    MechanicalSystems,
    InteriorConditions,
}

impl FormType {
    pub const ALL: [FormType; 5] = [
        FormType::ProjectSummary,
        FormType::SiteGrounds,
        FormType::BuildingEnvelope,
        FormType::MechanicalSystems,
        FormType::InteriorConditions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::ProjectSummary => "projectSummary",
            FormType::SiteGrounds => "siteGrounds",
            FormType::BuildingEnvelope => "buildingEnvelope",
            FormType::MechanicalSystems => "mechanicalSystems",
            FormType::InteriorConditions => "interiorConditions",
        }
    }
}

impl FromStr for FormType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormType::ALL
            .iter()
            .copied()
            .find(|form| form.as_str() == s)
            .ok_or_else(|| DomainError::InvalidPatch(format!("Unknown form type: {}", s)))
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an assessment. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    #[default]
    Draft,
    Submitted,
    Synced,
}

impl AssessmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::Submitted => "submitted",
            AssessmentStatus::Synced => "synced",
        }
    }
}

impl fmt::Display for AssessmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload state of a photo, driven by the external upload worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadStatus::Pending => "pending",
            UploadStatus::Uploading => "uploading",
            UploadStatus::Completed => "completed",
            UploadStatus::Failed => "failed",
        }
    }

    /// Still waiting for the upload worker to pick it up (again)
    pub fn awaits_upload(&self) -> bool {
        matches!(self, UploadStatus::Pending | UploadStatus::Failed)
    }
}
