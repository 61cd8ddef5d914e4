use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::building_envelope::BuildingEnvelope;
use crate::domains::core::{FormStore, StepKey};
use crate::domains::interior_conditions::InteriorConditions;
use crate::domains::mechanical_systems::MechanicalSystems;
use crate::domains::project_summary::ProjectSummary;
use crate::domains::site_grounds::SiteGrounds;
use crate::errors::DomainResult;
use crate::types::{FormType, PhotoId, UploadStatus};
use crate::validation::{Validate, ValidationBuilder};

pub const MAX_NOTES_LENGTH: usize = 2000;

/// Number of steps in `form`, taken from the form store definitions
pub fn step_count(form: FormType) -> u8 {
    match form {
        FormType::ProjectSummary => <<ProjectSummary as FormStore>::Key as StepKey>::COUNT,
        FormType::SiteGrounds => <<SiteGrounds as FormStore>::Key as StepKey>::COUNT,
        FormType::BuildingEnvelope => <<BuildingEnvelope as FormStore>::Key as StepKey>::COUNT,
        FormType::MechanicalSystems => <<MechanicalSystems as FormStore>::Key as StepKey>::COUNT,
        FormType::InteriorConditions => <<InteriorConditions as FormStore>::Key as StepKey>::COUNT,
    }
}

/// A captured photo attached to one field of one form step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub id: PhotoId,
    pub local_uri: String,
    pub thumbnail_uri: Option<String>,
    pub form_type: FormType,
    pub form_step: u8,
    pub field_name: String,
    pub mime_type: String,
    pub file_size: u64,
    pub width: u32,
    pub height: u32,
    pub upload_status: UploadStatus,
    /// Remote object path, set once an upload completes
    pub storage_path: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

/// Photo metadata handed over by the camera layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPhoto {
    pub local_uri: String,
    #[serde(default)]
    pub thumbnail_uri: Option<String>,
    pub form_type: FormType,
    pub form_step: u8,
    pub field_name: String,
    pub mime_type: String,
    #[serde(default)]
    pub file_size: u64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for NewPhoto {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("localUri", Some(self.local_uri.clone()))
            .required()
            .local_uri()
            .validate()?;

        if let Some(thumbnail) = &self.thumbnail_uri {
            ValidationBuilder::new("thumbnailUri", Some(thumbnail.clone()))
                .local_uri()
                .validate()?;
        }

        ValidationBuilder::new("formStep", Some(self.form_step))
            .range(1, step_count(self.form_type))
            .validate()?;

        ValidationBuilder::new("fieldName", Some(self.field_name.clone()))
            .required()
            .max_length(100)
            .validate()?;

        ValidationBuilder::new("mimeType", Some(self.mime_type.clone()))
            .required()
            .image_mime()
            .validate()?;

        if let Some(notes) = &self.notes {
            ValidationBuilder::new("notes", Some(notes.clone()))
                .max_length(MAX_NOTES_LENGTH)
                .validate()?;
        }

        Ok(())
    }
}

impl NewPhoto {
    pub fn into_record(self, id: PhotoId) -> PhotoRecord {
        PhotoRecord {
            id,
            local_uri: self.local_uri,
            thumbnail_uri: self.thumbnail_uri,
            form_type: self.form_type,
            form_step: self.form_step,
            field_name: self.field_name,
            mime_type: self.mime_type,
            file_size: self.file_size,
            width: self.width,
            height: self.height,
            upload_status: UploadStatus::Pending,
            storage_path: None,
            captured_at: self.captured_at.unwrap_or_else(Utc::now),
            notes: self.notes.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DomainError, ValidationError};

    fn sample() -> NewPhoto {
        NewPhoto {
            local_uri: "file:///var/mobile/Media/IMG_0001.jpg".into(),
            thumbnail_uri: None,
            form_type: FormType::MechanicalSystems,
            form_step: 6,
            field_name: "passengerElevators".into(),
            mime_type: "image/jpeg".into(),
            file_size: 2_400_000,
            width: 4032,
            height: 3024,
            captured_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_step_counts() {
        assert_eq!(step_count(FormType::ProjectSummary), 4);
        assert_eq!(step_count(FormType::SiteGrounds), 5);
        assert_eq!(step_count(FormType::BuildingEnvelope), 5);
        assert_eq!(step_count(FormType::MechanicalSystems), 9);
        assert_eq!(step_count(FormType::InteriorConditions), 4);
    }

    #[test]
    fn test_new_photo_validation() {
        assert!(sample().validate().is_ok());

        let mut photo = sample();
        photo.form_type = FormType::InteriorConditions;
        assert!(matches!(
            photo.validate(),
            Err(DomainError::Validation(ValidationError::Range { .. }))
        ));

        let mut photo = sample();
        photo.mime_type = "video/quicktime".into();
        assert!(photo.validate().is_err());

        let mut photo = sample();
        photo.local_uri = "https://cdn.example.com/a.jpg".into();
        assert!(photo.validate().is_err());
    }

    #[test]
    fn test_into_record_starts_pending() {
        let id = PhotoId::new();
        let record = sample().into_record(id);
        assert_eq!(record.id, id);
        assert_eq!(record.upload_status, UploadStatus::Pending);
        assert!(record.storage_path.is_none());
        assert_eq!(record.notes, "");
    }
}
