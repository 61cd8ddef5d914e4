use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{NewPhoto, PhotoRecord, MAX_NOTES_LENGTH};
use crate::domains::core::clock;
use crate::errors::DomainResult;
use crate::types::{FormType, PhotoId, UploadStatus};
use crate::validation::{Validate, ValidationBuilder};

/// Every photo captured for one assessment, in capture order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoCollection {
    photos: Vec<PhotoRecord>,
    last_modified: DateTime<Utc>,
}

impl Default for PhotoCollection {
    fn default() -> Self {
        Self {
            photos: Vec::new(),
            last_modified: clock::now(),
        }
    }
}

impl PhotoCollection {
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn touch(&mut self) {
        self.last_modified = clock::tick(self.last_modified);
    }

    pub fn add_photo(&mut self, photo: NewPhoto) -> DomainResult<PhotoId> {
        photo.validate()?;

        let mut id = PhotoId::new();
        while self.photos.iter().any(|p| p.id == id) {
            id = PhotoId::new();
        }
        self.photos.push(photo.into_record(id));
        self.touch();
        Ok(id)
    }

    /// Record progress reported by the upload worker. `storage_path` is kept
    /// when not provided.
    pub fn update_upload_status(
        &mut self,
        id: PhotoId,
        status: UploadStatus,
        storage_path: Option<String>,
    ) -> bool {
        let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) else {
            return false;
        };
        photo.upload_status = status;
        if storage_path.is_some() {
            photo.storage_path = storage_path;
        }
        self.touch();
        true
    }

    pub fn update_notes(&mut self, id: PhotoId, notes: String) -> DomainResult<bool> {
        ValidationBuilder::new("notes", Some(notes.clone()))
            .max_length(MAX_NOTES_LENGTH)
            .validate()?;

        let Some(photo) = self.photos.iter_mut().find(|p| p.id == id) else {
            return Ok(false);
        };
        photo.notes = notes;
        self.touch();
        Ok(true)
    }

    pub fn remove_photo(&mut self, id: PhotoId) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        let removed = self.photos.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn get(&self, id: PhotoId) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn all_photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    pub fn photos_for_step(&self, form: FormType, step: u8) -> Vec<&PhotoRecord> {
        self.photos
            .iter()
            .filter(|p| p.form_type == form && p.form_step == step)
            .collect()
    }

    pub fn photo_count_for_step(&self, form: FormType, step: u8) -> usize {
        self.photos
            .iter()
            .filter(|p| p.form_type == form && p.form_step == step)
            .count()
    }

    /// Photos still waiting on the uploader: pending, plus failed ones due a retry
    pub fn pending_upload_count(&self) -> usize {
        self.photos
            .iter()
            .filter(|p| p.upload_status.awaits_upload())
            .count()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}
