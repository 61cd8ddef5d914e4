use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domains::assessment::Assessment;
use crate::errors::{DomainError, DomainResult};
use crate::types::AssessmentId;

/// Every assessment on the device plus the pointer to the one being edited.
///
/// This is the persisted shape. It can hold a missing or dangling pointer;
/// [`Session::bootstrap`](super::Session::bootstrap) turns it into a tree with
/// a guaranteed active assessment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCollection {
    #[serde(default)]
    pub assessments: BTreeMap<AssessmentId, Assessment>,
    #[serde(default)]
    pub active_assessment_id: Option<AssessmentId>,
}

impl RootCollection {
    /// Insert a fresh assessment under `id`. Does not make it active.
    pub fn create_assessment(&mut self, id: AssessmentId) -> DomainResult<&mut Assessment> {
        if self.assessments.contains_key(&id) {
            return Err(DomainError::DuplicateAssessment(id));
        }
        Ok(self.assessments.entry(id).or_insert_with(|| Assessment::new(id)))
    }

    pub fn get(&self, id: AssessmentId) -> Option<&Assessment> {
        self.assessments.get(&id)
    }

    pub fn get_mut(&mut self, id: AssessmentId) -> Option<&mut Assessment> {
        self.assessments.get_mut(&id)
    }

    /// Point at an existing assessment; false if `id` is unknown
    pub fn set_active(&mut self, id: AssessmentId) -> bool {
        if self.assessments.contains_key(&id) {
            self.active_assessment_id = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&Assessment> {
        self.active_assessment_id.and_then(|id| self.assessments.get(&id))
    }

    pub fn reset_all(&mut self) {
        self.assessments.clear();
        self.active_assessment_id = None;
    }

    pub fn len(&self) -> usize {
        self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assessments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_does_not_activate() {
        let mut root = RootCollection::default();
        let id = AssessmentId::new();
        root.create_assessment(id).unwrap();
        assert!(root.active_assessment_id.is_none());
        assert!(root.active().is_none());

        assert!(root.set_active(id));
        assert_eq!(root.active().map(|a| a.id()), Some(id));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut root = RootCollection::default();
        let id = AssessmentId::new();
        root.create_assessment(id).unwrap();
        assert!(matches!(
            root.create_assessment(id),
            Err(DomainError::DuplicateAssessment(dup)) if dup == id
        ));
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_set_active_unknown_is_noop() {
        let mut root = RootCollection::default();
        let id = AssessmentId::new();
        root.create_assessment(id).unwrap();
        root.set_active(id);

        assert!(!root.set_active(AssessmentId::new()));
        assert_eq!(root.active_assessment_id, Some(id));

        root.reset_all();
        assert!(root.is_empty());
        assert!(root.active_assessment_id.is_none());
    }

    #[test]
    fn test_wire_shape() {
        let mut root = RootCollection::default();
        let id = AssessmentId::new();
        root.create_assessment(id).unwrap();
        root.set_active(id);

        let json = serde_json::to_value(&root).unwrap();
        assert_eq!(json["activeAssessmentId"], serde_json::json!(id.to_string()));
        assert!(json["assessments"][id.to_string()].is_object());

        let restored: RootCollection = serde_json::from_value(json).unwrap();
        assert_eq!(restored, root);
    }
}
