use crate::domains::core::{form_store, StepIndex};
use crate::types::RecordId;

use super::types::{
    PersonnelDocuments, PersonnelPatch, ProjectInformation, PropertyDescription, TenantInformation,
    TenantPatch,
};

form_store! {
    /// Project Summary questionnaire
    pub struct ProjectSummary {
        form: ProjectSummary,
        key: StepIndex<4>,
        steps {
            step1: ProjectInformation,
            step2: PropertyDescription,
            step3: PersonnelDocuments,
            step4: TenantInformation,
        }
    }
}

impl ProjectSummary {
    pub fn add_personnel(&mut self, patch: PersonnelPatch) -> RecordId {
        self.step3.edit(|step| step.personnel_interviewed.add(patch))
    }

    pub fn update_personnel(&mut self, id: RecordId, patch: PersonnelPatch) -> bool {
        self.step3.edit_when(|step| step.personnel_interviewed.update(id, patch))
    }

    pub fn remove_personnel(&mut self, id: RecordId) -> bool {
        self.step3.edit_when(|step| step.personnel_interviewed.remove(id))
    }

    pub fn add_tenant(&mut self, patch: TenantPatch) -> RecordId {
        self.step4.edit(|step| step.tenants.add(patch))
    }

    pub fn update_tenant(&mut self, id: RecordId, patch: TenantPatch) -> bool {
        self.step4.edit_when(|step| step.tenants.update(id, patch))
    }

    pub fn remove_tenant(&mut self, id: RecordId) -> bool {
        self.step4.edit_when(|step| step.tenants.remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::core::FormStore;
    use crate::domains::project_summary::types::{ProjectInformationPatch, PropertyDescriptionPatch};

    #[test]
    fn test_update_step1_keeps_other_fields() {
        let mut form = ProjectSummary::default();
        form.update_step1(ProjectInformationPatch {
            project_name: Some("Oak Tower".into()),
            city: Some("Denver".into()),
            weather_conditions: Some(vec!["sunny".into()]),
            ..Default::default()
        });
        form.update_step1(ProjectInformationPatch {
            project_number: Some("PCA-2291".into()),
            ..Default::default()
        });

        let step = form.step1();
        assert_eq!(step.project_name, "Oak Tower");
        assert_eq!(step.city, "Denver");
        assert_eq!(step.project_number, "PCA-2291");
        assert_eq!(step.weather_conditions, vec!["sunny".to_string()]);
    }

    #[test]
    fn test_personnel_add_remove_keeps_ids() {
        let mut form = ProjectSummary::default();
        let first = form.add_personnel(PersonnelPatch {
            name: Some("Dana Ruiz".into()),
            title: Some("Property Manager".into()),
            ..Default::default()
        });
        let second = form.add_personnel(PersonnelPatch {
            name: Some("Lee Park".into()),
            title: Some("Chief Engineer".into()),
            ..Default::default()
        });
        assert_ne!(first, second);

        assert!(form.remove_personnel(first));

        let personnel = &form.step3().personnel_interviewed;
        assert_eq!(personnel.len(), 1);
        let remaining = personnel.iter().next().unwrap();
        assert_eq!(remaining.id(), second);
        assert_eq!(remaining.name, "Lee Park");
    }

    #[test]
    fn test_missing_record_does_not_touch_step() {
        let mut form = ProjectSummary::default();
        let id = form.add_tenant(TenantPatch {
            unit_number: Some("101".into()),
            ..Default::default()
        });
        assert!(form.remove_tenant(id));
        let after_remove = form.step4().last_modified();

        assert!(!form.remove_tenant(id));
        assert!(!form.update_tenant(id, TenantPatch::default()));
        assert_eq!(form.step4().last_modified(), after_remove);
    }

    #[test]
    fn test_record_update_touches_step() {
        let mut form = ProjectSummary::default();
        let id = form.add_tenant(TenantPatch::default());
        let before = form.step4().last_modified();

        assert!(form.update_tenant(
            id,
            TenantPatch {
                lease_type: Some("NNN".into()),
                ..Default::default()
            }
        ));
        assert!(form.step4().last_modified() > before);
        assert_eq!(form.step4().tenants.get(id).unwrap().lease_type, "NNN");
    }

    #[test]
    fn test_step_patch_from_json() {
        let mut form = ProjectSummary::default();
        let step = StepIndex::new(2).unwrap();
        form.apply_step_patch(
            step,
            serde_json::json!({"yearBuilt": "1987", "constructionType": ["steel frame"]}),
        )
        .unwrap();
        assert_eq!(form.step2().year_built, "1987");

        form.update_step2(PropertyDescriptionPatch {
            construction_type: Some(vec!["masonry".into()]),
            ..Default::default()
        });
        assert_eq!(form.step2().construction_type, vec!["masonry".to_string()]);
        assert_eq!(form.step2().year_built, "1987");
    }

    #[test]
    fn test_personnel_list_is_not_patchable() {
        let mut form = ProjectSummary::default();
        let result = form.apply_step_patch(
            StepIndex::new(3).unwrap(),
            serde_json::json!({"personnelInterviewed": []}),
        );
        assert!(result.is_err());
    }
}
