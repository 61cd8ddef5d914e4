use crate::domains::core::{form_store, StepIndex};
use crate::types::RecordId;

use super::types::{Accessibility, CommonAreas, Restrooms, TenantSpacePatch, TenantSpaces};

form_store! {
    /// Interior Conditions questionnaire
    pub struct InteriorConditions {
        form: InteriorConditions,
        key: StepIndex<4>,
        steps {
            step1: CommonAreas,
            step2: Restrooms,
            step3: TenantSpaces,
            step4: Accessibility,
        }
    }
}

impl InteriorConditions {
    pub fn add_tenant_space(&mut self, patch: TenantSpacePatch) -> RecordId {
        self.step3.edit(|step| step.tenant_spaces.add(patch))
    }

    pub fn update_tenant_space(&mut self, id: RecordId, patch: TenantSpacePatch) -> bool {
        self.step3.edit_when(|step| step.tenant_spaces.update(id, patch))
    }

    pub fn remove_tenant_space(&mut self, id: RecordId) -> bool {
        self.step3.edit_when(|step| step.tenant_spaces.remove(id))
    }
}
