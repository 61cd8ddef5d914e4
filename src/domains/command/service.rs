use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use super::types::{
    CollectionKind, CommandOutcome, FormProgress, NavigationAction, StepRef, StoreCommand, StoreQuery,
};
use crate::domains::assessment::Assessment;
use crate::domains::core::{FormStore, StepKey};
use crate::domains::persistence::InspectionStore;
use crate::domains::root::Session;
use crate::errors::{DomainError, DomainResult, ServiceError, ServiceResult};
use crate::types::{FormType, RecordId};

/// Run a generic form operation against the form store `$form` names
macro_rules! on_form {
    ($assessment:expr, $form:expr, $op:ident $(, $arg:expr)*) => {
        match $form {
            FormType::ProjectSummary => $op(&mut $assessment.project_summary $(, $arg)*),
            FormType::SiteGrounds => $op(&mut $assessment.site_grounds $(, $arg)*),
            FormType::BuildingEnvelope => $op(&mut $assessment.building_envelope $(, $arg)*),
            FormType::MechanicalSystems => $op(&mut $assessment.mechanical_systems $(, $arg)*),
            FormType::InteriorConditions => $op(&mut $assessment.interior_conditions $(, $arg)*),
        }
    };
}

/// Executes [`StoreCommand`]s and answers [`StoreQuery`]s against a store
pub struct CommandService {
    store: Arc<InspectionStore>,
}

impl CommandService {
    pub fn new(store: Arc<InspectionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<InspectionStore> {
        &self.store
    }

    /// One applied command is one revision. A failed or unapplied command
    /// publishes nothing and schedules no save.
    pub fn execute(&self, command: StoreCommand) -> ServiceResult<CommandOutcome> {
        self.store
            .try_mutate_if(|session| apply(session, command), |outcome| outcome.applied)
    }

    pub fn execute_json(&self, json: &str) -> ServiceResult<CommandOutcome> {
        self.execute(StoreCommand::from_json(json)?)
    }

    pub fn query(&self, query: &StoreQuery) -> ServiceResult<Value> {
        if let StoreQuery::Health = query {
            return Ok(serde_json::to_value(self.store.health()).map_err(DomainError::from)?);
        }
        self.store
            .read(|session| answer(session, query))?
            .map_err(ServiceError::from)
    }

    pub fn query_json(&self, json: &str) -> ServiceResult<Value> {
        self.query(&StoreQuery::from_json(json)?)
    }
}

/// Apply `command` to the tree
pub fn apply(session: &mut Session, command: StoreCommand) -> DomainResult<CommandOutcome> {
    let edits_active = command.edits_active();
    let outcome = match command {
        StoreCommand::StartAssessment => {
            let id = session.start_new_assessment();
            log::info!("Started assessment {}", id);
            CommandOutcome::created(id)
        }
        StoreCommand::SetActiveAssessment { assessment_id } => {
            CommandOutcome::applied(session.switch_to(assessment_id))
        }
        StoreCommand::ResetAll => {
            let id = session.reset_all();
            log::info!("Cleared all assessments; new active assessment {}", id);
            CommandOutcome::created(id)
        }
        command => apply_to_assessment(session.active_mut(), command)?,
    };

    if edits_active && outcome.applied {
        session.active_mut().touch();
    }
    Ok(outcome)
}

fn apply_to_assessment(assessment: &mut Assessment, command: StoreCommand) -> DomainResult<CommandOutcome> {
    let outcome = match command {
        StoreCommand::UpdateStep { form, step, patch } => {
            CommandOutcome::applied(on_form!(assessment, form, update_step, &step, patch)?)
        }
        StoreCommand::Navigate { form, action } => {
            CommandOutcome::applied(on_form!(assessment, form, navigate, action)?)
        }
        StoreCommand::TouchStep { form, step } => {
            on_form!(assessment, form, touch_step, &step)?;
            CommandOutcome::applied(true)
        }
        StoreCommand::ClearForm { form } => {
            on_form!(assessment, form, clear_form);
            CommandOutcome::applied(true)
        }
        StoreCommand::AddRecord { collection, fields } => {
            CommandOutcome::created(add_record(assessment, collection, fields)?)
        }
        StoreCommand::UpdateRecord { collection, id, patch } => {
            CommandOutcome::applied(update_record(assessment, collection, id, patch)?)
        }
        StoreCommand::RemoveRecord { collection, id } => {
            CommandOutcome::applied(remove_record(assessment, collection, id))
        }
        StoreCommand::AddPhoto { photo } => CommandOutcome::created(assessment.photos.add_photo(photo)?),
        StoreCommand::UpdatePhotoUploadStatus { id, status, storage_path } => {
            CommandOutcome::applied(assessment.photos.update_upload_status(id, status, storage_path))
        }
        StoreCommand::UpdatePhotoNotes { id, notes } => {
            CommandOutcome::applied(assessment.photos.update_notes(id, notes)?)
        }
        StoreCommand::RemovePhoto { id } => CommandOutcome::applied(assessment.photos.remove_photo(id)),
        StoreCommand::MarkSubmitted => CommandOutcome::applied(assessment.mark_as_submitted()?),
        StoreCommand::MarkSynced => CommandOutcome::applied(assessment.mark_as_synced()?),
        StoreCommand::StartAssessment
        | StoreCommand::SetActiveAssessment { .. }
        | StoreCommand::ResetAll => {
            return Err(DomainError::Internal(
                "session command routed to an assessment".to_string(),
            ))
        }
    };
    Ok(outcome)
}

fn resolve_step<F: FormStore>(step: &StepRef) -> DomainResult<F::Key> {
    match step {
        StepRef::Ordinal(ordinal) => {
            <F::Key as StepKey>::from_ordinal(*ordinal).ok_or(DomainError::InvalidStep {
                form: F::FORM,
                step: *ordinal,
            })
        }
        StepRef::Label(label) => (1..=<F::Key as StepKey>::COUNT)
            .filter_map(<F::Key as StepKey>::from_ordinal)
            .find(|key| key.label() == *label)
            .ok_or_else(|| DomainError::InvalidPatch(format!("Form {} has no step '{}'", F::FORM, label))),
    }
}

fn update_step<F: FormStore>(form: &mut F, step: &StepRef, patch: Value) -> DomainResult<bool> {
    let key = resolve_step::<F>(step)?;
    form.apply_step_patch(key, patch)
}

fn navigate<F: FormStore>(form: &mut F, action: NavigationAction) -> DomainResult<bool> {
    match action {
        NavigationAction::Next => Ok(form.next_step()),
        NavigationAction::Previous => Ok(form.previous_step()),
        // Out-of-range ordinals leave the cursor where it is
        NavigationAction::Set(StepRef::Ordinal(ordinal)) => Ok(form.set_current_step(ordinal)),
        NavigationAction::Set(step) => {
            let key = resolve_step::<F>(&step)?;
            let moved = form.current_step() != key;
            form.cursor_mut().set(key);
            Ok(moved)
        }
    }
}

fn touch_step<F: FormStore>(form: &mut F, step: &StepRef) -> DomainResult<()> {
    let key = resolve_step::<F>(step)?;
    form.touch_step(key);
    Ok(())
}

fn clear_form<F: FormStore>(form: &mut F) {
    form.clear_all();
}

fn form_progress<F: FormStore>(form: &F) -> FormProgress {
    let current = form.current_step();
    FormProgress {
        form: F::FORM,
        current_step: current.ordinal(),
        current_label: current.label(),
        step_count: <F::Key as StepKey>::COUNT,
        is_first_step: form.is_first_step(),
        is_last_step: form.is_last_step(),
        progress: form.progress(),
        completed_steps: form.completed_steps(),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> DomainResult<T> {
    Ok(serde_json::from_value(value)?)
}

fn add_record(assessment: &mut Assessment, collection: CollectionKind, fields: Value) -> DomainResult<RecordId> {
    let project = &mut assessment.project_summary;
    let mechanical = &mut assessment.mechanical_systems;
    let id = match collection {
        CollectionKind::PersonnelInterviewed => project.add_personnel(decode(fields)?),
        CollectionKind::Tenants => project.add_tenant(decode(fields)?),
        CollectionKind::UnitManufacturers => mechanical.add_unit_manufacturer(decode(fields)?),
        CollectionKind::WaterHeaters => mechanical.add_water_heater(decode(fields)?),
        CollectionKind::PassengerElevators => mechanical.add_passenger_elevator(decode(fields)?)?,
        CollectionKind::FreightElevators => mechanical.add_freight_elevator(decode(fields)?)?,
        CollectionKind::TenantSpaces => assessment.interior_conditions.add_tenant_space(decode(fields)?),
    };
    Ok(id)
}

fn update_record(
    assessment: &mut Assessment,
    collection: CollectionKind,
    id: RecordId,
    patch: Value,
) -> DomainResult<bool> {
    let project = &mut assessment.project_summary;
    let mechanical = &mut assessment.mechanical_systems;
    let updated = match collection {
        CollectionKind::PersonnelInterviewed => project.update_personnel(id, decode(patch)?),
        CollectionKind::Tenants => project.update_tenant(id, decode(patch)?),
        CollectionKind::UnitManufacturers => mechanical.update_unit_manufacturer(id, decode(patch)?),
        CollectionKind::WaterHeaters => mechanical.update_water_heater(id, decode(patch)?),
        CollectionKind::PassengerElevators => mechanical.update_passenger_elevator(id, decode(patch)?),
        CollectionKind::FreightElevators => mechanical.update_freight_elevator(id, decode(patch)?),
        CollectionKind::TenantSpaces => assessment.interior_conditions.update_tenant_space(id, decode(patch)?),
    };
    Ok(updated)
}

fn remove_record(assessment: &mut Assessment, collection: CollectionKind, id: RecordId) -> bool {
    let project = &mut assessment.project_summary;
    let mechanical = &mut assessment.mechanical_systems;
    match collection {
        CollectionKind::PersonnelInterviewed => project.remove_personnel(id),
        CollectionKind::Tenants => project.remove_tenant(id),
        CollectionKind::UnitManufacturers => mechanical.remove_unit_manufacturer(id),
        CollectionKind::WaterHeaters => mechanical.remove_water_heater(id),
        CollectionKind::PassengerElevators => mechanical.remove_passenger_elevator(id),
        CollectionKind::FreightElevators => mechanical.remove_freight_elevator(id),
        CollectionKind::TenantSpaces => assessment.interior_conditions.remove_tenant_space(id),
    }
}

/// Answer `query` from the tree
pub fn answer(session: &Session, query: &StoreQuery) -> DomainResult<Value> {
    let active = session.active();
    let value = match query {
        StoreQuery::Snapshot => serde_json::to_value(session)?,
        StoreQuery::ActiveAssessment => serde_json::to_value(active)?,
        StoreQuery::AssessmentIds => serde_json::to_value(session.assessment_ids())?,
        StoreQuery::FormProgress { form } => serde_json::to_value(match form {
            FormType::ProjectSummary => form_progress(&active.project_summary),
            FormType::SiteGrounds => form_progress(&active.site_grounds),
            FormType::BuildingEnvelope => form_progress(&active.building_envelope),
            FormType::MechanicalSystems => form_progress(&active.mechanical_systems),
            FormType::InteriorConditions => form_progress(&active.interior_conditions),
        })?,
        StoreQuery::CompletionStatus => serde_json::to_value(active.completion_status())?,
        StoreQuery::RepairEstimate => serde_json::to_value(active.repair_estimate())?,
        StoreQuery::PhotosForStep { form, step } => {
            serde_json::to_value(active.photos.photos_for_step(*form, *step))?
        }
        StoreQuery::PendingUploadCount => Value::from(active.photos.pending_upload_count()),
        StoreQuery::Health => {
            return Err(DomainError::Internal(
                "persistence health is not part of the tree".to_string(),
            ))
        }
    };
    Ok(value)
}
