use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domains::building_envelope::BuildingEnvelope;
use crate::domains::core::{clock, AssessmentTriple, FormStore, RepairStatus};
use crate::domains::interior_conditions::InteriorConditions;
use crate::domains::mechanical_systems::MechanicalSystems;
use crate::domains::photo::PhotoCollection;
use crate::domains::project_summary::ProjectSummary;
use crate::domains::site_grounds::SiteGrounds;
use crate::errors::{DomainError, DomainResult};
use crate::types::{AssessmentId, AssessmentStatus, FormType};

/// One inspection: the five questionnaires, the photos, and a lifecycle status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    id: AssessmentId,
    status: AssessmentStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    pub project_summary: ProjectSummary,
    #[serde(default)]
    pub site_grounds: SiteGrounds,
    #[serde(default)]
    pub building_envelope: BuildingEnvelope,
    #[serde(default)]
    pub mechanical_systems: MechanicalSystems,
    #[serde(default)]
    pub interior_conditions: InteriorConditions,
    #[serde(default)]
    pub photos: PhotoCollection,
}

/// Repair amounts summed per repair horizon
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairEstimate {
    pub by_status: BTreeMap<RepairStatus, Decimal>,
    pub total: Decimal,
    /// Non-empty amounts that could not be read as a number
    pub unparsed: usize,
}

impl Assessment {
    pub fn new(id: AssessmentId) -> Self {
        let now = clock::now();
        Self {
            id,
            status: AssessmentStatus::Draft,
            created_at: now,
            updated_at: now,
            project_summary: ProjectSummary::default(),
            site_grounds: SiteGrounds::default(),
            building_envelope: BuildingEnvelope::default(),
            mechanical_systems: MechanicalSystems::default(),
            interior_conditions: InteriorConditions::default(),
            photos: PhotoCollection::default(),
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn status(&self) -> AssessmentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn touch(&mut self) {
        self.updated_at = clock::tick(self.updated_at);
    }

    /// `draft -> submitted`. Repeating it is a no-op; after sync it is refused.
    pub fn mark_as_submitted(&mut self) -> DomainResult<bool> {
        self.transition(AssessmentStatus::Submitted)
    }

    /// `submitted -> synced`. Repeating it is a no-op; a draft must be submitted first.
    pub fn mark_as_synced(&mut self) -> DomainResult<bool> {
        self.transition(AssessmentStatus::Synced)
    }

    fn transition(&mut self, to: AssessmentStatus) -> DomainResult<bool> {
        let from = self.status;
        let allowed = matches!(
            (from, to),
            (AssessmentStatus::Draft, AssessmentStatus::Submitted)
                | (AssessmentStatus::Submitted, AssessmentStatus::Synced)
        );

        if from == to {
            Ok(false)
        } else if allowed {
            self.status = to;
            self.touch();
            Ok(true)
        } else {
            Err(DomainError::InvalidStatusTransition { from, to })
        }
    }

    /// Latest edit anywhere in the assessment
    pub fn last_modified(&self) -> DateTime<Utc> {
        [
            self.updated_at,
            self.project_summary.last_modified(),
            self.site_grounds.last_modified(),
            self.building_envelope.last_modified(),
            self.mechanical_systems.last_modified(),
            self.interior_conditions.last_modified(),
            self.photos.last_modified(),
        ]
        .into_iter()
        .max()
        .unwrap_or(self.updated_at)
    }

    pub fn completion_status(&self) -> BTreeMap<FormType, BTreeMap<String, bool>> {
        BTreeMap::from([
            (FormType::ProjectSummary, self.project_summary.completion_status()),
            (FormType::SiteGrounds, self.site_grounds.completion_status()),
            (FormType::BuildingEnvelope, self.building_envelope.completion_status()),
            (FormType::MechanicalSystems, self.mechanical_systems.completion_status()),
            (FormType::InteriorConditions, self.interior_conditions.completion_status()),
        ])
    }

    pub fn collect_assessments(&self) -> Vec<&AssessmentTriple> {
        let mut out = Vec::new();
        self.project_summary.collect_assessments(&mut out);
        self.site_grounds.collect_assessments(&mut out);
        self.building_envelope.collect_assessments(&mut out);
        self.mechanical_systems.collect_assessments(&mut out);
        self.interior_conditions.collect_assessments(&mut out);
        out
    }

    pub fn repair_estimate(&self) -> RepairEstimate {
        let mut estimate = RepairEstimate::default();
        for triple in self.collect_assessments() {
            match triple.amount_decimal() {
                None => {}
                Some(Ok(amount)) => {
                    *estimate.by_status.entry(triple.repair_status).or_default() += amount;
                    estimate.total += amount;
                }
                Some(Err(_)) => estimate.unparsed += 1,
            }
        }
        estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::core::AssessmentPatch;
    use crate::domains::site_grounds::{SignagePatch, TopographyPatch};
    use crate::domains::mechanical_systems::UnitManufacturerPatch;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_moves_forward_only() {
        let mut assessment = Assessment::new(AssessmentId::new());
        assert_eq!(assessment.status(), AssessmentStatus::Draft);

        assert!(assessment.mark_as_submitted().unwrap());
        assert!(!assessment.mark_as_submitted().unwrap());
        assert!(assessment.mark_as_synced().unwrap());
        assert_eq!(assessment.status(), AssessmentStatus::Synced);

        assert!(matches!(
            assessment.mark_as_submitted(),
            Err(DomainError::InvalidStatusTransition { .. })
        ));
        assert_eq!(assessment.status(), AssessmentStatus::Synced);
        assert!(!assessment.mark_as_synced().unwrap());
    }

    #[test]
    fn test_draft_cannot_skip_to_synced() {
        let mut assessment = Assessment::new(AssessmentId::new());
        let before = assessment.updated_at();
        assert!(assessment.mark_as_synced().is_err());
        assert_eq!(assessment.status(), AssessmentStatus::Draft);
        assert_eq!(assessment.updated_at(), before);
    }

    #[test]
    fn test_transitions_bump_updated_at() {
        let mut assessment = Assessment::new(AssessmentId::new());
        let created = assessment.created_at();
        assessment.mark_as_submitted().unwrap();
        assert!(assessment.updated_at() > created);
        assert!(assessment.last_modified() >= assessment.updated_at());
    }

    #[test]
    fn test_repair_estimate_groups_by_status() {
        let mut assessment = Assessment::new(AssessmentId::new());
        assessment.site_grounds.step3_mut().update_section(
            |step| &mut step.signage,
            SignagePatch {
                assessment: Some(AssessmentPatch {
                    repair_status: Some(RepairStatus::ImmediateRepair),
                    amount_to_repair: Some("$1,250".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        assessment.site_grounds.step1_mut().update_section(
            |step| &mut step.topography,
            TopographyPatch {
                assessment: Some(AssessmentPatch {
                    repair_status: Some(RepairStatus::ReplacementReserve),
                    amount_to_repair: Some("TBD".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        assessment.mechanical_systems.add_unit_manufacturer(UnitManufacturerPatch {
            assessment: Some(AssessmentPatch {
                repair_status: Some(RepairStatus::ImmediateRepair),
                amount_to_repair: Some("750.50".into()),
                ..Default::default()
            }),
            ..Default::default()
        });

        let estimate = assessment.repair_estimate();
        assert_eq!(estimate.by_status.get(&RepairStatus::ImmediateRepair), Some(&dec!(2000.50)));
        assert_eq!(estimate.total, dec!(2000.50));
        assert_eq!(estimate.unparsed, 1);
    }

    #[test]
    fn test_round_trip_keeps_private_fields() {
        let mut assessment = Assessment::new(AssessmentId::new());
        assessment.mark_as_submitted().unwrap();
        let json = serde_json::to_string(&assessment).unwrap();
        let restored: Assessment = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, assessment);
        assert_eq!(restored.status(), AssessmentStatus::Submitted);
    }
}
