use crate::domains::core::{form_store, StepIndex};

use super::types::{
    AmenitiesWalls, LandscapingSignage, PavingCurbsSidewalks, TopographyDrainage, UtilitiesLighting,
};

form_store! {
    /// Site & Grounds questionnaire
    pub struct SiteGrounds {
        form: SiteGrounds,
        key: StepIndex<5>,
        steps {
            step1: TopographyDrainage,
            step2: PavingCurbsSidewalks,
            step3: LandscapingSignage,
            step4: UtilitiesLighting,
            step5: AmenitiesWalls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::core::{AssessmentPatch, Checklist, Condition, FormStore, RepairStatus, Section};
    use crate::domains::site_grounds::types::*;

    #[test]
    fn test_section_update_merges_assessment() {
        let mut form = SiteGrounds::default();
        form.step3_mut().update_section(
            |step| &mut step.signage,
            SignagePatch {
                types: Some(vec!["monument".into(), "pylon".into()]),
                assessment: Some(AssessmentPatch {
                    condition: Some(Condition::Fair),
                    amount_to_repair: Some("1200".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        form.step3_mut().update_section(
            |step| &mut step.signage,
            SignagePatch {
                assessment: Some(AssessmentPatch {
                    repair_status: Some(RepairStatus::ShortTerm),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );

        let signage = &form.step3().signage;
        assert_eq!(signage.types.len(), 2);
        assert_eq!(signage.assessment.condition, Condition::Fair);
        assert_eq!(signage.assessment.repair_status, RepairStatus::ShortTerm);
        assert_eq!(signage.assessment.amount_to_repair, "1200");
    }

    #[test]
    fn test_checklist_is_replaced_wholesale() {
        let mut form = SiteGrounds::default();
        let providers: Checklist = [("water".to_string(), true), ("gas".to_string(), false)].into();
        form.update_step4(UtilitiesLightingPatch {
            utilities: Some(SiteUtilitiesPatch {
                providers: Some(providers),
                ..Default::default()
            }),
            ..Default::default()
        });
        let providers: Checklist = [("electric".to_string(), true)].into();
        form.update_step4(UtilitiesLightingPatch {
            utilities: Some(SiteUtilitiesPatch {
                providers: Some(providers.clone()),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(form.step4().utilities.providers, providers);
    }

    #[test]
    fn test_every_accordion_carries_an_assessment() {
        let form = SiteGrounds::default();
        let mut triples = Vec::new();
        form.collect_assessments(&mut triples);
        assert_eq!(triples.len(), 12);

        let mut step = TopographyDrainage::default();
        let mut out = Vec::new();
        step.merge(TopographyDrainagePatch {
            comments: Some("flat".into()),
            ..Default::default()
        });
        step.collect_assessments(&mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_not_applicable_round_trips_with_values() {
        let mut form = SiteGrounds::default();
        form.update_step2(PavingCurbsSidewalksPatch {
            curbs: Some(CurbsPatch {
                materials: Some(vec!["granite".into()]),
                not_applicable: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        let json = serde_json::to_string(&form).unwrap();
        let restored: SiteGrounds = serde_json::from_str(&json).unwrap();
        assert!(restored.step2().curbs.not_applicable);
        assert_eq!(restored.step2().curbs.materials, vec!["granite".to_string()]);
    }
}
