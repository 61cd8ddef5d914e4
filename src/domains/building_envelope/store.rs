use crate::domains::core::{form_store, StepIndex};

use super::types::{BalconiesStairs, ExteriorWalls, FoundationStructure, Roofing, WindowsDoors};

form_store! {
    /// Building Envelope questionnaire
    pub struct BuildingEnvelope {
        form: BuildingEnvelope,
        key: StepIndex<5>,
        steps {
            step1: FoundationStructure,
            step2: ExteriorWalls,
            step3: WindowsDoors,
            step4: Roofing,
            step5: BalconiesStairs,
        }
    }
}
