use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::section::Section;

/// Observed condition of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::Poor => "poor",
        }
    }
}

/// Recommended repair horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum RepairStatus {
    #[serde(rename = "IR")]
    ImmediateRepair,
    #[serde(rename = "ST")]
    ShortTerm,
    #[serde(rename = "RR")]
    ReplacementReserve,
    #[serde(rename = "RM")]
    RoutineMaintenance,
    #[serde(rename = "INV")]
    Investigate,
    #[default]
    #[serde(rename = "NA")]
    NotApplicable,
}

impl RepairStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairStatus::ImmediateRepair => "IR",
            RepairStatus::ShortTerm => "ST",
            RepairStatus::ReplacementReserve => "RR",
            RepairStatus::RoutineMaintenance => "RM",
            RepairStatus::Investigate => "INV",
            RepairStatus::NotApplicable => "NA",
        }
    }
}

/// Yes/no answer for questions that gate a sub-section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

/// Keyed checkbox selections (`{"water": true, "gas": false}`); replaced wholesale on update
pub type Checklist = BTreeMap<String, bool>;

/// One line of a fixed checklist with an optional remark
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChecklistItem {
    pub key: String,
    pub label: String,
    pub checked: bool,
    pub remark: String,
}

/// The condition / repair-status / amount-to-repair triple carried by every accordion
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentTriple {
    pub condition: Condition,
    pub repair_status: RepairStatus,
    /// Free-form, callers format and parse it
    pub amount_to_repair: String,
}

/// Partial update for [`AssessmentTriple`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssessmentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_status: Option<RepairStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_to_repair: Option<String>,
}

impl AssessmentTriple {
    /// Merge only the provided keys
    pub fn update_assessment(&mut self, patch: AssessmentPatch) -> bool {
        let mut changed = false;
        if let Some(condition) = patch.condition {
            changed |= self.condition != condition;
            self.condition = condition;
        }
        if let Some(repair_status) = patch.repair_status {
            changed |= self.repair_status != repair_status;
            self.repair_status = repair_status;
        }
        if let Some(amount) = patch.amount_to_repair {
            if self.amount_to_repair != amount {
                self.amount_to_repair = amount;
                changed = true;
            }
        }
        changed
    }

    /// Parse the amount as currency. Blank amounts are `None`; thousands
    /// separators and a leading `$` are accepted.
    pub fn amount_decimal(&self) -> Option<Result<Decimal, rust_decimal::Error>> {
        let cleaned: String = self
            .amount_to_repair
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        if cleaned.is_empty() {
            None
        } else {
            Some(Decimal::from_str(&cleaned))
        }
    }
}

impl Section for AssessmentTriple {
    type Patch = AssessmentPatch;

    fn merge(&mut self, patch: AssessmentPatch) -> bool {
        self.update_assessment(patch)
    }

    fn collect_assessments<'a>(&'a self, out: &mut Vec<&'a AssessmentTriple>) {
        out.push(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_update_assessment_keeps_unspecified_keys() {
        let mut triple = AssessmentTriple {
            condition: Condition::Fair,
            repair_status: RepairStatus::ShortTerm,
            amount_to_repair: "1500".into(),
        };

        triple.update_assessment(AssessmentPatch {
            condition: Some(Condition::Poor),
            ..Default::default()
        });

        assert_eq!(triple.condition, Condition::Poor);
        assert_eq!(triple.repair_status, RepairStatus::ShortTerm);
        assert_eq!(triple.amount_to_repair, "1500");
    }

    #[test]
    fn test_wire_format() {
        let triple = AssessmentTriple {
            condition: Condition::Good,
            repair_status: RepairStatus::Investigate,
            amount_to_repair: "$2,000".into(),
        };
        let json = serde_json::to_value(&triple).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"condition": "good", "repairStatus": "INV", "amountToRepair": "$2,000"})
        );

        let patch: AssessmentPatch = serde_json::from_str(r#"{"repairStatus": "RR"}"#).unwrap();
        assert_eq!(patch.repair_status, Some(RepairStatus::ReplacementReserve));
        assert!(serde_json::from_str::<AssessmentPatch>(r#"{"condition": "excellent"}"#).is_err());
    }

    #[test]
    fn test_amount_parsing() {
        let mut triple = AssessmentTriple::default();
        assert!(triple.amount_decimal().is_none());

        triple.amount_to_repair = "$12,500.50".into();
        assert_eq!(triple.amount_decimal().unwrap().unwrap(), dec!(12500.50));

        triple.amount_to_repair = "call vendor".into();
        assert!(triple.amount_decimal().unwrap().is_err());
    }
}
