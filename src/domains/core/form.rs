use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

use super::assessment::AssessmentTriple;
use super::clock;
use super::navigation::{StepCursor, StepKey};
use crate::errors::DomainResult;
use crate::types::FormType;

/// One questionnaire: an ordered set of steps plus the current-step cursor.
///
/// Implementations come from [`form_store!`]; navigation and reset are shared
/// here.
pub trait FormStore: Default + Clone + PartialEq + Debug + Serialize + DeserializeOwned {
    type Key: StepKey;

    const FORM: FormType;

    fn cursor(&self) -> &StepCursor<Self::Key>;

    fn cursor_mut(&mut self) -> &mut StepCursor<Self::Key>;

    /// When the form was last cleared (or created)
    fn reset_at(&self) -> DateTime<Utc>;

    fn set_reset_at(&mut self, at: DateTime<Utc>);

    /// Step label to "edited since the last reset"
    fn completion_status(&self) -> BTreeMap<String, bool>;

    fn step_last_modified(&self, step: Self::Key) -> DateTime<Utc>;

    /// Latest of the reset time and every step's timestamp
    fn last_modified(&self) -> DateTime<Utc>;

    /// Decode `patch` as the step's patch type and merge it
    fn apply_step_patch(&mut self, step: Self::Key, patch: serde_json::Value) -> DomainResult<bool>;

    fn touch_step(&mut self, step: Self::Key);

    fn collect_assessments<'a>(&'a self, out: &mut Vec<&'a AssessmentTriple>);

    /// Replace every step with a fresh default and rewind the cursor
    fn clear_all(&mut self) {
        let at = clock::tick(self.last_modified());
        *self = Self::default();
        self.set_reset_at(at);
    }

    fn current_step(&self) -> Self::Key {
        self.cursor().current()
    }

    fn next_step(&mut self) -> bool {
        self.cursor_mut().next()
    }

    fn previous_step(&mut self) -> bool {
        self.cursor_mut().previous()
    }

    fn set_current_step(&mut self, ordinal: u8) -> bool {
        self.cursor_mut().set_ordinal(ordinal)
    }

    fn is_first_step(&self) -> bool {
        self.cursor().is_first()
    }

    fn is_last_step(&self) -> bool {
        self.cursor().is_last()
    }

    fn progress(&self) -> f64 {
        self.cursor().progress()
    }

    fn completed_steps(&self) -> usize {
        self.completion_status().values().filter(|done| **done).count()
    }
}

/// Declare a form store. Steps are matched to keys by declaration order, so
/// the first listed step is ordinal 1.
///
/// ```ignore
/// form_store! {
///     pub struct SiteGrounds {
///         form: SiteGrounds,
///         key: StepIndex<5>,
///         steps {
///             step1: TopographyStep,
///             step2: PavingStep,
///             ...
///         }
///     }
/// }
/// ```
macro_rules! form_store {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            form: $form:ident,
            key: $key:ty,
            steps {
                $( $field:ident : $ty:ty ),* $(,)?
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            current_step: $crate::domains::core::StepCursor<$key>,
            $( $field: $crate::domains::core::StepNode<$ty>, )*
            reset_at: chrono::DateTime<chrono::Utc>,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    current_step: Default::default(),
                    $( $field: Default::default(), )*
                    reset_at: $crate::domains::core::clock::now(),
                }
            }
        }

        paste::paste! {
            impl $name {
                $(
                    pub fn $field(&self) -> &$crate::domains::core::StepNode<$ty> {
                        &self.$field
                    }

                    pub fn [<$field _mut>](&mut self) -> &mut $crate::domains::core::StepNode<$ty> {
                        &mut self.$field
                    }

                    pub fn [<update_ $field>](
                        &mut self,
                        patch: <$ty as $crate::domains::core::Section>::Patch,
                    ) -> bool {
                        self.$field.update(patch)
                    }
                )*
            }
        }

        impl $crate::domains::core::FormStore for $name {
            type Key = $key;

            const FORM: $crate::types::FormType = $crate::types::FormType::$form;

            fn cursor(&self) -> &$crate::domains::core::StepCursor<$key> {
                &self.current_step
            }

            fn cursor_mut(&mut self) -> &mut $crate::domains::core::StepCursor<$key> {
                &mut self.current_step
            }

            fn reset_at(&self) -> chrono::DateTime<chrono::Utc> {
                self.reset_at
            }

            fn set_reset_at(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.reset_at = at;
            }

            fn completion_status(&self) -> std::collections::BTreeMap<String, bool> {
                use $crate::domains::core::StepKey;
                let mut status = std::collections::BTreeMap::new();
                let mut ordinal = 0u8;
                $(
                    ordinal += 1;
                    if let Some(key) = <$key as StepKey>::from_ordinal(ordinal) {
                        status.insert(key.label(), self.$field.is_edited());
                    }
                )*
                status
            }

            fn step_last_modified(&self, step: $key) -> chrono::DateTime<chrono::Utc> {
                use $crate::domains::core::StepKey;
                let target = step.ordinal();
                let mut ordinal = 0u8;
                $(
                    ordinal += 1;
                    if ordinal == target {
                        return self.$field.last_modified();
                    }
                )*
                self.reset_at
            }

            fn last_modified(&self) -> chrono::DateTime<chrono::Utc> {
                let mut latest = self.reset_at;
                $( latest = latest.max(self.$field.last_modified()); )*
                latest
            }

            fn apply_step_patch(
                &mut self,
                step: $key,
                patch: serde_json::Value,
            ) -> $crate::errors::DomainResult<bool> {
                use $crate::domains::core::StepKey;
                let target = step.ordinal();
                let mut ordinal = 0u8;
                $(
                    ordinal += 1;
                    if ordinal == target {
                        let patch: <$ty as $crate::domains::core::Section>::Patch =
                            serde_json::from_value(patch)?;
                        return Ok(self.$field.update(patch));
                    }
                )*
                Err($crate::errors::DomainError::InvalidStep {
                    form: $crate::types::FormType::$form,
                    step: target,
                })
            }

            fn touch_step(&mut self, step: $key) {
                use $crate::domains::core::StepKey;
                let target = step.ordinal();
                let mut ordinal = 0u8;
                $(
                    ordinal += 1;
                    if ordinal == target {
                        self.$field.touch();
                        return;
                    }
                )*
            }

            fn collect_assessments<'a>(
                &'a self,
                out: &mut Vec<&'a $crate::domains::core::AssessmentTriple>,
            ) {
                $( self.$field.collect_assessments(out); )*
            }
        }
    };
}

pub(crate) use form_store;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::core::{section, StepIndex};

    section! {
        pub struct Notes / NotesPatch {
            comments: value(String),
            tags: list(String),
        }
    }

    section! {
        pub struct Lighting / LightingPatch {
            fixtures: list(String),
            assessment: assessment,
        }
    }

    form_store! {
        pub struct Survey {
            form: SiteGrounds,
            key: StepIndex<3>,
            steps {
                step1: Notes,
                step2: Lighting,
                step3: Notes,
            }
        }
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut form = Survey::default();
        assert!(form.is_first_step());
        assert!(!form.previous_step());
        assert!(form.next_step());
        assert!(form.next_step());
        assert!(!form.next_step());
        assert!(form.is_last_step());
        assert_eq!(form.current_step().get(), 3);
        assert!(!form.set_current_step(9));
        assert_eq!(form.current_step().get(), 3);
        assert_eq!(form.progress(), 100.0);
    }

    #[test]
    fn test_apply_step_patch_routes_by_ordinal() {
        let mut form = Survey::default();
        let step = StepIndex::new(2).unwrap();
        assert!(form
            .apply_step_patch(step, serde_json::json!({"fixtures": ["led"]}))
            .unwrap());
        assert_eq!(form.step2().fixtures, vec!["led".to_string()]);

        let err = form.apply_step_patch(step, serde_json::json!({"comments": "x"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_clear_all_restores_defaults() {
        let mut form = Survey::default();
        form.update_step1(NotesPatch {
            comments: Some("cracked".into()),
            ..Default::default()
        });
        form.update_step2(LightingPatch {
            fixtures: Some(vec!["sodium".into()]),
            ..Default::default()
        });
        form.set_current_step(3);
        let edited_at = form.last_modified();

        form.clear_all();

        let fresh = Survey::default();
        assert_eq!(form.step1().fields(), fresh.step1().fields());
        assert_eq!(form.step2().fields(), fresh.step2().fields());
        assert_eq!(form.step3().fields(), fresh.step3().fields());
        assert_eq!(form.current_step().get(), 1);
        assert!(form.last_modified() > edited_at);
        assert!(form.completion_status().values().all(|done| !done));
    }

    #[test]
    fn test_completion_status_tracks_touched_steps() {
        let mut form = Survey::default();
        form.touch_step(StepIndex::new(3).unwrap());
        let status = form.completion_status();
        assert_eq!(status.get("step1"), Some(&false));
        assert_eq!(status.get("step3"), Some(&true));
        assert_eq!(form.completed_steps(), 1);
    }

    #[test]
    fn test_form_round_trip() {
        let mut form = Survey::default();
        form.update_step3(NotesPatch {
            tags: Some(vec!["a".into(), "b".into()]),
            ..Default::default()
        });
        form.next_step();
        let json = serde_json::to_string(&form).unwrap();
        let restored: Survey = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, form);
    }
}
