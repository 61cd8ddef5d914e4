use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

use super::assessment::AssessmentTriple;
use super::clock;
use super::section::Section;

/// One page of a form: the page's section fields plus the bookkeeping every
/// step carries.
///
/// Fields are only reachable mutably through `update`, `update_section` and
/// `edit`, each of which refreshes `last_modified` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNode<F> {
    #[serde(flatten)]
    fields: F,
    last_modified: DateTime<Utc>,
    /// Set on the first touch after construction or reset
    #[serde(default)]
    edited: bool,
}

impl<F: Section> Default for StepNode<F> {
    fn default() -> Self {
        Self {
            fields: F::default(),
            last_modified: clock::now(),
            edited: false,
        }
    }
}

impl<F> Deref for StepNode<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.fields
    }
}

impl<F: Section> StepNode<F> {
    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Whether anything has touched this step since it was created
    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Bump the timestamp without changing any field
    pub fn touch(&mut self) {
        self.last_modified = clock::tick(self.last_modified);
        self.edited = true;
    }

    /// Shallow-merge `patch` into the step. Always touches.
    pub fn update(&mut self, patch: F::Patch) -> bool {
        let changed = self.fields.merge(patch);
        self.touch();
        changed
    }

    /// Merge a patch into one nested section of the step.
    pub fn update_section<S, Sel>(&mut self, select: Sel, patch: S::Patch) -> bool
    where
        S: Section,
        Sel: FnOnce(&mut F) -> &mut S,
    {
        let changed = select(&mut self.fields).merge(patch);
        self.touch();
        changed
    }

    /// Arbitrary edit (collection add/remove etc.); touches once.
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut F) -> R) -> R {
        let result = f(&mut self.fields);
        self.touch();
        result
    }

    /// Edit that only touches when `f` reports that it applied.
    pub fn edit_when(&mut self, f: impl FnOnce(&mut F) -> bool) -> bool {
        let applied = f(&mut self.fields);
        if applied {
            self.touch();
        }
        applied
    }

    /// Edit that only touches when `f` succeeds.
    pub fn try_edit<T, E>(&mut self, f: impl FnOnce(&mut F) -> Result<T, E>) -> Result<T, E> {
        let result = f(&mut self.fields)?;
        self.touch();
        Ok(result)
    }

    pub fn collect_assessments<'a>(&'a self, out: &mut Vec<&'a AssessmentTriple>) {
        self.fields.collect_assessments(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::core::section;

    section! {
        pub struct Signage / SignagePatch {
            not_applicable: value(bool),
            types: list(String),
            assessment: assessment,
        }
    }

    section! {
        pub struct SignageStep / SignageStepPatch {
            signage: merge(Signage),
            comments: value(String),
        }
    }

    #[test]
    fn test_update_touches_exactly_once() {
        let mut step = StepNode::<SignageStep>::default();
        let before = step.last_modified();
        assert!(!step.is_edited());

        step.update(SignageStepPatch {
            comments: Some("faded".into()),
            signage: Some(SignagePatch {
                types: Some(vec!["monument".into()]),
                not_applicable: Some(false),
                ..Default::default()
            }),
        });

        assert!(step.last_modified() > before);
        assert!(step.is_edited());
        assert_eq!(step.comments, "faded");
        assert_eq!(step.signage.types, vec!["monument".to_string()]);
    }

    #[test]
    fn test_timestamp_is_monotonic() {
        let mut step = StepNode::<SignageStep>::default();
        let mut last = step.last_modified();
        for i in 0..50 {
            step.update_section(
                |s| &mut s.signage,
                SignagePatch {
                    types: Some(vec![format!("type-{}", i)]),
                    ..Default::default()
                },
            );
            assert!(step.last_modified() > last);
            last = step.last_modified();
        }
    }

    #[test]
    fn test_edit_when_skips_touch_on_noop() {
        let mut step = StepNode::<SignageStep>::default();
        let before = step.last_modified();
        assert!(!step.edit_when(|_| false));
        assert_eq!(step.last_modified(), before);
        assert!(!step.is_edited());
    }

    #[test]
    fn test_serializes_flat() {
        let mut step = StepNode::<SignageStep>::default();
        step.update(SignageStepPatch {
            comments: Some("ok".into()),
            ..Default::default()
        });
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["comments"], "ok");
        assert!(json.get("lastModified").is_some());
        assert_eq!(json["signage"]["assessment"]["repairStatus"], "NA");

        let restored: StepNode<SignageStep> = serde_json::from_value(json).unwrap();
        assert_eq!(restored, step);
    }
}
