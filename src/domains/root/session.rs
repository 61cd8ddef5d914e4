use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::collection::RootCollection;
use crate::domains::assessment::Assessment;
use crate::errors::{DomainError, DomainResult};
use crate::types::AssessmentId;

/// How a session came out of [`Session::bootstrap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The stored active pointer was valid
    Restored { assessments: usize },
    /// The pointer was missing or dangling; the most recently edited assessment was picked
    Repaired { active: AssessmentId },
    /// Nothing was stored; a new assessment was created
    Created { active: AssessmentId },
}

/// The live tree. There is always exactly one active assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    active: Assessment,
    others: BTreeMap<AssessmentId, Assessment>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            active: Assessment::new(AssessmentId::new()),
            others: BTreeMap::new(),
        }
    }

    /// Turn a persisted collection into a session, establishing the active
    /// assessment if the stored pointer does not name one.
    pub fn bootstrap(mut root: RootCollection) -> (Session, BootstrapOutcome) {
        if let Some(active) = root
            .active_assessment_id
            .and_then(|id| root.assessments.remove(&id))
        {
            let outcome = BootstrapOutcome::Restored {
                assessments: root.assessments.len() + 1,
            };
            return (
                Session {
                    active,
                    others: root.assessments,
                },
                outcome,
            );
        }

        let latest = root
            .assessments
            .values()
            .max_by_key(|assessment| assessment.last_modified())
            .map(|assessment| assessment.id());

        match latest.and_then(|id| root.assessments.remove(&id)) {
            Some(active) => {
                let outcome = BootstrapOutcome::Repaired { active: active.id() };
                (
                    Session {
                        active,
                        others: root.assessments,
                    },
                    outcome,
                )
            }
            None => {
                let session = Session::new();
                let outcome = BootstrapOutcome::Created {
                    active: session.active_id(),
                };
                (session, outcome)
            }
        }
    }

    pub fn active(&self) -> &Assessment {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut Assessment {
        &mut self.active
    }

    pub fn active_id(&self) -> AssessmentId {
        self.active.id()
    }

    pub fn get(&self, id: AssessmentId) -> Option<&Assessment> {
        if self.active.id() == id {
            Some(&self.active)
        } else {
            self.others.get(&id)
        }
    }

    pub fn get_mut(&mut self, id: AssessmentId) -> Option<&mut Assessment> {
        if self.active.id() == id {
            Some(&mut self.active)
        } else {
            self.others.get_mut(&id)
        }
    }

    pub fn contains(&self, id: AssessmentId) -> bool {
        self.get(id).is_some()
    }

    /// All ids, active included, in id order
    pub fn assessment_ids(&self) -> Vec<AssessmentId> {
        let mut ids: Vec<AssessmentId> = self.others.keys().copied().collect();
        ids.push(self.active.id());
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.others.len() + 1
    }

    /// Add an assessment without switching to it
    pub fn create_assessment(&mut self, id: AssessmentId) -> DomainResult<()> {
        if self.contains(id) {
            return Err(DomainError::DuplicateAssessment(id));
        }
        self.others.insert(id, Assessment::new(id));
        Ok(())
    }

    /// Create a new assessment and make it active
    pub fn start_new_assessment(&mut self) -> AssessmentId {
        let mut id = AssessmentId::new();
        while self.contains(id) {
            id = AssessmentId::new();
        }
        let previous = std::mem::replace(&mut self.active, Assessment::new(id));
        self.others.insert(previous.id(), previous);
        id
    }

    /// Make `id` active. False if there is no such assessment.
    pub fn switch_to(&mut self, id: AssessmentId) -> bool {
        if self.active.id() == id {
            return true;
        }
        let Some(target) = self.others.remove(&id) else {
            return false;
        };
        let previous = std::mem::replace(&mut self.active, target);
        self.others.insert(previous.id(), previous);
        true
    }

    /// Drop every assessment and start over with a single new one
    pub fn reset_all(&mut self) -> AssessmentId {
        *self = Session::new();
        self.active_id()
    }

    /// Owned copy in the persisted shape
    pub fn to_root(&self) -> RootCollection {
        let mut assessments = self.others.clone();
        assessments.insert(self.active.id(), self.active.clone());
        RootCollection {
            assessments,
            active_assessment_id: Some(self.active.id()),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RootView<'a> {
    assessments: BTreeMap<AssessmentId, &'a Assessment>,
    active_assessment_id: AssessmentId,
}

/// Serializes in the [`RootCollection`] shape without cloning the tree
impl Serialize for Session {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut assessments: BTreeMap<AssessmentId, &Assessment> = self.others.iter().map(|(id, a)| (*id, a)).collect();
        assessments.insert(self.active.id(), &self.active);
        RootView {
            assessments,
            active_assessment_id: self.active.id(),
        }
        .serialize(serializer)
    }
}
