use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Deref;

use super::assessment::AssessmentTriple;
use super::section::Section;
use crate::errors::CollectionBoundsError;
use crate::types::RecordId;

/// A repeated record shape kept in a [`RecordCollection`]
pub trait Record: Section {
    /// Wire name of the collection, used in errors and logs
    const KIND: &'static str;
}

/// Cardinality bound of a collection
pub trait CollectionBound: Copy + Default + Debug + PartialEq {
    const MAX: Option<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unbounded;

impl CollectionBound for Unbounded {
    const MAX: Option<usize> = None;
}

/// Holds at most `N` records; `add` fails once full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtMost<const N: usize>;

impl<const N: usize> CollectionBound for AtMost<N> {
    const MAX: Option<usize> = Some(N);
}

/// A record together with the id it was created under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyed<R> {
    id: RecordId,
    #[serde(flatten)]
    pub fields: R,
}

impl<R> Keyed<R> {
    pub fn id(&self) -> RecordId {
        self.id
    }
}

impl<R> Deref for Keyed<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.fields
    }
}

/// Ordered list of records addressed by generated id
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCollection<R, B = Unbounded> {
    records: Vec<Keyed<R>>,
    bound: PhantomData<B>,
}

impl<R, B> Default for RecordCollection<R, B> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            bound: PhantomData,
        }
    }
}

impl<R: Record, B: CollectionBound> RecordCollection<R, B> {
    /// Append a record built from defaults plus `patch`, honouring the bound.
    pub fn try_add(&mut self, patch: R::Patch) -> Result<RecordId, CollectionBoundsError> {
        if let Some(max) = B::MAX {
            if self.records.len() >= max {
                return Err(CollectionBoundsError {
                    collection: R::KIND.to_string(),
                    max,
                });
            }
        }

        Ok(self.push_new(patch))
    }

    fn push_new(&mut self, patch: R::Patch) -> RecordId {
        let mut id = RecordId::new();
        while self.records.iter().any(|record| record.id == id) {
            id = RecordId::new();
        }

        let mut fields = R::default();
        fields.merge(patch);
        self.records.push(Keyed { id, fields });
        id
    }

    /// Merge into the record with `id`; false if there is none
    pub fn update(&mut self, id: RecordId, patch: R::Patch) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                record.fields.merge(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the record with `id`; false if there is none
    pub fn remove(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    pub fn get(&self, id: RecordId) -> Option<&Keyed<R>> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyed<R>> {
        self.records.iter()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        B::MAX.is_some_and(|max| self.records.len() >= max)
    }

    pub fn collect_assessments<'a>(&'a self, out: &mut Vec<&'a AssessmentTriple>) {
        for record in &self.records {
            record.fields.collect_assessments(out);
        }
    }
}

impl<R: Record> RecordCollection<R, Unbounded> {
    pub fn add(&mut self, patch: R::Patch) -> RecordId {
        self.push_new(patch)
    }
}

impl<R: Record, const N: usize> RecordCollection<R, AtMost<N>> {
    pub fn add(&mut self, patch: R::Patch) -> Result<RecordId, CollectionBoundsError> {
        self.try_add(patch)
    }
}

impl<R: Serialize, B> Serialize for RecordCollection<R, B> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

impl<'de, R: Record, B: CollectionBound> Deserialize<'de> for RecordCollection<R, B> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<Keyed<R>>::deserialize(deserializer)?;

        if let Some(max) = B::MAX {
            if records.len() > max {
                return Err(D::Error::custom(format!(
                    "{} holds {} records, at most {} allowed",
                    R::KIND,
                    records.len(),
                    max
                )));
            }
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(D::Error::custom(format!(
                    "duplicate id {} in {}",
                    record.id,
                    R::KIND
                )));
            }
        }

        Ok(Self {
            records,
            bound: PhantomData,
        })
    }
}
