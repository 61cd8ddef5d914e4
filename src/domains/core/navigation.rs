use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Debug;

/// Identifies a step within a form. Steps are numbered 1..=COUNT for
/// navigation regardless of how the key itself is spelled.
pub trait StepKey: Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> {
    const COUNT: u8;

    fn first() -> Self;

    /// 1-based lookup; `None` when out of range
    fn from_ordinal(ordinal: u8) -> Option<Self>;

    fn ordinal(&self) -> u8;

    fn label(&self) -> String {
        format!("step{}", self.ordinal())
    }
}

/// Integer step key constrained to `1..=N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepIndex<const N: u8>(u8);

impl<const N: u8> StepIndex<N> {
    pub fn new(step: u8) -> Option<Self> {
        if (1..=N).contains(&step) {
            Some(Self(step))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl<const N: u8> StepKey for StepIndex<N> {
    const COUNT: u8 = N;

    fn first() -> Self {
        Self(1)
    }

    fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::new(ordinal)
    }

    fn ordinal(&self) -> u8 {
        self.0
    }
}

impl<const N: u8> Serialize for StepIndex<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de, const N: u8> Deserialize<'de> for StepIndex<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let step = u8::deserialize(deserializer)?;
        StepIndex::new(step).ok_or_else(|| {
            serde::de::Error::custom(format!("step {} outside 1..={}", step, N))
        })
    }
}

/// Current-step pointer for a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct StepCursor<K: StepKey> {
    current: K,
}

impl<K: StepKey> Default for StepCursor<K> {
    fn default() -> Self {
        Self { current: K::first() }
    }
}

impl<K: StepKey> StepCursor<K> {
    pub fn current(&self) -> K {
        self.current
    }

    pub fn set(&mut self, step: K) {
        self.current = step;
    }

    /// Jump to a 1-based step; no-op outside the form's range.
    pub fn set_ordinal(&mut self, ordinal: u8) -> bool {
        match K::from_ordinal(ordinal) {
            Some(step) if step != self.current => {
                self.current = step;
                true
            }
            _ => false,
        }
    }

    pub fn next(&mut self) -> bool {
        match self.current.ordinal().checked_add(1) {
            Some(ordinal) => self.set_ordinal(ordinal),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.current.ordinal().checked_sub(1) {
            Some(ordinal) => self.set_ordinal(ordinal),
            None => false,
        }
    }

    pub fn is_first(&self) -> bool {
        self.current.ordinal() == 1
    }

    pub fn is_last(&self) -> bool {
        self.current.ordinal() == K::COUNT
    }

    /// Percentage through the form, `current / COUNT * 100`
    pub fn progress(&self) -> f64 {
        f64::from(self.current.ordinal()) / f64::from(K::COUNT) * 100.0
    }
}
