use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::domains::root::{RootCollection, Session};
use crate::errors::{PersistenceError, PersistenceResult};

/// Version of the payload layout written by this build
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// One durable copy of the whole tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    /// Lowercase hex SHA-256 of `payload`
    pub checksum: String,
    /// The serialized root collection
    pub payload: String,
}

pub fn checksum(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

impl SnapshotEnvelope {
    pub fn seal(session: &Session) -> PersistenceResult<Self> {
        let payload = serde_json::to_string(session)?;
        Ok(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            checksum: checksum(&payload),
            payload,
        })
    }

    /// Verify, migrate and decode. A snapshot from a newer build is refused
    /// rather than reported corrupt so it is never overwritten.
    pub fn open(&self, key: &str) -> PersistenceResult<RootCollection> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(PersistenceError::UnsupportedSchemaVersion {
                found: self.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        if checksum(&self.payload) != self.checksum {
            return Err(PersistenceError::Corrupt {
                key: key.to_string(),
                reason: "checksum mismatch".to_string(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&self.payload).map_err(|e| PersistenceError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        let value = migrate(key, self.schema_version, value)?;

        serde_json::from_value(value).map_err(|e| PersistenceError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Bring a payload written at `version` up to [`CURRENT_SCHEMA_VERSION`].
fn migrate(key: &str, version: u32, payload: serde_json::Value) -> PersistenceResult<serde_json::Value> {
    match version {
        CURRENT_SCHEMA_VERSION => Ok(payload),
        other => Err(PersistenceError::Corrupt {
            key: key.to_string(),
            reason: format!("no migration from schema version {}", other),
        }),
    }
}

/// Retry policy for failed snapshot writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavePolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for SavePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl SavePolicy {
    /// Exponential backoff with +/-10% jitter; `attempt` is 1-based
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        self.base_delay.mul_f64(f64::from(1u32 << exponent) * jitter)
    }
}

/// Autosave status published to observers
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceHealth {
    pub last_saved_at: Option<DateTime<Utc>>,
    pub saves: u64,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl PersistenceHealth {
    pub fn is_healthy(&self) -> bool {
        self.consecutive_failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_and_open() {
        let session = Session::new();
        let envelope = SnapshotEnvelope::seal(&session).unwrap();
        assert_eq!(envelope.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(envelope.checksum.len(), 64);

        let root = envelope.open("rootStore").unwrap();
        assert_eq!(root.active_assessment_id, Some(session.active_id()));
        assert_eq!(root, session.to_root());
    }

    #[test]
    fn test_tampered_payload_is_corrupt() {
        let mut envelope = SnapshotEnvelope::seal(&Session::new()).unwrap();
        envelope.payload.push(' ');
        assert!(matches!(
            envelope.open("rootStore"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_undecodable_payload_is_corrupt() {
        let payload = r#"{"assessments": 42}"#.to_string();
        let envelope = SnapshotEnvelope {
            schema_version: CURRENT_SCHEMA_VERSION,
            saved_at: Utc::now(),
            checksum: checksum(&payload),
            payload,
        };
        assert!(matches!(
            envelope.open("rootStore"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }

    #[test]
    fn test_schema_version_gate() {
        let mut envelope = SnapshotEnvelope::seal(&Session::new()).unwrap();
        envelope.schema_version = CURRENT_SCHEMA_VERSION + 1;
        assert!(matches!(
            envelope.open("rootStore"),
            Err(PersistenceError::UnsupportedSchemaVersion { found: 2, supported: 1 })
        ));

        envelope.schema_version = 0;
        assert!(envelope.open("rootStore").is_err());
    }

    #[test]
    fn test_backoff_grows() {
        let policy = SavePolicy::default();
        let first = policy.delay_for(1);
        let third = policy.delay_for(3);
        assert!(first >= Duration::from_millis(225) && first <= Duration::from_millis(275));
        assert!(third >= Duration::from_millis(900) && third <= Duration::from_millis(1100));
    }
}
