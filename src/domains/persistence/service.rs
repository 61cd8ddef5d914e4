use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::repository::{SnapshotRepository, SqliteSnapshotRepository};
use super::types::PersistenceHealth;
use super::worker::{AutosaveMessage, AutosaveWorker};
use crate::config::StoreConfig;
use crate::domains::assessment::Assessment;
use crate::domains::root::{BootstrapOutcome, RootCollection, Session};
use crate::errors::{DomainResult, PersistenceError, PersistenceResult, ServiceResult};
use crate::types::AssessmentId;

const MESSAGE_BUFFER: usize = 16;

/// Handle to the live inspection tree.
///
/// Every write goes through [`mutate`](Self::mutate) or one of its variants,
/// which bump a revision counter. The autosave worker and any observers
/// listen to that counter; observers of the active assessment get a separate
/// channel that only fires on a switch.
pub struct InspectionStore {
    session: Arc<RwLock<Session>>,
    revision: watch::Sender<u64>,
    active: watch::Sender<AssessmentId>,
    health: watch::Receiver<PersistenceHealth>,
    messages: mpsc::Sender<AutosaveMessage>,
    worker: Mutex<Option<JoinHandle<()>>>,
    snapshot_key: String,
}

impl InspectionStore {
    /// Open the SQLite snapshot store named by `config`
    pub async fn open(config: StoreConfig) -> ServiceResult<Self> {
        let repository = SqliteSnapshotRepository::connect(&config.database_url).await?;
        Self::open_with_repository(Arc::new(repository), config).await
    }

    pub async fn open_with_repository(
        repository: Arc<dyn SnapshotRepository>,
        config: StoreConfig,
    ) -> ServiceResult<Self> {
        let key = config.snapshot_key.clone();
        let root = load_root(repository.as_ref(), &key).await?;
        let (session, outcome) = Session::bootstrap(root);

        match outcome {
            BootstrapOutcome::Restored { assessments } => {
                log::info!("Restored {} assessment(s) from '{}'", assessments, key)
            }
            BootstrapOutcome::Repaired { active } => {
                log::warn!("Active assessment pointer in '{}' was invalid; using {}", key, active)
            }
            BootstrapOutcome::Created { active } => {
                log::info!("No stored assessments under '{}'; created {}", key, active)
            }
        }

        let (revision, revisions) = watch::channel(0u64);
        let (active, _) = watch::channel(session.active_id());
        let (health_tx, health) = watch::channel(PersistenceHealth::default());
        let (messages, receiver) = mpsc::channel(MESSAGE_BUFFER);
        let session = Arc::new(RwLock::new(session));

        let worker = AutosaveWorker::new(
            repository,
            session.clone(),
            key.clone(),
            config.debounce,
            config.save_policy,
            revisions,
            health_tx,
            receiver,
        )
        .start();

        // A created or repaired tree differs from what is on disk
        if !matches!(outcome, BootstrapOutcome::Restored { .. }) {
            revision.send_modify(|r| *r += 1);
        }

        Ok(Self {
            session,
            revision,
            active,
            health,
            messages,
            worker: Mutex::new(Some(worker)),
            snapshot_key: key,
        })
    }

    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }

    pub fn read<R>(&self, f: impl FnOnce(&Session) -> R) -> ServiceResult<R> {
        let session = self.session.read().map_err(|_| PersistenceError::LockPoisoned)?;
        Ok(f(&session))
    }

    /// Apply one change to the tree. Each call is one revision: one save
    /// trigger and one change notification.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Session) -> R) -> ServiceResult<R> {
        let mut session = self.session.write().map_err(|_| PersistenceError::LockPoisoned)?;
        let result = f(&mut session);
        self.publish(&session);
        Ok(result)
    }

    /// Like [`mutate`](Self::mutate), but a failed operation publishes nothing
    pub fn try_mutate<R>(&self, f: impl FnOnce(&mut Session) -> DomainResult<R>) -> ServiceResult<R> {
        let mut session = self.session.write().map_err(|_| PersistenceError::LockPoisoned)?;
        let result = f(&mut session)?;
        self.publish(&session);
        Ok(result)
    }

    /// Like [`try_mutate`](Self::try_mutate), but publishes only when
    /// `changed` holds for the result. No-op operations schedule no save.
    pub fn try_mutate_if<R>(
        &self,
        f: impl FnOnce(&mut Session) -> DomainResult<R>,
        changed: impl FnOnce(&R) -> bool,
    ) -> ServiceResult<R> {
        let mut session = self.session.write().map_err(|_| PersistenceError::LockPoisoned)?;
        let result = f(&mut session)?;
        if changed(&result) {
            self.publish(&session);
        }
        Ok(result)
    }

    /// Change the active assessment and bump its `updated_at`
    pub fn mutate_active<R>(&self, f: impl FnOnce(&mut Assessment) -> R) -> ServiceResult<R> {
        self.mutate(|session| {
            let assessment = session.active_mut();
            let result = f(&mut *assessment);
            assessment.touch();
            result
        })
    }

    fn publish(&self, session: &Session) {
        self.revision.send_modify(|r| *r += 1);
        let id = session.active_id();
        self.active.send_if_modified(|current| {
            if *current == id {
                false
            } else {
                log::info!("Active assessment switched from {} to {}", current, id);
                *current = id;
                true
            }
        });
    }

    pub fn active_id(&self) -> AssessmentId {
        *self.active.borrow()
    }

    /// Owned copy of the whole tree in its persisted shape
    pub fn to_root(&self) -> ServiceResult<RootCollection> {
        self.read(Session::to_root)
    }

    /// Fires once per revision
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Fires only when a different assessment becomes active
    pub fn subscribe_active(&self) -> watch::Receiver<AssessmentId> {
        self.active.subscribe()
    }

    pub fn subscribe_health(&self) -> watch::Receiver<PersistenceHealth> {
        self.health.clone()
    }

    pub fn health(&self) -> PersistenceHealth {
        self.health.borrow().clone()
    }

    /// Write any unsaved revision now
    pub async fn flush(&self) -> ServiceResult<()> {
        let (response, reply) = oneshot::channel();
        self.messages
            .send(AutosaveMessage::Flush { response })
            .await
            .map_err(|_| PersistenceError::WorkerStopped)?;
        reply.await.map_err(|_| PersistenceError::WorkerStopped)??;
        Ok(())
    }

    /// Save outstanding changes and stop the autosave worker. Later writes
    /// stay in memory only.
    pub async fn shutdown(&self) -> ServiceResult<()> {
        let worker = self
            .worker
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned)?
            .take();
        let Some(worker) = worker else {
            return Ok(());
        };

        let (response, reply) = oneshot::channel();
        if self
            .messages
            .send(AutosaveMessage::Shutdown { response })
            .await
            .is_ok()
        {
            let _ = reply.await;
        }

        worker.await.map_err(|e| {
            log::error!("Autosave worker for '{}' panicked: {}", self.snapshot_key, e);
            PersistenceError::WorkerStopped
        })?;
        Ok(())
    }
}

/// Read the stored tree. A corrupt snapshot is moved aside and an empty
/// collection returned in its place.
async fn load_root(repository: &dyn SnapshotRepository, key: &str) -> PersistenceResult<RootCollection> {
    let Some(envelope) = repository.load(key).await? else {
        return Ok(RootCollection::default());
    };

    match envelope.open(key) {
        Ok(root) => Ok(root),
        Err(PersistenceError::Corrupt { reason, .. }) => {
            let moved = repository.quarantine(key).await?;
            log::error!(
                "Snapshot '{}' is corrupt ({}); moved to '{}' and starting fresh",
                key,
                reason,
                moved
            );
            Ok(RootCollection::default())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::persistence::repository::InMemorySnapshotRepository;
    use crate::domains::persistence::types::{checksum, SnapshotEnvelope, CURRENT_SCHEMA_VERSION};
    use crate::domains::project_summary::ProjectInformationPatch;
    use crate::errors::{DomainError, ServiceError};
    use crate::types::AssessmentStatus;

    fn config() -> StoreConfig {
        StoreConfig::new("sqlite::memory:")
    }

    fn name_patch(name: &str) -> ProjectInformationPatch {
        ProjectInformationPatch {
            project_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_open_creates_and_persists() {
        let repo = Arc::new(InMemorySnapshotRepository::new());
        let store = InspectionStore::open_with_repository(repo.clone(), config())
            .await
            .unwrap();
        store.flush().await.unwrap();
        assert_eq!(repo.saves(), 1);

        let active = store.active_id();
        store
            .mutate_active(|a| a.project_summary.update_step1(name_patch("Oak Tower")))
            .unwrap();
        store.shutdown().await.unwrap();

        let reopened = InspectionStore::open_with_repository(repo.clone(), config())
            .await
            .unwrap();
        assert_eq!(reopened.active_id(), active);
        let name = reopened
            .read(|s| s.active().project_summary.step1().project_name.clone())
            .unwrap();
        assert_eq!(name, "Oak Tower");

        let saves = repo.saves();
        reopened.flush().await.unwrap();
        assert_eq!(repo.saves(), saves, "restored tree is not rewritten");
    }

    #[tokio::test(start_paused = true)]
    async fn test_revisions_and_active_notifications() {
        let store = InspectionStore::open_with_repository(
            Arc::new(InMemorySnapshotRepository::new()),
            config(),
        )
        .await
        .unwrap();
        let mut changes = store.subscribe_changes();
        let mut active = store.subscribe_active();

        store
            .mutate_active(|a| a.project_summary.update_step1(name_patch("A")))
            .unwrap();
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();
        assert!(!active.has_changed().unwrap());

        let first = store.active_id();
        let second = store.mutate(|s| s.start_new_assessment()).unwrap();
        assert!(active.has_changed().unwrap());
        assert_eq!(*active.borrow_and_update(), second);

        store.mutate(|s| s.switch_to(first)).unwrap();
        assert_eq!(*active.borrow_and_update(), first);
        assert_eq!(store.read(|s| s.len()).unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_operation_publishes_nothing() {
        let store = InspectionStore::open_with_repository(
            Arc::new(InMemorySnapshotRepository::new()),
            config(),
        )
        .await
        .unwrap();
        let mut changes = store.subscribe_changes();

        let err = store
            .try_mutate(|s| s.active_mut().mark_as_synced())
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidStatusTransition { .. })
        ));
        assert!(!changes.has_changed().unwrap());

        assert!(store.try_mutate(|s| s.active_mut().mark_as_submitted()).unwrap());
        assert!(changes.has_changed().unwrap());
        changes.borrow_and_update();
        assert_eq!(
            store.read(|s| s.active().status()).unwrap(),
            AssessmentStatus::Submitted
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupt_snapshot_is_quarantined() {
        let repo = Arc::new(InMemorySnapshotRepository::new());
        let mut envelope = SnapshotEnvelope::seal(&Session::new()).unwrap();
        envelope.checksum = checksum("something else");
        repo.insert("rootStore", envelope).unwrap();

        let store = InspectionStore::open_with_repository(repo.clone(), config())
            .await
            .unwrap();
        store.flush().await.unwrap();

        let keys = repo.keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0], "rootStore");
        assert!(keys[1].starts_with("rootStore.corrupt."));
        assert_eq!(store.read(|s| s.len()).unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_snapshot_is_refused() {
        let repo = Arc::new(InMemorySnapshotRepository::new());
        let mut envelope = SnapshotEnvelope::seal(&Session::new()).unwrap();
        envelope.schema_version = CURRENT_SCHEMA_VERSION + 1;
        repo.insert("rootStore", envelope.clone()).unwrap();

        let result = InspectionStore::open_with_repository(repo.clone(), config()).await;
        assert!(matches!(
            result,
            Err(ServiceError::Persistence(PersistenceError::UnsupportedSchemaVersion { .. }))
        ));
        assert_eq!(repo.load("rootStore").await.unwrap(), Some(envelope));
    }

    #[tokio::test]
    async fn test_sqlite_file_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inspection.sqlite");
        let config = StoreConfig::new(format!("sqlite://{}?mode=rwc", path.display()));

        let store = InspectionStore::open(config.clone()).await.unwrap();
        let id = store.active_id();
        store
            .mutate_active(|a| a.project_summary.update_step1(name_patch("Harbor View")))
            .unwrap();
        store.shutdown().await.unwrap();
        drop(store);

        let store = InspectionStore::open(config).await.unwrap();
        assert_eq!(store.active_id(), id);
        assert_eq!(
            store
                .read(|s| s.active().project_summary.step1().project_name.clone())
                .unwrap(),
            "Harbor View"
        );
        assert!(store.health().is_healthy());
        store.shutdown().await.unwrap();
    }
}
