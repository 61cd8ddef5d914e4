//! Background autosave: coalesces tree revisions into throttled snapshot writes

use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::repository::SnapshotRepository;
use super::types::{PersistenceHealth, SavePolicy, SnapshotEnvelope};
use crate::domains::root::Session;
use crate::errors::{PersistenceError, PersistenceResult};

/// Messages that can be sent to the autosave worker
#[derive(Debug)]
pub enum AutosaveMessage {
    /// Write any unsaved revision now and report the outcome
    Flush {
        response: oneshot::Sender<PersistenceResult<()>>,
    },
    /// Write any unsaved revision, then stop
    Shutdown {
        response: oneshot::Sender<()>,
    },
}

/// Saves the session whenever its revision moves, at most once per
/// `debounce` window: the first change in a quiet period is written
/// immediately and later ones are folded into one write at the end of the
/// window.
pub struct AutosaveWorker {
    repository: Arc<dyn SnapshotRepository>,
    session: Arc<RwLock<Session>>,
    key: String,
    debounce: Duration,
    policy: SavePolicy,
    revisions: watch::Receiver<u64>,
    health: watch::Sender<PersistenceHealth>,
    message_receiver: mpsc::Receiver<AutosaveMessage>,
    saved_revision: u64,
    last_save: Option<Instant>,
}

impl AutosaveWorker {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        repository: Arc<dyn SnapshotRepository>,
        session: Arc<RwLock<Session>>,
        key: String,
        debounce: Duration,
        policy: SavePolicy,
        mut revisions: watch::Receiver<u64>,
        health: watch::Sender<PersistenceHealth>,
        message_receiver: mpsc::Receiver<AutosaveMessage>,
    ) -> Self {
        let saved_revision = *revisions.borrow_and_update();
        Self {
            repository,
            session,
            key,
            debounce,
            policy,
            revisions,
            health,
            message_receiver,
            saved_revision,
            last_save: None,
        }
    }

    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let key = self.key.clone();
            log::info!("Autosave worker started for '{}'", key);
            self.run().await;
            log::info!("Autosave worker for '{}' stopped", key);
        })
    }

    fn is_dirty(&self) -> bool {
        *self.revisions.borrow() != self.saved_revision
    }

    fn window_open(&self) -> bool {
        self.last_save
            .map_or(true, |at| Instant::now() >= at + self.debounce)
    }

    async fn run(mut self) {
        loop {
            let dirty = self.is_dirty();
            let deadline = self.last_save.unwrap_or_else(Instant::now) + self.debounce;

            tokio::select! {
                biased;

                message = self.message_receiver.recv() => match message {
                    Some(AutosaveMessage::Flush { response }) => {
                        let result = self.save_if_dirty().await;
                        let _ = response.send(result);
                    }
                    Some(AutosaveMessage::Shutdown { response }) => {
                        let _ = self.save_if_dirty().await;
                        let _ = response.send(());
                        break;
                    }
                    None => {
                        let _ = self.save_if_dirty().await;
                        break;
                    }
                },

                changed = self.revisions.changed() => {
                    if changed.is_err() {
                        // Store dropped without shutting down
                        let _ = self.save_if_dirty().await;
                        break;
                    }
                    if self.window_open() {
                        let _ = self.save_if_dirty().await;
                    }
                }

                _ = tokio::time::sleep_until(deadline), if dirty => {
                    let _ = self.save_if_dirty().await;
                }
            }
        }
    }

    async fn save_if_dirty(&mut self) -> PersistenceResult<()> {
        if !self.is_dirty() {
            return Ok(());
        }
        let result = self.save_with_retry().await;
        self.last_save = Some(Instant::now());
        result
    }

    async fn save_with_retry(&mut self) -> PersistenceResult<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.save_once().await {
                Ok(revision) => {
                    self.saved_revision = revision;
                    self.health.send_modify(|health| {
                        health.last_saved_at = Some(chrono::Utc::now());
                        health.saves += 1;
                        health.consecutive_failures = 0;
                        health.last_error = None;
                    });
                    log::debug!("Saved snapshot '{}' at revision {}", self.key, revision);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!(
                        "Autosave attempt {}/{} for '{}' failed: {}",
                        attempt,
                        self.policy.max_attempts,
                        self.key,
                        e
                    );
                    self.health.send_modify(|health| {
                        health.consecutive_failures += 1;
                        health.last_error = Some(e.to_string());
                    });
                    if attempt >= self.policy.max_attempts {
                        log::error!(
                            "Giving up on snapshot '{}' after {} attempts; changes stay in memory",
                            self.key,
                            attempt
                        );
                        return Err(e);
                    }
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                }
            }
        }
    }

    /// Returns the revision that was written
    async fn save_once(&self) -> PersistenceResult<u64> {
        let (revision, envelope) = {
            let session = self.session.read().map_err(|_| PersistenceError::LockPoisoned)?;
            let revision = *self.revisions.borrow();
            (revision, SnapshotEnvelope::seal(&session)?)
        };
        self.repository.save(&self.key, &envelope).await?;
        Ok(revision)
    }
}
