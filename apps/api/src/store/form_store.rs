//! Persistent form store: one serialized `FormState` blob under a fixed key.
//!
//! Failure policy: read, parse, and write errors are logged and treated as
//! "nothing persisted". They never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::form::FormState;
use crate::store::kv::{KvStore, PersistenceError};

/// Key the whole form is stored under.
pub const FORM_STORAGE_KEY: &str = "resume-generator-form";
/// Inactivity window before a scheduled save is written.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone)]
pub struct FormStore {
    kv: Arc<dyn KvStore>,
    key: String,
}

impl FormStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            key: FORM_STORAGE_KEY.to_string(),
        }
    }

    /// Returns the stored form, or the default form if nothing usable is stored.
    pub async fn load(&self) -> FormState {
        match self.try_load().await {
            Ok(Some(form)) => {
                info!("Restored saved form state");
                form
            }
            Ok(None) => FormState::default(),
            Err(e) => {
                warn!("Ignoring stored form state: {e}");
                FormState::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Option<FormState>, PersistenceError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Writes `form` immediately. Errors are logged only.
    pub async fn save(&self, form: &FormState) {
        if let Err(e) = self.try_save(form).await {
            warn!("Failed to save form state, continuing without persistence: {e}");
        }
    }

    pub async fn try_save(&self, form: &FormState) -> Result<(), PersistenceError> {
        let raw = serde_json::to_string(form)?;
        self.kv.set(&self.key, &raw).await?;
        debug!("Saved form state ({} bytes)", raw.len());
        Ok(())
    }

    /// Removes the stored form. Safe to call when nothing is stored.
    pub async fn clear(&self) {
        if let Err(e) = self.kv.remove(&self.key).await {
            warn!("Failed to remove stored form state: {e}");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Debounced writer
// ────────────────────────────────────────────────────────────────────────────

enum SaveCommand {
    Schedule(Box<FormState>),
    Flush(oneshot::Sender<()>),
    Discard(oneshot::Sender<()>),
}

/// Batches rapid edits into one write of the latest snapshot.
///
/// A background task holds at most one pending snapshot and writes it once
/// `delay` passes without a newer one arriving.
pub struct DebouncedSaver {
    tx: mpsc::UnboundedSender<SaveCommand>,
    task: JoinHandle<()>,
}

impl DebouncedSaver {
    pub fn spawn(store: FormStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_saver(store, delay, rx));
        Self { tx, task }
    }

    /// Queues `form` to be written after the debounce window.
    pub fn schedule(&self, form: FormState) {
        if self.tx.send(SaveCommand::Schedule(Box::new(form))).is_err() {
            warn!("Form saver is not running; edit will not be persisted");
        }
    }

    /// Writes any pending snapshot now and waits for the write to finish.
    pub async fn flush(&self) {
        self.round_trip(SaveCommand::Flush).await;
    }

    /// Drops any pending snapshot without writing it.
    pub async fn discard(&self) {
        self.round_trip(SaveCommand::Discard).await;
    }

    async fn round_trip(&self, command: fn(oneshot::Sender<()>) -> SaveCommand) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(command(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}

impl Drop for DebouncedSaver {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_saver(
    store: FormStore,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<SaveCommand>,
) {
    let mut pending: Option<Box<FormState>> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(delay, rx.recv()).await {
                Ok(command) => command,
                Err(_) => {
                    if let Some(form) = pending.take() {
                        store.save(&form).await;
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(SaveCommand::Schedule(form)) => pending = Some(form),
            Some(SaveCommand::Flush(ack)) => {
                if let Some(form) = pending.take() {
                    store.save(&form).await;
                }
                let _ = ack.send(());
            }
            Some(SaveCommand::Discard(ack)) => {
                pending = None;
                let _ = ack.send(());
            }
            None => {
                if let Some(form) = pending.take() {
                    store.save(&form).await;
                }
                break;
            }
        }
    }
}
