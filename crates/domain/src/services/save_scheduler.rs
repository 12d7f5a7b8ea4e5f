use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::entities::UserProfile;
use crate::errors::DomainError;
use crate::repositories::ProfileRepository;

/// Debounced write-back of profile snapshots.
///
/// At most one flush task is outstanding per session; scheduling a new
/// snapshot aborts and replaces the previous task, so the quiet period is
/// measured from the latest mutation, not the first. Each task closes over
/// the exact snapshot it will persist.
pub(crate) struct SaveScheduler {
    repository: Arc<dyn ProfileRepository>,
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    dirty: Arc<AtomicBool>,
}

impl SaveScheduler {
    pub(crate) fn new(repository: Arc<dyn ProfileRepository>, window: Duration) -> Self {
        Self {
            repository,
            window,
            pending: Mutex::new(None),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a mutation is still waiting on its durable write.
    pub(crate) fn is_save_pending(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Restart the quiet-period timer with a fresh snapshot.
    pub(crate) fn schedule(&self, snapshot: UserProfile) {
        self.dirty.store(true, Ordering::SeqCst);

        let repository = Arc::clone(&self.repository);
        let dirty = Arc::clone(&self.dirty);
        let window = self.window;

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            match repository.save(&snapshot).await {
                Ok(_) => dirty.store(false, Ordering::SeqCst),
                // Dirty stays set; only a later mutation or an explicit
                // flush retries.
                Err(err) => {
                    tracing::warn!("autosave for {} failed: {}", snapshot.username, err);
                }
            }
        }));
    }

    /// Drop any outstanding flush task without saving.
    pub(crate) fn cancel(&self) {
        if let Some(previous) = self.pending.lock().unwrap().take() {
            previous.abort();
        }
    }

    /// Cancel the timer and persist `snapshot` immediately.
    pub(crate) async fn flush(&self, snapshot: &UserProfile) -> Result<UserProfile, DomainError> {
        self.cancel();
        let saved = self.repository.save(snapshot).await?;
        self.dirty.store(false, Ordering::SeqCst);
        Ok(saved)
    }

    pub(crate) fn mark_clean(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
