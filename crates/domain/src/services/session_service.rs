use std::sync::{Arc, Mutex};

use tokio::time::Duration;

use crate::entities::{PokemonRecord, SlotTarget, UserProfile};
use crate::errors::DomainError;
use crate::repositories::ProfileRepository;
use crate::services::save_scheduler::SaveScheduler;

/// Default quiet period between the last mutation and the durable write.
pub const DEFAULT_AUTOSAVE_WINDOW: Duration = Duration::from_millis(1000);

/// The active trainer session - the application layer in clean architecture.
///
/// Owns the single in-memory profile, applies mutations, and mediates the
/// debounced write-back to the store. One session exists at a time and it is
/// the only producer of `save` calls, so there is no concurrent writer.
pub struct TrainerSession {
    profile: Mutex<UserProfile>,
    scheduler: SaveScheduler,
}

impl TrainerSession {
    /// Rehydrate the stored profile for `username`, or synthesize a fresh one
    /// and save it immediately so a brand-new trainer is durable before first
    /// display.
    pub async fn open(
        repository: Arc<dyn ProfileRepository>,
        username: &str,
        autosave_window: Duration,
    ) -> Result<Self, DomainError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(DomainError::ValidationError(
                "Trainer name cannot be empty".to_string(),
            ));
        }

        let profile = match repository.find_by_username(username).await {
            Some(existing) => existing,
            None => repository.save(&UserProfile::new(username)).await?,
        };

        tracing::info!("opened session for trainer {}", profile.username);

        Ok(Self {
            profile: Mutex::new(profile),
            scheduler: SaveScheduler::new(repository, autosave_window),
        })
    }

    pub fn username(&self) -> String {
        self.profile.lock().unwrap().username.clone()
    }

    /// Snapshot of the current in-memory profile.
    pub fn profile(&self) -> UserProfile {
        self.profile.lock().unwrap().clone()
    }

    /// Whether an edit is still waiting on its durable write (the "Saving..."
    /// indicator).
    pub fn is_save_pending(&self) -> bool {
        self.scheduler.is_save_pending()
    }

    /// Install `pokemon` into a slot of `boxes[box_index]` and schedule a
    /// debounced save. Returns the slot index actually used, which for
    /// `SlotTarget::Auto` (or an occupied explicit target) is the lowest
    /// empty one.
    pub fn place_pokemon(
        &self,
        box_index: usize,
        target: SlotTarget,
        pokemon: PokemonRecord,
    ) -> Result<usize, DomainError> {
        pokemon.validate()?;

        let (snapshot, slot_index) = {
            let mut profile = self.profile.lock().unwrap();
            let slot_index = profile.place_pokemon(box_index, target, pokemon)?;
            (profile.clone(), slot_index)
        };

        self.scheduler.schedule(snapshot);
        Ok(slot_index)
    }

    /// Swap in a whole imported profile. The import path has already written
    /// through to the store, so any pending autosave is dropped rather than
    /// allowed to overwrite the import with a stale snapshot.
    pub fn replace_profile(&self, imported: UserProfile) {
        {
            let mut profile = self.profile.lock().unwrap();
            *profile = imported;
        }
        self.scheduler.cancel();
        self.scheduler.mark_clean();
    }

    /// End the session: cancel the pending timer and save the current state
    /// immediately, so no edit is lost on exit.
    pub async fn logout(self) -> Result<UserProfile, DomainError> {
        let snapshot = self.profile.lock().unwrap().clone();
        let saved = self.scheduler.flush(&snapshot).await?;
        tracing::info!("closed session for trainer {}", saved.username);
        Ok(saved)
    }

    /// Drop the session without a final save. Only meaningful right after
    /// the trainer's record has been deleted from the store, where the usual
    /// save-on-exit would undo the deletion.
    pub fn discard(self) {
        self.scheduler.cancel();
    }
}
