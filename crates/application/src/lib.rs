use std::sync::Arc;

use domain::{
    legacy, transfer, DomainError, PokemonRecord, ProfileRepository, SlotTarget, TrainerSession,
    TrainerSummary, DEFAULT_AUTOSAVE_WINDOW,
};
use infrastructure::{Database, SqliteProfileRepository};
use tokio::time::Duration;

/// What an accepted save-file import did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The payload matched the active trainer; the in-memory profile was
    /// replaced outright.
    ReplacedActiveSession(String),
    /// The payload was written through to the store without touching the
    /// active session.
    StoredInBackground(String),
}

/// Dream Network application - wires the storage adapter to the session
/// layer and drives the trainer lifecycle.
pub struct DreamNetworkApp {
    repository: Arc<dyn ProfileRepository>,
    session: Option<TrainerSession>,
    autosave_window: Duration,
}

impl DreamNetworkApp {
    pub fn new(database_path: &str) -> Result<Self, DomainError> {
        Self::new_with_config(database_path, DEFAULT_AUTOSAVE_WINDOW)
    }

    pub fn new_with_config(
        database_path: &str,
        autosave_window: Duration,
    ) -> Result<Self, DomainError> {
        // Infrastructure layer - database setup
        let database = Database::open(database_path)?;
        let repository: Arc<dyn ProfileRepository> =
            Arc::new(SqliteProfileRepository::new(database.get_pool().clone()));

        Ok(Self::from_repository(repository, autosave_window))
    }

    pub fn from_repository(
        repository: Arc<dyn ProfileRepository>,
        autosave_window: Duration,
    ) -> Self {
        Self {
            repository,
            session: None,
            autosave_window,
        }
    }

    /// Summaries for the save-file picker. Fail-soft: storage trouble shows
    /// up as an empty list, never an error.
    pub async fn list_trainers(&self) -> Vec<TrainerSummary> {
        self.repository.list_summaries().await
    }

    /// Open a session for `username`, creating the profile on first visit.
    /// Any previously active session is logged out (and saved) first.
    pub async fn select_trainer(
        &mut self,
        username: &str,
    ) -> Result<&TrainerSession, DomainError> {
        if let Some(previous) = self.session.take() {
            previous.logout().await?;
        }

        let session =
            TrainerSession::open(Arc::clone(&self.repository), username, self.autosave_window)
                .await?;
        Ok(self.session.insert(session))
    }

    pub fn session(&self) -> Option<&TrainerSession> {
        self.session.as_ref()
    }

    pub fn is_save_pending(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, |session| session.is_save_pending())
    }

    pub fn place_pokemon(
        &self,
        box_index: usize,
        target: SlotTarget,
        pokemon: PokemonRecord,
    ) -> Result<usize, DomainError> {
        self.active_session()?
            .place_pokemon(box_index, target, pokemon)
    }

    /// End the active session with a final save; a no-op when nobody is
    /// logged in.
    pub async fn logout(&mut self) -> Result<(), DomainError> {
        if let Some(session) = self.session.take() {
            session.logout().await?;
        }
        Ok(())
    }

    /// Remove a trainer's record. A matching active session is discarded
    /// without a final save, so the deletion sticks.
    pub async fn delete_trainer(&mut self, username: &str) -> Result<(), DomainError> {
        self.repository.delete(username).await?;

        let matches_active = self
            .session
            .as_ref()
            .map_or(false, |session| session.username() == username);
        if matches_active {
            if let Some(session) = self.session.take() {
                session.discard();
            }
        }
        Ok(())
    }

    /// Accept a save-file payload: validate, write through to the store, and
    /// if it belongs to the active trainer swap the session state outright.
    pub async fn import_save(&mut self, payload: &str) -> Result<ImportOutcome, DomainError> {
        let imported = transfer::parse_save(payload)?;
        self.repository.save(&imported).await?;

        let matches_active = self
            .session
            .as_ref()
            .map_or(false, |session| session.username() == imported.username);
        if matches_active {
            let username = imported.username.clone();
            if let Some(session) = self.session.as_ref() {
                session.replace_profile(imported);
            }
            return Ok(ImportOutcome::ReplacedActiveSession(username));
        }

        Ok(ImportOutcome::StoredInBackground(imported.username))
    }

    /// Export the active trainer's in-memory state as a backup file body.
    pub fn export_save(&self) -> Result<String, DomainError> {
        transfer::export_save(&self.active_session()?.profile())
    }

    /// Suggested download name for the active trainer's backup.
    pub fn export_save_filename(&self) -> Result<String, DomainError> {
        Ok(transfer::save_filename(&self.active_session()?.profile()))
    }

    /// Export one boxed entry as a `.pkdream` body plus suggested filename.
    pub fn export_pokemon(
        &self,
        box_index: usize,
        slot_index: usize,
    ) -> Result<(String, String), DomainError> {
        let profile = self.active_session()?.profile();
        let pokemon = profile.pokemon_at(box_index, slot_index).ok_or_else(|| {
            DomainError::ValidationError(format!(
                "No entry at box {}, slot {}",
                box_index, slot_index
            ))
        })?;

        Ok((
            transfer::export_pokemon(pokemon)?,
            transfer::pokemon_filename(pokemon),
        ))
    }

    /// Convert an uploaded `.pk*` / `.pkdream` file into a record ready to
    /// be placed.
    pub fn convert_pokemon_file(
        &self,
        file_name: &str,
        contents: &str,
    ) -> Result<PokemonRecord, DomainError> {
        legacy::convert_pokemon_file(file_name, contents)
    }

    fn active_session(&self) -> Result<&TrainerSession, DomainError> {
        self.session.as_ref().ok_or(DomainError::NoActiveSession)
    }
}
