use crate::entities::{TrainerSummary, UserProfile};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Repository trait - defines what we need from the persistence layer.
/// This is a PORT in hexagonal architecture.
///
/// Read paths are fail-soft: a storage fault yields the same result as
/// legitimate absence, so the save-file picker always renders and a missing
/// trainer always falls through to profile creation. Write paths propagate
/// their errors to the caller.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// One summary per stored profile; no ordering guarantee.
    async fn list_summaries(&self) -> Vec<TrainerSummary>;

    /// The full record for `username`, or `None` if no such trainer exists.
    async fn find_by_username(&self, username: &str) -> Option<UserProfile>;

    /// Upsert the record under `profile.username`, stamping `last_played`
    /// with the current wall-clock time (any caller-supplied value is
    /// overwritten). Fully replaces prior data for that key and returns the
    /// stamped profile.
    async fn save(&self, profile: &UserProfile) -> Result<UserProfile, DomainError>;

    /// Remove the record for `username`; removing an absent key is a no-op
    /// success.
    async fn delete(&self, username: &str) -> Result<(), DomainError>;
}
