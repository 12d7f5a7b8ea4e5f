//! Shared fixtures for service and entity tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::entities::{Gender, PokemonRecord, PokemonType, TrainerSummary, UserProfile};
use crate::errors::DomainError;
use crate::repositories::ProfileRepository;

/// In-memory stand-in for the SQLite store: counts durable saves and can be
/// told to start failing them.
#[derive(Default)]
pub struct MemoryProfileRepository {
    profiles: Mutex<HashMap<String, UserProfile>>,
    save_count: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn stored(&self, username: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(username).cloned()
    }
}

#[async_trait]
impl ProfileRepository for MemoryProfileRepository {
    async fn list_summaries(&self) -> Vec<TrainerSummary> {
        self.profiles
            .lock()
            .unwrap()
            .values()
            .map(|profile| TrainerSummary {
                username: profile.username.clone(),
                last_played: profile.last_played,
            })
            .collect()
    }

    async fn find_by_username(&self, username: &str) -> Option<UserProfile> {
        self.profiles.lock().unwrap().get(username).cloned()
    }

    async fn save(&self, profile: &UserProfile) -> Result<UserProfile, DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::RepositoryError(
                "injected save failure".to_string(),
            ));
        }

        let mut stamped = profile.clone();
        stamped.last_played = Some(Utc::now());
        self.profiles
            .lock()
            .unwrap()
            .insert(stamped.username.clone(), stamped.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(stamped)
    }

    async fn delete(&self, username: &str) -> Result<(), DomainError> {
        self.profiles.lock().unwrap().remove(username);
        Ok(())
    }
}

pub fn sample_pokemon(species_name: &str) -> PokemonRecord {
    PokemonRecord {
        id: Uuid::new_v4(),
        species_name: species_name.to_string(),
        nickname: None,
        dex_number: 25,
        types: vec![PokemonType::Electric],
        level: 12,
        gender: Gender::Male,
        ot: "Ash".to_string(),
        id_no: "12345".to_string(),
        met_location: "Pallet Town".to_string(),
        met_date: "2024-03-01".to_string(),
        met_game: "Yellow".to_string(),
        met_level: Some(5),
        dream_text: String::new(),
        sprite_url: "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png"
            .to_string(),
    }
}
