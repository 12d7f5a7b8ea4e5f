use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// The 18 fixed category tags an entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Steel,
    Dark,
    Fairy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

/// One collectible record. Immutable once placed; "editing" a slot means
/// installing a replacement record built from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonRecord {
    /// Assigned once at creation, never reassigned.
    pub id: Uuid,
    pub species_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub dex_number: u16,
    pub types: Vec<PokemonType>,
    pub level: u8,
    pub gender: Gender,
    /// Original trainer name.
    pub ot: String,
    /// Trainer numeric id, kept as the fixed-width string it is displayed as.
    pub id_no: String,
    pub met_location: String,
    pub met_date: String,
    pub met_game: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub met_level: Option<u8>,
    /// Free-text dream annotation; may be empty.
    pub dream_text: String,
    pub sprite_url: String,
}

impl PokemonRecord {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.species_name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Species name cannot be empty".to_string(),
            ));
        }

        if self.types.is_empty() {
            return Err(DomainError::ValidationError(
                "An entry needs at least one type".to_string(),
            ));
        }

        if self.level < 1 || self.level > 100 {
            return Err(DomainError::ValidationError(format!(
                "Level {} is out of range (1-100)",
                self.level
            )));
        }

        if let Some(met_level) = self.met_level {
            if met_level < 1 || met_level > 100 {
                return Err(DomainError::ValidationError(format!(
                    "Met level {} is out of range (1-100)",
                    met_level
                )));
            }
        }

        Ok(())
    }
}
