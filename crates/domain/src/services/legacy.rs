//! Conversion of uploaded box-entry files.
//!
//! Legacy `.pk*` payloads are not actually parsed: the bytes are ignored and
//! a placeholder record is synthesized from random demo data, ready for the
//! trainer to review and annotate before placement. `.pkdream` files are the
//! JSON entry backups this system itself exports.

use rand::Rng;
use uuid::Uuid;

use crate::entities::{species, Gender, PokemonRecord};
use crate::errors::DomainError;
use crate::services::transfer;

/// Whether `file_name` looks like a legacy box entry (`.pk1` through `.pk9`
/// and beyond).
pub fn is_legacy_filename(file_name: &str) -> bool {
    match file_name.rsplit_once('.') {
        Some((_, extension)) => {
            extension.len() > 2
                && extension.starts_with("pk")
                && extension[2..].chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Convert an uploaded entry file into a record ready for placement.
pub fn convert_pokemon_file(file_name: &str, contents: &str) -> Result<PokemonRecord, DomainError> {
    if is_legacy_filename(file_name) {
        return Ok(simulate_legacy_record());
    }
    if file_name.ends_with(".pkdream") {
        return transfer::parse_pokemon(contents);
    }
    Err(DomainError::MalformedImport(format!(
        "unsupported file type: {}",
        file_name
    )))
}

/// Placeholder record standing in for a parsed legacy save entry.
pub fn simulate_legacy_record() -> PokemonRecord {
    let mut rng = rand::thread_rng();
    let species = &species::SPECIES[rng.gen_range(0..species::SPECIES.len())];

    PokemonRecord {
        id: Uuid::new_v4(),
        species_name: species.name.to_string(),
        nickname: None,
        dex_number: species.dex,
        types: species.types.to_vec(),
        level: rng.gen_range(1..=99),
        gender: Gender::Male,
        ot: "LegacyUser".to_string(),
        id_no: format!("{:05}", rng.gen_range(0..=99_999u32)),
        met_location: "Pallet Town".to_string(),
        met_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        met_game: "Red".to_string(),
        met_level: None,
        // Legacy files don't have dreams yet
        dream_text: String::new(),
        sprite_url: species::sprite_url(species.dex),
    }
}
