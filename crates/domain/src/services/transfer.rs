//! JSON backup import/export for whole profiles and single boxed entries.
//!
//! The backup file layout is identical to the store's serialized value, so a
//! downloaded save can be re-imported byte-for-byte.

use crate::entities::{PokemonRecord, UserProfile};
use crate::errors::DomainError;

/// Parse a save-file payload, enforcing the boundary contract: valid JSON
/// with a non-empty string `username` and a present `boxes` field. Deeper
/// shape (box/slot counts) is accepted as-is for compatibility with older
/// backup files.
pub fn parse_save(payload: &str) -> Result<UserProfile, DomainError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|err| DomainError::MalformedImport(format!("not valid JSON: {}", err)))?;

    let username = value.get("username").and_then(|v| v.as_str()).unwrap_or("");
    if username.trim().is_empty() {
        return Err(DomainError::MalformedImport(
            "missing or empty username".to_string(),
        ));
    }
    if value.get("boxes").is_none() {
        return Err(DomainError::MalformedImport("missing boxes".to_string()));
    }

    serde_json::from_value(value).map_err(|err| DomainError::MalformedImport(err.to_string()))
}

/// Serialize a profile as a pretty-printed backup file body.
pub fn export_save(profile: &UserProfile) -> Result<String, DomainError> {
    serde_json::to_string_pretty(profile)
        .map_err(|err| DomainError::SerializationError(err.to_string()))
}

/// Suggested download name for a profile backup.
pub fn save_filename(profile: &UserProfile) -> String {
    let date = chrono::Utc::now().format("%Y-%m-%d");
    format!("PDN_Save_{}_{}.json", profile.username, date)
}

/// Parse a single-entry `.pkdream` backup.
pub fn parse_pokemon(payload: &str) -> Result<PokemonRecord, DomainError> {
    serde_json::from_str(payload).map_err(|err| DomainError::MalformedImport(err.to_string()))
}

pub fn export_pokemon(pokemon: &PokemonRecord) -> Result<String, DomainError> {
    serde_json::to_string_pretty(pokemon)
        .map_err(|err| DomainError::SerializationError(err.to_string()))
}

/// Suggested download name for a single-entry backup.
pub fn pokemon_filename(pokemon: &PokemonRecord) -> String {
    let id = pokemon.id.to_string();
    format!("{}-{}.pkdream", pokemon.species_name, &id[..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SlotTarget;
    use crate::test_support::sample_pokemon;

    #[test]
    fn save_round_trips_through_export_and_parse() {
        let mut profile = UserProfile::new("Red");
        profile
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon("Pikachu"))
            .unwrap();

        let exported = export_save(&profile).unwrap();
        let parsed = parse_save(&exported).unwrap();

        assert_eq!(parsed, profile);
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let result = parse_save("not json at all");
        assert!(matches!(result, Err(DomainError::MalformedImport(_))));
    }

    #[test]
    fn parse_rejects_missing_username() {
        let result = parse_save(r#"{"boxes": []}"#);
        assert!(matches!(result, Err(DomainError::MalformedImport(_))));
    }

    #[test]
    fn parse_rejects_empty_username() {
        let result = parse_save(r#"{"username": "  ", "boxes": []}"#);
        assert!(matches!(result, Err(DomainError::MalformedImport(_))));
    }

    #[test]
    fn parse_rejects_missing_boxes() {
        let result = parse_save(r#"{"username": "Red"}"#);
        assert!(matches!(result, Err(DomainError::MalformedImport(_))));
    }

    #[test]
    fn parse_accepts_files_without_exact_box_counts() {
        // Older backups are not shape-hardened; a short box list still loads.
        let payload = r#"{
            "username": "Blue",
            "boxes": [
                { "id": 1, "name": "Box 1", "slots": [ { "pokemon": null } ] }
            ]
        }"#;

        let parsed = parse_save(payload).unwrap();
        assert_eq!(parsed.username, "Blue");
        assert_eq!(parsed.boxes.len(), 1);
        assert_eq!(parsed.boxes[0].slots.len(), 1);
    }

    #[test]
    fn pokemon_round_trips_through_export_and_parse() {
        let pokemon = sample_pokemon("Gardevoir");
        let exported = export_pokemon(&pokemon).unwrap();
        assert_eq!(parse_pokemon(&exported).unwrap(), pokemon);
    }

    #[test]
    fn filenames_follow_the_download_conventions() {
        let profile = UserProfile::new("Red");
        let name = save_filename(&profile);
        assert!(name.starts_with("PDN_Save_Red_"));
        assert!(name.ends_with(".json"));

        let pokemon = sample_pokemon("Pikachu");
        let name = pokemon_filename(&pokemon);
        assert!(name.starts_with("Pikachu-"));
        assert!(name.ends_with(".pkdream"));
        assert_eq!(name.len(), "Pikachu-".len() + 4 + ".pkdream".len());
    }
}
