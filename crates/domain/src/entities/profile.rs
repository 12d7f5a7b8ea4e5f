use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::PokemonRecord;
use crate::errors::DomainError;

pub const TOTAL_BOXES: usize = 30;
pub const SLOTS_PER_BOX: usize = 30;

/// One trainer's complete collection state. The 30x30 box/slot shape is
/// fixed at creation and never resized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    /// Stamped by the store on every durable save; absent until then.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
    pub boxes: Vec<StorageBox>,
}

/// One of the 30 fixed containers, holding 30 slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageBox {
    /// 1-based ordinal matching the box's position.
    pub id: u32,
    pub name: String,
    pub slots: Vec<BoxSlot>,
}

/// A single storage cell; `None` means empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxSlot {
    #[serde(default)]
    pub pokemon: Option<PokemonRecord>,
}

/// Slot addressing for a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    /// First empty slot in the box, scanning ascending indices.
    Auto,
    /// A specific slot; falls back to `Auto` behavior if occupied.
    At(usize),
}

/// What `list_summaries` returns for the save-file picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerSummary {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// A freshly-initialized profile: all boxes present, all slots empty.
    pub fn new(username: impl Into<String>) -> Self {
        let boxes = (1..=TOTAL_BOXES as u32).map(StorageBox::new).collect();
        Self {
            username: username.into(),
            last_played: None,
            boxes,
        }
    }

    /// Install `pokemon` into a slot of `boxes[box_index]`, returning the
    /// slot index used. Only that one slot changes; a full box fails with
    /// `BoxFull` and mutates nothing.
    pub fn place_pokemon(
        &mut self,
        box_index: usize,
        target: SlotTarget,
        pokemon: PokemonRecord,
    ) -> Result<usize, DomainError> {
        let total = self.boxes.len();
        let storage_box = self.boxes.get_mut(box_index).ok_or_else(|| {
            DomainError::ValidationError(format!(
                "Box index {} is out of range (0-{})",
                box_index,
                total.saturating_sub(1)
            ))
        })?;

        let slot_index = match target {
            SlotTarget::At(index) => {
                let slot = storage_box.slots.get(index).ok_or_else(|| {
                    DomainError::ValidationError(format!(
                        "Slot index {} is out of range (0-{})",
                        index,
                        storage_box.slots.len().saturating_sub(1)
                    ))
                })?;
                if slot.pokemon.is_none() {
                    index
                } else {
                    storage_box
                        .first_empty_slot()
                        .ok_or(DomainError::BoxFull(box_index))?
                }
            }
            SlotTarget::Auto => storage_box
                .first_empty_slot()
                .ok_or(DomainError::BoxFull(box_index))?,
        };

        storage_box.slots[slot_index].pokemon = Some(pokemon);
        Ok(slot_index)
    }

    pub fn pokemon_at(&self, box_index: usize, slot_index: usize) -> Option<&PokemonRecord> {
        self.boxes
            .get(box_index)?
            .slots
            .get(slot_index)?
            .pokemon
            .as_ref()
    }
}

impl StorageBox {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            name: format!("Box {}", id),
            slots: (0..SLOTS_PER_BOX).map(|_| BoxSlot { pokemon: None }).collect(),
        }
    }

    /// Lowest-indexed empty slot, if any.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.pokemon.is_none())
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.pokemon.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_pokemon;

    #[test]
    fn new_profile_has_fixed_shape() {
        let profile = UserProfile::new("Red");

        assert_eq!(profile.username, "Red");
        assert_eq!(profile.last_played, None);
        assert_eq!(profile.boxes.len(), TOTAL_BOXES);
        for (index, storage_box) in profile.boxes.iter().enumerate() {
            assert_eq!(storage_box.id as usize, index + 1);
            assert_eq!(storage_box.name, format!("Box {}", index + 1));
            assert_eq!(storage_box.slots.len(), SLOTS_PER_BOX);
            assert_eq!(storage_box.occupied_count(), 0);
        }
    }

    #[test]
    fn auto_placement_picks_lowest_empty_index() {
        let mut profile = UserProfile::new("Red");

        let first = profile
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon("Bulbasaur"))
            .unwrap();
        let second = profile
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon("Charmander"))
            .unwrap();

        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(profile.boxes[0].occupied_count(), 2);
    }

    #[test]
    fn explicit_empty_target_is_honored() {
        let mut profile = UserProfile::new("Red");

        let used = profile
            .place_pokemon(2, SlotTarget::At(7), sample_pokemon("Squirtle"))
            .unwrap();

        assert_eq!(used, 7);
        assert!(profile.pokemon_at(2, 7).is_some());
    }

    #[test]
    fn occupied_target_falls_back_to_first_empty() {
        let mut profile = UserProfile::new("Red");
        profile
            .place_pokemon(0, SlotTarget::At(0), sample_pokemon("Bulbasaur"))
            .unwrap();

        let used = profile
            .place_pokemon(0, SlotTarget::At(0), sample_pokemon("Ivysaur"))
            .unwrap();

        assert_eq!(used, 1);
        assert_eq!(
            profile.pokemon_at(0, 0).unwrap().species_name,
            "Bulbasaur"
        );
        assert_eq!(profile.pokemon_at(0, 1).unwrap().species_name, "Ivysaur");
    }

    #[test]
    fn full_box_fails_and_mutates_nothing() {
        let mut profile = UserProfile::new("Red");
        for _ in 0..SLOTS_PER_BOX {
            profile
                .place_pokemon(0, SlotTarget::Auto, sample_pokemon("Zubat"))
                .unwrap();
        }
        let before = profile.boxes[0].clone();

        let result = profile.place_pokemon(0, SlotTarget::Auto, sample_pokemon("Golbat"));

        assert!(matches!(result, Err(DomainError::BoxFull(0))));
        assert_eq!(profile.boxes[0], before);
    }

    #[test]
    fn out_of_range_box_is_rejected() {
        let mut profile = UserProfile::new("Red");
        let result = profile.place_pokemon(TOTAL_BOXES, SlotTarget::Auto, sample_pokemon("Mew"));
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn unrelated_boxes_are_untouched_by_placement() {
        let mut profile = UserProfile::new("Red");
        profile
            .place_pokemon(5, SlotTarget::Auto, sample_pokemon("Eevee"))
            .unwrap();
        let untouched = profile.boxes[4].clone();

        profile
            .place_pokemon(5, SlotTarget::Auto, sample_pokemon("Snorlax"))
            .unwrap();

        assert_eq!(profile.boxes[4], untouched);
    }

    #[test]
    fn profile_round_trips_through_json() {
        let mut profile = UserProfile::new("Red");
        profile
            .place_pokemon(0, SlotTarget::Auto, sample_pokemon("Pikachu"))
            .unwrap();

        let json = serde_json::to_string(&profile).unwrap();
        let parsed: UserProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, profile);
        assert!(json.contains("\"Box 1\""));
    }
}
