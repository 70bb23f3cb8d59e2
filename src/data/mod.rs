pub mod characters;
pub mod items;

use std::{fs, path::Path};

use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

use crate::error::Result;

const BUILTIN_THEMES: &str = include_str!("fantasy.json");

/// Every genre a content file offers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ThemeBook {
    pub genres: Vec<Theme>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub name: String,
    pub elements: ThemeElements,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ThemeElements {
    #[serde(default)]
    pub game_title: Vec<String>,
    #[serde(default)]
    pub treasure: Vec<String>,
    pub rooms: Vec<RoomArchetype>,
    #[serde(default)]
    pub puzzle_items: Vec<PuzzleItemData>,
    #[serde(default)]
    pub weapons: Vec<WeaponData>,
    #[serde(default)]
    pub armor: Vec<ArmorData>,
    #[serde(default)]
    pub enemies: Vec<CharacterData>,
    #[serde(default)]
    pub allies: Vec<CharacterData>,
}

/// Word lists for one room type. Names are "adjective noun", descriptions
/// are "scenery atmosphere" in either order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RoomArchetype {
    #[serde(rename = "type")]
    pub room_type: String,
    #[serde(rename = "name", default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub adjectives: Vec<String>,
    #[serde(default)]
    pub scenery: Vec<String>,
    #[serde(default)]
    pub atmosphere: Vec<String>,
}

/// A key and the lock it opens always come from the same entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PuzzleItemData {
    pub key_item: String,
    pub lock_item: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeaponData {
    #[serde(rename = "type")]
    pub name: String,
    pub stats: WeaponStats,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: i32,
    #[serde(default)]
    pub accuracy: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArmorData {
    #[serde(rename = "type")]
    pub name: String,
    pub stats: ArmorStats,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ArmorStats {
    pub defense: i32,
    #[serde(default)]
    pub evasion: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CharacterData {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default = "default_level")]
    pub level: i32,
    pub stats: CharacterStats,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CharacterStats {
    pub hit_points: i32,
    pub attack_points: i32,
    pub defense_points: i32,
    #[serde(default)]
    pub accuracy: i32,
    #[serde(default)]
    pub evasion: i32,
}

fn default_level() -> i32 {
    1
}

impl ThemeBook {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_THEMES)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn genre(&self, name: &str) -> Option<&Theme> {
        self.genres.iter().find(|theme| theme.name == name)
    }

    pub fn pick_genre(&self, rng: &mut RandomNumberGenerator) -> Option<&Theme> {
        rng.random_slice_entry(&self.genres)
    }
}

impl Theme {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn room_archetype(&self, room_type: &str) -> Option<&RoomArchetype> {
        self.elements
            .rooms
            .iter()
            .find(|archetype| archetype.room_type == room_type)
    }

    pub fn room_types(&self) -> Vec<String> {
        self.elements
            .rooms
            .iter()
            .map(|archetype| archetype.room_type.clone())
            .collect()
    }

    /// Title line such as "The Quest for the Amulet of Dawn".
    pub fn game_title(&self, rng: &mut RandomNumberGenerator) -> Option<String> {
        let title = rng.random_slice_entry(&self.elements.game_title)?;
        match rng.random_slice_entry(&self.elements.treasure) {
            Some(treasure) => Some(format!("{title} {treasure}")),
            None => Some(title.clone()),
        }
    }
}
