use bracket_random::prelude::RandomNumberGenerator;

use crate::data::{CharacterData, CharacterStats};

const BASE_XP_REWARD: f64 = 100.0;
const BASE_XP_PEAK: f64 = 250.0;

/// Name prefixes by level difference, from -5 (index 0) to +5 (index 10).
const DESCRIPTORS: [&[&str]; 11] = [
    &["Helpless", "Uninteresting", "Inept", "Ineffectual", "Sad", "Lame"],
    &["Weak", "Fragile", "Frail", "Feeble", "Tottering", "Sickly"],
    &["Inexperienced", "Novice", "Beginner", "Rookie"],
    &["Innocuous", "Harmless", "Old", "Scowling", "Unfortunate"],
    &["Hesitant", "Unprepared", "Immature", "Bruised", "Sick-looking"],
    &["Normal", "Average", "Standard", "Regular", "Usual"],
    &["Wily", "Cunning", "Spirited", "Fiery", "Energetic", "Ambitious"],
    &["Tough", "Experienced", "Solid", "Rugged", "Stout", "Strong"],
    &["Challenging", "Full-grown", "Trained", "Tricky"],
    &["Seasoned", "Practiced", "Adept", "Wise", "Veteran", "Proficient"],
    &["Elite", "Battle-Hardened", "Steely", "Hardened", "Ruthless", "Dauntless"],
];

const FRIENDLY: [&str; 6] = ["friendly", "ally", "peaceful", "relaxed", "polite", "smiling"];
const HOSTILE: [&str; 6] = ["hostile", "enemy", "angry", "violent", "rude", "crazed"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatStats {
    pub max_hp: i32,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub accuracy: i32,
    pub evasion: i32,
}

/// An enemy or ally standing in a room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub level: i32,
    pub stats: CombatStats,
    pub hostile: bool,
    pub defeated: bool,
}

impl CombatStats {
    /// Base block plus one random bonus roll per level.
    pub fn rolled(base: &CharacterStats, level: i32, rng: &mut RandomNumberGenerator) -> Self {
        let mut stats = Self {
            max_hp: base.hit_points,
            hp: base.hit_points,
            attack: base.attack_points,
            defense: base.defense_points,
            accuracy: base.accuracy,
            evasion: base.evasion,
        };
        for _ in 0..level.max(0) {
            stats.max_hp += rng.range(2, 13);
            stats.attack += rng.range(1, 4);
            stats.defense += rng.range(1, 3);
            stats.accuracy += rng.range(1, 3);
            stats.evasion += rng.range(1, 3);
        }
        stats.hp = stats.max_hp;
        stats
    }
}

impl Character {
    pub fn from_data(
        data: &CharacterData,
        hostile: bool,
        player_level: i32,
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        let level = data.level.max(1);
        let stats = CombatStats::rolled(&data.stats, level, rng);
        let name = decorated_name(&data.name, hostile, level - player_level, rng);
        Self {
            name,
            level,
            stats,
            hostile,
            defeated: false,
        }
    }

    pub fn mark_defeated(&mut self) {
        self.defeated = true;
        self.stats.hp = 0;
    }

    pub fn is_active(&self) -> bool {
        !self.defeated
    }

    pub fn xp_reward(&self, player_level: i32) -> u32 {
        let difference = f64::from(self.level - player_level);
        let reward = if difference >= 0.0 {
            BASE_XP_REWARD * ((1.0 + difference) * 0.5)
        } else {
            BASE_XP_REWARD / (1.0 - 0.1 * difference)
        };
        reward.round() as u32
    }
}

/// XP needed to leave `level`.
pub fn xp_required_for_level(level: i32) -> u32 {
    (BASE_XP_PEAK * 1.5_f64.powi(level - 1)).round() as u32
}

/// "Cunning Goblin (angry)": strength descriptor, base name, disposition.
pub fn decorated_name(
    base_name: &str,
    hostile: bool,
    level_difference: i32,
    rng: &mut RandomNumberGenerator,
) -> String {
    let descriptors = DESCRIPTORS[(level_difference.clamp(-5, 5) + 5) as usize];
    let descriptor = rng.random_slice_entry(descriptors).copied().unwrap_or_default();
    let synonyms: &[&str] = if hostile { &HOSTILE } else { &FRIENDLY };
    let disposition = rng.random_slice_entry(synonyms).copied().unwrap_or_default();
    format!("{descriptor} {base_name} ({disposition})")
}
