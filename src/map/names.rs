use bracket_random::prelude::RandomNumberGenerator;
use rand::seq::SliceRandom;

use crate::data::RoomArchetype;

/// Draws every word once in shuffled order, then falls back to picking with
/// replacement.
#[derive(Clone, Debug)]
pub struct ShuffledCycle {
    words: Vec<String>,
    pending: Vec<usize>,
}

impl ShuffledCycle {
    pub fn new(words: &[String], rng: &mut RandomNumberGenerator) -> Self {
        let mut pending: Vec<usize> = (0..words.len()).collect();
        pending.shuffle(rng.get_rng());
        Self {
            words: words.to_vec(),
            pending,
        }
    }

    pub fn draw(&mut self, rng: &mut RandomNumberGenerator) -> Option<&str> {
        let idx = match self.pending.pop() {
            Some(idx) => idx,
            None => rng.random_slice_index(&self.words)?,
        };
        Some(&self.words[idx])
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

/// Per-archetype word cycles used to title and describe new rooms.
#[derive(Clone, Debug)]
pub struct NameDeck {
    room_type: String,
    nouns: ShuffledCycle,
    adjectives: ShuffledCycle,
    scenery: ShuffledCycle,
    atmosphere: ShuffledCycle,
}

impl NameDeck {
    pub fn new(archetype: &RoomArchetype, rng: &mut RandomNumberGenerator) -> Self {
        Self {
            room_type: archetype.room_type.clone(),
            nouns: ShuffledCycle::new(&archetype.names, rng),
            adjectives: ShuffledCycle::new(&archetype.adjectives, rng),
            scenery: ShuffledCycle::new(&archetype.scenery, rng),
            atmosphere: ShuffledCycle::new(&archetype.atmosphere, rng),
        }
    }

    /// "Adjective Noun"; the room type stands in for a missing noun list.
    pub fn name(&mut self, rng: &mut RandomNumberGenerator) -> String {
        let noun = self
            .nouns
            .draw(rng)
            .map(str::to_string)
            .unwrap_or_else(|| capitalize(&self.room_type));
        match self.adjectives.draw(rng) {
            Some(adjective) => format!("{adjective} {noun}"),
            None => noun,
        }
    }

    /// Scenery and atmosphere sentences, in either order.
    pub fn description(&mut self, rng: &mut RandomNumberGenerator) -> String {
        let scenery = self.scenery.draw(rng).unwrap_or_default().to_string();
        let atmosphere = self.atmosphere.draw(rng).unwrap_or_default().to_string();
        let (first, second) = if rng.range(0, 2) == 0 {
            (scenery, atmosphere)
        } else {
            (atmosphere, scenery)
        };
        [first, second]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
