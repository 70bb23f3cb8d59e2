use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use log::debug;
use rand::seq::SliceRandom;

use super::{
    graph::RoomGraph,
    room::{Occupant, OccupantKind, PLACEABLES},
};
use crate::{
    data::{
        Theme,
        characters::Character,
        items::{Armor, KeyItem, LockItem, Weapon},
    },
    error::{MapError, Result},
};

/// Deals one of each placeable into distinct rooms.
pub struct ContentPlacer<'a> {
    theme: &'a Theme,
    /// Level character names are decorated against.
    player_level: i32,
}

fn pick<'t, T>(
    table: &'t [T],
    label: &'static str,
    rng: &mut RandomNumberGenerator,
) -> Result<&'t T> {
    rng.random_slice_entry(table).ok_or(MapError::EmptyTable(label))
}

impl<'a> ContentPlacer<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            theme,
            player_level: 1,
        }
    }

    pub fn with_player_level(mut self, level: i32) -> Self {
        self.player_level = level.max(1);
        self
    }

    /// One occupant per kind in `PLACEABLES` order. Key and lock share a
    /// puzzle entry.
    pub fn draw(&self, rng: &mut RandomNumberGenerator) -> Result<Vec<Occupant>> {
        let elements = &self.theme.elements;
        let puzzle = pick(&elements.puzzle_items, "puzzle_items", rng)?;
        let weapon = pick(&elements.weapons, "weapons", rng)?;
        let armor = pick(&elements.armor, "armor", rng)?;
        let enemy = pick(&elements.enemies, "enemies", rng)?;
        let ally = pick(&elements.allies, "allies", rng)?;

        let occupants = PLACEABLES
            .into_iter()
            .map(|kind| match kind {
                OccupantKind::Key => Occupant::Key(KeyItem::from_puzzle(puzzle)),
                OccupantKind::Lock => Occupant::Lock(LockItem::from_puzzle(puzzle)),
                OccupantKind::Weapon => Occupant::Weapon(Weapon::from(weapon)),
                OccupantKind::Armor => Occupant::Armor(Armor::from(armor)),
                OccupantKind::Enemy => {
                    Occupant::Enemy(Character::from_data(enemy, true, self.player_level, rng))
                }
                OccupantKind::Ally => {
                    Occupant::Ally(Character::from_data(ally, false, self.player_level, rng))
                }
            })
            .collect();
        Ok(occupants)
    }

    /// Assigns every placeable to a different vacant room other than
    /// `start`. On error no room is touched.
    pub fn place(
        &self,
        graph: &mut RoomGraph,
        start: Option<Point>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<(OccupantKind, Point)>> {
        let mut candidates: Vec<Point> = graph
            .rooms()
            .iter()
            .filter(|room| Some(room.position()) != start && room.is_vacant())
            .map(|room| room.position())
            .collect();
        if candidates.len() < PLACEABLES.len() {
            return Err(MapError::NotEnoughRooms {
                needed: PLACEABLES.len(),
                available: candidates.len(),
            });
        }

        let occupants = self.draw(rng)?;
        candidates.shuffle(rng.get_rng());

        let mut placed = Vec::with_capacity(occupants.len());
        for (occupant, point) in occupants.into_iter().zip(candidates) {
            let kind = occupant.kind();
            let Some(room) = graph.room_at_mut(point) else {
                continue;
            };
            if room.place_occupant(occupant).is_ok() {
                debug!("placed {} in {:?}", kind.as_str(), point);
                placed.push((kind, point));
            }
        }
        Ok(placed)
    }
}
