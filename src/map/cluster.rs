use std::collections::BTreeMap;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use log::debug;

use super::{
    graph::RoomGraph,
    names::NameDeck,
    room::{ClusterId, DIRECTIONS},
};
use crate::{
    config::GenerationConfig,
    data::Theme,
    error::{MapError, Result},
};

pub const START_ROOM_CONNECTIONS: usize = 1;
pub const SEED_ROOM_CONNECTIONS: usize = 2;
pub const ROOM_CONNECTIONS: usize = 4;

/// One themed group of rooms, in growth order. The first entry is the seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cluster {
    pub id: ClusterId,
    pub room_type: String,
    pub rooms: Vec<Point>,
}

impl Cluster {
    pub fn seed(&self) -> Option<Point> {
        self.rooms.first().copied()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Grows clusters one at a time. Word decks persist across clusters so a
/// room type that appears twice keeps drawing from the same cycles.
pub struct ClusterGrower<'a> {
    theme: &'a Theme,
    min_rooms: usize,
    max_rooms: usize,
    decks: BTreeMap<String, NameDeck>,
}

impl<'a> ClusterGrower<'a> {
    pub fn new(theme: &'a Theme, config: &GenerationConfig) -> Self {
        Self {
            theme,
            min_rooms: config.min_cluster_rooms.max(1),
            max_rooms: config.max_cluster_rooms.max(config.min_cluster_rooms.max(1)),
            decks: BTreeMap::new(),
        }
    }

    /// Seeds and grows one cluster. `Ok(None)` means no seed cell was
    /// available and nothing was placed.
    pub fn grow(
        &mut self,
        graph: &mut RoomGraph,
        id: ClusterId,
        room_type: &str,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<Cluster>> {
        let archetype = self
            .theme
            .room_archetype(room_type)
            .ok_or_else(|| MapError::UnknownRoomType(room_type.to_string()))?;

        let registry = graph.registry();
        let seed = if graph.is_empty() {
            Some(registry.center()).filter(|center| registry.is_free(*center))
        } else {
            registry.seed_position()
        };
        let Some(seed) = seed else {
            debug!("no seed cell left for a {room_type} cluster");
            return Ok(None);
        };

        let deck = self
            .decks
            .entry(room_type.to_string())
            .or_insert_with(|| NameDeck::new(archetype, rng));

        let seed_cap = if id == ClusterId(0) {
            START_ROOM_CONNECTIONS
        } else {
            SEED_ROOM_CONNECTIONS
        };
        let (name, description) = (deck.name(rng), deck.description(rng));
        graph.insert(seed, room_type, name, description, id, seed_cap)?;

        let target = rng.range(self.min_rooms as i32, self.max_rooms as i32 + 1) as usize;
        let mut rooms = vec![seed];
        let mut frontier: Vec<Point> = graph.registry().free_neighbors(seed).collect();

        while rooms.len() < target && !frontier.is_empty() {
            let Some(pick) = rng.random_slice_index(&frontier) else {
                break;
            };
            let cell = frontier.swap_remove(pick);
            if !graph.registry().free_adjacent_to_cluster(cell, id) {
                continue;
            }

            let anchors: Vec<Point> = DIRECTIONS
                .into_iter()
                .map(|dir| dir.step(cell))
                .filter(|next| {
                    graph
                        .room_at(*next)
                        .is_some_and(|room| room.cluster() == id && room.has_capacity())
                })
                .collect();
            if anchors.is_empty() {
                continue;
            }

            let (name, description) = (deck.name(rng), deck.description(rng));
            graph.insert(cell, room_type, name, description, id, ROOM_CONNECTIONS)?;
            for anchor in anchors {
                graph.connect_adjacent(cell, anchor);
            }
            rooms.push(cell);

            let registry = graph.registry();
            for next in registry.free_neighbors(cell) {
                if registry.free_adjacent_to_cluster(next, id) && !frontier.contains(&next) {
                    frontier.push(next);
                }
            }
        }

        debug!(
            "grew {} cluster {} at {:?}: {} of {} rooms",
            room_type,
            id.0,
            seed,
            rooms.len(),
            target
        );
        Ok(Some(Cluster {
            id,
            room_type: room_type.to_string(),
            rooms,
        }))
    }
}
