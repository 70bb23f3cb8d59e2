use bracket_geometry::prelude::Point;

use super::{
    registry::PositionRegistry,
    room::{ClusterId, Direction, Room},
};
use crate::error::{MapError, Result};

/// Arena of rooms addressed by grid position. All structural mutation goes
/// through here so neighbour links stay symmetric and within caps.
#[derive(Clone, Debug)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    registry: PositionRegistry,
}

impl RoomGraph {
    pub fn new(registry: PositionRegistry) -> Self {
        Self {
            rooms: Vec::new(),
            registry,
        }
    }

    pub fn registry(&self) -> &PositionRegistry {
        &self.registry
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn insert(
        &mut self,
        position: Point,
        room_type: &str,
        name: String,
        description: String,
        cluster: ClusterId,
        max_connections: usize,
    ) -> Result<&Room> {
        let index = self.rooms.len();
        if !self.registry.reserve(position, index, cluster) {
            return Err(MapError::PositionTaken(position));
        }
        self.rooms.push(Room::new(
            position,
            room_type,
            name,
            description,
            cluster,
            max_connections,
        ));
        Ok(&self.rooms[index])
    }

    pub fn room_at(&self, point: Point) -> Option<&Room> {
        self.registry
            .room_index(point)
            .map(|index| &self.rooms[index])
    }

    pub fn room_at_mut(&mut self, point: Point) -> Option<&mut Room> {
        self.registry
            .room_index(point)
            .map(|index| &mut self.rooms[index])
    }

    /// Links `a` to `b` through `direction` on `a`'s side and the opposite
    /// slot on `b`'s. Returns false and changes nothing when the rooms are
    /// not adjacent that way, already linked, or either is at its cap.
    pub fn connect(&mut self, a: Point, b: Point, direction: Direction) -> bool {
        if Direction::between(a, b) != Some(direction) {
            return false;
        }
        let (Some(ia), Some(ib)) = (self.registry.room_index(a), self.registry.room_index(b))
        else {
            return false;
        };
        let (room_a, room_b) = (&self.rooms[ia], &self.rooms[ib]);
        if room_a.is_connected_to(b) || room_b.is_connected_to(a) {
            return false;
        }
        if room_a.neighbor(direction).is_some()
            || room_b.neighbor(direction.opposite()).is_some()
        {
            return false;
        }
        if !room_a.has_capacity() || !room_b.has_capacity() {
            return false;
        }
        self.rooms[ia].set_neighbor(direction, b);
        self.rooms[ib].set_neighbor(direction.opposite(), a);
        true
    }

    pub fn connect_adjacent(&mut self, a: Point, b: Point) -> bool {
        match Direction::between(a, b) {
            Some(direction) => self.connect(a, b, direction),
            None => false,
        }
    }

    pub fn are_connected(&self, a: Point, b: Point) -> bool {
        self.room_at(a).is_some_and(|room| room.is_connected_to(b))
    }

    pub fn count_connections(&self, point: Point) -> usize {
        self.room_at(point).map_or(0, Room::connection_count)
    }

    pub fn available_connections(&self, point: Point) -> Vec<Direction> {
        self.room_at(point)
            .map(Room::available_connections)
            .unwrap_or_default()
    }

    pub fn connected_rooms(&self, point: Point) -> Vec<&Room> {
        self.room_at(point)
            .map(|room| {
                room.exits()
                    .filter_map(|(_, next)| self.room_at(next))
                    .collect()
            })
            .unwrap_or_default()
    }
}
