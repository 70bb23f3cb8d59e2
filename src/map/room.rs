use std::collections::BTreeMap;

use bracket_geometry::prelude::Point;

use crate::data::{
    characters::Character,
    items::{Armor, Item, KeyItem, LockItem, Weapon},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

pub const DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

impl Direction {
    /// Grid offset; y grows southwards.
    pub fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::South => Point::new(0, 1),
            Direction::East => Point::new(1, 0),
            Direction::West => Point::new(-1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        DIRECTIONS
            .into_iter()
            .find(|dir| dir.as_str().eq_ignore_ascii_case(name.trim()))
    }

    fn slot(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    pub fn step(self, from: Point) -> Point {
        let delta = self.delta();
        Point::new(from.x + delta.x, from.y + delta.y)
    }

    /// Direction leading from `from` to `to`, if the cells are grid-adjacent.
    pub fn between(from: Point, to: Point) -> Option<Self> {
        DIRECTIONS.into_iter().find(|dir| dir.step(from) == to)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccupantKind {
    Key,
    Lock,
    Weapon,
    Armor,
    Enemy,
    Ally,
}

/// The six unique gameplay objects distributed across a fresh map.
pub const PLACEABLES: [OccupantKind; 6] = [
    OccupantKind::Key,
    OccupantKind::Lock,
    OccupantKind::Weapon,
    OccupantKind::Armor,
    OccupantKind::Enemy,
    OccupantKind::Ally,
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    Key(KeyItem),
    Lock(LockItem),
    Weapon(Weapon),
    Armor(Armor),
    Enemy(Character),
    Ally(Character),
}

impl OccupantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupantKind::Key => "key",
            OccupantKind::Lock => "lock",
            OccupantKind::Weapon => "weapon",
            OccupantKind::Armor => "armor",
            OccupantKind::Enemy => "enemy",
            OccupantKind::Ally => "ally",
        }
    }
}

impl Occupant {
    pub fn kind(&self) -> OccupantKind {
        match self {
            Occupant::Key(_) => OccupantKind::Key,
            Occupant::Lock(_) => OccupantKind::Lock,
            Occupant::Weapon(_) => OccupantKind::Weapon,
            Occupant::Armor(_) => OccupantKind::Armor,
            Occupant::Enemy(_) => OccupantKind::Enemy,
            Occupant::Ally(_) => OccupantKind::Ally,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Occupant::Key(key) => &key.name,
            Occupant::Lock(lock) => &lock.name,
            Occupant::Weapon(weapon) => &weapon.name,
            Occupant::Armor(armor) => &armor.name,
            Occupant::Enemy(character) | Occupant::Ally(character) => &character.name,
        }
    }
}

impl From<Item> for Occupant {
    fn from(item: Item) -> Self {
        match item {
            Item::Key(key) => Occupant::Key(key),
            Item::Lock(lock) => Occupant::Lock(lock),
            Item::Weapon(weapon) => Occupant::Weapon(weapon),
            Item::Armor(armor) => Occupant::Armor(armor),
        }
    }
}

/// One grid cell of the dungeon. Position, cluster, cap and neighbours are
/// fixed once the map is built; occupants stay mutable for gameplay.
#[derive(Clone, Debug)]
pub struct Room {
    position: Point,
    room_type: String,
    name: String,
    description: String,
    cluster: ClusterId,
    max_connections: usize,
    neighbors: [Option<Point>; 4],
    occupants: BTreeMap<OccupantKind, Occupant>,
}

impl Room {
    pub(crate) fn new(
        position: Point,
        room_type: &str,
        name: String,
        description: String,
        cluster: ClusterId,
        max_connections: usize,
    ) -> Self {
        Self {
            position,
            room_type: room_type.to_string(),
            name,
            description,
            cluster,
            max_connections: max_connections.min(DIRECTIONS.len()),
            neighbors: [None; 4],
            occupants: BTreeMap::new(),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cluster(&self) -> ClusterId {
        self.cluster
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    pub fn symbol(&self) -> char {
        self.name.chars().next().unwrap_or(' ')
    }

    pub fn neighbor(&self, direction: Direction) -> Option<Point> {
        self.neighbors[direction.slot()]
    }

    pub(crate) fn set_neighbor(&mut self, direction: Direction, neighbor: Point) {
        self.neighbors[direction.slot()] = Some(neighbor);
    }

    /// Populated directions with the neighbour each one leads to.
    pub fn exits(&self) -> impl Iterator<Item = (Direction, Point)> + '_ {
        DIRECTIONS
            .into_iter()
            .filter_map(|dir| self.neighbor(dir).map(|point| (dir, point)))
    }

    pub fn connection_count(&self) -> usize {
        self.neighbors.iter().flatten().count()
    }

    pub fn available_connections(&self) -> Vec<Direction> {
        DIRECTIONS
            .into_iter()
            .filter(|dir| self.neighbor(*dir).is_none())
            .collect()
    }

    pub fn has_capacity(&self) -> bool {
        self.connection_count() < self.max_connections
    }

    pub fn is_connected_to(&self, other: Point) -> bool {
        self.neighbors.contains(&Some(other))
    }

    pub fn occupant(&self, kind: OccupantKind) -> Option<&Occupant> {
        self.occupants.get(&kind)
    }

    pub fn occupant_mut(&mut self, kind: OccupantKind) -> Option<&mut Occupant> {
        self.occupants.get_mut(&kind)
    }

    pub fn occupants(&self) -> impl Iterator<Item = &Occupant> + '_ {
        self.occupants.values()
    }

    pub fn is_vacant(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Clears a slot, e.g. when the player picks an item up.
    pub fn take_occupant(&mut self, kind: OccupantKind) -> Option<Occupant> {
        self.occupants.remove(&kind)
    }

    /// Fills the matching slot; hands the occupant back if it is taken.
    pub fn place_occupant(&mut self, occupant: Occupant) -> Result<(), Occupant> {
        let kind = occupant.kind();
        if self.occupants.contains_key(&kind) {
            return Err(occupant);
        }
        self.occupants.insert(kind, occupant);
        Ok(())
    }

    pub fn enemy_mut(&mut self) -> Option<&mut Character> {
        match self.occupants.get_mut(&OccupantKind::Enemy) {
            Some(Occupant::Enemy(character)) => Some(character),
            _ => None,
        }
    }

    /// Text-adventure summary of the room.
    pub fn describe(&self) -> String {
        let mut text = format!("{} ({}): {}", self.name, self.room_type, self.description);
        for occupant in self.occupants.values() {
            match occupant {
                Occupant::Enemy(character) if character.defeated => {
                    text.push_str(&format!("\nThe {} lies defeated here.", character.name));
                }
                Occupant::Ally(character) => {
                    text.push_str(&format!("\nA {} is here.", character.name));
                }
                other => text.push_str(&format!("\nYou see a {} here.", other.name())),
            }
        }
        let exits: Vec<&str> = self.exits().map(|(dir, _)| dir.as_str()).collect();
        if exits.is_empty() {
            text.push_str("\nThere is no way out.");
        } else {
            text.push_str(&format!("\nYou can go: {}", exits.join(", ")));
        }
        text
    }
}
