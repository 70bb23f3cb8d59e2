//! Grid dungeon generator for text adventures: themed room clusters grown on
//! a small grid, linked into one graph and stocked with a key, a lock, gear
//! and two characters.

pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod player;

pub use config::{ConnectivityPolicy, GenerationConfig};
pub use data::{Theme, ThemeBook};
pub use error::{MapError, Result};
pub use map::{
    GameMap, GenerationPhase,
    cluster::Cluster,
    connector::UnresolvedLink,
    room::{ClusterId, Direction, Occupant, OccupantKind, Room},
};
pub use player::Player;
