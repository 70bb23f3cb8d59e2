use bracket_geometry::prelude::Point;
use thiserror::Error;

/// Everything that can stop a map from reaching the ready state.
///
/// Invalid connection requests are not represented here: `RoomGraph::connect`
/// answers those with `false`.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32 },

    #[error("cluster size range {min}..={max} is empty")]
    InvalidClusterRange { min: usize, max: usize },

    #[error("retry budget must allow at least one attempt")]
    NoAttempts,

    #[error("theme defines no room archetypes")]
    NoRoomTypes,

    #[error("theme has no room archetype named '{0}'")]
    UnknownRoomType(String),

    #[error("theme table '{0}' is empty")]
    EmptyTable(&'static str),

    #[error("cell {0:?} is already occupied or off the grid")]
    PositionTaken(Point),

    #[error("content placement needs {needed} free rooms, found {available}")]
    NotEnoughRooms { needed: usize, available: usize },

    #[error("cluster growth stalled with {free} free cells left")]
    GrowthStalled { free: usize },

    #[error("{unresolved} cluster links could not be materialized")]
    Disconnected { unresolved: usize },

    #[error("map generation failed after {attempts} attempts: {last}")]
    GenerationFailed {
        attempts: u32,
        #[source]
        last: Box<MapError>,
    },

    #[error("theme parse error: {0}")]
    Theme(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    /// Failures that a fresh pass with new randomness may avoid.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MapError::GrowthStalled { .. } | MapError::Disconnected { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
