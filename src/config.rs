use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};

pub const DEFAULT_GRID_WIDTH: i32 = 9;
pub const DEFAULT_GRID_HEIGHT: i32 = 9;

/// What the orchestrator does when some cluster pair could not be linked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityPolicy {
    /// Count the pass as failed and start over.
    #[default]
    Retry,
    /// Ship the map and expose the missing links through `unresolved_links`.
    Tolerate,
}

/// Knobs for one map generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    /// Inclusive bounds for the per-cluster room target.
    pub min_cluster_rooms: usize,
    pub max_cluster_rooms: usize,
    pub max_attempts: u32,
    pub connectivity: ConnectivityPolicy,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            min_cluster_rooms: 7,
            max_cluster_rooms: 10,
            max_attempts: 5,
            connectivity: ConnectivityPolicy::Retry,
        }
    }
}

impl GenerationConfig {
    pub fn with_grid(grid_width: i32, grid_height: i32) -> Self {
        Self {
            grid_width,
            grid_height,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width < 1 || self.grid_height < 1 {
            return Err(MapError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.min_cluster_rooms == 0 || self.min_cluster_rooms > self.max_cluster_rooms {
            return Err(MapError::InvalidClusterRange {
                min: self.min_cluster_rooms,
                max: self.max_cluster_rooms,
            });
        }
        if self.max_attempts == 0 {
            return Err(MapError::NoAttempts);
        }
        Ok(())
    }
}
