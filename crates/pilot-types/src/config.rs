//! World and session configuration.
//!
//! Every field has a default matching the reference level, so `{}` is a
//! valid configuration document.

use crate::world::{AgentState, Grid, Heading, Position, World};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_GRID_SIZE: u32 = 6;
pub const MAX_GRID_SIZE: u32 = 64;
pub const DEFAULT_STEP_DELAY_MS: u64 = 800;
pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// How the parser treats lines it does not recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop the line, record a warning, keep going.
    #[default]
    Permissive,
    /// Record an error; the program is not run.
    Strict,
}

/// Errors from validating a [`WorldConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be between 1 and {max}, got {0}", max = MAX_GRID_SIZE)]
    GridSize(u32),

    #[error("start position {0} is outside the grid")]
    StartOutOfBounds(Position),

    #[error("target position {0} is outside the grid")]
    TargetOutOfBounds(Position),

    #[error("max_steps must be greater than zero")]
    ZeroStepLimit,

    #[error("invalid configuration JSON: {0}")]
    Json(String),
}

/// Raw configuration, as loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub grid_size: u32,
    pub start: Position,
    pub start_heading: Heading,
    pub target: Position,
    /// Pause between animated steps.
    pub step_delay_ms: u64,
    pub max_steps: u64,
    pub parse_mode: ParseMode,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            start: Position::new(0, DEFAULT_GRID_SIZE as i32 - 1),
            start_heading: Heading::Up,
            target: Position::new(DEFAULT_GRID_SIZE as i32 - 1, 0),
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            max_steps: DEFAULT_MAX_STEPS,
            parse_mode: ParseMode::Permissive,
        }
    }
}

impl WorldConfig {
    /// Parse a JSON configuration document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<WorldConfig, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Check the configuration and build the [`World`] it describes.
    pub fn validate(&self) -> Result<World, ConfigError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        let grid = Grid::new(self.grid_size);
        if !grid.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds(self.start));
        }
        if !grid.contains(self.target) {
            return Err(ConfigError::TargetOutOfBounds(self.target));
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepLimit);
        }
        Ok(World {
            grid,
            start: AgentState::new(self.start, self.start_heading),
            target: self.target,
            max_steps: self.max_steps,
        })
    }
}
