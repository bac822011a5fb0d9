//! Error types for the simulation core.
//!
//! Every error here is recoverable. Grid errors raised inside a tick are
//! absorbed by the stage that hit them (a skipped spawn point, a no-op move)
//! and never escape [`Simulation::advance_tick`](crate::simulation::Simulation::advance_tick).

use crate::entity::EntityId;

/// Errors raised by [`SpatialGrid`](crate::grid::SpatialGrid) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A cell of the target footprint already holds another object.
    #[error("cell ({row}, {col}) is already occupied")]
    OccupiedCell {
        /// Row of the first occupied cell found.
        row: usize,
        /// Column of the first occupied cell found.
        col: usize,
    },
    /// The object is not placed on the grid.
    #[error("entity {0} is not on the grid")]
    NotFound(EntityId),
    /// The target footprint extends past the grid edge.
    #[error("cell ({row}, {col}) is outside the grid")]
    OutOfBounds {
        /// Row of the offending cell.
        row: i64,
        /// Column of the offending cell.
        col: i64,
    },
}

/// Errors raised while fetching or validating a level layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    /// The provider has no level with this index.
    #[error("unknown level {0}")]
    UnknownLevel(u32),
    /// The layout does not match the arena dimensions.
    #[error("layout is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    Dimensions {
        /// Rows the arena expects.
        expected_rows: usize,
        /// Columns the arena expects.
        expected_cols: usize,
        /// Rows found in the layout.
        rows: usize,
        /// Columns found in the layout (widest row).
        cols: usize,
    },
}

/// Errors raised by [`SimConfig::validate`](crate::config::SimConfig::validate).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A probability lies outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Name of the offending setting.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A dimension or rate that must be positive is zero.
    #[error("{0} must be greater than zero")]
    ZeroDimension(&'static str),
    /// The tick rate is so high a projectile of this speed would never move.
    #[error("tick_rate {tick_rate} stalls projectiles of speed {speed}")]
    StalledProjectile {
        /// The rejected tick rate.
        tick_rate: u32,
        /// Slowest projectile speed in pixels per second.
        speed: i32,
    },
}

/// Top-level error for simulation setup and level transitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Level lookup or validation failed.
    #[error("level error: {0}")]
    Level(#[from] LevelError),
    /// Grid operation failed.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
}
