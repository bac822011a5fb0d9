//! # Citadel Core
//!
//! Tick-driven simulation engine for Citadel, a top-down grid tank battle.
//!
//! Player and enemy tanks trade projectiles across bricks, stone, water,
//! trees and mirrors while defending a castle. Enemies arrive in waves and
//! timed power-ups appear on the floor. The crate owns the rules only:
//! drawing, sound playback and keyboard polling belong to the host, which
//! talks to the engine through [`Simulation`].
//!
//! ## Architecture
//!
//! - **Grid**: [`SpatialGrid`] occupancy for terrain and vehicles
//! - **Entities**: terrain, vehicles, projectiles, explosions, power-ups
//! - **Directors**: enemy AI, waves and floor power-ups
//! - **Resolvers**: combat and power-up collection
//! - **Simulation**: the tick loop, levels, player input and cheats
//!
//! ## Usage
//!
//! ```
//! use citadel_core::{Command, Direction, Simulation};
//!
//! let mut sim = Simulation::with_builtin_levels(7).unwrap();
//! sim.submit_player(Command::Fire);
//! sim.advance_tick();
//!
//! for spec in sim.render_specs() {
//!     let _ = (spec.x, spec.y, spec.visual);
//! }
//! let _cues = sim.take_cues();
//! # let _ = Direction::North;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod director;
pub mod entity;
pub mod error;
pub mod events;
pub mod geometry;
pub mod grid;
pub mod level;
pub mod powerup;
pub mod render;
pub mod resolver;
pub mod schedule;
pub mod simulation;
pub mod world;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use config::SimConfig;
pub use entity::{EntityId, EntityInner, EntityTag, ProjectileKind, Vehicle, VehicleKind, Weapon};
pub use error::{ConfigError, GridError, LevelError, SimError};
pub use events::{AudioCue, Command, Theme};
pub use geometry::{Direction, Rect};
pub use grid::SpatialGrid;
pub use level::{BuiltinLevels, LevelLayout, LevelProvider, LevelSet, Tile};
pub use powerup::{BoostFlags, PowerUpKind};
pub use render::{RenderSpec, Visual};
pub use simulation::{Cheat, Simulation};
pub use world::World;
