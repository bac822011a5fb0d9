//! Directors decide what happens next: enemy behaviour and what spawns.
//!
//! Directors run after player intents and before combat (the AI) or after
//! pickups (waves and floor power-ups). They draw every random number from
//! [`World::rng`](crate::world::World::rng), so a run is reproducible from
//! its seed.
//!
//! # Available Directors
//!
//! - [`AiDirector`]: per-enemy movement and firing
//! - [`WaveDirector`]: enemy waves and floor power-ups

mod ai;
mod wave;

pub use ai::AiDirector;
pub use wave::WaveDirector;

use crate::world::World;

/// A tick stage that issues intents or spawns objects.
pub trait Director {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Runs the stage once for the current tick.
    fn direct(&mut self, world: &mut World);
}
