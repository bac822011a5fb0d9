//! Resolvers turn the arena state of a tick into consequences.
//!
//! Resolvers run after the directors have issued their intents and mutate
//! the [`World`] directly. They must tolerate objects vanishing mid-pass: an
//! object removed earlier in the same pass is skipped, never an error.
//!
//! # Invariants
//!
//! - Iterate over a snapshot of ids, re-fetching each object before use.
//! - Deterministic given the same world and random stream.
//!
//! # Available Resolvers
//!
//! - [`CombatResolver`]: projectile movement and every collision it causes
//! - [`PickupResolver`]: power-up collection by the player

mod combat;
mod pickup;

pub use combat::{CombatResolver, CombatStats};
pub use pickup::PickupResolver;

use crate::world::World;

/// A tick stage that applies consequences to the world.
pub trait Resolver {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Runs the stage once for the current tick.
    fn resolve(&mut self, world: &mut World);
}
