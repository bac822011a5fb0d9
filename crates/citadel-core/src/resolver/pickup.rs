//! Power-up collection.

use tracing::debug;

use crate::entity::EntityId;
use crate::powerup::PowerUpKind;
use crate::schedule::ScheduledAction;
use crate::world::World;

use super::Resolver;

/// Hands floor power-ups to the player.
///
/// A power-up is collected when the player's anchor cell is exactly the
/// power-up's cell and the player holds fewer than the maximum number of
/// active power-ups. Collection starts the pickup cooldown that keeps new
/// floor power-ups from appearing for a while.
#[derive(Debug, Clone, Default)]
pub struct PickupResolver {
    collected: usize,
}

impl PickupResolver {
    /// Creates a new pickup resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-ups collected over the resolver's lifetime.
    #[must_use]
    pub const fn collected(&self) -> usize {
        self.collected
    }
}

impl Resolver for PickupResolver {
    fn name(&self) -> &'static str {
        "pickup"
    }

    fn resolve(&mut self, world: &mut World) {
        let player = world.player;
        let Ok(anchor) = world.arena.grid().locate(player) else {
            return;
        };
        let under: Vec<(EntityId, PowerUpKind)> = world
            .arena
            .powerups()
            .filter(|(_, floor)| (floor.row, floor.col) == anchor)
            .map(|(id, floor)| (id, floor.kind))
            .collect();

        for (id, kind) in under {
            let held = world.arena.vehicle(player).map_or(usize::MAX, |v| v.powerups().len());
            if held >= world.config.max_active_powerups {
                continue;
            }
            world.arena.remove_powerup(id);
            world.grant_powerup(player, kind, world.config.powerup_duration_secs);
            world.just_powered_up = true;
            world.schedule_in(
                world.config.pickup_cooldown_secs,
                ScheduledAction::ClearPickupCooldown,
            );
            self.collected += 1;
            debug!(tick = world.tick, ?kind, "power-up collected");
        }
    }
}
