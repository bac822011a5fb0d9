//! Enemy decision loop.

use rand::Rng;
use tracing::trace;

use crate::entity::EntityId;
use crate::geometry::Direction;
use crate::world::World;

use super::Director;

/// Moves and fires every enemy vehicle, in id order.
#[derive(Debug, Clone, Default)]
pub struct AiDirector;

impl AiDirector {
    /// Creates the AI director.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn think(world: &mut World, id: EntityId) {
        if world.rng.gen::<f64>() < world.config.enemy_move_chance {
            let direction = Direction::ALL[world.rng.gen_range(0..Direction::ALL.len())];
            if world.rng.gen::<f64>() < world.config.enemy_redirect_chance {
                let moved = world.move_vehicle(id, direction);
                trace!(tick = world.tick, entity = %id, %direction, moved, "enemy redirect");
            }
        }

        let idle = world
            .arena
            .vehicle(id)
            .is_some_and(|v| !v.has_live_projectile());
        if idle && world.rng.gen::<f64>() < world.config.enemy_fire_chance {
            world.fire(id);
        }
    }
}

impl Director for AiDirector {
    fn name(&self) -> &'static str {
        "ai"
    }

    fn direct(&mut self, world: &mut World) {
        let enemies: Vec<EntityId> = world.arena.enemy_ids().collect();
        for id in enemies {
            if world.arena.grid().contains(id) {
                Self::think(world, id);
            }
        }
    }
}
