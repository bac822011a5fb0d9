//! Enemy waves and floor power-ups.

use rand::Rng;
use tracing::{debug, info};

use crate::entity::{EntityInner, Vehicle, VehicleKind};
use crate::world::World;

use super::Director;

/// Spawns enemy waves and floor power-ups.
///
/// A wave spawns when the counter is below the terminal wave and the arena
/// holds neither enemies nor projectiles. Every enemy spawn point gets one
/// vehicle (plain on wave 1, a coin flip between plain and elite later);
/// occupied points are skipped.
///
/// Independently, while the floor is empty, the wave has reached the pickup
/// threshold and no pickup cooldown is active, one power-up appears at a
/// random power-up spawn point.
#[derive(Debug, Clone, Default)]
pub struct WaveDirector;

impl WaveDirector {
    /// Creates the wave director.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Spawns the next wave if the arena is quiet. Returns `true` if a wave
    /// was started.
    pub fn spawn_wave(world: &mut World) -> bool {
        if world.wave >= world.config.terminal_wave
            || world.arena.enemy_count() > 0
            || world.arena.projectile_count() > 0
        {
            return false;
        }

        let mut spawned = 0;
        for (row, col) in world.enemy_spawns().to_vec() {
            let kind = if world.wave >= 2 && world.rng.gen_bool(0.5) {
                VehicleKind::Magic
            } else {
                VehicleKind::Enemy
            };
            match world
                .arena
                .spawn_at(EntityInner::Vehicle(Vehicle::new(kind)), row, col)
            {
                Ok(_) => spawned += 1,
                Err(err) => debug!(tick = world.tick, row, col, %err, "spawn point skipped"),
            }
        }
        world.wave += 1;
        info!(tick = world.tick, wave = world.wave, spawned, "wave spawned");
        true
    }

    /// Drops a floor power-up if allowed. Returns `true` if one appeared.
    pub fn spawn_pickup(world: &mut World) -> bool {
        if world.arena.powerup_count() > 0
            || world.wave < world.config.pickup_min_wave
            || world.just_powered_up
            || world.powerup_spawns().is_empty()
            || world.config.pickup_kinds.is_empty()
        {
            return false;
        }

        let spawn_count = world.powerup_spawns().len();
        let spot = world.rng.gen_range(0..spawn_count);
        let (row, col) = world.powerup_spawns()[spot];
        let kind_count = world.config.pickup_kinds.len();
        let kind = world.config.pickup_kinds[world.rng.gen_range(0..kind_count)];
        world.arena.spawn_powerup(row, col, kind);
        debug!(tick = world.tick, row, col, ?kind, "power-up dropped");
        true
    }
}

impl Director for WaveDirector {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn direct(&mut self, world: &mut World) {
        Self::spawn_wave(world);
        Self::spawn_pickup(world);
    }
}
