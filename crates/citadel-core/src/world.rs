//! Mutable per-level state shared by every tick stage.
//!
//! [`World`] bundles the arena with the bookkeeping the stages need: the
//! deferred-action schedule, audio cues, the random stream, lives and wave
//! counters. Directors and resolvers receive `&mut World` in turn; nothing
//! else mutates it.
//!
//! The primitive actions used by several stages live here as well: firing,
//! stepping a vehicle, destroying a projectile or vehicle, granting a
//! power-up, and running due scheduled actions.

use glam::IVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::entity::{
    Brick, EntityId, EntityInner, ExplosionKind, Mirror, MirrorSlope, Vehicle, VehicleKind,
    BRICK_HP,
};
use crate::events::{AudioCue, CueLog};
use crate::geometry::Direction;
use crate::level::{LevelLayout, Tile};
use crate::powerup::PowerUpKind;
use crate::schedule::{Schedule, ScheduledAction};

/// Everything a tick stage may read or mutate.
#[derive(Debug, Clone)]
pub struct World {
    /// Tuning constants.
    pub config: SimConfig,
    /// Objects of the current level.
    pub arena: Arena,
    /// Deferred actions.
    pub schedule: Schedule,
    /// Pending audio cues.
    pub cues: CueLog,
    /// Single random stream for every stochastic decision.
    pub rng: ChaCha8Rng,
    /// Ticks advanced since creation.
    pub tick: u64,
    /// Current level index.
    pub level: u32,
    /// Wave counter of the current level, starting at 1.
    pub wave: u32,
    /// Remaining lives. Zero means game over.
    pub lives: u32,
    /// The player vehicle, placed or waiting to respawn.
    pub player: EntityId,
    /// Floor power-ups are suppressed while set.
    pub just_powered_up: bool,
    /// Set once the stage-clear cue has been emitted.
    pub level_won: bool,
    player_spawn: Option<(usize, usize)>,
    enemy_spawns: Vec<(usize, usize)>,
    powerup_spawns: Vec<(usize, usize)>,
}

impl World {
    /// Creates an empty world with a waiting player vehicle.
    #[must_use]
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut arena = Arena::new(config.rows, config.cols, config.cell_size);
        let player = arena.spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Player)));
        Self {
            lives: config.player_lives,
            config,
            arena,
            schedule: Schedule::new(),
            cues: CueLog::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
            level: 0,
            wave: 1,
            player,
            just_powered_up: false,
            level_won: false,
            player_spawn: None,
            enemy_spawns: Vec::new(),
            powerup_spawns: Vec::new(),
        }
    }

    /// Returns `true` once lives have run out.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Enemy spawn points of the loaded level.
    #[must_use]
    pub fn enemy_spawns(&self) -> &[(usize, usize)] {
        &self.enemy_spawns
    }

    /// Power-up spawn points of the loaded level.
    #[must_use]
    pub fn powerup_spawns(&self) -> &[(usize, usize)] {
        &self.powerup_spawns
    }

    /// Player anchor of the loaded level.
    #[must_use]
    pub const fn player_spawn(&self) -> Option<(usize, usize)> {
        self.player_spawn
    }

    /// Replaces the arena contents with `layout`.
    ///
    /// Clears the schedule, resets the wave counter and places `player` on
    /// the player anchor. Conflicting placements are logged and skipped.
    pub fn load_layout(&mut self, layout: &LevelLayout, player: Vehicle) {
        self.arena.clear();
        self.schedule.clear();
        self.wave = 1;
        self.just_powered_up = false;
        self.level_won = false;
        self.player_spawn = layout.player_spawn();
        self.enemy_spawns = layout.enemy_spawns().to_vec();
        self.powerup_spawns = layout.powerup_spawns().to_vec();

        for (row, col, tile) in layout.tiles() {
            let inner = match tile {
                Tile::Empty | Tile::PlayerSpawn => continue,
                Tile::Brick => EntityInner::Brick(Brick::new(BRICK_HP)),
                Tile::CrackedBrick => EntityInner::Brick(Brick::new(1)),
                Tile::Water => EntityInner::Water,
                Tile::Stone => EntityInner::Stone,
                Tile::Tree => EntityInner::Tree,
                Tile::MirrorPositive => EntityInner::Mirror(Mirror::new(MirrorSlope::Positive)),
                Tile::MirrorNegative => EntityInner::Mirror(Mirror::new(MirrorSlope::Negative)),
                Tile::Castle => EntityInner::Castle,
                Tile::EnemySpawn => EntityInner::Vehicle(Vehicle::new(VehicleKind::Enemy)),
            };
            if let Err(err) = self.arena.spawn_at(inner, row, col) {
                warn!(level = self.level, row, col, ?tile, %err, "skipping tile");
            }
        }

        self.player = self.arena.spawn(EntityInner::Vehicle(player));
        if let Some((row, col)) = self.player_spawn {
            if let Err(err) = self.arena.place(self.player, row, col) {
                warn!(level = self.level, row, col, %err, "player anchor is blocked");
            }
        }

        info!(
            level = self.level,
            entities = self.arena.entity_count(),
            enemies = self.arena.enemy_count(),
            "level loaded"
        );
    }

    /// Schedules `action` after `secs` seconds of simulated time.
    pub fn schedule_in(&mut self, secs: f64, action: ScheduledAction) {
        let due = self.tick + self.config.ticks(secs);
        self.schedule.schedule(due, action);
    }

    // =========================================================================
    // Vehicles
    // =========================================================================

    /// Turns a placed vehicle to `direction` and tries to step one cell.
    ///
    /// The destination is clamped to the grid. The turn happens even when
    /// the step is blocked. Returns `true` if the vehicle moved.
    #[allow(clippy::cast_possible_wrap)]
    pub fn move_vehicle(&mut self, id: EntityId, direction: Direction) -> bool {
        let Ok((row, col)) = self.arena.grid().locate(id) else {
            return false;
        };
        let Some(footprint) = self.arena.grid().footprint(id) else {
            return false;
        };
        let Some(vehicle) = self.arena.vehicle_mut(id) else {
            return false;
        };
        vehicle.set_facing(direction);

        let (dr, dc) = direction.cell_delta();
        let max_row = self.arena.grid().rows().saturating_sub(footprint.rows) as i64;
        let max_col = self.arena.grid().cols().saturating_sub(footprint.cols) as i64;
        let target_row = (row as i64 + dr).clamp(0, max_row);
        let target_col = (col as i64 + dc).clamp(0, max_col);
        if (target_row, target_col) == (row as i64, col as i64) {
            return false;
        }
        self.arena
            .grid_mut()
            .relocate(id, target_row, target_col)
            .is_ok()
    }

    /// Fires the weapon of a placed vehicle.
    ///
    /// The projectile appears just outside the vehicle's footprint on its
    /// facing side. Sets the live-projectile latch; callers decide whether
    /// the latch allows firing.
    pub fn fire(&mut self, id: EntityId) -> Option<EntityId> {
        let origin = self.arena.position_of(id)?;
        let footprint = self.arena.grid().footprint(id)?;
        let vehicle = self.arena.vehicle_mut(id)?;
        let projectile = vehicle
            .weapon()
            .fire(vehicle.facing(), id, vehicle.faction());
        vehicle.set_live_projectile(true);

        let collider = projectile.collider();
        let buffer = self.config.projectile_spawn_buffer;
        let cell = self.config.cell_size;
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let offset = match projectile.facing() {
            Direction::North => IVec2::new(0, -(collider.max.y + buffer)),
            Direction::West => IVec2::new(-(collider.max.x + buffer), 0),
            Direction::South => {
                IVec2::new(0, footprint.rows as i32 * cell - collider.min.y + buffer)
            }
            Direction::East => {
                IVec2::new(footprint.cols as i32 * cell - collider.min.x + buffer, 0)
            }
        };

        let cue = AudioCue::ProjectileFired {
            kind: projectile.kind(),
            owner: projectile.faction(),
        };
        let projectile_id = self.arena.spawn_projectile(origin + offset, projectile);
        self.cues.push(cue);
        Some(projectile_id)
    }

    /// Blows up a placed vehicle.
    ///
    /// Enemies are removed for good. The player loses a life and a fresh
    /// vehicle waits for the respawn timer, unless that was the last life.
    pub fn destroy_vehicle(&mut self, id: EntityId) {
        let Some(kind) = self.arena.vehicle(id).map(Vehicle::kind) else {
            return;
        };
        if let Some(position) = self.arena.position_of(id) {
            self.arena.spawn_explosion(position, ExplosionKind::Vehicle);
        }
        self.cues.push(AudioCue::VehicleDestroyed { kind: Some(kind) });
        self.arena.despawn(id);
        debug!(tick = self.tick, entity = %id, ?kind, "vehicle destroyed");

        if id != self.player {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.player = self
                .arena
                .spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Player)));
            self.schedule_in(self.config.respawn_delay_secs, ScheduledAction::RespawnPlayer);
            debug!(tick = self.tick, lives = self.lives, "player respawn scheduled");
        } else {
            self.cues.push(AudioCue::StopMusic);
            self.cues.push(AudioCue::GameOver);
            info!(tick = self.tick, level = self.level, "game over");
        }
    }

    /// Blows up the castle; the game ends after a short delay.
    pub fn destroy_castle(&mut self, id: EntityId) {
        if let Some(position) = self.arena.position_of(id) {
            self.arena.spawn_explosion(position, ExplosionKind::Vehicle);
        }
        self.arena.despawn(id);
        self.cues.push(AudioCue::VehicleDestroyed { kind: None });
        self.schedule_in(self.config.game_over_delay_secs, ScheduledAction::ForceGameOver);
        info!(tick = self.tick, level = self.level, "castle destroyed");
    }

    /// Attaches a power-up to a vehicle and schedules its expiry.
    ///
    /// Emits [`AudioCue::PowerUpCollected`]. Returns `false` if `vehicle` is not a vehicle.
    pub fn grant_powerup(&mut self, vehicle: EntityId, kind: PowerUpKind, secs: f64) -> bool {
        let Some(v) = self.arena.vehicle_mut(vehicle) else {
            return false;
        };
        let serial = v.apply_powerup(kind);
        self.schedule_in(secs, ScheduledAction::ExpirePowerUp { vehicle, serial });
        self.cues.push(AudioCue::PowerUpCollected);
        debug!(tick = self.tick, entity = %vehicle, ?kind, serial, "power-up applied");
        true
    }

    // =========================================================================
    // Projectiles
    // =========================================================================

    /// Removes a projectile, leaving an explosion where it was and freeing
    /// its owner to fire again.
    pub fn destroy_projectile(&mut self, id: EntityId, with_cue: bool) {
        let Some(state) = self.arena.remove_projectile(id) else {
            return;
        };
        let projectile = state.projectile;
        self.arena.spawn_explosion(
            state.position,
            ExplosionKind::Projectile {
                kind: projectile.kind(),
                faction: projectile.faction(),
            },
        );
        if let Some(owner) = self.arena.vehicle_mut(projectile.owner()) {
            owner.set_live_projectile(false);
        }
        if with_cue {
            self.cues.push(AudioCue::ProjectileDestroyed {
                kind: projectile.kind(),
                owner: projectile.faction(),
            });
        }
    }

    // =========================================================================
    // Scheduled actions
    // =========================================================================

    /// Runs every scheduled action due at the current tick.
    pub fn run_due_actions(&mut self) {
        for action in self.schedule.drain_due(self.tick) {
            self.run_action(action);
        }
    }

    fn run_action(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::ExpirePowerUp { vehicle, serial } => {
                let expired = self
                    .arena
                    .vehicle_mut(vehicle)
                    .is_some_and(|v| v.expire_powerup(serial));
                if expired {
                    debug!(tick = self.tick, entity = %vehicle, serial, "power-up expired");
                } else {
                    debug!(tick = self.tick, entity = %vehicle, serial, "stale power-up expiry");
                }
            }
            ScheduledAction::RespawnPlayer => self.respawn_player(),
            ScheduledAction::ForceGameOver => {
                if self.lives > 0 {
                    self.lives = 0;
                    self.cues.push(AudioCue::GameOver);
                    info!(tick = self.tick, level = self.level, "game over");
                }
            }
            ScheduledAction::ClearPickupCooldown => self.just_powered_up = false,
        }
    }

    fn respawn_player(&mut self) {
        if self.is_game_over() || self.arena.grid().contains(self.player) {
            return;
        }
        let Some((row, col)) = self.player_spawn else {
            return;
        };
        match self.arena.place(self.player, row, col) {
            Ok(()) => debug!(tick = self.tick, entity = %self.player, "player respawned"),
            Err(err) => {
                debug!(tick = self.tick, %err, "respawn blocked, retrying");
                self.schedule.schedule(self.tick + 1, ScheduledAction::RespawnPlayer);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ProjectileKind, Weapon};
    use crate::tests::{blank_map, world_from_map};

    mod movement_tests {
        use super::*;

        #[test]
        fn move_steps_one_cell() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            assert!(world.move_vehicle(world.player, Direction::East));
            assert_eq!(world.arena.grid().locate(world.player), Ok((10, 11)));
            assert_eq!(
                world.arena.vehicle(world.player).unwrap().facing(),
                Direction::East
            );
        }

        #[test]
        fn blocked_move_still_turns() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P'), (9, 11, 'S')]));
            assert!(!world.move_vehicle(world.player, Direction::North));
            assert_eq!(world.arena.grid().locate(world.player), Ok((10, 10)));
            assert_eq!(
                world.arena.vehicle(world.player).unwrap().facing(),
                Direction::North
            );
        }

        #[test]
        fn move_is_clamped_to_grid() {
            let mut world = world_from_map(&blank_map(&[(30, 0, 'P')]));
            assert!(!world.move_vehicle(world.player, Direction::South));
            assert!(!world.move_vehicle(world.player, Direction::West));
            assert_eq!(world.arena.grid().locate(world.player), Ok((30, 0)));
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn projectile_spawns_outside_footprint() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            let origin = IVec2::new(80, 80);

            for (facing, expected) in [
                (Direction::North, IVec2::new(80, 70)),
                (Direction::West, IVec2::new(70, 80)),
                (Direction::South, IVec2::new(80, 91)),
                (Direction::East, IVec2::new(91, 80)),
            ] {
                world
                    .arena
                    .vehicle_mut(world.player)
                    .unwrap()
                    .set_facing(facing);
                let id = world.fire(world.player).unwrap();
                let state = world.arena.projectile(id).unwrap();
                assert_eq!(state.position, expected, "{facing}");
                assert!(!state.collider().overlaps(&crate::geometry::Rect::at(
                    origin,
                    IVec2::splat(16)
                )));
            }
            assert!(world.arena.vehicle(world.player).unwrap().has_live_projectile());
        }

        #[test]
        fn fire_emits_cue_with_weapon_kind() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            world
                .arena
                .vehicle_mut(world.player)
                .unwrap()
                .apply_powerup(PowerUpKind::AttackBoost);
            world.fire(world.player);
            assert_eq!(
                world.cues.take_cues(),
                vec![AudioCue::ProjectileFired {
                    kind: ProjectileKind::MagicArrow,
                    owner: crate::entity::Faction::Player,
                }]
            );
        }

        #[test]
        fn destroy_projectile_clears_latch() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            let id = world.fire(world.player).unwrap();
            world.destroy_projectile(id, true);
            assert!(!world.arena.vehicle(world.player).unwrap().has_live_projectile());
            assert_eq!(world.arena.projectile_count(), 0);
            assert_eq!(world.arena.explosions().count(), 1);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn player_death_schedules_respawn() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            let old = world.player;
            world.destroy_vehicle(old);

            assert_eq!(world.lives, 1);
            assert_ne!(world.player, old);
            assert!(!world.arena.grid().contains(world.player));

            world.tick += world.config.ticks(world.config.respawn_delay_secs);
            world.run_due_actions();
            assert_eq!(world.arena.grid().locate(world.player), Ok((10, 10)));
        }

        #[test]
        fn blocked_respawn_retries() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            world.destroy_vehicle(world.player);
            let blocker = world
                .arena
                .spawn_at(EntityInner::Stone, 11, 11)
                .unwrap();

            world.tick += world.config.ticks(world.config.respawn_delay_secs);
            world.run_due_actions();
            assert!(!world.arena.grid().contains(world.player));

            world.arena.despawn(blocker);
            world.tick += 1;
            world.run_due_actions();
            assert!(world.arena.grid().contains(world.player));
        }

        #[test]
        fn last_life_ends_game() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            world.lives = 1;
            world.destroy_vehicle(world.player);
            assert!(world.is_game_over());
            let cues = world.cues.take_cues();
            assert!(cues.ends_with(&[AudioCue::StopMusic, AudioCue::GameOver]));
            assert!(world.schedule.is_empty());
        }

        #[test]
        fn castle_ends_game_after_delay() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P'), (30, 15, 'C')]));
            let castle = world.arena.grid().get(30, 15).unwrap();
            world.destroy_castle(castle);
            assert!(!world.is_game_over());

            world.tick += world.config.ticks(world.config.game_over_delay_secs);
            world.run_due_actions();
            assert!(world.is_game_over());
        }

        #[test]
        fn expiry_for_destroyed_vehicle_is_noop() {
            let mut world = world_from_map(&blank_map(&[(10, 10, 'P')]));
            let old = world.player;
            assert!(world.grant_powerup(old, PowerUpKind::DefenseBoost, 1.0));
            world.destroy_vehicle(old);

            world.tick += 60;
            world.run_due_actions();
            let fresh = world.arena.vehicle(world.player).unwrap();
            assert!(fresh.powerups().is_empty());
            assert!(!fresh.is_invulnerable());
        }

        #[test]
        fn load_layout_places_everything() {
            let world = world_from_map(&blank_map(&[
                (0, 0, 'E'),
                (10, 10, 'P'),
                (5, 5, 'B'),
                (5, 6, 'T'),
                (20, 20, '*'),
            ]));
            assert_eq!(world.arena.enemy_count(), 1);
            assert_eq!(world.enemy_spawns(), &[(0, 0)]);
            assert_eq!(world.powerup_spawns(), &[(20, 20)]);
            assert!(world.arena.canopy().get(5, 6).is_some());
            assert_eq!(world.arena.grid().locate(world.player), Ok((10, 10)));
            assert_eq!(
                world.arena.vehicle(world.player).unwrap().weapon(),
                Weapon::Arrow
            );
        }
    }
}
