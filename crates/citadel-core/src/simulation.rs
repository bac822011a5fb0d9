//! The simulation context and its per-tick loop.
//!
//! [`Simulation`] owns the [`World`], the level provider and every tick
//! stage. A call to [`Simulation::advance_tick`] runs the stages in a fixed
//! order, each reading what the previous ones wrote:
//!
//! 1. **SCHEDULE**: run deferred actions that have come due
//! 2. **PLAYER**: apply the intents submitted since the last tick
//! 3. **AI**: enemy movement and firing
//! 4. **COMBAT**: projectile movement and collisions
//! 5. **EFFECTS**: age explosions
//! 6. **PICKUP**: power-up collection
//! 7. **WAVE**: enemy waves and floor power-ups
//!
//! # Determinism
//!
//! Every random decision draws from one seeded stream and every collection
//! is iterated in id order, so equal seeds and equal inputs give equal runs.
//!
//! # Example
//!
//! ```
//! use citadel_core::simulation::Simulation;
//! use citadel_core::events::Command;
//! use citadel_core::geometry::Direction;
//!
//! let mut sim = Simulation::with_builtin_levels(42).unwrap();
//! sim.submit_player(Command::Move(Direction::East));
//! for _ in 0..10 {
//!     sim.advance_tick();
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.level(), 1);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::arena::Arena;
use crate::config::SimConfig;
use crate::director::{AiDirector, Director, WaveDirector};
use crate::entity::{EntityId, Vehicle, VehicleKind};
use crate::error::SimError;
use crate::events::{AudioCue, Command, Theme};
use crate::geometry::Direction;
use crate::level::{BuiltinLevels, LevelProvider};
use crate::powerup::PowerUpKind;
use crate::render::{render_specs, RenderSpec};
use crate::resolver::{CombatResolver, CombatStats, PickupResolver, Resolver};
use crate::world::World;

/// Duration of cheat power-ups, in seconds.
pub const CHEAT_DURATION_SECS: f64 = 1_000_000.0;

/// Lives added by [`Cheat::ExtraLives`].
pub const CHEAT_EXTRA_LIVES: u32 = 2;

// =============================================================================
// Cheats
// =============================================================================

/// Typed cheat codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cheat {
    /// Near-permanent invulnerability.
    Undying,
    /// Two more lives.
    ExtraLives,
    /// Near-permanent magic weapon.
    Magic,
}

impl Cheat {
    /// All cheats, in detection priority.
    pub const ALL: [Self; 3] = [Self::Undying, Self::ExtraLives, Self::Magic];

    /// The code that activates this cheat.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Undying => "failures",
            Self::ExtraLives => "hesoyam",
            Self::Magic => "fries",
        }
    }

    /// Finds a cheat code anywhere in the typed buffer.
    ///
    /// The host should clear its buffer once a cheat is detected.
    #[must_use]
    pub fn detect(buffer: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cheat| buffer.contains(cheat.code()))
    }
}

// =============================================================================
// Simulation
// =============================================================================

/// Player vehicle and lives as they were on entering a level.
#[derive(Debug, Clone, PartialEq)]
struct PlayerSnapshot {
    vehicle: Vehicle,
    lives: u32,
}

/// The simulation context.
///
/// Owns the world and runs the tick loop. Level transitions, player intents
/// and cheats all go through here; directors and resolvers only ever see
/// the [`World`].
pub struct Simulation {
    world: World,
    provider: Box<dyn LevelProvider>,
    snapshots: BTreeMap<u32, PlayerSnapshot>,
    pending_move: Option<Direction>,
    pending_fire: bool,
    ai: AiDirector,
    waves: WaveDirector,
    combat: CombatResolver,
    pickup: PickupResolver,
    campaign_complete: bool,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("levels", &self.provider.level_count())
            .field("snapshots", &self.snapshots)
            .field("pending_move", &self.pending_move)
            .field("pending_fire", &self.pending_fire)
            .field("campaign_complete", &self.campaign_complete)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation at level 1 of `provider`.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] for an invalid configuration, [`SimError::Level`]
    /// if level 1 is missing or does not match the configured grid.
    pub fn new(
        config: SimConfig,
        provider: impl LevelProvider + 'static,
        seed: u64,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let lives = config.player_lives;
        let mut sim = Self {
            world: World::new(config, seed),
            provider: Box::new(provider),
            snapshots: BTreeMap::new(),
            pending_move: None,
            pending_fire: false,
            ai: AiDirector::new(),
            waves: WaveDirector::new(),
            combat: CombatResolver::new(),
            pickup: PickupResolver::new(),
            campaign_complete: false,
        };
        sim.world.level = 1;
        sim.snapshots.insert(
            1,
            PlayerSnapshot {
                vehicle: Vehicle::new(VehicleKind::Player),
                lives,
            },
        );
        sim.reset_level()?;
        Ok(sim)
    }

    /// Creates a simulation over the built-in stages with default tuning.
    ///
    /// # Errors
    ///
    /// Only if the built-in stages fail to load.
    pub fn with_builtin_levels(seed: u64) -> Result<Self, SimError> {
        Self::new(SimConfig::default(), BuiltinLevels::new(), seed)
    }

    /// Advances the simulation by one tick.
    ///
    /// Does nothing once the game is over or the campaign is complete.
    pub fn advance_tick(&mut self) {
        if self.world.is_game_over() || self.campaign_complete {
            self.clear_intents();
            return;
        }

        self.world.tick += 1;
        self.world.run_due_actions();
        if self.world.is_game_over() {
            self.clear_intents();
            return;
        }

        self.apply_player_intents();
        self.ai.direct(&mut self.world);
        self.combat.resolve(&mut self.world);
        self.world.arena.age_explosions();
        self.pickup.resolve(&mut self.world);
        self.waves.direct(&mut self.world);

        if !self.world.level_won && self.is_level_cleared() && self.world.arena.projectile_count() == 0
        {
            self.world.level_won = true;
            self.world.cues.push(AudioCue::LevelWon);
            info!(tick = self.world.tick, level = self.world.level, "stage cleared");
        }

        trace!(
            tick = self.world.tick,
            wave = self.world.wave,
            enemies = self.world.arena.enemy_count(),
            projectiles = self.world.arena.projectile_count(),
            explosions = self.world.arena.explosions().count(),
            "tick complete"
        );
    }

    // =========================================================================
    // Player input
    // =========================================================================

    /// Queues a player intent for the next tick.
    ///
    /// A later move replaces an earlier one within the same tick.
    pub fn submit_player(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.pending_move = Some(direction),
            Command::Fire => self.pending_fire = true,
        }
    }

    fn clear_intents(&mut self) {
        self.pending_move = None;
        self.pending_fire = false;
    }

    fn apply_player_intents(&mut self) {
        let movement = self.pending_move.take();
        let fire = std::mem::take(&mut self.pending_fire);
        if self.is_level_cleared() {
            return;
        }

        let player = self.world.player;
        if !self.world.arena.grid().contains(player) {
            return;
        }
        let idle = self
            .world
            .arena
            .vehicle(player)
            .is_some_and(|v| !v.has_live_projectile());
        if fire && movement.is_none() && idle {
            self.world.fire(player);
        }
        if let Some(direction) = movement {
            if self.world.tick % self.world.config.player_move_interval == 0 {
                self.world.move_vehicle(player, direction);
            }
        }
    }

    /// Applies a cheat to the player.
    ///
    /// Ignored once the game is over or while the stage is cleared. Returns
    /// `true` if the cheat took effect.
    pub fn apply_cheat(&mut self, cheat: Cheat) -> bool {
        if self.world.is_game_over() || self.campaign_complete || self.is_level_cleared() {
            return false;
        }
        let player = self.world.player;
        let applied = match cheat {
            Cheat::Undying => {
                self.world
                    .grant_powerup(player, PowerUpKind::DefenseBoost, CHEAT_DURATION_SECS)
            }
            Cheat::Magic => {
                self.world
                    .grant_powerup(player, PowerUpKind::AttackBoost, CHEAT_DURATION_SECS)
            }
            Cheat::ExtraLives => {
                self.world.lives += CHEAT_EXTRA_LIVES;
                self.world.cues.push(AudioCue::PowerUpCollected);
                true
            }
        };
        debug!(tick = self.world.tick, ?cheat, applied, "cheat");
        applied
    }

    // =========================================================================
    // Levels
    // =========================================================================

    /// Moves on to the next level, remembering the player as they are now.
    ///
    /// Past the last level the campaign is complete and the victory theme
    /// starts.
    ///
    /// # Errors
    ///
    /// [`SimError::Level`] if the provider cannot supply the next layout.
    pub fn next_level(&mut self) -> Result<(), SimError> {
        let mut vehicle = self
            .world
            .arena
            .vehicle(self.world.player)
            .cloned()
            .unwrap_or_else(|| Vehicle::new(VehicleKind::Player));
        vehicle.clear_powerups();
        vehicle.set_live_projectile(false);

        self.world.level += 1;
        self.snapshots.insert(
            self.world.level,
            PlayerSnapshot {
                vehicle,
                lives: self.world.lives,
            },
        );

        if self.world.level > self.provider.level_count() {
            self.campaign_complete = true;
            self.world.arena.clear();
            self.world.schedule.clear();
            self.world.cues.push(AudioCue::StopMusic);
            self.world.cues.push(AudioCue::Theme(Theme::Victory));
            info!(tick = self.world.tick, "campaign complete");
            return Ok(());
        }
        self.reset_level()
    }

    /// Restarts the current level from the player's snapshot.
    ///
    /// Works after a game over as well.
    ///
    /// # Errors
    ///
    /// [`SimError::Level`] if the provider cannot supply the layout.
    pub fn reset_level(&mut self) -> Result<(), SimError> {
        let level = self.world.level;
        let layout = self.provider.layout(level)?;
        layout.check_dimensions(self.world.config.rows, self.world.config.cols)?;

        let snapshot = self.snapshots.get(&level).cloned();
        let vehicle = match snapshot {
            Some(PlayerSnapshot { vehicle, lives }) => {
                self.world.lives = lives;
                vehicle
            }
            None => Vehicle::new(VehicleKind::Player),
        };

        self.clear_intents();
        self.world.load_layout(&layout, vehicle);
        self.world.cues.push(AudioCue::StopMusic);
        self.world.cues.push(AudioCue::Theme(Theme::Stage(level)));
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Ticks advanced so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.world.level
    }

    /// Number of levels in the campaign.
    #[must_use]
    pub fn level_count(&self) -> u32 {
        self.provider.level_count()
    }

    /// Current wave counter.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.world.wave
    }

    /// Remaining lives.
    #[must_use]
    pub fn lives(&self) -> u32 {
        self.world.lives
    }

    /// The player vehicle's id.
    #[must_use]
    pub fn player(&self) -> EntityId {
        self.world.player
    }

    /// Returns `true` once lives have run out.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.world.is_game_over()
    }

    /// Returns `true` when no enemies remain and no more waves will come.
    #[must_use]
    pub fn is_level_cleared(&self) -> bool {
        self.world.arena.enemy_count() == 0 && self.world.wave >= self.world.config.terminal_wave
    }

    /// Returns `true` once every level has been cleared.
    #[must_use]
    pub fn is_campaign_complete(&self) -> bool {
        self.campaign_complete
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Write access to the world, for hosts and tests that stage scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The arena of the current level.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.world.arena
    }

    /// Statistics of the most recent combat pass.
    #[must_use]
    pub fn last_combat_stats(&self) -> CombatStats {
        self.combat.last_stats()
    }

    /// Drains the audio cues recorded since the last call.
    pub fn take_cues(&mut self) -> Vec<AudioCue> {
        self.world.cues.take_cues()
    }

    /// Lazily lists everything to draw this frame.
    pub fn render_specs(&self) -> impl Iterator<Item = RenderSpec> + '_ {
        render_specs(&self.world.arena)
    }
}

// =============================================================================
// Tests
// =============================================================================
