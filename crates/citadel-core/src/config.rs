//! Tuning constants for a simulation run.
//!
//! [`SimConfig`] gathers every number the engine uses so a run can be
//! described (and replayed) by a seed plus a config. Durations are stored in
//! seconds and converted to whole ticks through [`SimConfig::ticks`].
//!
//! # Example
//!
//! ```
//! use citadel_core::config::SimConfig;
//!
//! let config = SimConfig::default().with_player_lives(5);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.ticks(config.respawn_delay_secs), 60);
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::projectile::{ARROW_SPEED, MAGIC_ARROW_SPEED};
use crate::error::ConfigError;
use crate::powerup::PowerUpKind;

/// Complete set of tuning constants for a [`Simulation`](crate::simulation::Simulation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Grid rows.
    pub rows: usize,
    /// Grid columns.
    pub cols: usize,
    /// Edge length of one cell in pixels.
    pub cell_size: i32,
    /// Ticks per simulated second.
    pub tick_rate: u32,
    /// Lives the player starts a campaign with.
    pub player_lives: u32,
    /// Distance in pixels after which a projectile fizzles.
    pub projectile_travel_limit: i32,
    /// Extra gap in pixels between a vehicle and the projectile it fires.
    pub projectile_spawn_buffer: i32,
    /// Per-tick chance an enemy considers moving.
    pub enemy_move_chance: f64,
    /// Chance a considered move actually turns and steps the enemy.
    pub enemy_redirect_chance: f64,
    /// Per-tick chance an idle enemy fires.
    pub enemy_fire_chance: f64,
    /// Waves spawn while the counter is below this value.
    pub terminal_wave: u32,
    /// Floor power-ups start appearing from this wave on.
    pub pickup_min_wave: u32,
    /// A vehicle holding this many active power-ups cannot collect more.
    pub max_active_powerups: usize,
    /// How long a collected power-up lasts.
    pub powerup_duration_secs: f64,
    /// Floor spawns are suppressed this long after a pickup.
    pub pickup_cooldown_secs: f64,
    /// Delay before a destroyed player re-enters the field.
    pub respawn_delay_secs: f64,
    /// Delay between the castle falling and the game ending.
    pub game_over_delay_secs: f64,
    /// Player move intents are honored on ticks divisible by this.
    pub player_move_interval: u64,
    /// Kinds the pickup director chooses from.
    pub pickup_kinds: Vec<PowerUpKind>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 32,
            cell_size: 8,
            tick_rate: 60,
            player_lives: 2,
            projectile_travel_limit: 256,
            projectile_spawn_buffer: 0,
            enemy_move_chance: 0.5256,
            enemy_redirect_chance: 0.1738,
            enemy_fire_chance: 0.069_42,
            terminal_wave: 3,
            pickup_min_wave: 2,
            max_active_powerups: 3,
            powerup_duration_secs: 10.0,
            pickup_cooldown_secs: 5.0,
            respawn_delay_secs: 1.0,
            game_over_delay_secs: 1.0,
            player_move_interval: 5,
            pickup_kinds: vec![PowerUpKind::AttackBoost, PowerUpKind::DefenseBoost],
        }
    }
}

impl SimConfig {
    /// Arena width in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn width(&self) -> i32 {
        self.cols as i32 * self.cell_size
    }

    /// Arena height in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn height(&self) -> i32 {
        self.rows as i32 * self.cell_size
    }

    /// Converts a duration in seconds to whole ticks (at least one).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn ticks(&self, secs: f64) -> u64 {
        ((secs * f64::from(self.tick_rate)).round() as u64).max(1)
    }

    /// Pixels a projectile of the given speed covers in one tick.
    ///
    /// Zero when the tick rate is zero or does not fit an `i32`.
    #[must_use]
    pub fn step_per_tick(&self, speed: i32) -> i32 {
        i32::try_from(self.tick_rate)
            .ok()
            .filter(|rate| *rate > 0)
            .map_or(0, |rate| speed / rate)
    }

    /// Sets the starting lives.
    #[must_use]
    pub fn with_player_lives(mut self, lives: u32) -> Self {
        self.player_lives = lives;
        self
    }

    /// Sets the three enemy AI probabilities.
    #[must_use]
    pub fn with_enemy_chances(mut self, move_chance: f64, redirect: f64, fire: f64) -> Self {
        self.enemy_move_chance = move_chance;
        self.enemy_redirect_chance = redirect;
        self.enemy_fire_chance = fire;
        self
    }

    /// Sets the kinds the pickup director may place.
    #[must_use]
    pub fn with_pickup_kinds(mut self, kinds: Vec<PowerUpKind>) -> Self {
        self.pickup_kinds = kinds;
        self
    }

    /// Checks that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for probabilities outside `[0, 1]`, for a
    /// zero grid dimension, cell size, tick rate or move interval, and for a
    /// tick rate at which the slowest projectile would not advance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("enemy_move_chance", self.enemy_move_chance),
            ("enemy_redirect_chance", self.enemy_redirect_chance),
            ("enemy_fire_chance", self.enemy_fire_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        if self.rows == 0 {
            return Err(ConfigError::ZeroDimension("rows"));
        }
        if self.cols == 0 {
            return Err(ConfigError::ZeroDimension("cols"));
        }
        if self.cell_size <= 0 {
            return Err(ConfigError::ZeroDimension("cell_size"));
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroDimension("tick_rate"));
        }
        let slowest = ARROW_SPEED.min(MAGIC_ARROW_SPEED);
        if self.step_per_tick(slowest) < 1 {
            return Err(ConfigError::StalledProjectile {
                tick_rate: self.tick_rate,
                speed: slowest,
            });
        }
        if self.player_move_interval == 0 {
            return Err(ConfigError::ZeroDimension("player_move_interval"));
        }
        Ok(())
    }
}
