//! Test helpers for building maps, worlds and simulations.
//!
//! Maps are written in the ASCII level format and parsed with
//! [`LevelLayout::parse`], so helpers exercise the same path as real levels.

use crate::config::SimConfig;
use crate::entity::{Vehicle, VehicleKind};
use crate::level::{LevelLayout, LevelSet};
use crate::simulation::Simulation;
use crate::world::World;

/// Seed used when a test does not care about randomness.
pub const TEST_SEED: u64 = 42;

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

// =============================================================================
// Maps
// =============================================================================

/// A 32x32 map of empty cells with the given symbols written over it.
///
/// # Arguments
///
/// * `overrides` - `(row, col, symbol)` triples; later entries win
pub fn blank_map(overrides: &[(usize, usize, char)]) -> String {
    let mut rows = vec![vec!['.'; 32]; 32];
    for &(row, col, symbol) in overrides {
        rows[row][col] = symbol;
    }
    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>() + "\n")
        .collect()
}

/// Default tuning with enemy AI switched off, so only the test acts.
pub fn quiet_config() -> SimConfig {
    SimConfig::default().with_enemy_chances(0.0, 0.0, 0.0)
}

// =============================================================================
// Worlds
// =============================================================================

/// Loads `map` into a world with default tuning.
pub fn world_from_map(map: &str) -> World {
    world_from_map_with(map, SimConfig::default(), TEST_SEED)
}

/// Loads `map` into a world as level 1 with a fresh player vehicle.
pub fn world_from_map_with(map: &str, config: SimConfig, seed: u64) -> World {
    let mut world = World::new(config, seed);
    world.level = 1;
    world.load_layout(
        &LevelLayout::parse(map),
        Vehicle::new(VehicleKind::Player),
    );
    world
}

// =============================================================================
// Simulations
// =============================================================================

/// Builds a simulation over the given maps, starting at the first one.
pub fn sim_from_maps(maps: &[&str], config: SimConfig, seed: u64) -> Simulation {
    Simulation::new(config, LevelSet::from_maps(maps.iter().copied()), seed)
        .expect("test maps should load")
}

/// Runs `ticks` ticks.
pub fn run_ticks(sim: &mut Simulation, ticks: usize) {
    for _ in 0..ticks {
        sim.advance_tick();
    }
}
