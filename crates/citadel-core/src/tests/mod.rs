//! Crate-level tests that drive the whole tick loop.
//!
//! - `determinism.rs`: equal seeds give equal runs
//! - `integration.rs`: end-to-end scenarios across stages
//! - `helpers.rs`: map, world and simulation builders

mod determinism;
mod helpers;

pub use helpers::*;
