//! Deferred actions keyed by tick.
//!
//! Power-up expiry, delayed respawn and delayed game-over are queued here
//! and drained at the start of each tick, before any other stage runs. Nothing
//! fires from outside the tick loop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// An action to run at a later tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Remove one power-up instance from a vehicle.
    ExpirePowerUp {
        /// Vehicle holding the power-up.
        vehicle: EntityId,
        /// Instance serial returned by [`crate::entity::Vehicle::apply_powerup`].
        serial: u64,
    },
    /// Put the waiting player vehicle back on its spawn cell.
    RespawnPlayer,
    /// Drop lives to zero after the castle fell.
    ForceGameOver,
    /// Allow floor power-ups to spawn again.
    ClearPickupCooldown,
}

/// Tick-ordered queue of [`ScheduledAction`]s.
///
/// Actions due on the same tick run in the order they were scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    queue: BTreeMap<(u64, u64), ScheduledAction>,
    next_seq: u64,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run at tick `due`.
    pub fn schedule(&mut self, due: u64, action: ScheduledAction) {
        self.queue.insert((due, self.next_seq), action);
        self.next_seq += 1;
    }

    /// Removes and returns every action due at or before `tick`, in order.
    pub fn drain_due(&mut self, tick: u64) -> Vec<ScheduledAction> {
        let later = self.queue.split_off(&(tick + 1, 0));
        let due = std::mem::replace(&mut self.queue, later);
        due.into_values().collect()
    }

    /// Number of pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every pending action.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
