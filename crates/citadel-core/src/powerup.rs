//! Power-up kinds and the per-vehicle boost lifecycle.
//!
//! A vehicle's boost state is one of Normal, AttackBoosted, DefenseBoosted or
//! Both, encoded as [`BoostFlags`]. Each collected power-up becomes an
//! [`ActivePowerUp`] instance with a vehicle-local serial number. Expiry
//! removes exactly that instance and recomputes the effects from whatever is
//! still active, so overlapping boosts of the same kind only revert once the
//! last one is gone.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::entity::{Vehicle, Weapon};

bitflags! {
    /// Effects granted by the active power-ups of a vehicle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BoostFlags: u8 {
        /// Fires magic arrows.
        const ATTACK = 1;
        /// Ignores hits.
        const DEFENSE = 1 << 1;
    }
}

/// Power-up variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Swaps the weapon for a magic arrow.
    AttackBoost,
    /// Makes the vehicle invulnerable.
    DefenseBoost,
    /// Both of the above in a single slot.
    Evolved,
}

impl PowerUpKind {
    /// Effects this kind grants.
    #[must_use]
    pub const fn boosts(self) -> BoostFlags {
        match self {
            Self::AttackBoost => BoostFlags::ATTACK,
            Self::DefenseBoost => BoostFlags::DEFENSE,
            Self::Evolved => BoostFlags::ATTACK.union(BoostFlags::DEFENSE),
        }
    }
}

/// One collected power-up attached to a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    /// Vehicle-local instance number, used to expire exactly this instance.
    pub serial: u64,
    /// What was collected.
    pub kind: PowerUpKind,
}

impl Vehicle {
    /// Attaches a power-up and applies its effect immediately.
    ///
    /// Returns the instance serial to pass to [`Vehicle::expire_powerup`].
    pub fn apply_powerup(&mut self, kind: PowerUpKind) -> u64 {
        let serial = self.next_powerup_serial;
        self.next_powerup_serial += 1;
        self.powerups.push(ActivePowerUp { serial, kind });
        self.refresh_boosts();
        serial
    }

    /// Removes the power-up instance `serial`.
    ///
    /// Effects are reverted only when no remaining instance still grants
    /// them. Returns `false` if the instance was not attached.
    pub fn expire_powerup(&mut self, serial: u64) -> bool {
        let Some(index) = self.powerups.iter().position(|p| p.serial == serial) else {
            return false;
        };
        self.powerups.remove(index);
        self.refresh_boosts();
        true
    }

    /// Drops every power-up and reverts to the base state.
    pub fn clear_powerups(&mut self) {
        self.powerups.clear();
        self.refresh_boosts();
    }

    /// Current boost state.
    #[must_use]
    pub fn boosts(&self) -> BoostFlags {
        self.powerups
            .iter()
            .fold(BoostFlags::empty(), |acc, p| acc | p.kind.boosts())
    }

    fn refresh_boosts(&mut self) {
        let boosts = self.boosts();
        self.weapon = if boosts.contains(BoostFlags::ATTACK) {
            Weapon::MAGIC
        } else {
            self.kind.base_weapon()
        };
        self.invulnerable = boosts.contains(BoostFlags::DEFENSE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::VehicleKind;

    mod apply_tests {
        use super::*;

        #[test]
        fn attack_boost_swaps_weapon() {
            let mut v = Vehicle::new(VehicleKind::Player);
            v.apply_powerup(PowerUpKind::AttackBoost);
            assert_eq!(v.weapon(), Weapon::MAGIC);
            assert!(!v.is_invulnerable());
            assert_eq!(v.boosts(), BoostFlags::ATTACK);
        }

        #[test]
        fn defense_boost_sets_invulnerable() {
            let mut v = Vehicle::new(VehicleKind::Player);
            v.apply_powerup(PowerUpKind::DefenseBoost);
            assert!(v.is_invulnerable());
            assert_eq!(v.weapon(), Weapon::Arrow);
        }

        #[test]
        fn evolved_applies_both_in_one_slot() {
            let mut v = Vehicle::new(VehicleKind::Player);
            v.apply_powerup(PowerUpKind::Evolved);
            assert_eq!(v.boosts(), BoostFlags::all());
            assert_eq!(v.powerups().len(), 1);
        }

        #[test]
        fn serials_are_unique() {
            let mut v = Vehicle::new(VehicleKind::Player);
            let a = v.apply_powerup(PowerUpKind::AttackBoost);
            let b = v.apply_powerup(PowerUpKind::AttackBoost);
            assert_ne!(a, b);
        }
    }

    mod expire_tests {
        use super::*;

        #[test]
        fn stacked_attack_reverts_after_last_expiry() {
            let mut v = Vehicle::new(VehicleKind::Player);
            let first = v.apply_powerup(PowerUpKind::AttackBoost);
            let second = v.apply_powerup(PowerUpKind::AttackBoost);

            assert!(v.expire_powerup(first));
            assert_eq!(v.weapon(), Weapon::MAGIC);

            assert!(v.expire_powerup(second));
            assert_eq!(v.weapon(), Weapon::Arrow);
            assert!(v.boosts().is_empty());
        }

        #[test]
        fn evolved_keeps_defense_after_defense_expires() {
            let mut v = Vehicle::new(VehicleKind::Player);
            let defense = v.apply_powerup(PowerUpKind::DefenseBoost);
            v.apply_powerup(PowerUpKind::Evolved);

            v.expire_powerup(defense);
            assert!(v.is_invulnerable());
            assert_eq!(v.weapon(), Weapon::MAGIC);
        }

        #[test]
        fn magic_tank_keeps_its_base_weapon() {
            let mut v = Vehicle::new(VehicleKind::Magic);
            let s = v.apply_powerup(PowerUpKind::AttackBoost);
            v.expire_powerup(s);
            assert_eq!(v.weapon(), Weapon::MAGIC);
        }

        #[test]
        fn unknown_serial_is_rejected() {
            let mut v = Vehicle::new(VehicleKind::Player);
            v.apply_powerup(PowerUpKind::DefenseBoost);
            assert!(!v.expire_powerup(42));
            assert!(v.is_invulnerable());
        }

        #[test]
        fn clear_reverts_everything() {
            let mut v = Vehicle::new(VehicleKind::Player);
            v.apply_powerup(PowerUpKind::Evolved);
            v.clear_powerups();
            assert!(v.powerups().is_empty());
            assert!(!v.is_invulnerable());
            assert_eq!(v.weapon(), Weapon::Arrow);
        }
    }
}
