//! Kind-specific state for grid-resident entities.
//!
//! Terrain carries almost nothing; bricks track hit-points and mirrors their
//! slope. [`Vehicle`] is the rich one: facing, weapon, live-projectile latch,
//! invulnerability and the list of active power-ups (the lifecycle itself is
//! implemented in [`crate::powerup`]).

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::entity::projectile::Weapon;
use crate::geometry::{Direction, Rect};
use crate::powerup::ActivePowerUp;

/// Hit-points of a fresh brick.
pub const BRICK_HP: i32 = 3;

/// Destructible wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brick {
    hp: i32,
}

impl Brick {
    /// Creates a brick with the given hit-points (3 fresh, 1 cracked).
    #[must_use]
    pub const fn new(hp: i32) -> Self {
        Self { hp }
    }

    /// Remaining hit-points.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Removes `damage` hit-points.
    pub fn hit(&mut self, damage: i32) {
        self.hp -= damage;
    }

    /// Returns `true` once the brick has no hit-points left.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.hp <= 0
    }

    /// Damage stage for drawing: 0 intact, 2 nearly gone.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn wear(&self) -> u8 {
        (BRICK_HP - self.hp).clamp(0, BRICK_HP - 1) as u8
    }
}

/// Orientation of a mirror's diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MirrorSlope {
    /// Runs from the bottom-left to the top-right corner (`/`).
    Positive,
    /// Runs from the top-left to the bottom-right corner (`\`).
    Negative,
}

/// Diagonal reflector occupying one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    slope: MirrorSlope,
}

impl Mirror {
    /// Creates a mirror with the given slope.
    #[must_use]
    pub const fn new(slope: MirrorSlope) -> Self {
        Self { slope }
    }

    /// The mirror's slope.
    #[must_use]
    pub const fn slope(&self) -> MirrorSlope {
        self.slope
    }

    /// Facing of a projectile leaving the mirror.
    #[must_use]
    pub const fn reflect(&self, incoming: Direction) -> Direction {
        match (self.slope, incoming) {
            (MirrorSlope::Positive, Direction::North) => Direction::East,
            (MirrorSlope::Positive, Direction::West) => Direction::South,
            (MirrorSlope::Positive, Direction::South) => Direction::West,
            (MirrorSlope::Positive, Direction::East) => Direction::North,
            (MirrorSlope::Negative, Direction::North) => Direction::West,
            (MirrorSlope::Negative, Direction::West) => Direction::North,
            (MirrorSlope::Negative, Direction::South) => Direction::East,
            (MirrorSlope::Negative, Direction::East) => Direction::South,
        }
    }

    /// The two corners at the ends of the diagonal of `cell`.
    ///
    /// For a positive slope these lie on the bottom and right edges; for a
    /// negative slope on the top and left edges.
    #[must_use]
    pub fn diagonal_ends(&self, cell: &Rect) -> [IVec2; 2] {
        match self.slope {
            MirrorSlope::Positive => [
                IVec2::new(cell.min.x, cell.max.y),
                IVec2::new(cell.max.x, cell.min.y),
            ],
            MirrorSlope::Negative => [cell.min, cell.max],
        }
    }

    /// Returns `true` if a projectile collider has crossed into the mirror
    /// through an edge that triggers reflection.
    #[must_use]
    pub fn is_entered_by(&self, collider: &Rect, cell: &Rect) -> bool {
        self.diagonal_ends(cell)
            .iter()
            .any(|corner| collider.contains(*corner))
    }
}

/// Side a vehicle fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// The player.
    Player,
    /// The AI.
    Enemy,
}

/// Vehicle variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Player-controlled tank.
    Player,
    /// Plain enemy tank.
    Enemy,
    /// Elite enemy tank firing magic arrows.
    Magic,
}

impl VehicleKind {
    /// Faction this kind fights for.
    #[must_use]
    pub const fn faction(self) -> Faction {
        match self {
            Self::Player => Faction::Player,
            Self::Enemy | Self::Magic => Faction::Enemy,
        }
    }

    /// Weapon the kind carries without power-ups.
    #[must_use]
    pub const fn base_weapon(self) -> Weapon {
        match self {
            Self::Player | Self::Enemy => Weapon::Arrow,
            Self::Magic => Weapon::MAGIC,
        }
    }

    /// Facing on creation.
    #[must_use]
    pub const fn initial_facing(self) -> Direction {
        match self {
            Self::Player => Direction::North,
            Self::Enemy | Self::Magic => Direction::South,
        }
    }
}

/// State of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub(crate) kind: VehicleKind,
    pub(crate) facing: Direction,
    pub(crate) weapon: Weapon,
    pub(crate) has_live_projectile: bool,
    pub(crate) invulnerable: bool,
    pub(crate) powerups: Vec<ActivePowerUp>,
    pub(crate) next_powerup_serial: u64,
}

impl Vehicle {
    /// Creates a fresh vehicle of the given kind.
    #[must_use]
    pub fn new(kind: VehicleKind) -> Self {
        Self {
            kind,
            facing: kind.initial_facing(),
            weapon: kind.base_weapon(),
            has_live_projectile: false,
            invulnerable: false,
            powerups: Vec::new(),
            next_powerup_serial: 0,
        }
    }

    /// The vehicle's kind.
    #[must_use]
    pub const fn kind(&self) -> VehicleKind {
        self.kind
    }

    /// The vehicle's faction.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.kind.faction()
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Turns the vehicle.
    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Weapon used for the next shot.
    #[must_use]
    pub const fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Returns `true` while a projectile fired by this vehicle is alive.
    #[must_use]
    pub const fn has_live_projectile(&self) -> bool {
        self.has_live_projectile
    }

    /// Sets or clears the live-projectile latch.
    pub fn set_live_projectile(&mut self, live: bool) {
        self.has_live_projectile = live;
    }

    /// Returns `true` while hits are absorbed without effect.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    /// Active power-ups in collection order.
    #[must_use]
    pub fn powerups(&self) -> &[ActivePowerUp] {
        &self.powerups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod brick_tests {
        use super::*;

        #[test]
        fn hit_reduces_hp_and_destroys_at_zero() {
            let mut brick = Brick::new(BRICK_HP);
            brick.hit(1);
            assert_eq!(brick.hp(), 2);
            assert!(!brick.is_destroyed());
            brick.hit(3);
            assert!(brick.is_destroyed());
        }

        #[test]
        fn wear_tracks_damage() {
            assert_eq!(Brick::new(3).wear(), 0);
            assert_eq!(Brick::new(2).wear(), 1);
            assert_eq!(Brick::new(1).wear(), 2);
        }
    }

    mod mirror_tests {
        use super::*;

        #[test]
        fn positive_slope_table() {
            let m = Mirror::new(MirrorSlope::Positive);
            assert_eq!(m.reflect(Direction::North), Direction::East);
            assert_eq!(m.reflect(Direction::West), Direction::South);
            assert_eq!(m.reflect(Direction::South), Direction::West);
            assert_eq!(m.reflect(Direction::East), Direction::North);
        }

        #[test]
        fn negative_slope_table() {
            let m = Mirror::new(MirrorSlope::Negative);
            assert_eq!(m.reflect(Direction::North), Direction::West);
            assert_eq!(m.reflect(Direction::West), Direction::North);
            assert_eq!(m.reflect(Direction::South), Direction::East);
            assert_eq!(m.reflect(Direction::East), Direction::South);
        }

        #[test]
        fn positive_slope_enters_through_bottom_left_corner() {
            let m = Mirror::new(MirrorSlope::Positive);
            let cell = Rect::new(80, 80, 88, 88);
            // Arrow collider sitting on the mirror's bottom-left corner.
            assert!(m.is_entered_by(&Rect::new(77, 85, 82, 90), &cell));
            // Same overlap shifted up so it misses both diagonal ends.
            assert!(!m.is_entered_by(&Rect::new(77, 81, 82, 86), &cell));
        }

        #[test]
        fn negative_slope_enters_through_top_left_corner() {
            let m = Mirror::new(MirrorSlope::Negative);
            let cell = Rect::new(80, 80, 88, 88);
            assert!(m.is_entered_by(&Rect::new(77, 77, 82, 82), &cell));
            assert!(!m.is_entered_by(&Rect::new(77, 85, 82, 90), &cell));
        }
    }

    mod vehicle_tests {
        use super::*;

        #[test]
        fn kinds_start_with_their_weapon_and_facing() {
            let player = Vehicle::new(VehicleKind::Player);
            assert_eq!(player.facing(), Direction::North);
            assert_eq!(player.weapon(), Weapon::Arrow);
            assert_eq!(player.faction(), Faction::Player);

            let magic = Vehicle::new(VehicleKind::Magic);
            assert_eq!(magic.facing(), Direction::South);
            assert_eq!(magic.weapon(), Weapon::MagicArrow { damage: 3 });
            assert_eq!(magic.faction(), Faction::Enemy);
        }

        #[test]
        fn fresh_vehicle_is_idle() {
            let v = Vehicle::new(VehicleKind::Enemy);
            assert!(!v.has_live_projectile());
            assert!(!v.is_invulnerable());
            assert!(v.powerups().is_empty());
        }
    }
}
