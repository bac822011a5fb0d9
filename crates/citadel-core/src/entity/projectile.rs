//! Projectiles and the weapons that make them.
//!
//! A [`Weapon`] is a plain tag stored on a vehicle and switched by the
//! power-up lifecycle; [`Weapon::fire`] builds a fresh [`Projectile`] for each
//! shot.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::entity::components::Faction;
use crate::entity::EntityId;
use crate::geometry::{Direction, Rect};

/// Edge length of a projectile sprite in pixels.
pub const PROJECTILE_SPRITE: i32 = 16;

/// Speed of a plain arrow in pixels per second.
pub const ARROW_SPEED: i32 = 240;

/// Speed of a magic arrow in pixels per second.
pub const MAGIC_ARROW_SPEED: i32 = 300;

/// Damage of the magic arrow granted by power-ups and elite tanks.
pub const MAGIC_DAMAGE: i32 = 3;

/// Projectile variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// One hit-point, slow.
    Arrow,
    /// Several hit-points, faster and larger.
    MagicArrow,
}

/// What a vehicle fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weapon {
    /// Plain arrow.
    Arrow,
    /// Magic arrow carrying `damage` hit-points.
    MagicArrow {
        /// Starting hit-points of each shot.
        damage: i32,
    },
}

impl Weapon {
    /// The magic arrow used by elite tanks and attack boosts.
    pub const MAGIC: Weapon = Weapon::MagicArrow {
        damage: MAGIC_DAMAGE,
    };

    /// Kind of projectile this weapon fires.
    #[must_use]
    pub const fn kind(self) -> ProjectileKind {
        match self {
            Self::Arrow => ProjectileKind::Arrow,
            Self::MagicArrow { .. } => ProjectileKind::MagicArrow,
        }
    }

    /// Builds a projectile facing `facing`, owned by `owner`.
    #[must_use]
    pub fn fire(self, facing: Direction, owner: EntityId, faction: Faction) -> Projectile {
        match self {
            Self::Arrow => Projectile {
                kind: ProjectileKind::Arrow,
                collider: Rect::new(5, 5, 10, 10),
                facing,
                hp: 1,
                speed: ARROW_SPEED,
                distance: 0,
                last_mirror: None,
                owner,
                faction,
            },
            Self::MagicArrow { damage } => Projectile {
                kind: ProjectileKind::MagicArrow,
                collider: Rect::new(4, 2, 12, 13),
                facing,
                hp: damage,
                speed: MAGIC_ARROW_SPEED,
                distance: 0,
                last_mirror: None,
                owner,
                faction,
            },
        }
    }
}

/// A projectile in flight.
///
/// Its hit-points double as a damage pool: every object it overlaps in a
/// tick draws from the same pool, which is subtracted once at the end of the
/// tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    kind: ProjectileKind,
    collider: Rect,
    facing: Direction,
    hp: i32,
    speed: i32,
    distance: i32,
    last_mirror: Option<EntityId>,
    owner: EntityId,
    faction: Faction,
}

impl Projectile {
    /// Projectile kind.
    #[must_use]
    pub const fn kind(&self) -> ProjectileKind {
        self.kind
    }

    /// Collider relative to the projectile's origin.
    #[must_use]
    pub const fn collider(&self) -> Rect {
        self.collider
    }

    /// Collider in world pixels for a projectile whose origin is `position`.
    #[must_use]
    pub fn world_collider(&self, position: IVec2) -> Rect {
        self.collider.translate(position)
    }

    /// Direction of travel.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Changes direction of travel and forgets the last mirror.
    pub fn redirect(&mut self, facing: Direction) {
        self.facing = facing;
        self.last_mirror = None;
    }

    /// Changes direction after bouncing off `mirror`.
    pub fn reflect_from(&mut self, mirror: EntityId, facing: Direction) {
        self.redirect(facing);
        self.last_mirror = Some(mirror);
    }

    /// Mirror this projectile last reflected from.
    #[must_use]
    pub const fn last_mirror(&self) -> Option<EntityId> {
        self.last_mirror
    }

    /// Remaining hit-points.
    #[must_use]
    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Removes `points` hit-points.
    pub fn hit(&mut self, points: i32) {
        self.hp -= points;
    }

    /// Speed in pixels per second.
    #[must_use]
    pub const fn speed(&self) -> i32 {
        self.speed
    }

    /// Total pixels travelled so far.
    #[must_use]
    pub const fn distance(&self) -> i32 {
        self.distance
    }

    /// Adds to the travelled distance.
    pub fn add_distance(&mut self, pixels: i32) {
        self.distance += pixels;
    }

    /// Vehicle that fired this projectile.
    #[must_use]
    pub const fn owner(&self) -> EntityId {
        self.owner
    }

    /// Faction of the vehicle that fired this projectile.
    #[must_use]
    pub const fn faction(&self) -> Faction {
        self.faction
    }
}
