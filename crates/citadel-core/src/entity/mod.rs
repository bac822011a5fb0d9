//! Entity model for the arena.
//!
//! This module provides the grid-resident entity types:
//! - [`EntityId`]: Unique identifier shared by every simulated object
//! - [`EntityTag`]: Closed classification of terrain and vehicle kinds
//! - [`EntityInner`]: Type-safe storage for kind-specific state
//! - [`Entity`]: The complete container stored by the [`Arena`](crate::arena::Arena)
//!
//! Free-floating objects (projectiles, explosions, floor power-ups) are not
//! grid residents; they live in [`projectile`] and [`effects`] and are keyed
//! by the same [`EntityId`] space.
//!
//! # Example
//!
//! ```
//! use citadel_core::entity::{Entity, EntityId, EntityInner, EntityTag};
//! use citadel_core::entity::components::Brick;
//!
//! let brick = Entity::new(EntityId::new(3), EntityInner::Brick(Brick::new(3)));
//!
//! assert_eq!(brick.id().as_u64(), 3);
//! assert_eq!(brick.tag(), EntityTag::Brick);
//! assert!(brick.footprint().is_unit());
//! ```

pub mod components;
pub mod effects;
pub mod projectile;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{Brick, Faction, Mirror, MirrorSlope, Vehicle, VehicleKind, BRICK_HP};
pub use effects::{Explosion, ExplosionKind};
pub use projectile::{Projectile, ProjectileKind, Weapon};

/// Unique identifier for an entity.
///
/// Identifiers are handed out monotonically by the arena, so ordering by id
/// is ordering by creation. Every per-tick iteration walks ids in ascending
/// order, which keeps runs reproducible.
///
/// # Example
///
/// ```
/// use citadel_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Rectangular set of cells an object covers, anchored at its top-left cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Footprint {
    /// Height in cells.
    pub rows: usize,
    /// Width in cells.
    pub cols: usize,
}

impl Footprint {
    /// A single cell.
    pub const UNIT: Footprint = Footprint { rows: 1, cols: 1 };
    /// Two by two cells (vehicles, castle).
    pub const LARGE: Footprint = Footprint { rows: 2, cols: 2 };

    /// Creates a footprint of `rows` by `cols` cells.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Returns `true` for a one-cell footprint.
    #[must_use]
    pub const fn is_unit(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Cell offsets relative to the anchor, row-major.
    pub fn offsets(self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
    }
}

/// Closed classification of grid-resident entities.
///
/// Every resolver decision over entity kinds matches on this enum (or on
/// [`EntityInner`]) exhaustively, so adding a kind fails to compile until
/// each stage handles it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    /// Destructible wall with tiered hit-points.
    Brick,
    /// Impassable for vehicles, ignored by projectiles.
    Water,
    /// Indestructible wall that swallows projectiles.
    Stone,
    /// Decoration drawn above vehicles; never collides.
    Tree,
    /// Diagonal reflector.
    Mirror,
    /// The base; losing it ends the game.
    Castle,
    /// The player's vehicle.
    PlayerTank,
    /// Plain enemy vehicle.
    EnemyTank,
    /// Elite enemy firing magic arrows.
    MagicTank,
}

impl EntityTag {
    /// Returns `true` for vehicle tags.
    #[must_use]
    pub const fn is_vehicle(self) -> bool {
        matches!(self, Self::PlayerTank | Self::EnemyTank | Self::MagicTank)
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Brick => "Brick",
            Self::Water => "Water",
            Self::Stone => "Stone",
            Self::Tree => "Tree",
            Self::Mirror => "Mirror",
            Self::Castle => "Castle",
            Self::PlayerTank => "PlayerTank",
            Self::EnemyTank => "EnemyTank",
            Self::MagicTank => "MagicTank",
        };
        f.write_str(s)
    }
}

/// Type-safe storage for kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityInner {
    /// Brick with its remaining hit-points.
    Brick(Brick),
    /// Water tile.
    Water,
    /// Stone tile.
    Stone,
    /// Tree tile (overlay layer).
    Tree,
    /// Mirror with its orientation.
    Mirror(Mirror),
    /// Castle.
    Castle,
    /// Any vehicle; the kind lives inside.
    Vehicle(Vehicle),
}

impl EntityInner {
    /// Returns the corresponding [`EntityTag`].
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        match self {
            Self::Brick(_) => EntityTag::Brick,
            Self::Water => EntityTag::Water,
            Self::Stone => EntityTag::Stone,
            Self::Tree => EntityTag::Tree,
            Self::Mirror(_) => EntityTag::Mirror,
            Self::Castle => EntityTag::Castle,
            Self::Vehicle(v) => match v.kind() {
                VehicleKind::Player => EntityTag::PlayerTank,
                VehicleKind::Enemy => EntityTag::EnemyTank,
                VehicleKind::Magic => EntityTag::MagicTank,
            },
        }
    }

    /// Cells covered on the grid.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        match self {
            Self::Castle | Self::Vehicle(_) => Footprint::LARGE,
            Self::Brick(_) | Self::Water | Self::Stone | Self::Tree | Self::Mirror(_) => {
                Footprint::UNIT
            }
        }
    }

    /// Returns the vehicle state, if this is a vehicle.
    #[must_use]
    pub const fn as_vehicle(&self) -> Option<&Vehicle> {
        match self {
            Self::Vehicle(v) => Some(v),
            _ => None,
        }
    }

    /// Returns mutable vehicle state, if this is a vehicle.
    #[must_use]
    pub fn as_vehicle_mut(&mut self) -> Option<&mut Vehicle> {
        match self {
            Self::Vehicle(v) => Some(v),
            _ => None,
        }
    }
}

/// A grid-resident entity: identifier plus kind-specific state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    inner: EntityInner,
}

impl Entity {
    /// Creates a new entity.
    #[must_use]
    pub const fn new(id: EntityId, inner: EntityInner) -> Self {
        Self { id, inner }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's tag.
    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.inner.tag()
    }

    /// Returns the entity's footprint.
    #[must_use]
    pub const fn footprint(&self) -> Footprint {
        self.inner.footprint()
    }

    /// Returns a reference to the inner state.
    #[must_use]
    pub const fn inner(&self) -> &EntityInner {
        &self.inner
    }

    /// Returns a mutable reference to the inner state.
    #[must_use]
    pub fn inner_mut(&mut self) -> &mut EntityInner {
        &mut self.inner
    }

    /// Returns the vehicle state if this is a vehicle.
    #[must_use]
    pub const fn as_vehicle(&self) -> Option<&Vehicle> {
        self.inner.as_vehicle()
    }

    /// Returns mutable vehicle state if this is a vehicle.
    #[must_use]
    pub fn as_vehicle_mut(&mut self) -> Option<&mut Vehicle> {
        self.inner.as_vehicle_mut()
    }
}
