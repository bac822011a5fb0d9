//! Arena: storage for everything that exists in the current level.
//!
//! The Arena owns three kinds of state:
//!
//! - Grid-resident entities (terrain and vehicles) in a `BTreeMap` keyed by
//!   [`EntityId`], plus their placement in the [`SpatialGrid`]. Trees live in
//!   a separate canopy grid so vehicles can pass beneath them.
//! - Free-moving objects that ignore the one-object-per-cell rule:
//!   projectiles and explosions at pixel positions, floor power-ups at
//!   cells. They share the entity id counter, so every map iterates in
//!   creation order.
//! - Nothing else. Lives, waves and timers belong to the
//!   [`World`](crate::world::World).
//!
//! # Placement
//!
//! An entity may exist without being placed (the player vehicle while
//! waiting to respawn). Use [`Arena::spawn_at`] to create and place in one
//! step; a failed placement leaves no trace.
//!
//! ```
//! use citadel_core::arena::Arena;
//! use citadel_core::entity::{EntityInner, Vehicle, VehicleKind};
//!
//! let mut arena = Arena::new(32, 32, 8);
//! let tank = arena
//!     .spawn_at(EntityInner::Vehicle(Vehicle::new(VehicleKind::Enemy)), 0, 0)
//!     .unwrap();
//!
//! assert_eq!(arena.grid().locate(tank), Ok((0, 0)));
//! assert!(arena
//!     .spawn_at(EntityInner::Water, 1, 1)
//!     .is_err());
//! assert_eq!(arena.entity_count(), 1);
//! ```

use std::collections::BTreeMap;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::entity::{
    Entity, EntityId, EntityInner, EntityTag, Explosion, ExplosionKind, Faction, Projectile,
    Vehicle,
};
use crate::error::GridError;
use crate::grid::SpatialGrid;
use crate::powerup::PowerUpKind;

/// A projectile together with its pixel position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Top-left of the projectile sprite.
    pub position: IVec2,
    /// The projectile.
    pub projectile: Projectile,
}

impl ProjectileState {
    /// Collider in world pixels.
    #[must_use]
    pub fn collider(&self) -> crate::geometry::Rect {
        self.projectile.world_collider(self.position)
    }
}

/// An explosion together with its pixel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionState {
    /// Top-left of the explosion sprite.
    pub position: IVec2,
    /// The explosion.
    pub explosion: Explosion,
}

/// An unclaimed power-up resting on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPowerUp {
    /// Row of the cell.
    pub row: usize,
    /// Column of the cell.
    pub col: usize,
    /// What collecting it grants.
    pub kind: PowerUpKind,
}

/// Container for every object in the current level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing id counter shared by all object maps.
    next_id: u64,
    /// Pixel edge length of one cell.
    cell_size: i32,
    /// Terrain, trees and vehicles.
    entities: BTreeMap<EntityId, Entity>,
    /// Occupancy of terrain and vehicles.
    grid: SpatialGrid,
    /// Occupancy of trees.
    canopy: SpatialGrid,
    projectiles: BTreeMap<EntityId, ProjectileState>,
    explosions: BTreeMap<EntityId, ExplosionState>,
    powerups: BTreeMap<EntityId, FloorPowerUp>,
}

impl Arena {
    /// Creates an empty arena of `rows` x `cols` cells.
    #[must_use]
    pub fn new(rows: usize, cols: usize, cell_size: i32) -> Self {
        Self {
            next_id: 0,
            cell_size,
            entities: BTreeMap::new(),
            grid: SpatialGrid::new(rows, cols),
            canopy: SpatialGrid::new(rows, cols),
            projectiles: BTreeMap::new(),
            explosions: BTreeMap::new(),
            powerups: BTreeMap::new(),
        }
    }

    /// Removes every object. Ids keep counting up.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.grid.clear();
        self.canopy.clear();
        self.projectiles.clear();
        self.explosions.clear();
        self.powerups.clear();
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    // =========================================================================
    // Grid-resident entities
    // =========================================================================

    /// Creates an entity without placing it.
    pub fn spawn(&mut self, inner: EntityInner) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(id, Entity::new(id, inner));
        id
    }

    /// Creates an entity and places its anchor at (`row`, `col`).
    ///
    /// Trees go to the canopy grid, everything else to the main grid.
    ///
    /// # Errors
    ///
    /// Any placement error; the entity is discarded in that case.
    pub fn spawn_at(
        &mut self,
        inner: EntityInner,
        row: usize,
        col: usize,
    ) -> Result<EntityId, GridError> {
        let id = self.spawn(inner);
        if let Err(err) = self.place(id, row, col) {
            self.entities.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Places an existing entity.
    ///
    /// # Errors
    ///
    /// [`GridError::NotFound`] if the entity does not exist, otherwise any
    /// error from [`SpatialGrid::place`].
    #[allow(clippy::cast_possible_wrap)]
    pub fn place(&mut self, id: EntityId, row: usize, col: usize) -> Result<(), GridError> {
        let entity = self.entities.get(&id).ok_or(GridError::NotFound(id))?;
        let footprint = entity.footprint();
        let grid = if entity.tag() == EntityTag::Tree {
            &mut self.canopy
        } else {
            &mut self.grid
        };
        grid.place(id, footprint, row as i64, col as i64)
    }

    /// Takes an entity off the grid but keeps it.
    ///
    /// # Errors
    ///
    /// [`GridError::NotFound`] if the entity is not placed.
    pub fn unplace(&mut self, id: EntityId) -> Result<(), GridError> {
        self.grid.remove(id).or_else(|_| self.canopy.remove(id))
    }

    /// Removes an entity entirely, placed or not.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let _ = self.unplace(id);
        self.entities.remove(&id)
    }

    /// Entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Vehicle state of an entity, if it is a vehicle.
    #[must_use]
    pub fn vehicle(&self, id: EntityId) -> Option<&Vehicle> {
        self.get(id)?.as_vehicle()
    }

    /// Mutable vehicle state of an entity, if it is a vehicle.
    #[must_use]
    pub fn vehicle_mut(&mut self, id: EntityId) -> Option<&mut Vehicle> {
        self.get_mut(id)?.as_vehicle_mut()
    }

    /// Entities in ascending id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Ids of enemy-faction vehicles, ascending.
    pub fn enemy_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .values()
            .filter(|e| e.as_vehicle().is_some_and(|v| v.faction() == Faction::Enemy))
            .map(Entity::id)
    }

    /// Number of enemy vehicles.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemy_ids().count()
    }

    /// Number of entities (placed or not).
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing at all is in the arena.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.projectiles.is_empty()
            && self.explosions.is_empty()
            && self.powerups.is_empty()
    }

    /// Main occupancy grid.
    #[must_use]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Mutable main occupancy grid.
    pub fn grid_mut(&mut self) -> &mut SpatialGrid {
        &mut self.grid
    }

    /// Tree occupancy grid.
    #[must_use]
    pub fn canopy(&self) -> &SpatialGrid {
        &self.canopy
    }

    // =========================================================================
    // Coordinates
    // =========================================================================

    /// Pixel edge length of one cell.
    #[must_use]
    pub const fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Top-left pixel of a cell.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cell_origin(&self, row: usize, col: usize) -> IVec2 {
        IVec2::new(col as i32 * self.cell_size, row as i32 * self.cell_size)
    }

    /// Top-left pixel of a placed entity.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<IVec2> {
        let (row, col) = self.grid.locate(id).ok()?;
        Some(self.cell_origin(row, col))
    }

    // =========================================================================
    // Projectiles
    // =========================================================================

    /// Tracks a new projectile at `position`.
    pub fn spawn_projectile(&mut self, position: IVec2, projectile: Projectile) -> EntityId {
        let id = self.allocate_id();
        self.projectiles.insert(
            id,
            ProjectileState {
                position,
                projectile,
            },
        );
        id
    }

    /// Stops tracking a projectile.
    pub fn remove_projectile(&mut self, id: EntityId) -> Option<ProjectileState> {
        self.projectiles.remove(&id)
    }

    /// Projectile by id.
    #[must_use]
    pub fn projectile(&self, id: EntityId) -> Option<&ProjectileState> {
        self.projectiles.get(&id)
    }

    /// Mutable projectile by id.
    #[must_use]
    pub fn projectile_mut(&mut self, id: EntityId) -> Option<&mut ProjectileState> {
        self.projectiles.get_mut(&id)
    }

    /// Projectiles in ascending id order.
    pub fn projectiles(&self) -> impl Iterator<Item = (EntityId, &ProjectileState)> + '_ {
        self.projectiles.iter().map(|(&id, p)| (id, p))
    }

    /// Snapshot of live projectile ids.
    #[must_use]
    pub fn projectile_ids(&self) -> Vec<EntityId> {
        self.projectiles.keys().copied().collect()
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    // =========================================================================
    // Explosions
    // =========================================================================

    /// Starts an explosion at `position`.
    pub fn spawn_explosion(&mut self, position: IVec2, kind: ExplosionKind) -> EntityId {
        let id = self.allocate_id();
        self.explosions.insert(
            id,
            ExplosionState {
                position,
                explosion: Explosion::new(kind),
            },
        );
        id
    }

    /// Explosions in ascending id order.
    pub fn explosions(&self) -> impl Iterator<Item = (EntityId, &ExplosionState)> + '_ {
        self.explosions.iter().map(|(&id, e)| (id, e))
    }

    /// Ages every explosion by one frame, dropping finished ones.
    ///
    /// Returns the number removed.
    pub fn age_explosions(&mut self) -> usize {
        let before = self.explosions.len();
        self.explosions.retain(|_, e| e.explosion.advance());
        before - self.explosions.len()
    }

    // =========================================================================
    // Floor power-ups
    // =========================================================================

    /// Drops a power-up on a cell.
    pub fn spawn_powerup(&mut self, row: usize, col: usize, kind: PowerUpKind) -> EntityId {
        let id = self.allocate_id();
        self.powerups.insert(id, FloorPowerUp { row, col, kind });
        id
    }

    /// Removes a floor power-up.
    pub fn remove_powerup(&mut self, id: EntityId) -> Option<FloorPowerUp> {
        self.powerups.remove(&id)
    }

    /// Floor power-ups in ascending id order.
    pub fn powerups(&self) -> impl Iterator<Item = (EntityId, &FloorPowerUp)> + '_ {
        self.powerups.iter().map(|(&id, p)| (id, p))
    }

    /// Number of floor power-ups.
    #[must_use]
    pub fn powerup_count(&self) -> usize {
        self.powerups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Brick, VehicleKind, Weapon};
    use crate::geometry::Direction;

    fn arena() -> Arena {
        Arena::new(8, 8, 8)
    }

    mod entity_tests {
        use super::*;

        #[test]
        fn ids_are_sequential_across_maps() {
            let mut arena = arena();
            let a = arena.spawn(EntityInner::Stone);
            let p = arena.spawn_projectile(
                IVec2::ZERO,
                Weapon::Arrow.fire(Direction::North, a, Faction::Player),
            );
            let e = arena.spawn_explosion(IVec2::ZERO, ExplosionKind::Vehicle);
            let u = arena.spawn_powerup(0, 0, PowerUpKind::AttackBoost);
            assert_eq!(
                [a, p, e, u],
                [0, 1, 2, 3].map(EntityId::new)
            );
        }

        #[test]
        fn spawn_at_places_on_grid() {
            let mut arena = arena();
            let id = arena
                .spawn_at(EntityInner::Brick(Brick::new(3)), 2, 5)
                .unwrap();
            assert_eq!(arena.grid().get(2, 5), Some(id));
            assert_eq!(arena.position_of(id), Some(IVec2::new(40, 16)));
        }

        #[test]
        fn failed_spawn_at_leaves_nothing() {
            let mut arena = arena();
            arena.spawn_at(EntityInner::Stone, 0, 1).unwrap();
            let result = arena.spawn_at(
                EntityInner::Vehicle(Vehicle::new(VehicleKind::Enemy)),
                0,
                0,
            );
            assert!(result.is_err());
            assert_eq!(arena.entity_count(), 1);
        }

        #[test]
        fn trees_live_in_the_canopy() {
            let mut arena = arena();
            let tree = arena.spawn_at(EntityInner::Tree, 3, 3).unwrap();
            assert_eq!(arena.canopy().get(3, 3), Some(tree));
            assert_eq!(arena.grid().get(3, 3), None);

            let tank = arena
                .spawn_at(EntityInner::Vehicle(Vehicle::new(VehicleKind::Player)), 3, 3)
                .unwrap();
            assert_eq!(arena.grid().get(4, 4), Some(tank));

            arena.despawn(tree);
            assert!(arena.canopy().is_empty());
        }

        #[test]
        fn despawn_unplaced_entity() {
            let mut arena = arena();
            let id = arena.spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Player)));
            assert!(arena.despawn(id).is_some());
            assert!(arena.get(id).is_none());
        }

        #[test]
        fn enemy_ids_filter_by_faction() {
            let mut arena = arena();
            arena.spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Player)));
            let e = arena.spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Enemy)));
            let m = arena.spawn(EntityInner::Vehicle(Vehicle::new(VehicleKind::Magic)));
            arena.spawn(EntityInner::Castle);
            assert_eq!(arena.enemy_ids().collect::<Vec<_>>(), vec![e, m]);
            assert_eq!(arena.enemy_count(), 2);
        }
    }

    mod transient_tests {
        use super::*;

        #[test]
        fn explosions_age_out() {
            let mut arena = arena();
            arena.spawn_explosion(IVec2::new(8, 8), ExplosionKind::Vehicle);
            let mut removed = 0;
            for _ in 0..crate::entity::effects::EXPLOSION_FRAMES {
                removed += arena.age_explosions();
            }
            assert_eq!(removed, 1);
            assert_eq!(arena.explosions().count(), 0);
        }

        #[test]
        fn clear_keeps_counting_ids() {
            let mut arena = arena();
            arena.spawn(EntityInner::Water);
            arena.spawn_powerup(1, 1, PowerUpKind::DefenseBoost);
            arena.clear();
            assert!(arena.is_empty());
            assert_eq!(arena.spawn(EntityInner::Water), EntityId::new(2));
        }
    }
}
