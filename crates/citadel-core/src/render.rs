//! Draw list for the rendering host.
//!
//! [`render_specs`] walks the arena lazily and yields one [`RenderSpec`] per
//! visible object: grid objects first (row-major by anchor), then
//! projectiles, explosions and floor power-ups in id order, and finally the
//! tree canopy so it covers vehicles beneath it. Each call starts a fresh
//! walk; nothing is cached between frames.

use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::entity::{
    Entity, EntityInner, ExplosionKind, Faction, MirrorSlope, ProjectileKind, VehicleKind,
};
use crate::geometry::Direction;
use crate::grid::SpatialGrid;
use crate::powerup::PowerUpKind;

/// What to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visual {
    /// Brick at a damage stage (0 intact).
    Brick {
        /// Damage stage.
        wear: u8,
    },
    /// Water.
    Water,
    /// Stone.
    Stone,
    /// Tree canopy.
    Tree,
    /// Mirror.
    Mirror(MirrorSlope),
    /// Castle.
    Castle,
    /// Vehicle sprite.
    Vehicle {
        /// Vehicle kind.
        kind: VehicleKind,
        /// Sprite direction.
        facing: Direction,
        /// Alternate look while invulnerable.
        shielded: bool,
    },
    /// Projectile sprite.
    Projectile {
        /// Projectile kind.
        kind: ProjectileKind,
        /// Shooter's faction.
        faction: Faction,
        /// Sprite direction.
        facing: Direction,
    },
    /// Explosion frame.
    Explosion {
        /// What blew up.
        kind: ExplosionKind,
        /// Animation stage.
        stage: u8,
    },
    /// Unclaimed power-up.
    PowerUp(PowerUpKind),
}

/// One draw call: top-left pixel plus visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderSpec {
    /// Left edge in pixels.
    pub x: i32,
    /// Top edge in pixels.
    pub y: i32,
    /// What to draw there.
    pub visual: Visual,
}

fn entity_visual(entity: &Entity) -> Visual {
    match entity.inner() {
        EntityInner::Brick(b) => Visual::Brick { wear: b.wear() },
        EntityInner::Water => Visual::Water,
        EntityInner::Stone => Visual::Stone,
        EntityInner::Tree => Visual::Tree,
        EntityInner::Mirror(m) => Visual::Mirror(m.slope()),
        EntityInner::Castle => Visual::Castle,
        EntityInner::Vehicle(v) => Visual::Vehicle {
            kind: v.kind(),
            facing: v.facing(),
            shielded: v.is_invulnerable(),
        },
    }
}

/// Objects of one grid layer, one spec per object at its anchor cell.
fn placed<'a>(arena: &'a Arena, grid: &'a SpatialGrid) -> impl Iterator<Item = RenderSpec> + 'a {
    grid.enumerate().filter_map(move |(id, row, col)| {
        let entity = arena.get(id)?;
        let origin = arena.cell_origin(row, col);
        Some(RenderSpec {
            x: origin.x,
            y: origin.y,
            visual: entity_visual(entity),
        })
    })
}

/// Lazily lists everything to draw this frame.
pub fn render_specs(arena: &Arena) -> impl Iterator<Item = RenderSpec> + '_ {
    let projectiles = arena.projectiles().map(|(_, state)| RenderSpec {
        x: state.position.x,
        y: state.position.y,
        visual: Visual::Projectile {
            kind: state.projectile.kind(),
            faction: state.projectile.faction(),
            facing: state.projectile.facing(),
        },
    });
    let explosions = arena.explosions().map(|(_, state)| RenderSpec {
        x: state.position.x,
        y: state.position.y,
        visual: Visual::Explosion {
            kind: state.explosion.kind(),
            stage: state.explosion.stage(),
        },
    });
    let powerups = arena.powerups().map(|(_, floor)| {
        let origin = arena.cell_origin(floor.row, floor.col);
        RenderSpec {
            x: origin.x,
            y: origin.y,
            visual: Visual::PowerUp(floor.kind),
        }
    });

    placed(arena, arena.grid())
        .chain(projectiles)
        .chain(explosions)
        .chain(powerups)
        .chain(placed(arena, arena.canopy()))
}
