//! Combat resolver for projectiles.
//!
//! Every live projectile is processed once per tick, in id order, against a
//! snapshot of ids taken before the pass. For each one:
//!
//! 1. Its world collider is computed from its position.
//! 2. The distinct grid objects under the collider are gathered row-major.
//! 3. Each object adds to a damage pool and applies its side effect
//!    (destroyed vehicles, worn bricks, a fallen castle, a reflection).
//!    A reflection ends the object pass.
//! 4. Other live projectiles overlapping it trade damage; the first one
//!    destroyed ends that scan.
//! 5. The pool is subtracted from its hit-points.
//! 6. It is removed if it touched an invulnerable vehicle, ran out of
//!    hit-points or travelled too far; otherwise it moves, bouncing off the
//!    arena edge instead of leaving it.

use glam::IVec2;
use tracing::{debug, trace};

use crate::entity::{EntityId, EntityInner, Faction, Mirror};
use crate::geometry::{Direction, Rect};
use crate::world::World;

use super::Resolver;

/// What a projectile found under one grid object, captured by value so the
/// world can be mutated while applying it.
#[derive(Debug, Clone, Copy)]
enum Contact {
    Vehicle {
        faction: Faction,
        invulnerable: bool,
    },
    Brick {
        hp: i32,
    },
    Castle,
    Mirror(Mirror),
    Stone,
    Passive,
}

impl Contact {
    fn of(inner: &EntityInner) -> Self {
        match inner {
            EntityInner::Vehicle(v) => Self::Vehicle {
                faction: v.faction(),
                invulnerable: v.is_invulnerable(),
            },
            EntityInner::Brick(b) => Self::Brick { hp: b.hp() },
            EntityInner::Castle => Self::Castle,
            EntityInner::Mirror(m) => Self::Mirror(*m),
            EntityInner::Stone => Self::Stone,
            EntityInner::Water | EntityInner::Tree => Self::Passive,
        }
    }
}

/// Counters from the last combat pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatStats {
    /// Projectiles processed.
    pub processed: usize,
    /// Projectiles removed, including ones destroyed by other projectiles.
    pub removed: usize,
    /// Reflections off mirrors.
    pub reflections: usize,
    /// Vehicles destroyed.
    pub vehicles_destroyed: usize,
}

/// Resolver for projectile flight and collisions.
///
/// # Example
///
/// ```
/// use citadel_core::resolver::{CombatResolver, Resolver};
///
/// let resolver = CombatResolver::new();
/// assert_eq!(resolver.name(), "combat");
/// assert_eq!(resolver.last_stats().processed, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CombatResolver {
    stats: CombatStats,
}

impl CombatResolver {
    /// Creates a new combat resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters from the most recent pass.
    #[must_use]
    pub const fn last_stats(&self) -> CombatStats {
        self.stats
    }

    /// Cell ranges covered by a pixel rectangle (floor division, unclipped).
    fn cell_span(collider: &Rect, cell: i32) -> (std::ops::Range<i64>, std::ops::Range<i64>) {
        let rows = i64::from(collider.min.y.div_euclid(cell))
            ..i64::from(collider.last_y().div_euclid(cell)) + 1;
        let cols = i64::from(collider.min.x.div_euclid(cell))
            ..i64::from(collider.last_x().div_euclid(cell)) + 1;
        (rows, cols)
    }

    #[allow(clippy::too_many_lines)]
    fn resolve_projectile(&mut self, world: &mut World, id: EntityId) {
        let Some(state) = world.arena.projectile(id) else {
            return;
        };
        self.stats.processed += 1;
        let collider = state.collider();
        let hp = state.projectile.hp();
        let faction = state.projectile.faction();
        let last_mirror = state.projectile.last_mirror();
        let cell = world.config.cell_size;

        let (rows, cols) = Self::cell_span(&collider, cell);
        let objects = world.arena.grid().scan(rows, cols);

        let mut pool = 0;
        let mut touched_invulnerable = false;
        let mut destroyed_vehicle = false;

        for obj in objects {
            let Some(contact) = world.arena.get(obj).map(|e| Contact::of(e.inner())) else {
                continue;
            };
            match contact {
                Contact::Vehicle {
                    faction: target,
                    invulnerable,
                } => {
                    touched_invulnerable |= invulnerable;
                    if target == faction {
                        continue;
                    }
                    if invulnerable {
                        pool += hp;
                    } else {
                        pool += 1;
                        world.destroy_vehicle(obj);
                        destroyed_vehicle = true;
                        self.stats.vehicles_destroyed += 1;
                    }
                }
                Contact::Brick { hp: brick_hp } => {
                    pool += brick_hp;
                    let crumbled = match world.arena.get_mut(obj).map(|e| e.inner_mut()) {
                        Some(EntityInner::Brick(brick)) => {
                            brick.hit(hp);
                            brick.is_destroyed()
                        }
                        _ => false,
                    };
                    if crumbled {
                        world.arena.despawn(obj);
                        trace!(tick = world.tick, entity = %obj, "brick destroyed");
                    }
                }
                Contact::Castle => world.destroy_castle(obj),
                Contact::Mirror(mirror) => {
                    if last_mirror == Some(obj) {
                        continue;
                    }
                    let Some(origin) = world.arena.position_of(obj) else {
                        continue;
                    };
                    let cell_rect = Rect::at(origin, IVec2::splat(cell));
                    if !mirror.is_entered_by(&collider, &cell_rect) {
                        continue;
                    }
                    if let Some(state) = world.arena.projectile_mut(id) {
                        let incoming = state.projectile.facing();
                        let outgoing = mirror.reflect(incoming);
                        state.projectile.reflect_from(obj, outgoing);
                        self.stats.reflections += 1;
                        debug!(
                            tick = world.tick,
                            projectile = %id,
                            mirror = %obj,
                            %incoming,
                            %outgoing,
                            "reflected"
                        );
                    }
                    break;
                }
                Contact::Stone => pool += hp,
                Contact::Passive => {}
            }
        }

        for other in world.arena.projectile_ids() {
            if other == id {
                continue;
            }
            let Some(state) = world.arena.projectile_mut(other) else {
                continue;
            };
            if !collider.overlaps(&state.collider()) {
                continue;
            }
            pool += state.projectile.hp();
            state.projectile.hit(hp);
            if state.projectile.hp() <= 0 {
                world.destroy_projectile(other, true);
                self.stats.removed += 1;
                break;
            }
        }

        let limit = world.config.projectile_travel_limit;
        let width = world.config.width();
        let height = world.config.height();
        let Some(state) = world.arena.projectile_mut(id) else {
            return;
        };
        state.projectile.hit(pool);

        if touched_invulnerable || state.projectile.hp() <= 0 || state.projectile.distance() > limit
        {
            world.destroy_projectile(id, !destroyed_vehicle);
            self.stats.removed += 1;
            return;
        }

        let step = world.config.step_per_tick(state.projectile.speed());
        let facing = state.projectile.facing();
        let at_edge = match facing {
            Direction::North => collider.min.y <= 0,
            Direction::West => collider.min.x <= 0,
            Direction::South => collider.last_y() >= height - 1,
            Direction::East => collider.last_x() >= width - 1,
        };
        if at_edge {
            state.projectile.redirect(facing.reverse());
        } else {
            state.position += facing.delta() * step;
        }
        state.projectile.add_distance(step);
    }
}

impl Resolver for CombatResolver {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn resolve(&mut self, world: &mut World) {
        self.stats = CombatStats::default();
        for id in world.arena.projectile_ids() {
            self.resolve_projectile(world, id);
        }
        trace!(
            tick = world.tick,
            processed = self.stats.processed,
            removed = self.stats.removed,
            "combat resolved"
        );
    }
}
