//! Transient visual effects.

use serde::{Deserialize, Serialize};

use crate::entity::components::Faction;
use crate::entity::projectile::ProjectileKind;

/// Lifetime of an explosion in ticks.
pub const EXPLOSION_FRAMES: u32 = 30;

/// Number of distinct visual stages an explosion cycles through.
pub const EXPLOSION_STAGES: u32 = 4;

/// What blew up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// A destroyed vehicle or castle.
    Vehicle,
    /// A destroyed projectile.
    Projectile {
        /// Projectile kind.
        kind: ProjectileKind,
        /// Faction of the shooter, for colouring.
        faction: Faction,
    },
}

/// A short-lived explosion.
///
/// Created at frame 1, removed once it reaches [`EXPLOSION_FRAMES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explosion {
    kind: ExplosionKind,
    frame: u32,
}

impl Explosion {
    /// New explosion at its first frame.
    #[must_use]
    pub const fn new(kind: ExplosionKind) -> Self {
        Self { kind, frame: 1 }
    }

    /// Explosion kind.
    #[must_use]
    pub const fn kind(&self) -> ExplosionKind {
        self.kind
    }

    /// Current frame.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Ages the explosion by one tick. Returns `false` once it has expired
    /// and should be removed.
    pub fn advance(&mut self) -> bool {
        if self.frame >= EXPLOSION_FRAMES {
            return false;
        }
        self.frame += 1;
        true
    }

    /// Visual stage in `0..EXPLOSION_STAGES`.
    #[must_use]
    pub fn stage(&self) -> u8 {
        let per_stage = EXPLOSION_FRAMES.div_ceil(EXPLOSION_STAGES);
        #[allow(clippy::cast_possible_truncation)]
        let stage = ((self.frame.saturating_sub(1)) / per_stage).min(EXPLOSION_STAGES - 1) as u8;
        stage
    }
}
