//! Player commands and audio cues.
//!
//! The simulation never plays sound itself. It records an [`AudioCue`] at the
//! moment each condition becomes true and the host drains them with
//! [`CueLog::take_cues`] once per frame.

use serde::{Deserialize, Serialize};

use crate::entity::{Faction, ProjectileKind, VehicleKind};
use crate::geometry::Direction;

/// Intent issued for the player vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Step one cell, turning to face the direction.
    Move(Direction),
    /// Fire the current weapon.
    Fire,
}

/// Background music selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    /// Music for a stage.
    Stage(u32),
    /// Played once the campaign is complete.
    Victory,
}

/// Discrete sound events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// A projectile was fired.
    ProjectileFired {
        /// Projectile kind.
        kind: ProjectileKind,
        /// Faction of the shooter.
        owner: Faction,
    },
    /// A projectile was destroyed.
    ProjectileDestroyed {
        /// Projectile kind.
        kind: ProjectileKind,
        /// Faction of the shooter.
        owner: Faction,
    },
    /// A vehicle (or the castle, as `None`) exploded.
    VehicleDestroyed {
        /// Kind of the destroyed vehicle.
        kind: Option<VehicleKind>,
    },
    /// A power-up was picked up or granted.
    PowerUpCollected,
    /// The game is over.
    GameOver,
    /// The current stage was cleared.
    LevelWon,
    /// Stop the background music.
    StopMusic,
    /// Start a background theme.
    Theme(Theme),
}

/// Append-only cue buffer drained by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueLog {
    cues: Vec<AudioCue>,
}

impl CueLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cue.
    pub fn push(&mut self, cue: AudioCue) {
        self.cues.push(cue);
    }

    /// Drains and returns all recorded cues in emission order.
    pub fn take_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }

    /// Number of undrained cues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Returns `true` if nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
