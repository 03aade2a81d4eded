//! One-shot events raised inside a tick
//!
//! Drained by the shell each frame; this is how the score sink hears about
//! game over exactly once without the simulation knowing about it.

use super::state::BossKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// An unblocked miss landed on the player
    PlayerHit { lives: f32 },
    /// A queued dodge resolved against a hazard
    Dodged { points: f32, combo: u32 },
    /// A queued duck resolved against a projectile
    Ducked { points: f32 },
    /// A dodged hazard was absorbed by the boss
    BossHit { hits_landed: u32 },
    BossDefeated { kind: BossKind, level: u32 },
    /// The next boss stage began after the defeat delay
    BossStageStarted { kind: BossKind, level: u32 },
    /// Emitted once per session, at the caught-to-game-over transition
    GameOver { score: u32 },
}
