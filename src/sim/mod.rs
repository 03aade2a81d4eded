//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Continuous time deltas, one tick per rendered frame
//! - Seeded RNG only
//! - Deferred effects go through the in-state scheduler, never host timers
//! - No rendering or platform dependencies

pub mod boss;
pub mod events;
pub mod hazard;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timer;

pub use events::SessionEvent;
pub use state::{
    BossEncounter, BossKind, CutIn, DodgeStyle, GamePhase, HazardKind, HazardTrack,
    ProjectileKind, ProjectileTrack, SessionState,
};
pub use tick::{TickInput, tick};
pub use timer::TimerAction;
