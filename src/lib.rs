//! Chihuahua Rush - an endless-runner chase game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tracks, boss progression, game state)
//! - `render_snapshot`: Read-only per-frame view handed to the renderer
//! - `thoughts`: Optional flavor-text service (cosmetic, falls back offline)
//! - `settings`: Player preferences

pub mod render_snapshot;
pub mod settings;
pub mod sim;
pub mod thoughts;

pub use render_snapshot::FrameSnapshot;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Run speed at session start
    pub const START_SPEED: f32 = 2.0;
    /// Speed cap
    pub const MAX_SPEED: f32 = 5.0;
    /// Speed gained per distance threshold crossed
    pub const SPEED_RAMP_STEP: f32 = 0.2 * (2.0 / 3.0);
    /// Distance between speed ramps
    pub const SPEED_RAMP_DISTANCE: f32 = 50.0;
    /// Score awarded per unit of distance
    pub const SCORE_PER_UNIT: f32 = 30.0;

    /// Lives at session start (also the cap)
    pub const MAX_LIVES: f32 = 3.0;
    /// Lives at or below this end the run (absorbs float drift)
    pub const CAUGHT_THRESHOLD: f32 = 0.2;
    /// Life restored when the boss absorbs a dodged hazard
    pub const ABSORB_HEAL: f32 = 0.2;

    /// Track Z where the boss stands at full lives
    pub const BOSS_TRACK_MAX_Z: f32 = 16.0;
    /// Track Z where hazards enter the world
    pub const TRACK_SPAWN_Z: f32 = -40.0;
    /// Track length from spawn to the player
    pub const TRACK_LENGTH: f32 = 40.0;
    /// Tolerance band in front of the boss for hazard absorption
    pub const ABSORB_TOLERANCE: f32 = 1.0;

    /// Hazard approach per unit of speed-second (half the projectile base)
    pub const HAZARD_APPROACH_RATE: f32 = 0.5;
    /// Queued dodges resolve past this approach
    pub const DODGE_WINDOW: f32 = 0.8;
    /// Hazards despawn past this approach no matter what
    pub const HAZARD_OVERSHOOT: f32 = 1.6;
    /// Hazard spawn interval range, seconds
    pub const HAZARD_INTERVAL_MIN: f32 = 1.5;
    pub const HAZARD_INTERVAL_MAX: f32 = 3.5;

    /// Projectile spawn interval range, seconds
    pub const PROJECTILE_INTERVAL_MIN: f32 = 4.0;
    pub const PROJECTILE_INTERVAL_MAX: f32 = 8.0;
    /// Queued ducks resolve past this approach (tighter than dodges)
    pub const DUCK_WINDOW: f32 = 0.85;
    /// Wind-up between throw trigger and launch, seconds
    pub const THROW_WINDUP: f64 = 0.5;
    /// Base fly-speed multiplier at boss level 1
    pub const THROW_BASE_RATE: f32 = 5.0;
    /// Extra fly-speed multiplier per boss level
    pub const THROW_RATE_PER_LEVEL: f32 = 2.0;

    /// Hits landed on the boss before it is defeated
    pub const BOSS_DEFEAT_HITS: u32 = 10;
    /// Flat score bonus for a boss defeat
    pub const BOSS_DEFEAT_BONUS: f32 = 1000.0;
    /// Delay before the next boss stage begins, seconds
    pub const BOSS_RESPAWN_DELAY: f64 = 3.0;
    /// Delay between being caught and the game-over report, seconds
    pub const CAUGHT_DELAY: f64 = 3.0;

    /// Transient flag durations, seconds
    pub const HIT_FLASH_DURATION: f64 = 1.5;
    pub const BOSS_HIT_FLASH_DURATION: f64 = 1.0;
    pub const DODGE_ANIM_DURATION: f64 = 0.5;
    pub const CUT_IN_DURATION: f64 = 0.5;

    /// Scoring
    pub const DODGE_BASE_POINTS: f32 = 10.0;
    pub const COMBO_STEP_POINTS: f32 = 5.0;
    pub const DUCK_POINTS: f32 = 20.0;
}

/// World-space Z of a hazard at the given approach fraction
#[inline]
pub fn track_z(approach: f32) -> f32 {
    consts::TRACK_SPAWN_Z + approach * consts::TRACK_LENGTH
}

/// Clamp to the unit interval
#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}
