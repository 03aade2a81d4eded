//! Session state and core simulation types
//!
//! The whole encounter lives in one mutable record, mutated only by the tick
//! and by the deferred events the tick itself scheduled.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::SessionEvent;
use super::timer::Scheduled;
use crate::clamp01;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// The boss caught the player; cinematic before game over
    CaughtAnimation,
    /// Run ended
    GameOver,
}

/// The pursuing boss species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BossKind {
    Gorilla,
    Cheetah,
    Dragon,
}

impl BossKind {
    /// Next species in the rotation; Dragon is terminal
    pub fn next(self) -> Self {
        match self {
            BossKind::Gorilla => BossKind::Cheetah,
            BossKind::Cheetah => BossKind::Dragon,
            BossKind::Dragon => BossKind::Dragon,
        }
    }
}

/// Ground hazard variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardKind {
    #[default]
    Rock,
    Car,
    Animal,
    Sheep,
}

/// Thrown-weapon variants (availability depends on the boss)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectileKind {
    #[default]
    Barrel,
    Banana,
    Bone,
    Rock,
    Fireball,
}

/// Evasion animation variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DodgeStyle {
    #[default]
    Sidestep,
    Jump,
    Spin,
}

/// Boss encounter progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossEncounter {
    pub kind: BossKind,
    /// Stage within the current species, 1-based
    pub level: u32,
    /// Hazards absorbed by the boss this stage
    pub hits_landed: u32,
    pub defeated: bool,
}

impl Default for BossEncounter {
    fn default() -> Self {
        Self {
            kind: BossKind::Gorilla,
            level: 1,
            hits_landed: 0,
            defeated: false,
        }
    }
}

/// Ground hazard lifecycle (at most one live instance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardTrack {
    pub active: bool,
    pub kind: HazardKind,
    /// Progress fraction toward impact; overshoots past 1 before despawn
    pub approach: f32,
    /// Normalized screen hint for the reactive-button placement
    pub anchor: Vec2,
    pub dodge_queued: bool,
    pub was_dodged: bool,
    /// Idle time since the last despawn
    pub idle_time: f32,
    /// Randomized interval gating the next spawn
    pub next_interval: f32,
}

impl HazardTrack {
    /// Despawn and drop any queued reaction
    pub fn clear(&mut self) {
        self.active = false;
        self.approach = 0.0;
        self.dodge_queued = false;
        self.was_dodged = false;
    }
}

/// Thrown-weapon lifecycle (at most one live instance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileTrack {
    pub active: bool,
    pub kind: ProjectileKind,
    /// Progress fraction toward impact
    pub approach: f32,
    /// Boss proximity snapshotted at launch; fixes the arc length
    pub launch_distance: f32,
    pub duck_queued: bool,
    pub was_ducked: bool,
    /// Wind-up flag between trigger and launch, exposed for boss animation
    pub throwing: bool,
    pub idle_time: f32,
    pub next_interval: f32,
}

impl ProjectileTrack {
    /// Despawn, cancel a pending wind-up, drop any queued reaction
    pub fn clear(&mut self) {
        self.active = false;
        self.approach = 0.0;
        self.duck_queued = false;
        self.was_ducked = false;
        self.throwing = false;
    }
}

/// Comic-book acknowledgment word shown briefly after a reaction input
#[derive(Debug, Clone, Serialize)]
pub struct CutIn {
    pub id: u32,
    pub word: &'static str,
    /// Normalized screen position
    pub pos: Vec2,
}

/// Complete session state, owned by the simulator
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving every spawn roll
    pub rng: Pcg32,
    /// Bumped on reset; deferred events from an older generation are no-ops
    pub generation: u32,
    /// Real-time session clock, advances every tick regardless of phase
    pub clock: f64,

    pub phase: GamePhase,
    pub speed: f32,
    pub distance: f32,
    pub score: f32,
    /// Continuous lives in [0, 3]; also the (inverted) boss-proximity input
    pub lives: f32,
    pub combo: u32,

    pub boss: BossEncounter,
    pub hazard: HazardTrack,
    pub projectile: ProjectileTrack,

    /// Hit flash, auto-cleared after a real-time delay
    pub is_player_hit: bool,
    pub is_boss_hit: bool,
    /// Evasion animation intent, ~0.5s
    pub is_dodging: bool,
    pub dodge_style: DodgeStyle,
    /// At most one pending acknowledgment; a new one replaces the old
    pub cut_in: Option<CutIn>,

    pub(crate) next_cut_in_id: u32,
    pub(crate) timers: Vec<Scheduled>,
    pub(crate) events: Vec<SessionEvent>,
}

impl SessionState {
    /// Create a fresh session with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let hazard_interval = rng.random_range(HAZARD_INTERVAL_MIN..HAZARD_INTERVAL_MAX);
        let projectile_interval =
            rng.random_range(PROJECTILE_INTERVAL_MIN..PROJECTILE_INTERVAL_MAX);

        Self {
            seed,
            rng,
            generation: 0,
            clock: 0.0,
            phase: GamePhase::Running,
            speed: START_SPEED,
            distance: 0.0,
            score: 0.0,
            lives: MAX_LIVES,
            combo: 0,
            boss: BossEncounter::default(),
            hazard: HazardTrack {
                active: false,
                kind: HazardKind::Rock,
                approach: 0.0,
                anchor: Vec2::new(0.5, 0.5),
                dodge_queued: false,
                was_dodged: false,
                idle_time: 0.0,
                next_interval: hazard_interval,
            },
            projectile: ProjectileTrack {
                active: false,
                kind: ProjectileKind::Barrel,
                approach: 0.0,
                launch_distance: BOSS_TRACK_MAX_Z,
                duck_queued: false,
                was_ducked: false,
                throwing: false,
                idle_time: 0.0,
                next_interval: projectile_interval,
            },
            is_player_hit: false,
            is_boss_hit: false,
            is_dodging: false,
            dodge_style: DodgeStyle::Sidestep,
            cut_in: None,
            next_cut_in_id: 1,
            timers: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Start a new session in place. The generation bump invalidates every
    /// deferred event scheduled by the old session; stale entries stay queued
    /// and die on the generation guard when they come due.
    pub fn reset(&mut self, seed: u64) {
        let generation = self.generation.wrapping_add(1);
        let timers = std::mem::take(&mut self.timers);
        *self = Self::new(seed);
        self.generation = generation;
        self.timers = timers;
    }

    /// Boss position along the track, derived from lives (never stored):
    /// the boss closes in as the player runs out of lives.
    pub fn boss_proximity(&self) -> f32 {
        clamp01(self.lives / MAX_LIVES) * BOSS_TRACK_MAX_Z
    }

    /// Drain the one-shot events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub(crate) fn alloc_cut_in_id(&mut self) -> u32 {
        let id = self.next_cut_in_id;
        self.next_cut_in_id = self.next_cut_in_id.wrapping_add(1);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let state = SessionState::new(7);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.speed, START_SPEED);
        assert_eq!(state.combo, 0);
        assert!(!state.hazard.active);
        assert!(!state.projectile.active);
        assert!(state.hazard.next_interval >= HAZARD_INTERVAL_MIN);
        assert!(state.hazard.next_interval < HAZARD_INTERVAL_MAX);
        assert!(state.projectile.next_interval >= PROJECTILE_INTERVAL_MIN);
        assert!(state.projectile.next_interval < PROJECTILE_INTERVAL_MAX);
    }

    #[test]
    fn test_boss_proximity_tracks_lives() {
        let mut state = SessionState::new(7);
        assert!((state.boss_proximity() - BOSS_TRACK_MAX_Z).abs() < f32::EPSILON);

        state.lives = 1.5;
        assert!((state.boss_proximity() - BOSS_TRACK_MAX_Z / 2.0).abs() < 1e-5);

        // Derived value stays clamped even if lives drift out of range
        state.lives = -0.5;
        assert_eq!(state.boss_proximity(), 0.0);
        state.lives = 99.0;
        assert_eq!(state.boss_proximity(), BOSS_TRACK_MAX_Z);
    }

    #[test]
    fn test_reset_bumps_generation() {
        let mut state = SessionState::new(7);
        state.score = 4242.0;
        state.lives = 0.1;
        state.reset(8);
        assert_eq!(state.generation, 1);
        assert_eq!(state.seed, 8);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_boss_kind_rotation_is_terminal() {
        assert_eq!(BossKind::Gorilla.next(), BossKind::Cheetah);
        assert_eq!(BossKind::Cheetah.next(), BossKind::Dragon);
        assert_eq!(BossKind::Dragon.next(), BossKind::Dragon);
    }
}
