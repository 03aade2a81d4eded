//! Read-only per-frame view handed to the rendering collaborator
//!
//! The renderer (and the reactive-button overlay) never touch `SessionState`;
//! each frame gets a serializable copy of exactly what it needs, including
//! the derived input affordances, and emits nothing back.

use serde::Serialize;

use crate::consts::*;
use crate::sim::{
    BossKind, CutIn, DodgeStyle, GamePhase, HazardKind, ProjectileKind, SessionState,
};

/// Projectile display scale growth per boss level
const SCALE_PER_LEVEL: f32 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct HazardView {
    pub kind: HazardKind,
    pub approach: f32,
    /// Normalized screen hint for the dodge button
    pub anchor: glam::Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub approach: f32,
    /// World Z the flight started from
    pub launch_distance: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BossView {
    pub kind: BossKind,
    pub level: u32,
    pub hits_landed: u32,
    pub defeated: bool,
    /// Wind-up pose
    pub throwing: bool,
    pub hit: bool,
    /// Derived position along the track
    pub proximity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    pub speed: f32,
    pub distance: f32,
    pub score: u32,
    pub lives: f32,
    pub combo: u32,

    pub is_player_hit: bool,
    pub is_dodging: bool,
    pub dodge_style: DodgeStyle,
    pub cut_in: Option<CutIn>,

    pub hazard: Option<HazardView>,
    pub projectile: Option<ProjectileView>,
    pub boss: BossView,

    /// Reactive-button affordances, derived per the gameplay windows
    pub show_dodge_button: bool,
    pub show_duck_button: bool,
}

/// Copy everything the renderer needs out of the live state
pub fn build_snapshot(state: &SessionState) -> FrameSnapshot {
    let hazard = state.hazard.active.then(|| HazardView {
        kind: state.hazard.kind,
        approach: state.hazard.approach,
        anchor: state.hazard.anchor,
    });

    let projectile = state.projectile.active.then(|| ProjectileView {
        kind: state.projectile.kind,
        approach: state.projectile.approach,
        launch_distance: state.projectile.launch_distance,
        scale: 1.0 + (state.boss.level - 1) as f32 * SCALE_PER_LEVEL,
    });

    let show_dodge_button =
        state.hazard.active && !state.hazard.dodge_queued && state.hazard.approach < DODGE_WINDOW;

    // The duck button only appears once the flight is within a second of
    // impact, so the player reads it as a reaction prompt, not scenery.
    let show_duck_button = state.projectile.active
        && !state.projectile.duck_queued
        && state.projectile.approach < DUCK_WINDOW
        && projectile_time_remaining(state) <= 1.0;

    FrameSnapshot {
        phase: state.phase,
        speed: state.speed,
        distance: state.distance,
        score: state.score as u32,
        lives: state.lives,
        combo: state.combo,
        is_player_hit: state.is_player_hit,
        is_dodging: state.is_dodging,
        dodge_style: state.dodge_style,
        cut_in: state.cut_in.clone(),
        hazard,
        projectile,
        boss: BossView {
            kind: state.boss.kind,
            level: state.boss.level,
            hits_landed: state.boss.hits_landed,
            defeated: state.boss.defeated,
            throwing: state.projectile.throwing,
            hit: state.is_boss_hit,
            proximity: state.boss_proximity(),
        },
        show_dodge_button,
        show_duck_button,
    }
}

/// Estimated seconds until the in-flight projectile lands
fn projectile_time_remaining(state: &SessionState) -> f32 {
    let rate = THROW_BASE_RATE + (state.boss.level - 1) as f32 * THROW_RATE_PER_LEVEL;
    let velocity = (state.speed * rate).max(f32::EPSILON);
    let total_time = state.projectile.launch_distance.max(1.0) / velocity;
    (1.0 - state.projectile.approach) * total_time
}
