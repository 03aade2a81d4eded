//! Projectile spawner & approach tracker
//!
//! One thrown weapon at a time. A throw triggers a short wind-up (exposed to
//! the renderer as the boss's throwing pose), then launches with the arc
//! length frozen from the boss's proximity at that instant: a closer boss
//! means a shorter, faster-feeling flight.

use rand::Rng;

use super::events::SessionEvent;
use super::state::{BossKind, DodgeStyle, GamePhase, ProjectileKind, SessionState};
use super::tick::apply_damage;
use super::timer::{self, TimerAction};
use crate::consts::*;

pub(crate) fn update(state: &mut SessionState, dt: f32) {
    if state.boss.defeated || state.phase == GamePhase::CaughtAnimation {
        return;
    }

    if !state.projectile.active {
        // Spawning is mutually exclusive with an active hazard; an
        // already-flying projectile never blocks itself via `throwing`.
        if !state.hazard.active && !state.projectile.throwing {
            state.projectile.idle_time += dt;
            if state.projectile.idle_time > state.projectile.next_interval {
                trigger_throw(state);
            }
        }
        return;
    }

    let rate = THROW_BASE_RATE + (state.boss.level - 1) as f32 * THROW_RATE_PER_LEVEL;
    state.projectile.approach +=
        state.speed * dt * rate / state.projectile.launch_distance.max(1.0);

    // Tighter window than hazards: the median flight closes faster
    if state.projectile.approach > DUCK_WINDOW
        && state.projectile.duck_queued
        && !state.projectile.was_ducked
        && !state.is_player_hit
    {
        resolve_duck(state);
    }

    if state.projectile.approach >= 1.0 {
        if !state.projectile.was_ducked && !state.is_player_hit {
            apply_damage(state);
        }
        // No boss-return mechanic: a projectile always despawns at impact
        state.projectile.clear();
    }
}

fn trigger_throw(state: &mut SessionState) {
    state.projectile.throwing = true;
    state.projectile.idle_time = 0.0;
    state.projectile.next_interval = state
        .rng
        .random_range(PROJECTILE_INTERVAL_MIN..PROJECTILE_INTERVAL_MAX);
    timer::schedule(state, THROW_WINDUP, TimerAction::LaunchProjectile);
    log::debug!(
        "throw wind-up started, next in {:.2}s",
        state.projectile.next_interval
    );
}

/// End of the wind-up. The boss may have been defeated (or the run ended)
/// while the throw was pending; the force-clear already dropped `throwing`,
/// so a cancelled launch is a silent no-op.
pub(crate) fn launch(state: &mut SessionState) {
    if !state.projectile.throwing {
        return;
    }
    if state.boss.defeated || matches!(state.phase, GamePhase::CaughtAnimation | GamePhase::GameOver)
    {
        state.projectile.throwing = false;
        return;
    }

    let kind = roll_kind(state);
    let launch_distance = state.boss_proximity();

    let projectile = &mut state.projectile;
    projectile.kind = kind;
    projectile.launch_distance = launch_distance;
    projectile.active = true;
    projectile.approach = 0.0;
    projectile.duck_queued = false;
    projectile.was_ducked = false;
    projectile.throwing = false;

    log::debug!("projectile launched: {kind:?} from z {launch_distance:.1}");
}

/// The boss throws what it has on hand
fn roll_kind(state: &mut SessionState) -> ProjectileKind {
    match state.boss.kind {
        BossKind::Gorilla => {
            if state.rng.random::<f32>() > 0.5 {
                ProjectileKind::Barrel
            } else {
                ProjectileKind::Banana
            }
        }
        BossKind::Cheetah => {
            if state.rng.random::<f32>() > 0.5 {
                ProjectileKind::Bone
            } else {
                ProjectileKind::Rock
            }
        }
        BossKind::Dragon => ProjectileKind::Fireball,
    }
}

fn resolve_duck(state: &mut SessionState) {
    state.projectile.was_ducked = true;
    state.dodge_style = DodgeStyle::Spin;
    state.is_dodging = true;
    timer::schedule(state, DODGE_ANIM_DURATION, TimerAction::ClearDodgeAnim);

    state.score += DUCK_POINTS;
    state.push_event(SessionEvent::Ducked {
        points: DUCK_POINTS,
    });
}
