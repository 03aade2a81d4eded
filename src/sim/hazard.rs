//! Hazard spawner & approach tracker
//!
//! One ground hazard at a time: idle -> approaching -> absorbed by the boss
//! or despawned past the overshoot limit. Hazards close distance at half the
//! base rate of thrown weapons.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::boss;
use super::events::SessionEvent;
use super::state::{DodgeStyle, GamePhase, HazardKind, SessionState};
use super::tick::apply_damage;
use super::timer::{self, TimerAction};
use crate::consts::*;
use crate::track_z;

pub(crate) fn update(state: &mut SessionState, dt: f32) {
    // Frozen between a defeat and the next stage, and during the cinematic
    if state.boss.defeated || state.phase == GamePhase::CaughtAnimation {
        return;
    }

    if !state.hazard.active {
        // Spawning waits for the projectile track to be fully idle;
        // a throw that is merely winding up still holds the road.
        if !state.projectile.active && !state.projectile.throwing {
            state.hazard.idle_time += dt;
            if state.hazard.idle_time > state.hazard.next_interval {
                spawn(state);
            }
        }
        return;
    }

    state.hazard.approach += HAZARD_APPROACH_RATE * state.speed * dt;

    // A queued dodge lands just before the miss threshold
    if state.hazard.approach > DODGE_WINDOW
        && state.hazard.dodge_queued
        && !state.hazard.was_dodged
        && !state.is_player_hit
    {
        resolve_dodge(state);
    }

    if state.hazard.approach < 1.0 {
        return;
    }

    if !state.hazard.was_dodged && !state.is_player_hit {
        apply_damage(state);
    }

    if state.hazard.was_dodged {
        // The dodged hazard keeps rolling down the track toward the boss
        if track_z(state.hazard.approach) >= state.boss_proximity() - ABSORB_TOLERANCE {
            absorb(state);
            return;
        }
    }

    // Cleanup safety net: nothing lives past the overshoot limit
    if state.hazard.approach > HAZARD_OVERSHOOT {
        state.hazard.clear();
    }
}

fn spawn(state: &mut SessionState) {
    let kind = roll_kind(&mut state.rng);
    let anchor = Vec2::new(
        state.rng.random_range(0.2..0.8),
        state.rng.random_range(0.2..0.8),
    );
    let next_interval = state
        .rng
        .random_range(HAZARD_INTERVAL_MIN..HAZARD_INTERVAL_MAX);

    let hazard = &mut state.hazard;
    hazard.active = true;
    hazard.kind = kind;
    hazard.approach = 0.0;
    hazard.anchor = anchor;
    hazard.dodge_queued = false;
    hazard.was_dodged = false;
    hazard.idle_time = 0.0;
    hazard.next_interval = next_interval;

    log::debug!("hazard spawned: {kind:?}, next in {next_interval:.2}s");
}

/// Weighted hazard pick; the residue collapses to Rock
pub(crate) fn roll_kind(rng: &mut Pcg32) -> HazardKind {
    let r: f32 = rng.random();
    if r < 0.3 {
        HazardKind::Car
    } else if r < 0.6 {
        HazardKind::Animal
    } else if r < 0.8 {
        HazardKind::Sheep
    } else {
        HazardKind::Rock
    }
}

fn resolve_dodge(state: &mut SessionState) {
    state.hazard.was_dodged = true;

    // Sheep are jumped over; anything else gets a random flourish
    state.dodge_style = if state.hazard.kind == HazardKind::Sheep {
        DodgeStyle::Jump
    } else {
        match state.rng.random_range(0..3u8) {
            0 => DodgeStyle::Jump,
            1 => DodgeStyle::Sidestep,
            _ => DodgeStyle::Spin,
        }
    };
    state.is_dodging = true;
    timer::schedule(state, DODGE_ANIM_DURATION, TimerAction::ClearDodgeAnim);

    let points = DODGE_BASE_POINTS + (state.combo + 1) as f32 * COMBO_STEP_POINTS;
    state.score += points;
    state.combo += 1;
    state.push_event(SessionEvent::Dodged {
        points,
        combo: state.combo,
    });
}

/// A dodged hazard reaching the boss's band converts into a hit against it
fn absorb(state: &mut SessionState) {
    state.lives = (state.lives + ABSORB_HEAL).min(MAX_LIVES);
    state.hazard.clear();
    boss::register_hit(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_kind_distribution_matches_weights() {
        let mut rng = Pcg32::seed_from_u64(0xC0FFEE);
        let n = 4000;
        let mut counts = [0u32; 4];
        for _ in 0..n {
            match roll_kind(&mut rng) {
                HazardKind::Car => counts[0] += 1,
                HazardKind::Animal => counts[1] += 1,
                HazardKind::Sheep => counts[2] += 1,
                HazardKind::Rock => counts[3] += 1,
            }
        }
        let freq = |c: u32| c as f32 / n as f32;
        assert!((freq(counts[0]) - 0.3).abs() < 0.03, "car {:?}", counts);
        assert!((freq(counts[1]) - 0.3).abs() < 0.03, "animal {:?}", counts);
        assert!((freq(counts[2]) - 0.2).abs() < 0.03, "sheep {:?}", counts);
        assert!((freq(counts[3]) - 0.2).abs() < 0.03, "rock {:?}", counts);
    }

    #[test]
    fn test_spawn_waits_for_interval_then_rolls_a_new_one() {
        let mut state = SessionState::new(42);
        let interval = state.hazard.next_interval;

        update(&mut state, interval * 0.5);
        assert!(!state.hazard.active);

        update(&mut state, interval);
        assert!(state.hazard.active);
        assert_eq!(state.hazard.approach, 0.0);
        assert_eq!(state.hazard.idle_time, 0.0);
        assert!(state.hazard.next_interval >= HAZARD_INTERVAL_MIN);
        assert!(state.hazard.next_interval < HAZARD_INTERVAL_MAX);
    }

    #[test]
    fn test_no_spawn_while_projectile_holds_the_road() {
        let mut state = SessionState::new(42);
        state.projectile.throwing = true;
        update(&mut state, 100.0);
        assert!(!state.hazard.active);
        assert_eq!(state.hazard.idle_time, 0.0);

        state.projectile.throwing = false;
        state.projectile.active = true;
        update(&mut state, 100.0);
        assert!(!state.hazard.active);
    }

    #[test]
    fn test_dodged_hazard_absorbed_by_boss() {
        let mut state = SessionState::new(42);
        state.hazard.active = true;
        state.hazard.was_dodged = true;
        state.hazard.approach = 1.0;
        state.lives = 2.0;

        // Walk it down the track until it reaches the boss band
        for _ in 0..200 {
            if !state.hazard.active {
                break;
            }
            update(&mut state, 1.0 / 60.0);
        }

        assert!(!state.hazard.active);
        assert!(state.is_boss_hit);
        assert_eq!(state.boss.hits_landed, 1);
        assert!((state.lives - 2.2).abs() < 1e-5);
    }

    #[test]
    fn test_heal_caps_at_max_lives() {
        let mut state = SessionState::new(42);
        state.hazard.active = true;
        state.hazard.was_dodged = true;
        state.hazard.approach = 1.55;
        // Full lives: boss band sits at the far end, reachable before 1.6
        update(&mut state, 1.0);
        assert!(!state.hazard.active);
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_frozen_while_boss_defeated() {
        let mut state = SessionState::new(42);
        state.boss.defeated = true;
        update(&mut state, 100.0);
        assert!(!state.hazard.active);
        assert_eq!(state.hazard.idle_time, 0.0);
    }
}
