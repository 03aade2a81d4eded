//! Per-frame simulation tick
//!
//! Driven once per rendered frame with the real time delta. Intra-tick order
//! is fixed: due deferred events, then input queuing, then progression, then
//! the hazard track, then the projectile track.

use glam::Vec2;
use rand::Rng;

use super::events::SessionEvent;
use super::state::{CutIn, GamePhase, SessionState};
use super::timer::{self, TimerAction};
use super::{hazard, projectile};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Dodge event (obstacle reaction button / key)
    pub dodge: bool,
    /// Duck event (projectile reaction button / key)
    pub duck: bool,
    /// Normalized screen position of the triggering tap, if any
    pub pointer: Option<Vec2>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    // The session clock is real time: transient-flag clears, the wind-up,
    // and the caught/defeat transitions keep running in every phase.
    state.clock += dt as f64;
    timer::run_due(state);

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Running,
            _ => {}
        }
    }

    // Reactions queue while running; resolution happens later in the tick,
    // at the per-track approach windows.
    if state.phase == GamePhase::Running && (input.dodge || input.duck) {
        queue_reaction(state, input.pointer);
    }

    if state.phase != GamePhase::Running {
        return;
    }

    advance_progression(state, dt);
    hazard::update(state, dt);
    projectile::update(state, dt);
}

/// Distance, score-per-distance and the speed ramp
fn advance_progression(state: &mut SessionState, dt: f32) {
    let increment = dt * state.speed;
    let crossings = ((state.distance + increment) / SPEED_RAMP_DISTANCE).floor()
        - (state.distance / SPEED_RAMP_DISTANCE).floor();

    state.distance += increment;
    state.score += increment * SCORE_PER_UNIT;

    if crossings > 0.0 {
        // One ramp per threshold crossed, even on a huge frame delta
        state.speed = (state.speed + SPEED_RAMP_STEP * crossings).min(MAX_SPEED);
    }
}

/// Queue the reaction on every active track; a single tap may arm both.
pub(crate) fn queue_reaction(state: &mut SessionState, pointer: Option<Vec2>) {
    let mut acknowledged = false;
    if state.hazard.active {
        state.hazard.dodge_queued = true;
        acknowledged = true;
    }
    if state.projectile.active {
        state.projectile.duck_queued = true;
        acknowledged = true;
    }
    if acknowledged {
        show_cut_in(state, pointer);
    }
}

const CUT_IN_WORDS: [&str; 7] = [
    "WHOOSH!", "SWISH!", "NICE!", "WOW!", "ZOOM!", "YEAH!", "DODGE!",
];

fn show_cut_in(state: &mut SessionState, pointer: Option<Vec2>) {
    let word = CUT_IN_WORDS[state.rng.random_range(0..CUT_IN_WORDS.len())];
    let pos = match pointer {
        // Snap to the screen edge on the tapped side, keep the tap height
        Some(p) => Vec2::new(if p.x < 0.5 { 0.2 } else { 0.8 }, p.y.clamp(0.2, 0.8)),
        None => Vec2::new(
            if state.rng.random::<f32>() > 0.5 { 0.2 } else { 0.8 },
            state.rng.random_range(0.4..0.6),
        ),
    };

    let id = state.alloc_cut_in_id();
    state.cut_in = Some(CutIn { id, word, pos });
    // A replacement orphans the previous clear; it no-ops on the id guard
    timer::schedule(state, CUT_IN_DURATION, TimerAction::ClearCutIn { id });
}

/// An unblocked miss on either track
pub(crate) fn apply_damage(state: &mut SessionState) {
    // Mercy window: nothing lands while the hit flash is showing
    if state.is_player_hit {
        return;
    }

    state.lives = (state.lives - 1.0).max(0.0);
    state.combo = 0;
    state.is_player_hit = true;
    timer::schedule(state, HIT_FLASH_DURATION, TimerAction::ClearPlayerHit);
    state.push_event(SessionEvent::PlayerHit { lives: state.lives });

    if state.lives <= CAUGHT_THRESHOLD {
        state.phase = GamePhase::CaughtAnimation;
        timer::schedule(state, CAUGHT_DELAY, TimerAction::FinishCaughtAnimation);
        log::info!("caught at distance {:.0}", state.distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::HazardKind;

    const DT: f32 = 1.0 / 60.0;

    fn run(state: &mut SessionState, seconds: f32) {
        let input = TickInput::default();
        let steps = (seconds / DT).ceil() as usize;
        for _ in 0..steps {
            tick(state, &input, DT);
        }
    }

    #[test]
    fn test_pause_toggles_and_freezes_progression() {
        let mut state = SessionState::new(11);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Paused);

        let distance = state.distance;
        run(&mut state, 1.0);
        assert_eq!(state.distance, distance);

        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_hit_flash_clears_on_real_time_even_while_paused() {
        let mut state = SessionState::new(11);
        apply_damage(&mut state);
        assert!(state.is_player_hit);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        run(&mut state, HIT_FLASH_DURATION as f32 + 0.1);
        assert!(!state.is_player_hit);
    }

    // Scenario A: unresolved hazard miss
    #[test]
    fn test_miss_costs_a_life_and_resets_combo() {
        let mut state = SessionState::new(11);
        state.combo = 4;
        state.hazard.active = true;
        state.hazard.approach = 0.99;

        run(&mut state, 0.1);
        assert!((state.lives - 2.0).abs() < 1e-5);
        assert_eq!(state.combo, 0);
        assert!(state.is_player_hit);
        assert_eq!(state.phase, GamePhase::Running);

        run(&mut state, HIT_FLASH_DURATION as f32);
        assert!(!state.is_player_hit);
    }

    // Scenario B: queued dodge resolves at the window, hazard flies on
    #[test]
    fn test_queued_dodge_scores_and_hazard_continues() {
        let mut state = SessionState::new(11);
        state.combo = 2;
        state.hazard.active = true;
        state.hazard.kind = HazardKind::Car;
        state.hazard.approach = 0.5;
        state.hazard.dodge_queued = true;
        let score_before = state.score;

        while !state.hazard.was_dodged {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.hazard.approach > DODGE_WINDOW);
        assert!(state.hazard.active, "dodged hazard keeps approaching");
        assert_eq!(state.combo, 3);
        // 10 + (2+1)*5 on top of the distance score trickle
        let earned = state.score - score_before - state.distance * SCORE_PER_UNIT;
        assert!((earned - 25.0).abs() < 0.1, "earned {earned}");
        assert!(state.is_dodging);

        // It eventually reaches the boss band and is absorbed
        state.hazard.next_interval = f32::MAX;
        run(&mut state, 3.0);
        assert!(!state.hazard.active);
        assert_eq!(state.boss.hits_landed, 1);
    }

    // Scenario C is covered in sim::boss; Scenario D below.
    #[test]
    fn test_caught_then_game_over_reports_once() {
        let mut state = SessionState::new(11);
        state.lives = 1.1;
        state.hazard.active = true;
        state.hazard.approach = 0.99;

        run(&mut state, 0.1);
        assert_eq!(state.phase, GamePhase::CaughtAnimation);
        assert!((state.lives - 0.1).abs() < 1e-5);

        let mut game_overs = 0;
        let input = TickInput::default();
        for _ in 0..400 {
            tick(&mut state, &input, DT);
            for event in state.take_events() {
                if matches!(event, SessionEvent::GameOver { .. }) {
                    game_overs += 1;
                }
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(game_overs, 1);
    }

    // Scenario E: speed ramp, including several thresholds in one delta
    #[test]
    fn test_speed_ramps_once_per_threshold() {
        let mut state = SessionState::new(11);
        state.hazard.next_interval = f32::MAX;
        state.projectile.next_interval = f32::MAX;

        // One huge delta crossing two thresholds: distance 0 -> 110
        tick(&mut state, &TickInput::default(), 110.0 / START_SPEED);
        assert!((state.distance - 110.0).abs() < 0.5);
        assert!(
            (state.speed - (START_SPEED + 2.0 * SPEED_RAMP_STEP)).abs() < 1e-4,
            "speed {}",
            state.speed
        );

        // The cap holds no matter how far the run goes
        state.distance = 10_000.0;
        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.speed, MAX_SPEED);
    }

    #[test]
    fn test_score_grows_with_distance() {
        let mut state = SessionState::new(11);
        state.hazard.next_interval = f32::MAX;
        state.projectile.next_interval = f32::MAX;
        run(&mut state, 2.0);
        assert!((state.score - state.distance * SCORE_PER_UNIT).abs() < 1.0);
    }

    #[test]
    fn test_single_input_queues_both_active_tracks() {
        let mut state = SessionState::new(11);
        state.hazard.active = true;
        state.hazard.approach = 0.2;
        state.projectile.active = true;
        state.projectile.approach = 0.2;
        state.projectile.launch_distance = 16.0;

        let input = TickInput {
            dodge: true,
            pointer: Some(Vec2::new(0.1, 0.9)),
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        assert!(state.hazard.dodge_queued);
        assert!(state.projectile.duck_queued);
        let cut_in = state.cut_in.as_ref().expect("one acknowledgment");
        assert_eq!(cut_in.pos.x, 0.2);
        assert_eq!(cut_in.pos.y, 0.8);
    }

    #[test]
    fn test_reaction_without_active_track_is_ignored() {
        let mut state = SessionState::new(11);
        let input = TickInput {
            duck: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.cut_in.is_none());
        assert!(!state.hazard.dodge_queued);
        assert!(!state.projectile.duck_queued);
    }

    // Open-question behavior, preserved: both tracks may be active at once
    // and resolve independently.
    #[test]
    fn test_concurrent_tracks_tick_independently() {
        let mut state = SessionState::new(11);
        state.hazard.active = true;
        state.hazard.approach = 0.3;
        state.hazard.dodge_queued = true;
        state.projectile.active = true;
        state.projectile.approach = 0.3;
        state.projectile.duck_queued = true;
        state.projectile.launch_distance = 16.0;

        run(&mut state, 2.0);

        // Both resolved without damage: dodge scored, duck scored,
        // hazard absorbed, projectile despawned at impact.
        assert!(!state.is_player_hit);
        assert!((state.lives - MAX_LIVES).abs() < 1e-4);
        assert_eq!(state.combo, 1);
        assert!(!state.hazard.active);
        assert!(!state.projectile.active);
        assert_eq!(state.boss.hits_landed, 1);
    }

    #[test]
    fn test_determinism_under_fixed_seed() {
        let mut a = SessionState::new(777);
        let mut b = SessionState::new(777);
        let input = TickInput::default();
        for _ in 0..2000 {
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.distance, b.distance);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.hazard.active, b.hazard.active);
        assert_eq!(a.hazard.kind, b.hazard.kind);
        assert_eq!(a.projectile.active, b.projectile.active);
    }

    mod invariants {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // For all seeds and frame-time jitter, the core invariants hold
            // on every tick of a long unattended session.
            #[test]
            fn lives_combo_and_hits_stay_in_range(
                seed in any::<u64>(),
                deltas in prop::collection::vec(0.001f32..0.25, 200..600),
                react_every in 2usize..20,
            ) {
                let mut state = SessionState::new(seed);
                for (i, dt) in deltas.into_iter().enumerate() {
                    let input = TickInput {
                        dodge: i % react_every == 0,
                        ..Default::default()
                    };
                    tick(&mut state, &input, dt);

                    prop_assert!(state.lives >= 0.0 && state.lives <= MAX_LIVES + 1e-4);
                    prop_assert!(state.boss.hits_landed <= BOSS_DEFEAT_HITS);
                    prop_assert!(state.speed <= MAX_SPEED + 1e-4);
                    prop_assert!(state.hazard.approach <= HAZARD_OVERSHOOT + 1.0);
                }
            }
        }
    }
}
