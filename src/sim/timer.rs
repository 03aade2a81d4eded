//! Deferred-event scheduler
//!
//! Everything the original game did with wall-clock timeouts is a scheduled
//! event here: an action plus a fire time on the session clock, processed at
//! the top of each tick on the same single thread. Each entry captures the
//! session generation at scheduling time, so an event queued by a session
//! that has since been reset dies silently; effect handlers additionally
//! check that the state they target has not moved on.

use super::boss;
use super::events::SessionEvent;
use super::projectile;
use super::state::{GamePhase, SessionState};

/// What a scheduled event does when it comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    ClearPlayerHit,
    ClearBossHit,
    ClearDodgeAnim,
    /// Clears the cut-in only if it is still the same one
    ClearCutIn { id: u32 },
    /// End of the throw wind-up
    LaunchProjectile,
    /// End of the post-defeat pause
    AdvanceBossStage,
    /// End of the caught cinematic
    FinishCaughtAnimation,
}

#[derive(Debug, Clone, Copy)]
pub struct Scheduled {
    pub fire_at: f64,
    pub generation: u32,
    pub action: TimerAction,
}

pub(crate) fn schedule(state: &mut SessionState, delay: f64, action: TimerAction) {
    let entry = Scheduled {
        fire_at: state.clock + delay,
        generation: state.generation,
        action,
    };
    state.timers.push(entry);
}

/// Fire every due event, in insertion order for equal fire times.
/// Handlers may schedule follow-up events; those are strictly in the future
/// and wait for a later tick.
pub(crate) fn run_due(state: &mut SessionState) {
    let now = state.clock;
    let mut i = 0;
    while i < state.timers.len() {
        if state.timers[i].fire_at <= now {
            let entry = state.timers.remove(i);
            if entry.generation == state.generation {
                apply(state, entry.action);
            }
        } else {
            i += 1;
        }
    }
}

fn apply(state: &mut SessionState, action: TimerAction) {
    match action {
        TimerAction::ClearPlayerHit => state.is_player_hit = false,
        TimerAction::ClearBossHit => state.is_boss_hit = false,
        TimerAction::ClearDodgeAnim => state.is_dodging = false,
        TimerAction::ClearCutIn { id } => {
            if state.cut_in.as_ref().is_some_and(|c| c.id == id) {
                state.cut_in = None;
            }
        }
        TimerAction::LaunchProjectile => projectile::launch(state),
        TimerAction::AdvanceBossStage => boss::advance_stage(state),
        TimerAction::FinishCaughtAnimation => {
            if state.phase == GamePhase::CaughtAnimation {
                state.phase = GamePhase::GameOver;
                let score = state.score as u32;
                state.push_event(SessionEvent::GameOver { score });
                log::info!("game over, final score {score}");
            }
        }
    }
}
