//! Boss progression state machine
//!
//! Absorbed hazards accumulate as hits; ten hits defeat the current stage.
//! A defeated boss either levels up (faster throws) or, past level 2, hands
//! the chase to the next species in the rotation.

use super::events::SessionEvent;
use super::state::SessionState;
use super::timer::{self, TimerAction};
use crate::consts::*;

/// Record one absorbed hazard against the boss
pub(crate) fn register_hit(state: &mut SessionState) {
    state.is_boss_hit = true;
    timer::schedule(state, BOSS_HIT_FLASH_DURATION, TimerAction::ClearBossHit);

    state.boss.hits_landed = (state.boss.hits_landed + 1).min(BOSS_DEFEAT_HITS);
    state.push_event(SessionEvent::BossHit {
        hits_landed: state.boss.hits_landed,
    });

    if state.boss.hits_landed >= BOSS_DEFEAT_HITS && !state.boss.defeated {
        defeat(state);
    }
}

fn defeat(state: &mut SessionState) {
    state.boss.defeated = true;
    state.score += BOSS_DEFEAT_BONUS;

    // No dangling reactions against a defeated boss: both tracks drop,
    // including a throw still winding up.
    state.hazard.clear();
    state.projectile.clear();

    state.push_event(SessionEvent::BossDefeated {
        kind: state.boss.kind,
        level: state.boss.level,
    });
    timer::schedule(state, BOSS_RESPAWN_DELAY, TimerAction::AdvanceBossStage);

    log::info!(
        "boss defeated: {:?} level {}",
        state.boss.kind,
        state.boss.level
    );
}

/// End of the post-defeat pause; the session may have been reset meanwhile,
/// in which case `defeated` is already false and nothing happens.
pub(crate) fn advance_stage(state: &mut SessionState) {
    if !state.boss.defeated {
        return;
    }

    if state.boss.level >= 2 {
        state.boss.kind = state.boss.kind.next();
        state.boss.level = 1;
    } else {
        state.boss.level += 1;
    }
    state.boss.hits_landed = 0;
    state.boss.defeated = false;

    // Fresh timing window for the new stage
    state.hazard.idle_time = 0.0;
    state.projectile.idle_time = 0.0;

    state.push_event(SessionEvent::BossStageStarted {
        kind: state.boss.kind,
        level: state.boss.level,
    });
    log::info!(
        "boss stage start: {:?} level {}",
        state.boss.kind,
        state.boss.level
    );
}
