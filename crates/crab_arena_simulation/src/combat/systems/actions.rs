//! Action state machine systems (timers, hit-check pulses, pose).

use bevy::prelude::*;

use crate::combat::{ActionState, ClawPose, CombatAction, HitCheck, PendingAction};
use crate::config::SimulationConfig;

/// System: advance every combatant's action machine by one tick.
///
/// - Consumes `PendingAction` (accepted or dropped, never queued)
/// - Emits `HitCheck` on the peak-of-swing tick
/// - Updates `ClawPose` (neutral again once the state exits)
pub fn advance_combat_actions(
    mut combatants: Query<(Entity, &mut CombatAction, &mut PendingAction, &mut ClawPose)>,
    mut hit_checks: EventWriter<HitCheck>,
    config: Res<SimulationConfig>,
) {
    let tuning = &config.combat;

    for (entity, mut action, mut pending, mut pose) in combatants.iter_mut() {
        let outcome = action.tick(pending.take(), tuning);

        if let Some(state) = outcome.entered {
            crate::logger::log(&format!("⚔️ {:?} → {:?}", entity, state));
        }

        if let Some(kind) = outcome.hit_check {
            hit_checks.write(HitCheck {
                attacker: entity,
                kind,
            });
            crate::logger::log(&format!("💥 Hit check ({:?}) from {:?}", kind, entity));
        }

        if let Some(state) = outcome.finished {
            crate::logger::log(&format!("✅ {:?} finished {:?} → {:?}", entity, state, ActionState::Idle));
        }

        let next_pose = ClawPose::for_action(&action, tuning);
        if *pose != next_pose {
            *pose = next_pose;
        }
    }
}
