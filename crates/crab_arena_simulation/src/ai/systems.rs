//! AI systems: policy evaluation → facing → steering → attack request.

use bevy::prelude::*;

use crate::ai::decide;
use crate::combat::{ActionRequest, CombatAction, PendingAction};
use crate::components::{AiBehavior, AiOpponent, ArenaBounds, ArenaPosition, Facing, Health, Player};
use crate::config::SimulationConfig;
use crate::movement::steer;
use crate::DeterministicRng;

/// System: one AI decision per tick (step 4 of the loop).
///
/// Mid-attack AI стоит на месте и не пересматривает решение: поворот,
/// движение и новые запросы ждут возврата в Idle.
pub fn ai_decide_and_steer(
    mut opponents: Query<
        (
            &mut ArenaPosition,
            &mut Facing,
            &mut AiBehavior,
            &mut PendingAction,
            &Health,
            &CombatAction,
        ),
        (With<AiOpponent>, Without<Player>),
    >,
    players: Query<&ArenaPosition, (With<Player>, Without<AiOpponent>)>,
    mut rng: ResMut<DeterministicRng>,
    config: Res<SimulationConfig>,
    bounds: Res<ArenaBounds>,
) {
    let Some(player_position) = players.iter().next().copied() else {
        return;
    };
    let tuning = &config.ai;

    for (mut position, mut facing, mut behavior, mut pending, health, action) in opponents.iter_mut() {
        if action.is_busy() {
            continue;
        }

        let to_player = player_position.0 - position.0;
        let distance = to_player.length();
        let decision = decide(health.fraction(), distance, tuning);

        if behavior.mode != decision.mode {
            crate::logger::log(&format!(
                "🦀 AI {:?} → {:?} (distance {:.2})",
                behavior.mode, decision.mode, distance
            ));
        }
        behavior.mode = decision.mode;
        behavior.distance_to_player = distance;

        // Совпали с игроком: направление не определено, держим текущий facing
        if let Some(towards_player) = Facing::towards(to_player) {
            *facing = towards_player;
        }
        let unit = to_player.try_normalize().unwrap_or_else(|| facing.forward());

        let direction = decision.mode.steering(unit);
        let next = steer(position.0, direction, decision.speed(tuning), &bounds);
        if next != position.0 {
            position.0 = next;
        }

        if decision.attack.roll(&mut rng.rng) {
            pending.set(ActionRequest::BasicAttack);
            crate::logger::log(&format!("🦀 AI attacks ({:?}, distance {:.2})", decision.mode, distance));
        }
    }
}
