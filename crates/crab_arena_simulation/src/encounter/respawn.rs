//! Defeat handling: AI respawn, player defeat ends the match.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{ClawPose, CombatAction, CombatantDefeated, PendingAction};
use crate::components::{AiOpponent, ArenaBounds, ArenaPosition, Health, Player};
use crate::encounter::{DefeatCountChanged, EncounterStats, MatchPhase, MatchState};
use crate::DeterministicRng;

/// Uniform random point inside the playable square.
pub fn random_arena_point<R: Rng + ?Sized>(rng: &mut R, bounds: &ArenaBounds) -> Vec2 {
    let limit = bounds.limit();
    if !limit.is_finite() || limit <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(rng.gen_range(-limit..=limit), rng.gen_range(-limit..=limit))
}

/// System: react to `CombatantDefeated` (step 7 of the loop).
///
/// - AI: defeat_count += 1, full health, random in-bounds position, Idle
/// - Player: MatchPhase::Over (симуляция останавливается до нового start)
pub fn handle_defeats(
    mut defeated: EventReader<CombatantDefeated>,
    mut opponents: Query<
        (
            &mut Health,
            &mut ArenaPosition,
            &mut CombatAction,
            &mut PendingAction,
            &mut ClawPose,
        ),
        (With<AiOpponent>, Without<Player>),
    >,
    players: Query<(), With<Player>>,
    mut stats: ResMut<EncounterStats>,
    mut match_state: ResMut<MatchState>,
    mut rng: ResMut<DeterministicRng>,
    bounds: Res<ArenaBounds>,
    mut count_events: EventWriter<DefeatCountChanged>,
) {
    for event in defeated.read() {
        if let Ok((mut health, mut position, mut action, mut pending, mut pose)) = opponents.get_mut(event.entity) {
            stats.defeat_count += 1;

            health.restore();
            position.0 = random_arena_point(&mut rng.rng, &bounds);
            action.reset();
            pending.0 = None;
            *pose = ClawPose::NEUTRAL;

            count_events.write(DefeatCountChanged {
                count: stats.defeat_count,
            });
            crate::logger::log_info(&format!(
                "🔄 AI {:?} defeated (total {}), respawned at {:?}",
                event.entity, stats.defeat_count, position.0
            ));
        } else if players.contains(event.entity) {
            match_state.phase = MatchPhase::Over;
            crate::logger::log_info(&format!("🏁 Player {:?} defeated, match over", event.entity));
        } else {
            crate::logger::log_warning(&format!("Defeat of unknown entity {:?} ignored", event.entity));
        }
    }
}
