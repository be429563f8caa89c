//! Match lifecycle: spawning the pair, starting and restarting a match.

use bevy::prelude::*;

use crate::combat::{ClawPose, CombatAction, PendingAction};
use crate::components::{AiBehavior, AiOpponent, ArenaPosition, Combatant, Facing, Health, Player, PlayerMotion};
use crate::config::SimulationConfig;
use crate::encounter::{Combatants, DefeatCountChanged, EncounterStats, MatchPhase, MatchState};

/// Spawn both combatants at their spawn points and register `Combatants`.
pub fn spawn_encounter(world: &mut World) -> Combatants {
    let config = world.get_resource::<SimulationConfig>().cloned().unwrap_or_default();
    let player_spawn = config.spawn.player.to_plane();
    let opponent_spawn = config.spawn.opponent.to_plane();
    let max_health = config.combat.max_health;

    let player = world
        .spawn((
            Name::new("Player Crab"),
            Player,
            Combatant,
            Health::new(max_health),
            ArenaPosition(player_spawn),
        ))
        .id();

    let opponent = world
        .spawn((
            Name::new("AI Crab"),
            AiOpponent,
            Combatant,
            Health::new(max_health),
            ArenaPosition(opponent_spawn),
            Facing::towards(player_spawn - opponent_spawn).unwrap_or_default(),
        ))
        .id();

    let combatants = Combatants { player, opponent };
    world.insert_resource(combatants);

    crate::logger::log_info(&format!(
        "🦀 Spawned player {:?} at {:?}, opponent {:?} at {:?}",
        player, player_spawn, opponent, opponent_spawn
    ));

    combatants
}

/// Start (or restart) the match.
///
/// Оба бойца возвращаются на spawn points: full health, Idle, cooldowns = 0.
/// Stats обнуляются. Если пары ещё нет (или entity пропал), спавним заново.
pub fn start_match(world: &mut World) {
    let config = world.get_resource::<SimulationConfig>().cloned().unwrap_or_default();

    let existing = world
        .get_resource::<Combatants>()
        .copied()
        .filter(|c| world.get_entity(c.player).is_ok() && world.get_entity(c.opponent).is_ok());

    let combatants = match existing {
        Some(combatants) => {
            reset_combatants(world, combatants, &config);
            combatants
        }
        None => spawn_encounter(world),
    };

    if let Some(mut stats) = world.get_resource_mut::<EncounterStats>() {
        *stats = EncounterStats::default();
    }
    world.send_event(DefeatCountChanged { count: 0 });

    if let Some(mut state) = world.get_resource_mut::<MatchState>() {
        state.phase = MatchPhase::Running;
    }

    crate::logger::log_info(&format!(
        "▶️ Match started (player {:?} vs opponent {:?})",
        combatants.player, combatants.opponent
    ));
}

fn reset_combatants(world: &mut World, combatants: Combatants, config: &SimulationConfig) {
    let player_spawn = config.spawn.player.to_plane();
    let opponent_spawn = config.spawn.opponent.to_plane();

    let fresh = || {
        (
            Health::new(config.combat.max_health),
            CombatAction::default(),
            PendingAction::default(),
            ClawPose::NEUTRAL,
        )
    };

    if let Ok(mut player) = world.get_entity_mut(combatants.player) {
        player.insert((
            fresh(),
            ArenaPosition(player_spawn),
            Facing::default(),
            PlayerMotion::default(),
        ));
    }

    if let Ok(mut opponent) = world.get_entity_mut(combatants.opponent) {
        opponent.insert((
            fresh(),
            ArenaPosition(opponent_spawn),
            Facing::towards(player_spawn - opponent_spawn).unwrap_or_default(),
            AiBehavior::default(),
        ));
    }
}

/// Exclusive system: apply a pending start request (first step of the tick).
pub fn apply_match_start(world: &mut World) {
    let requested = world
        .get_resource_mut::<MatchState>()
        .map(|mut state| state.take_start_request())
        .unwrap_or(false);

    if requested {
        start_match(world);
    }
}
