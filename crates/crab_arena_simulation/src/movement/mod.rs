//! Movement module (player integration + shared steering/clamp helpers)

use bevy::prelude::*;

pub mod integrator;

pub use integrator::{angle_difference, held_direction, integrate_player, steer, turn_towards, update_speed};

use crate::combat::CombatAction;
use crate::components::{ArenaBounds, ArenaPosition, Facing, Player, PlayerControls, PlayerMotion};
use crate::config::SimulationConfig;
use crate::encounter::EncounterSet;

/// System: integrate player movement for one tick (step 3 of the loop).
pub fn integrate_player_movement(
    mut players: Query<
        (
            &PlayerControls,
            &CombatAction,
            &mut PlayerMotion,
            &mut ArenaPosition,
            &mut Facing,
        ),
        With<Player>,
    >,
    config: Res<SimulationConfig>,
    bounds: Res<ArenaBounds>,
) {
    for (controls, action, mut motion, mut position, mut facing) in players.iter_mut() {
        integrate_player(
            &mut position,
            &mut facing,
            &mut motion,
            controls,
            action,
            &config.movement,
            &config.combat,
            &bounds,
        );
    }
}

/// Movement Plugin
///
/// AI steering применяется в `ai` (направление от policy → `steer`).
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            integrate_player_movement.in_set(EncounterSet::PlayerMovement),
        );
    }
}
