//! Encounter loop: tick ordering, match lifecycle, defeat/respawn.
//!
//! Порядок внутри одного тика (FixedUpdate, `.chain()`):
//! 1. Input: применяем start request, тянем InputState (всегда)
//! 2. PlayerMovement ┐
//! 3. AiDecision     │ только пока MatchPhase::Running
//! 4. CombatTimers   │
//! 5. HitResolution  │
//! 6. Respawn        ┘
//! 7. Presentation: Transform sync + UI события (всегда)

use bevy::prelude::*;

pub mod lifecycle;
pub mod respawn;


pub use lifecycle::{apply_match_start, spawn_encounter, start_match};
pub use respawn::{handle_defeats, random_arena_point};

use crate::input::{pull_player_input, InputState};

/// Ordered stages of one encounter tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncounterSet {
    Input,
    PlayerMovement,
    AiDecision,
    CombatTimers,
    HitResolution,
    Respawn,
    Presentation,
}

/// Match phase (host-facing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum MatchPhase {
    /// Combatants exist, simulation paused until the host requests a start
    #[default]
    Lobby,
    Running,
    /// Player defeated; a new start request resets everything
    Over,
}

/// Match lifecycle resource.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct MatchState {
    pub phase: MatchPhase,
    start_requested: bool,
}

impl MatchState {
    /// Host entry point: start (or restart) at the beginning of the next tick.
    pub fn request_start(&mut self) {
        self.start_requested = true;
    }

    pub fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    pub fn take_start_request(&mut self) -> bool {
        std::mem::take(&mut self.start_requested)
    }
}

/// Encounter statistics.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncounterStats {
    /// AI defeats since match start
    pub defeat_count: u32,
}

/// Entity handles of the two combatants.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combatants {
    pub player: Entity,
    pub opponent: Entity,
}

/// Defeat counter changed (respawn or match reset).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefeatCountChanged {
    pub count: u32,
}

/// Run condition for the simulation sets.
pub fn match_running(state: Res<MatchState>) -> bool {
    state.is_running()
}

/// Encounter Plugin
///
/// Регистрирует порядок `EncounterSet`, lifecycle ресурсы и системы
/// Input/Respawn стадий. Остальные стадии заполняют свои плагины.
pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<MatchState>()
            .init_resource::<EncounterStats>()
            .add_event::<DefeatCountChanged>();

        app.configure_sets(
            FixedUpdate,
            (
                EncounterSet::Input,
                EncounterSet::PlayerMovement.run_if(match_running),
                EncounterSet::AiDecision.run_if(match_running),
                EncounterSet::CombatTimers.run_if(match_running),
                EncounterSet::HitResolution.run_if(match_running),
                EncounterSet::Respawn.run_if(match_running),
                EncounterSet::Presentation,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                (apply_match_start, pull_player_input)
                    .chain()
                    .in_set(EncounterSet::Input),
                handle_defeats.in_set(EncounterSet::Respawn),
            ),
        );
    }
}
