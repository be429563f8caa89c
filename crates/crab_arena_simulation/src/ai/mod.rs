//! AI opponent module
//!
//! Stateless policy: каждый тик решение заново из (health fraction, distance).
//! Режим хранится в `AiBehavior` только для debug/UI.

use bevy::prelude::*;

pub mod policy;
pub mod systems;


// Re-export основных типов
pub use policy::{decide, AiDecision, AiMode, AttackIntent};
pub use systems::ai_decide_and_steer;

use crate::encounter::EncounterSet;

/// AI Plugin
///
/// Одна система в `EncounterSet::AiDecision`: policy → facing → steering →
/// attack request (PendingAction, обрабатывается в CombatTimers того же тика).
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, ai_decide_and_steer.in_set(EncounterSet::AiDecision));
    }
}
