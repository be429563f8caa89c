//! Combat module (action state machine + hit resolution)
//!
//! ECS ответственность:
//! - Action state: Idle / BasicAttack / HeavyAttack / Dodging (tick counters)
//! - Hit-check pulse в пике замаха (duration / 2)
//! - Distance check + damage, defeat detection
//!
//! Rendering layer ответственность:
//! - Анимация клешней (читает ClawPose)
//! - Particles для HitEffect

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::{CombatantDefeated, DamageDealt, HitCheck, HitEffect};
pub use systems::{advance_combat_actions, contact_damage, resolve_hit_checks};

use crate::encounter::EncounterSet;

/// Combat Plugin
///
/// Порядок выполнения (внутри encounter loop):
/// 1. advance_combat_actions: таймеры, переходы, HitCheck pulses (CombatTimers)
/// 2. resolve_hit_checks: HitCheck → distance → DamageDealt / CombatantDefeated (HitResolution)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HitCheck>()
            .add_event::<DamageDealt>()
            .add_event::<CombatantDefeated>()
            .add_event::<HitEffect>();

        app.add_systems(
            FixedUpdate,
            (
                advance_combat_actions.in_set(EncounterSet::CombatTimers),
                resolve_hit_checks.in_set(EncounterSet::HitResolution),
            ),
        );
    }
}
