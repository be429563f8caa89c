//! Combat events (resolver → encounter loop → presentation).

use bevy::prelude::*;

use super::components::AttackKind;

/// Peak-of-swing pulse: raised exactly once per attack, at half duration.
///
/// Resolver не считает урон сам, только сообщает "удар в этом тике".
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitCheck {
    pub attacker: Entity,
    pub kind: AttackKind,
}

/// Damage was applied to a defender.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub kind: AttackKind,
    /// Health actually removed (after clamping at 0)
    pub damage: u32,
    pub remaining_health: u32,
}

/// Defender's health reached 0.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CombatantDefeated {
    pub entity: Entity,
    pub by: Entity,
}

/// Transient hit effect request (particles live in the rendering layer).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HitEffect {
    pub position: Vec3,
}
