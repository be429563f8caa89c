//! AI decision policy: pure function of (health fraction, distance).
//!
//! | health     | distance  | mode              | speed |
//! |------------|-----------|-------------------|-------|
//! | > 0.5      | > 0.1     | Aggress           | 1.0   |
//! | ≤ 0.5      | < 4       | Retreat           | 0.7   |
//! | ≤ 0.5      | [4, 7)    | Circle            | 0.8   |
//! | ≤ 0.5      | ≥ 7       | CautiousApproach  | 0.5   |
//!
//! Никакого состояния: одинаковый вход → одинаковое решение.

use bevy::prelude::*;
use rand::Rng;

use crate::config::AiTuning;

/// Movement mode chosen by the policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum AiMode {
    /// Straight at the player
    Aggress,
    /// Straight away from the player (still facing them)
    Retreat,
    /// Perpendicular to the player direction
    Circle,
    /// Straight at the player, slowly
    CautiousApproach,
}

impl AiMode {
    /// Steering direction for a unit to-player vector.
    pub fn steering(self, to_player: Vec2) -> Vec2 {
        match self {
            AiMode::Aggress | AiMode::CautiousApproach => to_player,
            AiMode::Retreat => -to_player,
            AiMode::Circle => to_player.perp(),
        }
    }
}

/// Attack initiation rule for this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackIntent {
    Hold,
    /// Attack unconditionally
    Strike,
    /// Independent per-tick Bernoulli draw
    Gamble { chance: f32 },
}

impl AttackIntent {
    /// Resolve the intent; only `Gamble` consumes randomness.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        match self {
            AttackIntent::Hold => false,
            AttackIntent::Strike => true,
            AttackIntent::Gamble { chance } => rng.gen_bool(f64::from(chance.clamp(0.0, 1.0))),
        }
    }
}

/// Policy output for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AiDecision {
    pub mode: AiMode,
    /// Multiplier on `AiTuning::speed` (0 = hold position)
    pub speed_factor: f32,
    pub attack: AttackIntent,
}

impl AiDecision {
    pub fn speed(&self, tuning: &AiTuning) -> f32 {
        tuning.speed * self.speed_factor
    }
}

/// Decide movement mode and attack intent.
///
/// Defensive attack rule: at low health the AI may lunge when the player is
/// inside `defensive_attack_distance`, whatever its movement mode.
pub fn decide(health_fraction: f32, distance: f32, tuning: &AiTuning) -> AiDecision {
    if health_fraction > tuning.low_health_threshold {
        let speed_factor = if distance > tuning.min_chase_distance {
            tuning.aggress_speed_factor
        } else {
            0.0
        };
        let attack = if distance < tuning.aggress_attack_distance {
            AttackIntent::Strike
        } else {
            AttackIntent::Hold
        };

        return AiDecision {
            mode: AiMode::Aggress,
            speed_factor,
            attack,
        };
    }

    let (mode, speed_factor) = if distance < tuning.retreat_distance {
        (AiMode::Retreat, tuning.retreat_speed_factor)
    } else if distance < tuning.circle_distance {
        (AiMode::Circle, tuning.circle_speed_factor)
    } else {
        (AiMode::CautiousApproach, tuning.cautious_speed_factor)
    };

    let attack = if distance < tuning.defensive_attack_distance {
        AttackIntent::Gamble {
            chance: tuning.defensive_attack_chance,
        }
    } else {
        AttackIntent::Hold
    };

    AiDecision {
        mode,
        speed_factor,
        attack,
    }
}
