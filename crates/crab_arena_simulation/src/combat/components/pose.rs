//! Claw pose driven by the action state machine (cosmetic).

use std::f32::consts::PI;

use bevy::prelude::*;

use super::action::{ActionState, CombatAction};
use crate::config::CombatTuning;

/// Peak claw rotation of a basic swing (radians).
const BASIC_SWING: f32 = 0.8;
/// Claw raised back during heavy wind-up (radians).
const HEAVY_WINDUP: f32 = -0.6;
/// Claw fully extended at the end of the heavy strike (radians).
const HEAVY_STRIKE: f32 = 1.2;

/// Heavy attack phase boundaries (fraction of duration).
const WINDUP_END: f32 = 0.3;
const STRIKE_END: f32 = 0.6;

/// Claw rotations for the rendering layer. Neutral = both 0.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ClawPose {
    pub left: f32,
    pub right: f32,
}

/// Heavy attack animation phases (wind-up → strike → recovery).
///
/// Boundary ticks belong to the later phase: progress 0.3 is already Strike,
/// 0.6 is already Recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeavyPhase {
    WindUp,
    Strike,
    Recovery,
}

impl HeavyPhase {
    pub fn at(progress: f32) -> Self {
        if progress < WINDUP_END {
            HeavyPhase::WindUp
        } else if progress < STRIKE_END {
            HeavyPhase::Strike
        } else {
            HeavyPhase::Recovery
        }
    }
}

impl ClawPose {
    pub const NEUTRAL: ClawPose = ClawPose { left: 0.0, right: 0.0 };

    /// Pose for the current action and its progress.
    pub fn for_action(action: &CombatAction, tuning: &CombatTuning) -> Self {
        let progress = action.progress(tuning);

        match action.state {
            ActionState::Idle | ActionState::Dodging => Self::NEUTRAL,
            ActionState::BasicAttack => {
                let swing = (progress * PI).sin() * BASIC_SWING;
                Self {
                    left: swing * 0.5,
                    right: swing,
                }
            }
            ActionState::HeavyAttack => {
                let angle = match HeavyPhase::at(progress) {
                    HeavyPhase::WindUp => HEAVY_WINDUP * (progress / WINDUP_END),
                    HeavyPhase::Strike => {
                        let t = (progress - WINDUP_END) / (STRIKE_END - WINDUP_END);
                        HEAVY_WINDUP + (HEAVY_STRIKE - HEAVY_WINDUP) * t
                    }
                    HeavyPhase::Recovery => {
                        let t = (progress - STRIKE_END) / (1.0 - STRIKE_END);
                        HEAVY_STRIKE * (1.0 - t)
                    }
                };
                Self {
                    left: angle,
                    right: angle,
                }
            }
        }
    }
}
