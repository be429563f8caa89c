//! AI компоненты: marker + последнее решение (для debug/UI)

use bevy::prelude::*;

use crate::ai::AiMode;

/// Marker для AI-controlled crab.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(AiBehavior)]
pub struct AiOpponent;

/// Last policy output, written every tick the AI is free to decide.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AiBehavior {
    pub mode: AiMode,
    pub distance_to_player: f32,
}

impl Default for AiBehavior {
    fn default() -> Self {
        Self {
            mode: AiMode::Aggress,
            distance_to_player: 0.0,
        }
    }
}
