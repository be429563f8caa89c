//! Player control components
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI).

use bevy::prelude::*;

/// Marker component для player-controlled crab
///
/// # Архитектурная заметка
/// - AI systems используют `Without<Player>` filter
/// - Input/movement systems используют `With<Player>` filter
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(PlayerMotion, PlayerControls)]
pub struct Player;

/// Scalar ground speed, ramps up while thrusting and bleeds off otherwise.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerMotion {
    pub current_speed: f32,
}

/// Level-triggered controls pulled from `InputState` at the start of the tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerControls {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Pointer ray ∩ ground plane (x, z)
    pub pointer_target: Vec2,
}

impl PlayerControls {
    /// Forward/backward held, the only keys that build up speed.
    pub fn is_thrusting(&self) -> bool {
        self.forward || self.backward
    }
}
