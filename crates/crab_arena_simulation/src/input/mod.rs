//! Player input state
//!
//! # Архитектура
//! - Host (браузер / нативное окно) переводит сырые key/pointer события в `HostInput`
//!   и вызывает `InputState::apply` между тиками
//! - Encounter loop в начале тика копирует level-состояние в `PlayerControls`
//!   и забирает edge-triggered запросы в `PendingAction`
//!
//! Last write wins: host и симуляция работают в одном потоке.

use bevy::prelude::*;

use crate::combat::{ActionRequest, CombatAction, PendingAction};
use crate::components::{Facing, Player, PlayerControls};

/// Keyboard controls the core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKey {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Dodge,
}

impl ControlKey {
    /// Map a DOM-style key name ("w", "A", " ") to a control, case-insensitive.
    pub fn from_key_name(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" => Some(ControlKey::Forward),
            "s" => Some(ControlKey::Backward),
            "a" => Some(ControlKey::StrafeLeft),
            "d" => Some(ControlKey::StrafeRight),
            " " | "space" => Some(ControlKey::Dodge),
            _ => None,
        }
    }
}

/// Pointer buttons: primary = basic attack, secondary = heavy attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Raw input event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostInput {
    KeyDown(ControlKey),
    KeyUp(ControlKey),
    /// Pointer ray ∩ ground plane, world (x, z)
    PointerMoved(Vec2),
    ButtonDown(PointerButton),
}

/// Latest raw control state.
///
/// Movement keys are level-triggered. Attack/dodge flags are edge-triggered:
/// set on press, cleared when the loop pulls them.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub move_forward: bool,
    pub move_backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub pointer_world_target: Vec2,

    pub basic_attack_requested: bool,
    pub heavy_attack_requested: bool,
    pub dodge_requested: bool,

    /// Dodge key currently down (auto-repeat keydown не даёт новый edge)
    dodge_held: bool,
}

impl InputState {
    pub fn apply(&mut self, input: HostInput) {
        match input {
            HostInput::KeyDown(key) => self.set_key(key, true),
            HostInput::KeyUp(key) => self.set_key(key, false),
            HostInput::PointerMoved(target) => self.pointer_world_target = target,
            HostInput::ButtonDown(PointerButton::Primary) => self.basic_attack_requested = true,
            HostInput::ButtonDown(PointerButton::Secondary) => self.heavy_attack_requested = true,
        }
    }

    fn set_key(&mut self, key: ControlKey, down: bool) {
        match key {
            ControlKey::Forward => self.move_forward = down,
            ControlKey::Backward => self.move_backward = down,
            ControlKey::StrafeLeft => self.strafe_left = down,
            ControlKey::StrafeRight => self.strafe_right = down,
            ControlKey::Dodge => {
                if down && !self.dodge_held {
                    self.dodge_requested = true;
                }
                self.dodge_held = down;
            }
        }
    }

    /// Level-triggered snapshot for the movement integrator.
    pub fn controls(&self) -> PlayerControls {
        PlayerControls {
            forward: self.move_forward,
            backward: self.move_backward,
            strafe_left: self.strafe_left,
            strafe_right: self.strafe_right,
            pointer_target: self.pointer_world_target,
        }
    }

    /// Consume all edge-triggered flags, returning the first eligible request.
    ///
    /// Priority: dodge > heavy > basic. A request `action` would reject on the
    /// next tick (ability still cooling down) is skipped in favour of the next
    /// one. Dodge direction = held movement keys relative to `facing`, or
    /// `facing` itself when nothing is held.
    pub fn take_action_request(&mut self, facing: Facing, action: &CombatAction) -> Option<ActionRequest> {
        let dodge = std::mem::take(&mut self.dodge_requested);
        let heavy = std::mem::take(&mut self.heavy_attack_requested);
        let basic = std::mem::take(&mut self.basic_attack_requested);

        let mut requests = Vec::with_capacity(3);
        if dodge {
            let held = crate::movement::held_direction(&self.controls(), facing);
            let direction = if held == Vec2::ZERO { facing.forward() } else { held };
            requests.push(ActionRequest::Dodge { direction });
        }
        if heavy {
            requests.push(ActionRequest::HeavyAttack);
        }
        if basic {
            requests.push(ActionRequest::BasicAttack);
        }

        requests
            .into_iter()
            .find(|request| action.accepts(request.ability()))
    }
}

/// System: pull `InputState` into the player's components (step 1 of the tick).
///
/// Runs in every phase; requests pulled in Lobby are cleared by `start_match`.
pub fn pull_player_input(
    mut input: ResMut<InputState>,
    mut players: Query<(&mut PlayerControls, &mut PendingAction, &Facing, &CombatAction), With<Player>>,
) {
    let controls = input.controls();
    let mut request = None;
    if input.basic_attack_requested || input.heavy_attack_requested || input.dodge_requested {
        let default_action = CombatAction::default();
        let (facing, action) = match players.iter().next() {
            Some((_, _, facing, action)) => (*facing, action),
            None => (Facing::default(), &default_action),
        };
        request = input.take_action_request(facing, action);
    }

    for (mut player_controls, mut pending, _, _) in players.iter_mut() {
        if *player_controls != controls {
            *player_controls = controls;
        }
        if let Some(request) = request {
            pending.set(request);
        }
    }
}
