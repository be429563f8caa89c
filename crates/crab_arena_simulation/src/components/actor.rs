//! Базовые компоненты бойцов: Combatant, Health, Facing

use std::f32::consts::TAU;

use bevy::prelude::*;

/// Combatant (player crab или AI crab), базовый компонент
///
/// Автоматически добавляет позицию, здоровье, боевой state machine и pose
/// через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Health,
    Facing,
    crate::components::ArenaPosition,
    crate::combat::CombatAction,
    crate::combat::PendingAction,
    crate::combat::ClawPose,
    Transform
)]
pub struct Combatant;

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100) // Default 100 HP
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Subtract damage (saturating at 0), returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }

    /// Back to full (respawn / match start).
    pub fn restore(&mut self) {
        self.current = self.max;
    }

    /// `current / max`, 0.0 when max is 0.
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Health bar value for the HUD (0–100).
    pub fn percent(&self) -> f32 {
        self.fraction() * 100.0
    }
}

/// Yaw on the arena plane (radians), always kept in `[0, 2π)`.
///
/// 0 смотрит вдоль +Z; угол считается как `atan2(dx, dz)`.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Facing(f32);

impl Facing {
    pub fn new(angle: f32) -> Self {
        Self(normalize_angle(angle))
    }

    /// Facing that looks along `direction` (x, z). Zero vector → None.
    pub fn towards(direction: Vec2) -> Option<Self> {
        if direction.length_squared() <= f32::EPSILON {
            return None;
        }
        Some(Self::new(direction.x.atan2(direction.y)))
    }

    pub fn angle(&self) -> f32 {
        self.0
    }

    /// Unit forward vector (x, z).
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.0.sin(), self.0.cos())
    }

    /// Unit right vector (x, z), perpendicular to [`Facing::forward`].
    pub fn right(&self) -> Vec2 {
        Vec2::new(-self.0.cos(), self.0.sin())
    }
}

/// Wrap any angle into `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid может вернуть ровно TAU из-за округления
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
