//! Arena positioning: ArenaPosition, ArenaBounds

use bevy::prelude::*;

/// Height of a crab body above the arena plane (visual only).
pub const GROUND_OFFSET: f32 = 0.25;

/// Position on the arena plane (x, z), authoritative for the simulation.
///
/// Y не хранится: бойцы всегда стоят на земле (`GROUND_OFFSET`).
/// Bevy `Transform` обновляется из этого компонента в presentation sync.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ArenaPosition(pub Vec2);

impl ArenaPosition {
    pub fn new(x: f32, z: f32) -> Self {
        Self(Vec2::new(x, z))
    }

    pub fn planar_distance(&self, other: &ArenaPosition) -> f32 {
        self.0.distance(other.0)
    }

    /// World-space position for the rendering layer.
    pub fn to_world_position(&self) -> Vec3 {
        Vec3::new(self.0.x, GROUND_OFFSET, self.0.y)
    }
}

/// Square arena bounds. Immutable after setup.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub half_size: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self { half_size: 10.0 }
    }
}

impl ArenaBounds {
    pub fn new(half_size: f32) -> Self {
        Self { half_size }
    }

    /// Largest |x| or |z| a combatant may occupy (one unit margin from the edge).
    pub fn limit(&self) -> f32 {
        (self.half_size - 1.0).max(0.0)
    }

    pub fn clamp(&self, point: Vec2) -> Vec2 {
        let limit = self.limit();
        Vec2::new(point.x.clamp(-limit, limit), point.y.clamp(-limit, limit))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let limit = self.limit();
        point.x.abs() <= limit && point.y.abs() <= limit
    }
}
