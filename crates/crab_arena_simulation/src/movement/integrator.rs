//! Movement integrator: pointer-facing, speed ramp, dodge impulse, bounds clamp.
//!
//! Pure functions over plain data; systems in `movement::systems` only wire
//! them to components.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use crate::combat::CombatAction;
use crate::components::{ArenaBounds, ArenaPosition, Facing, PlayerControls, PlayerMotion};
use crate::config::{CombatTuning, MovementTuning};

/// Shortest signed angle from `from` to `to`, wrapped into `[-π, π]`.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    let diff = (to - from).rem_euclid(TAU);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Critically-damped turn towards the pointer target.
///
/// Step = `min(cap, |diff| × gain) × sign(diff)`. Pointer inside the deadzone
/// holds the current facing.
pub fn turn_towards(facing: Facing, position: Vec2, target: Vec2, tuning: &MovementTuning) -> Facing {
    let to_target = target - position;
    if to_target.length() <= tuning.pointer_deadzone {
        return facing;
    }

    let target_angle = to_target.x.atan2(to_target.y);
    let diff = angle_difference(facing.angle(), target_angle);
    let step = (diff.abs() * tuning.turn_gain).min(tuning.turn_rate_cap);

    Facing::new(facing.angle() + step.copysign(diff))
}

/// Speed ramp: accelerate while thrusting, otherwise decelerate (floor 0).
pub fn update_speed(current: f32, thrusting: bool, tuning: &MovementTuning) -> f32 {
    if thrusting {
        (current + tuning.acceleration).min(tuning.max_speed)
    } else {
        (current - tuning.deceleration).max(0.0)
    }
}

/// Unit direction of the held movement keys relative to `facing` (ZERO if none).
///
/// Forward/back идут вдоль facing, strafe перпендикулярно. Нормализация,
/// чтобы диагональ не была быстрее.
pub fn held_direction(controls: &PlayerControls, facing: Facing) -> Vec2 {
    let forward = facing.forward();
    let right = facing.right();

    let mut direction = Vec2::ZERO;
    if controls.forward {
        direction += forward;
    }
    if controls.backward {
        direction -= forward;
    }
    if controls.strafe_right {
        direction += right;
    }
    if controls.strafe_left {
        direction -= right;
    }

    direction.normalize_or_zero()
}

/// Advance the player by one tick.
///
/// Order: facing → speed → translation → dodge impulse → bounds clamp (last).
pub fn integrate_player(
    position: &mut ArenaPosition,
    facing: &mut Facing,
    motion: &mut PlayerMotion,
    controls: &PlayerControls,
    action: &CombatAction,
    movement: &MovementTuning,
    combat: &CombatTuning,
    bounds: &ArenaBounds,
) {
    *facing = turn_towards(*facing, position.0, controls.pointer_target, movement);

    motion.current_speed = update_speed(motion.current_speed, controls.is_thrusting(), movement);

    let mut next = position.0 + held_direction(controls, *facing) * motion.current_speed;

    if action.is_dodge_boost_active(combat) {
        next += action.dodge_direction * movement.dodge_speed;
    }

    position.0 = bounds.clamp(next);
}

/// Apply a steering direction at `speed`, then clamp to the arena.
///
/// Направление нормализуется здесь; нулевой вектор = стоим на месте.
pub fn steer(position: Vec2, direction: Vec2, speed: f32, bounds: &ArenaBounds) -> Vec2 {
    bounds.clamp(position + direction.normalize_or_zero() * speed)
}
