//! Presentation sync (последняя стадия тика, read-only для симуляции)
//!
//! Rendering/UI layer (вне crate) читает:
//! - `Transform` бойцов (y = GROUND_OFFSET, yaw = Facing)
//! - `ClawPose` для анимации клешней
//! - события `HealthChanged`, `DefeatCountChanged`, `HitEffect`, `HudRefresh`

use bevy::prelude::*;

use crate::components::{ArenaPosition, Combatant, Facing, Health};
use crate::encounter::{Combatants, EncounterSet, EncounterStats};

/// Health bar update for one combatant.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    /// 0–100
    pub percent: f32,
}

/// Per-tick UI refresh request.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HudRefresh {
    pub player_health_percent: f32,
    pub opponent_health_percent: f32,
    pub defeat_count: u32,
}

/// Visual transform for an arena pose.
pub fn visual_transform(position: &ArenaPosition, facing: &Facing) -> Transform {
    Transform::from_translation(position.to_world_position()).with_rotation(Quat::from_rotation_y(facing.angle()))
}

/// System: mirror `ArenaPosition` + `Facing` into `Transform`.
pub fn sync_visual_transforms(
    mut combatants: Query<
        (&ArenaPosition, &Facing, &mut Transform),
        (With<Combatant>, Or<(Changed<ArenaPosition>, Changed<Facing>)>),
    >,
) {
    for (position, facing, mut transform) in combatants.iter_mut() {
        *transform = visual_transform(position, facing);
    }
}

/// System: `HealthChanged` for every health that changed since last run.
pub fn emit_health_changes(
    changed: Query<(Entity, &Health), (With<Combatant>, Changed<Health>)>,
    mut health_events: EventWriter<HealthChanged>,
) {
    for (entity, health) in changed.iter() {
        health_events.write(HealthChanged {
            entity,
            percent: health.percent(),
        });
    }
}

/// System: request a HUD refresh with current values (step 8 of the loop).
pub fn request_hud_refresh(
    combatants: Option<Res<Combatants>>,
    healths: Query<&Health>,
    stats: Res<EncounterStats>,
    mut hud_events: EventWriter<HudRefresh>,
) {
    let Some(combatants) = combatants else {
        return;
    };
    let percent = |entity| healths.get(entity).map(Health::percent).unwrap_or(0.0);

    hud_events.write(HudRefresh {
        player_health_percent: percent(combatants.player),
        opponent_health_percent: percent(combatants.opponent),
        defeat_count: stats.defeat_count,
    });
}

/// Presentation Plugin
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HealthChanged>().add_event::<HudRefresh>();

        app.add_systems(
            FixedUpdate,
            (sync_visual_transforms, emit_health_changes, request_hud_refresh)
                .chain()
                .in_set(EncounterSet::Presentation),
        );
    }
}
