//! Hit resolution: hit-check pulse → distance test → damage.

use bevy::prelude::*;

use crate::combat::{AttackKind, CombatantDefeated, DamageDealt, HitCheck, HitEffect};
use crate::components::{ArenaPosition, Combatant, Health};
use crate::config::CombatTuning;

/// Damage a hit check deals at this planar distance, None when out of reach.
///
/// Reach is inclusive: a defender exactly at the radius is hit.
pub fn contact_damage(
    kind: AttackKind,
    attacker: &ArenaPosition,
    defender: &ArenaPosition,
    tuning: &CombatTuning,
) -> Option<u32> {
    let distance = attacker.planar_distance(defender);
    (distance <= kind.hit_radius(tuning)).then(|| kind.damage(tuning))
}

/// System: resolve `HitCheck` pulses into damage.
///
/// Для каждого pulse: все живые противники в радиусе получают урон
/// (в арене это ровно один defender). Health клампится в 0.
pub fn resolve_hit_checks(
    mut hit_checks: EventReader<HitCheck>,
    mut combatants: Query<(Entity, &ArenaPosition, &mut Health), With<Combatant>>,
    config: Res<crate::config::SimulationConfig>,
    mut damage_events: EventWriter<DamageDealt>,
    mut hit_effects: EventWriter<HitEffect>,
    mut defeated_events: EventWriter<CombatantDefeated>,
) {
    let tuning = &config.combat;

    for check in hit_checks.read() {
        let Ok((_, attacker_pos, attacker_health)) = combatants.get(check.attacker) else {
            crate::logger::log_warning(&format!(
                "Hit check from unknown attacker {:?}, skipped",
                check.attacker
            ));
            continue;
        };
        if !attacker_health.is_alive() {
            continue;
        }
        let attacker_pos = *attacker_pos;

        let targets: Vec<(Entity, ArenaPosition, u32)> = combatants
            .iter()
            .filter(|(entity, _, health)| *entity != check.attacker && health.is_alive())
            .filter_map(|(entity, pos, _)| {
                contact_damage(check.kind, &attacker_pos, pos, tuning).map(|damage| (entity, *pos, damage))
            })
            .collect();

        if targets.is_empty() {
            crate::logger::log(&format!("💨 {:?} swing missed ({:?})", check.attacker, check.kind));
            continue;
        }

        for (target, target_pos, damage) in targets {
            let Ok((_, _, mut health)) = combatants.get_mut(target) else {
                continue;
            };

            let applied = health.take_damage(damage);
            damage_events.write(DamageDealt {
                attacker: check.attacker,
                target,
                kind: check.kind,
                damage: applied,
                remaining_health: health.current,
            });
            hit_effects.write(HitEffect {
                position: target_pos.to_world_position(),
            });

            crate::logger::log(&format!(
                "🩸 {:?} hit {:?} ({:?}) for {} (HP: {}/{})",
                check.attacker, target, check.kind, applied, health.current, health.max
            ));

            if !health.is_alive() {
                defeated_events.write(CombatantDefeated {
                    entity: target,
                    by: check.attacker,
                });
                crate::logger::log_info(&format!("☠️ {:?} defeated by {:?}", target, check.attacker));
            }
        }
    }
}
