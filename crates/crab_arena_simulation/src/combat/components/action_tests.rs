//! Tests for the combat action state machine and claw pose.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::action::*;
    use super::super::pose::{ClawPose, HeavyPhase};
    use crate::config::CombatTuning;

    fn run_idle_ticks(action: &mut CombatAction, tuning: &CombatTuning, ticks: u32) -> Vec<ActionTick> {
        (0..ticks).map(|_| action.tick(None, tuning)).collect()
    }

    #[test]
    fn test_basic_attack_lasts_20_ticks_with_single_hit_at_10() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        let start = action.tick(Some(ActionRequest::BasicAttack), &tuning);
        assert_eq!(start.entered, Some(ActionState::BasicAttack));
        assert_eq!(action.state, ActionState::BasicAttack);
        assert_eq!(action.state_timer, 0);

        let ticks = run_idle_ticks(&mut action, &tuning, 20);

        let hits: Vec<_> = ticks
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.hit_check.map(|kind| (i + 1, kind)))
            .collect();
        assert_eq!(hits, vec![(10, AttackKind::Basic)]);

        // Возврат в Idle ровно на 20-м тике
        assert_eq!(ticks[18].finished, None);
        assert_eq!(ticks[19].finished, Some(ActionState::BasicAttack));
        assert_eq!(action.state, ActionState::Idle);
        assert_eq!(action.state_timer, 0);
    }

    #[test]
    fn test_heavy_attack_hit_at_half_duration() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::HeavyAttack), &tuning);
        let ticks = run_idle_ticks(&mut action, &tuning, 40);

        let hit_ticks: Vec<_> = ticks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.hit_check.is_some())
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(hit_ticks, vec![20]);
        assert_eq!(ticks[39].finished, Some(ActionState::HeavyAttack));
        assert!(!action.is_busy());
    }

    #[test]
    fn test_heavy_request_while_attacking_is_dropped() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::BasicAttack), &tuning);
        action.tick(None, &tuning);

        let outcome = action.tick(Some(ActionRequest::HeavyAttack), &tuning);
        assert_eq!(outcome.entered, None);
        assert_eq!(action.state, ActionState::BasicAttack);
        assert_eq!(action.state_timer, 2);

        // try_begin напрямую тоже отказывает
        assert!(!action.try_begin(ActionRequest::HeavyAttack));
        assert_eq!(action.state, ActionState::BasicAttack);
    }

    #[test]
    fn test_dodge_then_cooldown() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        let dodge = ActionRequest::Dodge { direction: Vec2::new(3.0, 4.0) };
        assert_eq!(action.tick(Some(dodge), &tuning).entered, Some(ActionState::Dodging));
        assert!((action.dodge_direction - Vec2::new(0.6, 0.8)).length() < 1e-5);

        let ticks = run_idle_ticks(&mut action, &tuning, 15);
        assert_eq!(ticks[14].finished, Some(ActionState::Dodging));
        assert!(ticks.iter().all(|t| t.hit_check.is_none()));
        assert_eq!(action.state, ActionState::Idle);
        assert_eq!(action.cooldowns.remaining(Ability::Dodge), 45);

        // Вторая попытка при cooldown > 0 игнорируется
        let outcome = action.tick(Some(dodge), &tuning);
        assert_eq!(outcome.entered, None);
        assert_eq!(action.state, ActionState::Idle);
        assert_eq!(action.cooldowns.remaining(Ability::Dodge), 44);
    }

    #[test]
    fn test_dodge_cooldown_expires() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();
        let dodge = ActionRequest::Dodge { direction: Vec2::X };

        action.tick(Some(dodge), &tuning);
        run_idle_ticks(&mut action, &tuning, 15);
        run_idle_ticks(&mut action, &tuning, 44);
        assert_eq!(action.cooldowns.remaining(Ability::Dodge), 1);

        // На 45-м тике cooldown доходит до 0 и dodge снова доступен
        assert_eq!(action.tick(Some(dodge), &tuning).entered, Some(ActionState::Dodging));
    }

    #[test]
    fn test_accepts_agrees_with_next_tick() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();
        let dodge = ActionRequest::Dodge { direction: Vec2::X };

        assert!(action.accepts(Ability::Dodge));
        action.tick(Some(dodge), &tuning);

        // Пока идёт dodge, ничего не принимается
        assert!(!action.accepts(Ability::BasicAttack));
        run_idle_ticks(&mut action, &tuning, 15);

        assert!(action.accepts(Ability::BasicAttack));
        assert!(action.accepts(Ability::HeavyAttack));

        while action.cooldowns.remaining(Ability::Dodge) > 1 {
            assert!(!action.accepts(Ability::Dodge));
            action.tick(None, &tuning);
        }
        assert!(action.accepts(Ability::Dodge));
        assert_eq!(action.tick(Some(dodge), &tuning).entered, Some(ActionState::Dodging));
    }

    #[test]
    fn test_cooldown_does_not_block_attacks() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::Dodge { direction: Vec2::Y }), &tuning);
        run_idle_ticks(&mut action, &tuning, 15);
        assert!(!action.cooldowns.is_ready(Ability::Dodge));

        assert_eq!(
            action.tick(Some(ActionRequest::BasicAttack), &tuning).entered,
            Some(ActionState::BasicAttack)
        );
    }

    #[test]
    fn test_dodge_boost_first_half_only() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::Dodge { direction: Vec2::X }), &tuning);
        let boosted = (0..15)
            .filter(|_| {
                let active = action.is_dodge_boost_active(&tuning);
                action.tick(None, &tuning);
                active
            })
            .count();

        // state_timer 0..=6 (< 15 / 2)
        assert_eq!(boosted, 7);
    }

    #[test]
    fn test_progress_and_duration() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();
        assert_eq!(action.progress(&tuning), 0.0);

        action.tick(Some(ActionRequest::HeavyAttack), &tuning);
        run_idle_ticks(&mut action, &tuning, 10);
        assert_eq!(action.duration(&tuning), 40);
        assert_eq!(action.progress(&tuning), 0.25);
    }

    #[test]
    fn test_heavy_phase_boundaries_belong_to_later_phase() {
        assert_eq!(HeavyPhase::at(0.0), HeavyPhase::WindUp);
        assert_eq!(HeavyPhase::at(0.29), HeavyPhase::WindUp);
        assert_eq!(HeavyPhase::at(0.3), HeavyPhase::Strike);
        assert_eq!(HeavyPhase::at(0.59), HeavyPhase::Strike);
        assert_eq!(HeavyPhase::at(0.6), HeavyPhase::Recovery);
        assert_eq!(HeavyPhase::at(1.0), HeavyPhase::Recovery);
    }

    #[test]
    fn test_pose_resets_to_neutral_on_exit() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::BasicAttack), &tuning);
        run_idle_ticks(&mut action, &tuning, 10);
        let mid_swing = ClawPose::for_action(&action, &tuning);
        assert!(mid_swing.right > 0.7, "pose = {:?}", mid_swing);

        run_idle_ticks(&mut action, &tuning, 10);
        assert_eq!(ClawPose::for_action(&action, &tuning), ClawPose::NEUTRAL);
    }

    #[test]
    fn test_heavy_pose_winds_up_backwards() {
        let tuning = CombatTuning::default();
        let mut action = CombatAction::default();

        action.tick(Some(ActionRequest::HeavyAttack), &tuning);
        run_idle_ticks(&mut action, &tuning, 6);
        let pose = ClawPose::for_action(&action, &tuning);
        assert!(pose.left < 0.0 && pose.right < 0.0);
    }

    #[test]
    fn test_cooldowns_map() {
        let mut cooldowns = Cooldowns::default();
        assert!(cooldowns.is_ready(Ability::Dodge));

        cooldowns.start(Ability::Dodge, 2);
        cooldowns.start(Ability::HeavyAttack, 0);
        assert_eq!(cooldowns.remaining(Ability::Dodge), 2);
        assert!(cooldowns.is_ready(Ability::HeavyAttack));

        cooldowns.tick();
        cooldowns.tick();
        cooldowns.tick(); // не уходит ниже 0
        assert!(cooldowns.is_ready(Ability::Dodge));
    }
}
