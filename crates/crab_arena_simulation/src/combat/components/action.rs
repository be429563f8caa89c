//! Combat action state machine (Idle / BasicAttack / HeavyAttack / Dodging).
//!
//! One machine per combatant. All timings are tick counters, never wall-clock.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::config::CombatTuning;

// ============================================================================
// States, abilities, requests
// ============================================================================

/// Current action of a combatant. Mutually exclusive: only one non-Idle at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum ActionState {
    #[default]
    Idle,
    BasicAttack,
    HeavyAttack,
    Dodging,
}

impl ActionState {
    pub fn is_active(self) -> bool {
        self != ActionState::Idle
    }

    /// Attack kind for attack states (None for Idle/Dodging).
    pub fn attack_kind(self) -> Option<AttackKind> {
        match self {
            ActionState::BasicAttack => Some(AttackKind::Basic),
            ActionState::HeavyAttack => Some(AttackKind::Heavy),
            ActionState::Idle | ActionState::Dodging => None,
        }
    }

    pub fn ability(self) -> Option<Ability> {
        match self {
            ActionState::Idle => None,
            ActionState::BasicAttack => Some(Ability::BasicAttack),
            ActionState::HeavyAttack => Some(Ability::HeavyAttack),
            ActionState::Dodging => Some(Ability::Dodge),
        }
    }
}

/// Ability slot (cooldown key).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Reflect)]
pub enum Ability {
    BasicAttack,
    HeavyAttack,
    Dodge,
}

impl Ability {
    pub fn state(self) -> ActionState {
        match self {
            Ability::BasicAttack => ActionState::BasicAttack,
            Ability::HeavyAttack => ActionState::HeavyAttack,
            Ability::Dodge => ActionState::Dodging,
        }
    }

    /// State duration (ticks).
    pub fn duration(self, tuning: &CombatTuning) -> u32 {
        match self {
            Ability::BasicAttack => tuning.basic_attack_duration,
            Ability::HeavyAttack => tuning.heavy_attack_duration,
            Ability::Dodge => tuning.dodge_duration,
        }
    }

    /// Lockout started when the state exits (ticks).
    pub fn cooldown(self, tuning: &CombatTuning) -> u32 {
        match self {
            Ability::BasicAttack => tuning.basic_attack_cooldown,
            Ability::HeavyAttack => tuning.heavy_attack_cooldown,
            Ability::Dodge => tuning.dodge_cooldown,
        }
    }
}

/// Type of attack carried by a hit-check pulse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum AttackKind {
    Basic,
    Heavy,
}

impl AttackKind {
    pub fn hit_radius(self, tuning: &CombatTuning) -> f32 {
        match self {
            AttackKind::Basic => tuning.basic_hit_radius,
            AttackKind::Heavy => tuning.heavy_hit_radius,
        }
    }

    pub fn damage(self, tuning: &CombatTuning) -> u32 {
        match self {
            AttackKind::Basic => tuning.basic_damage,
            AttackKind::Heavy => tuning.heavy_damage,
        }
    }
}

/// Edge-triggered action request (from player input or AI policy).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionRequest {
    BasicAttack,
    HeavyAttack,
    /// Unit direction on the arena plane, captured when the request is made.
    Dodge { direction: Vec2 },
}

impl ActionRequest {
    pub fn ability(&self) -> Ability {
        match self {
            ActionRequest::BasicAttack => Ability::BasicAttack,
            ActionRequest::HeavyAttack => Ability::HeavyAttack,
            ActionRequest::Dodge { .. } => Ability::Dodge,
        }
    }
}

/// Request waiting for the next combat tick.
///
/// Consumed (taken) every tick whether or not it was accepted:
/// disallowed requests are dropped, never queued.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct PendingAction(pub Option<ActionRequest>);

impl PendingAction {
    pub fn set(&mut self, request: ActionRequest) {
        self.0 = Some(request);
    }

    pub fn take(&mut self) -> Option<ActionRequest> {
        self.0.take()
    }
}

// ============================================================================
// Cooldowns
// ============================================================================

/// Remaining lockout per ability (ticks). Missing entry = ready.
///
/// BTreeMap: стабильный порядок для snapshot/Debug.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cooldowns {
    remaining: BTreeMap<Ability, u32>,
}

impl Cooldowns {
    pub fn remaining(&self, ability: Ability) -> u32 {
        self.remaining.get(&ability).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, ability: Ability) -> bool {
        self.remaining(ability) == 0
    }

    pub fn start(&mut self, ability: Ability, ticks: u32) {
        if ticks == 0 {
            self.remaining.remove(&ability);
        } else {
            self.remaining.insert(ability, ticks);
        }
    }

    /// Decrement every running cooldown by one tick.
    pub fn tick(&mut self) {
        self.remaining.retain(|_, ticks| {
            *ticks = ticks.saturating_sub(1);
            *ticks > 0
        });
    }
}

// ============================================================================
// CombatAction component
// ============================================================================

/// Per-combatant action state machine.
///
/// # Tick semantics
///
/// - Request accepted → state entered with `state_timer = 0` (no advance that tick)
/// - Every following tick: `state_timer += 1`
/// - Attacks raise a hit check exactly once, at `state_timer == duration / 2`
/// - `state_timer == duration` → back to Idle, ability cooldown starts
/// - Cooldowns tick down every tick regardless of state
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct CombatAction {
    pub state: ActionState,
    /// Ticks elapsed in the current state
    pub state_timer: u32,
    pub cooldowns: Cooldowns,
    /// Unit direction of the current dodge (ZERO when not dodging)
    pub dodge_direction: Vec2,
}

/// What happened during one [`CombatAction::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ActionTick {
    /// State entered this tick (request accepted)
    pub entered: Option<ActionState>,
    /// Peak-of-swing collision check
    pub hit_check: Option<AttackKind>,
    /// State that ended this tick (back to Idle)
    pub finished: Option<ActionState>,
}

impl CombatAction {
    pub fn is_busy(&self) -> bool {
        self.state.is_active()
    }

    /// Duration of the current state in ticks (0 for Idle).
    pub fn duration(&self, tuning: &CombatTuning) -> u32 {
        self.state
            .ability()
            .map(|ability| ability.duration(tuning))
            .unwrap_or(0)
    }

    /// Animation progress of the current state in `[0, 1]` (0 for Idle).
    pub fn progress(&self, tuning: &CombatTuning) -> f32 {
        let duration = self.duration(tuning);
        if duration == 0 {
            return 0.0;
        }
        (self.state_timer as f32 / duration as f32).min(1.0)
    }

    /// Dodge impulse applies during the first half of the dodge.
    pub fn is_dodge_boost_active(&self, tuning: &CombatTuning) -> bool {
        self.state == ActionState::Dodging && self.state_timer < tuning.dodge_duration / 2
    }

    /// Tick on which the current attack checks for contact.
    fn hit_tick(&self, tuning: &CombatTuning) -> u32 {
        (self.duration(tuning) / 2).max(1)
    }

    /// Whether a request for `ability` offered on the next [`CombatAction::tick`]
    /// would be accepted. That tick decrements cooldowns before the guards run.
    pub fn accepts(&self, ability: Ability) -> bool {
        !self.is_busy() && self.cooldowns.remaining(ability) <= 1
    }

    /// Enter the requested state if the guards allow it.
    ///
    /// Guards: currently Idle, ability cooldown at 0. Returns false (and
    /// changes nothing) otherwise.
    pub fn try_begin(&mut self, request: ActionRequest) -> bool {
        if self.is_busy() {
            return false;
        }

        let ability = request.ability();
        if !self.cooldowns.is_ready(ability) {
            return false;
        }

        self.state = ability.state();
        self.state_timer = 0;
        self.dodge_direction = match request {
            ActionRequest::Dodge { direction } => direction.normalize_or_zero(),
            _ => Vec2::ZERO,
        };
        true
    }

    /// Advance the machine by one tick, optionally offering a new request.
    pub fn tick(&mut self, request: Option<ActionRequest>, tuning: &CombatTuning) -> ActionTick {
        self.cooldowns.tick();

        let mut outcome = ActionTick::default();

        if self.is_busy() {
            // Занят: request (если был) отбрасывается
            self.state_timer += 1;

            if let Some(kind) = self.state.attack_kind() {
                if self.state_timer == self.hit_tick(tuning) {
                    outcome.hit_check = Some(kind);
                }
            }

            if self.state_timer >= self.duration(tuning) {
                outcome.finished = Some(self.state);
                self.finish(tuning);
            }

            return outcome;
        }

        if let Some(request) = request {
            if self.try_begin(request) {
                outcome.entered = Some(self.state);
            }
        }

        outcome
    }

    /// Exit the current state: back to Idle, start the ability cooldown.
    fn finish(&mut self, tuning: &CombatTuning) {
        if let Some(ability) = self.state.ability() {
            let cooldown = ability.cooldown(tuning);
            if cooldown > 0 {
                self.cooldowns.start(ability, cooldown);
            }
        }
        self.state = ActionState::Idle;
        self.state_timer = 0;
        self.dodge_direction = Vec2::ZERO;
    }

    /// Hard reset (match start / respawn).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
