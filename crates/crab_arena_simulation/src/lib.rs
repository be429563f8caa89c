//! Crab Arena Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: игрок-краб против AI-краба на квадратной арене.
//!
//! Simulation core (этот crate):
//! - движение игрока и AI, bounds clamp
//! - attack/dodge state machine, hit-check pulses, урон
//! - AI policy по health/distance, respawn loop
//!
//! Host layer (вне crate): сцена, модели, HUD. Читает Transform/ClawPose/события,
//! пишет `HostInput` и start request.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod encounter;
pub mod input;
pub mod logger;
pub mod movement;
pub mod presentation;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AiMode};
pub use combat::{ActionState, CombatAction, CombatPlugin, CombatantDefeated, DamageDealt, HitEffect};
pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use encounter::{Combatants, DefeatCountChanged, EncounterPlugin, EncounterStats, MatchPhase, MatchState};
pub use input::{ControlKey, HostInput, InputState, PointerButton};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use movement::MovementPlugin;
pub use presentation::{HealthChanged, HudRefresh, PresentationPlugin};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Config/RNG вставляются только если хост не положил свои заранее.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<ArenaBounds>() {
            app.insert_resource(ArenaBounds::new(config.arena.half_size));
        }
        if !app.world().contains_resource::<SimulationConfig>() {
            app.insert_resource(config);
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        // Подсистемы (порядок стадий задаёт EncounterPlugin)
        app.add_plugins((
            EncounterPlugin,
            MovementPlugin,
            AIPlugin,
            CombatPlugin,
            PresentationPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Headless App с полной симуляцией и заспавненной парой бойцов (MatchPhase::Lobby).
pub fn create_arena_app(seed: u64, config: SimulationConfig) -> App {
    let mut app = create_headless_app(seed);
    app.insert_resource(config).add_plugins(SimulationPlugin);
    encounter::spawn_encounter(app.world_mut());

    app
}

/// Один детерминированный тик (FixedUpdate напрямую, без wall-clock).
///
/// После тика event buffers ротируются: событие живёт два тика,
/// reader с собственным cursor должен читать каждый тик.
pub fn run_tick(app: &mut App) {
    let world = app.world_mut();
    world.run_schedule(FixedUpdate);
    rotate_simulation_events(world);
}

fn rotate_simulation_events(world: &mut World) {
    rotate_events::<combat::HitCheck>(world);
    rotate_events::<DamageDealt>(world);
    rotate_events::<CombatantDefeated>(world);
    rotate_events::<HitEffect>(world);
    rotate_events::<DefeatCountChanged>(world);
    rotate_events::<HealthChanged>(world);
    rotate_events::<HudRefresh>(world);
}

fn rotate_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}

/// Host → core: сырое input событие (применяется к InputState между тиками).
pub fn apply_host_input(app: &mut App, input: HostInput) {
    if let Some(mut state) = app.world_mut().get_resource_mut::<InputState>() {
        state.apply(input);
    }
}

/// Host → core: начать (или перезапустить) матч на следующем тике.
pub fn request_match_start(app: &mut App) {
    if let Some(mut state) = app.world_mut().get_resource_mut::<MatchState>() {
        state.request_start();
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
