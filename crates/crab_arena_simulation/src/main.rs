//! Headless симуляция Crab Arena
//!
//! Scripted матч на 1000 тиков: игрок кружит вокруг центра и атакует,
//! AI действует по своей policy. Первый аргумент: путь к RON config (опционально).

use bevy::prelude::*;
use crab_arena_simulation::{
    apply_host_input, create_arena_app, init_logger, log_error, log_info, request_match_start, run_tick,
    ArenaPosition, ControlKey, EncounterStats, Health, HostInput, MatchPhase, MatchState, PointerButton,
    SimulationConfig,
};

const SEED: u64 = 42;
const TICK_COUNT: u32 = 1000;

fn main() {
    init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => {
                log_info(&format!("Loaded config from {}", path));
                config
            }
            Err(err) => {
                log_error(&format!("{}", err));
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    log_info(&format!("Starting Crab Arena headless simulation (seed: {})", SEED));

    let mut app = create_arena_app(SEED, config);
    request_match_start(&mut app);
    apply_host_input(&mut app, HostInput::KeyDown(ControlKey::Forward));

    for tick in 0..TICK_COUNT {
        script_input(&mut app, tick);
        run_tick(&mut app);

        if tick % 100 == 0 {
            report(&mut app, tick);
        }

        let over = app
            .world()
            .get_resource::<MatchState>()
            .is_some_and(|state| state.phase == MatchPhase::Over);
        if over {
            log_info(&format!("Player defeated at tick {}", tick));
            break;
        }
    }

    let defeats = app
        .world()
        .get_resource::<EncounterStats>()
        .map(|stats| stats.defeat_count)
        .unwrap_or_default();
    log_info(&format!("Simulation complete! AI defeats: {}", defeats));
}

/// Указатель ходит по кругу радиуса 5, атаки с фиксированными интервалами.
fn script_input(app: &mut App, tick: u32) {
    let angle = tick as f32 * 0.02;
    apply_host_input(app, HostInput::PointerMoved(Vec2::new(angle.sin(), angle.cos()) * 5.0));

    if tick % 25 == 0 {
        apply_host_input(app, HostInput::ButtonDown(PointerButton::Primary));
    }
    if tick % 90 == 45 {
        apply_host_input(app, HostInput::ButtonDown(PointerButton::Secondary));
    }
    if tick % 120 == 60 {
        apply_host_input(app, HostInput::KeyDown(ControlKey::Dodge));
        apply_host_input(app, HostInput::KeyUp(ControlKey::Dodge));
    }
}

fn report(app: &mut App, tick: u32) {
    let world = app.world_mut();
    let mut query = world.query_filtered::<(&Name, &ArenaPosition, &Health), With<crab_arena_simulation::Combatant>>();
    for (name, position, health) in query.iter(world) {
        log_info(&format!(
            "Tick {}: {} at ({:.2}, {:.2}) hp {}/{}",
            tick, name, position.0.x, position.0.y, health.current, health.max
        ));
    }
}
