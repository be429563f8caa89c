//! ECS Components для бойцов арены
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Combatant, Health, Facing)
//! - world: позиционирование на арене (ArenaPosition, ArenaBounds)
//! - player: player control (Player, PlayerMotion, PlayerControls)
//! - ai: AI marker и последнее решение (AiOpponent, AiBehavior)
//!
//! Боевой state machine (CombatAction, PendingAction, ClawPose) живёт в `combat`.

pub mod actor;
pub mod ai;
pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
pub use player::*;
pub use world::*;
