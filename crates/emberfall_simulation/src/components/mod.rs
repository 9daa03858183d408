//! ECS Components для игровых персонажей
//!
//! Организация по доменам:
//! - character: базовые характеристики (identity, health, state machine, sprite)
//! - combat: боевая механика (Attacker, combo, DespawnAfter)
//! - enemy: конфигурация вражеского AI (Enemy, EnemyArchetype)
//! - player: player control (Player, PlayerController, PlayerInput, FollowBot)

pub mod character;
pub mod combat;
pub mod enemy;
pub mod player;

// Re-exports для удобного импорта
pub use character::*;
pub use combat::*;
pub use enemy::*;
pub use player::*;
