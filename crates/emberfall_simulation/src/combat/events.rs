//! Combat события
//!
//! Input-события (`DamageEvent`, `HealEvent`) — команды в симуляцию;
//! output-события — уведомления для UI/аудио слушателей.

use bevy::prelude::*;

/// Запрос нанесения урона (резолвится в apply_damage)
#[derive(Event, Debug, Clone)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: u32,
    /// None = environmental урон
    pub source: Option<Entity>,
}

/// Запрос лечения
#[derive(Event, Debug, Clone)]
pub struct HealEvent {
    pub target: Entity,
    pub amount: u32,
}

/// Урон применён (для UI/аудио/статистики)
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub target: Entity,
    pub amount: u32,
    pub source: Option<Entity>,
    /// Тик симуляции в момент применения
    pub tick: u64,
}

/// Изменилось здоровье игрока (HUD)
#[derive(Event, Debug, Clone)]
pub struct PlayerHealthChanged {
    pub current: u32,
    pub max: u32,
}

/// Игрок погиб
#[derive(Event, Debug, Clone)]
pub struct PlayerDied;

/// Враг повержен
#[derive(Event, Debug, Clone)]
pub struct EnemyDefeated {
    pub entity: Entity,
}
