//! Компоненты вражеского AI: Enemy (tuning + таймеры), EnemyArchetype

use bevy::prelude::*;

/// Тюнинг вражеского поведения + per-entity таймеры
///
/// Дистанции — от центра к центру. `contact_damage_range = 0.0` означает
/// "вывести из габаритов коллайдера при спавне".
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    /// false = только contact damage, melee-атак нет
    pub can_attack: bool,
    pub applies_gravity: bool,
    pub speed: f32,
    pub jump_velocity: f32,
    /// Дальше этой дистанции враг не замечает игрока
    pub detection_range: f32,
    pub contact_damage_cooldown: f32,
    pub contact_damage_range: f32,
    /// Deadzone по X: внутри неё facing не обновляется (анти-джиттер)
    pub horizontal_chase_threshold: f32,
    /// Выше этой разницы по Y игрок считается недосягаемым
    pub vertical_chase_threshold: f32,
    /// Stun-пауза после полученного урона
    pub hurt_duration: f32,
    pub contact_damage_timer: f32,
    pub hurt_timer: f32,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            can_attack: true,
            applies_gravity: true,
            speed: 100.0,
            jump_velocity: 300.0,
            detection_range: 150.0,
            contact_damage_cooldown: 1.0,
            contact_damage_range: 0.0,
            horizontal_chase_threshold: 15.0,
            vertical_chase_threshold: 80.0,
            hurt_duration: 0.2,
            contact_damage_timer: 0.0,
            hurt_timer: 0.0,
        }
    }
}

/// Архетип движения: как именно враг преследует игрока
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum EnemyArchetype {
    /// Ходит по платформам, прыгать не умеет
    Ground,
    /// Прыгает когда игрок выше порога
    Jumping { jump_threshold: f32 },
    /// Игнорирует гравитацию, движется по обеим осям
    Flying { vertical_speed: f32 },
}
