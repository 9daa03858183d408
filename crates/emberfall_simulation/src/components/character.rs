//! Базовые компоненты персонажей: Character, CharacterState, Health, Facing, SpriteState

use bevy::prelude::*;

/// Идентификаторы анимаций (проигрываются внешним рендером, core только выбирает)
pub mod anim {
    pub const IDLE: &str = "idle";
    pub const WALK: &str = "walk";
    pub const RUN: &str = "run";
    pub const FLY: &str = "fly";
    pub const JUMP: &str = "jump";
    pub const FALL: &str = "fall";
    pub const ATTACK: &str = "attack";
    pub const DIE: &str = "die";
    pub const CROUCH: &str = "crouch";
    pub const CROUCH_WALK: &str = "crouch_walk";
    pub const PUNCH: &str = "punch";
    pub const PUNCH_CROSS: &str = "punch_cross";
    pub const PUNCH_JAB: &str = "punch_jab";
}

/// Фракция игрока (и союзных ботов)
pub const PLAYER_FACTION: u64 = 0;
/// Фракция врагов
pub const ENEMY_FACTION: u64 = 1;

/// Базовый компонент combat-capable персонажа (игрок, враг, союзный бот)
///
/// `save_id` — стабильный идентификатор для save/load, назначается при спавне.
/// Для контента без авторского id есть fallback [`Character::derived_save_id`].
#[derive(Component, Debug, Clone)]
pub struct Character {
    pub name: String,
    pub save_id: String,
    pub faction_id: u64,
    /// Участвует ли персонаж в save/load
    pub savable: bool,
}

impl Character {
    pub fn new(name: impl Into<String>, save_id: impl Into<String>, faction_id: u64) -> Self {
        Self {
            name: name.into(),
            save_id: save_id.into(),
            faction_id,
            savable: true,
        }
    }

    /// Fallback-идентификатор из пути сцены и пути узла (схема `scene::node`)
    ///
    /// Ломается при реструктуризации сцены — использовать только когда
    /// явный id не назначен.
    pub fn derived_save_id(scene_path: &str, node_path: &str) -> String {
        format!("{scene_path}::{node_path}")
    }
}

/// Состояния персонажа
///
/// `Dead` — терминальное: урон и лечение становятся no-op,
/// удаление из симуляции происходит после death-секвенции.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum CharacterState {
    #[default]
    Idle,
    Walking,
    Running,
    Attacking,
    Hurt,
    Dead,
    Chasing,
    Jumping,
    Falling,
}

impl CharacterState {
    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Здоровье персонажа
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Направление взгляда: +1.0 вправо, -1.0 влево
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing {
    pub direction: f32,
}

impl Default for Facing {
    fn default() -> Self {
        Self { direction: 1.0 }
    }
}

/// Sprite bookkeeping: текущая анимация + горизонтальный flip
///
/// Core только выбирает анимацию, проигрывание — забота рендера.
#[derive(Component, Debug, Clone)]
pub struct SpriteState {
    pub animation: &'static str,
    pub flip_h: bool,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            animation: anim::IDLE,
            flip_h: false,
        }
    }
}

impl SpriteState {
    pub fn play(&mut self, animation: &'static str) {
        self.animation = animation;
    }

    /// Обновляет flip по направлению (0 — направление не меняется)
    pub fn face(&mut self, direction: f32) {
        if direction != 0.0 {
            self.flip_h = direction < 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamps_at_zero() {
        let mut health = Health::new(100);
        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(200); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_clamps_at_max() {
        let mut health = Health::new(100);
        health.take_damage(50);
        health.heal(30);
        assert_eq!(health.current, 80);

        health.heal(100);
        assert_eq!(health.current, 100);
    }

    #[test]
    fn test_health_invariant_random_sequence() {
        let mut health = Health::new(60);
        for (damage, heal) in [(10, 3), (200, 50), (0, 500), (7, 0)] {
            health.take_damage(damage);
            assert!(health.current <= health.max);
            health.heal(heal);
            assert!(health.current <= health.max);
        }
    }

    #[test]
    fn test_sprite_face_ignores_zero() {
        let mut sprite = SpriteState::default();
        sprite.face(-1.0);
        assert!(sprite.flip_h);

        sprite.face(0.0);
        assert!(sprite.flip_h); // Не меняется

        sprite.face(1.0);
        assert!(!sprite.flip_h);
    }

    #[test]
    fn test_derived_save_id() {
        let id = Character::derived_save_id("levels/main.tscn", "Enemies/Crawler1");
        assert_eq!(id, "levels/main.tscn::Enemies/Crawler1");
    }
}
