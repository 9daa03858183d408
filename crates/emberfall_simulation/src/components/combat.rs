//! Боевые компоненты: Attacker (melee + combo), DespawnAfter

use bevy::prelude::*;

use super::character::anim;

/// Способность наносить melee-урон
///
/// Атака — это таймер: `start_attack` взводит `attack_timer`, резолв удара
/// происходит когда таймер истекает (wind-up вместо мгновенного хита).
/// Инвариант: `combo_animations` непуст, `combo_index < combo_animations.len()`.
#[derive(Component, Debug, Clone)]
pub struct Attacker {
    pub attack_damage: u32,
    pub attack_range: f32,
    /// Набор анимаций комбо, циклически
    pub combo_animations: &'static [&'static str],
    pub combo_index: usize,
    /// Сколько секунд без атак до сброса комбо в начало
    pub combo_reset_time: f32,
    pub combo_reset_timer: f32,
    /// Wind-up атаки до резолва удара
    pub attack_duration: f32,
    pub attack_timer: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            attack_damage: 10,
            attack_range: 50.0,
            combo_animations: &[anim::ATTACK],
            combo_index: 0,
            combo_reset_time: 3.5,
            combo_reset_timer: 0.0,
            attack_duration: 0.4,
            attack_timer: 0.0,
        }
    }
}

impl Attacker {
    /// Анимация текущего шага комбо
    pub fn current_animation(&self) -> &'static str {
        self.combo_animations[self.combo_index % self.combo_animations.len()]
    }

    pub fn start_attack(&mut self) {
        self.attack_timer = self.attack_duration;
    }

    /// Атака в процессе (между start и резолвом)
    pub fn is_swinging(&self) -> bool {
        self.attack_timer > 0.0
    }

    /// Следующий шаг комбо (циклически) + взвод окна сброса
    pub fn advance_combo(&mut self) {
        self.combo_index = (self.combo_index + 1) % self.combo_animations.len();
        self.combo_reset_timer = self.combo_reset_time;
    }
}

/// Отложенное удаление: entity остаётся в мире на время death-анимации,
/// затем despawn на границе тика
#[derive(Component, Debug, Clone)]
pub struct DespawnAfter {
    pub timer: f32,
}
