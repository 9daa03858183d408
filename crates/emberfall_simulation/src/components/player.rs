//! Компоненты игрока: Player, PlayerInput, PlayerController, FollowBot

use bevy::prelude::*;

/// Маркер игрока (lookup по роли, а не по прямой ссылке)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Логические действия игрока за текущий тик
///
/// Mock input для headless тестов: тест выставляет поля напрямую,
/// реальный фронтенд пишет их из своей системы ввода.
/// `*_just_pressed` флаги одноразовые — контроллер сбрасывает их после
/// обработки.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Горизонтальная ось движения, -1.0..=1.0
    pub move_axis: f32,
    pub jump_just_pressed: bool,
    pub down_held: bool,
    pub attack_just_pressed: bool,
    pub left_just_pressed: bool,
    pub right_just_pressed: bool,
}

/// Тюнинг платформер-контроллера + runtime-состояние таймеров
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub speed: f32,
    pub run_speed: f32,
    pub crouch_speed: f32,
    pub jump_velocity: f32,
    /// Окно прыжка после схода с платформы
    pub coyote_time: f32,
    /// Окно предзаказа прыжка до приземления
    pub jump_buffer_time: f32,
    /// Drop-through разрешён только если ниже есть поверхность в пределах
    /// этой дистанции
    pub max_drop_distance: f32,
    /// Окно двойного нажатия для перехода в бег
    pub double_tap_time: f32,
    /// Сколько держится collision exception при drop-through
    pub drop_through_duration: f32,

    pub coyote_timer: f32,
    pub jump_buffer_timer: f32,
    pub drop_through_timer: f32,
    pub drop_through_platform: Option<Entity>,
    pub left_tap_timer: f32,
    pub right_tap_timer: f32,
    pub is_running: bool,
    pub is_crouching: bool,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            speed: 120.0,
            run_speed: 200.0,
            crouch_speed: 50.0,
            jump_velocity: 300.0,
            coyote_time: 0.12,
            jump_buffer_time: 0.12,
            max_drop_distance: 100.0,
            double_tap_time: 0.25,
            drop_through_duration: 0.25,

            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            drop_through_timer: 0.0,
            drop_through_platform: None,
            left_tap_timer: 0.0,
            right_tap_timer: 0.0,
            is_running: false,
            is_crouching: false,
        }
    }
}

/// Союзный бот-компаньон: парит рядом с игроком, в бою не участвует
#[derive(Component, Debug, Clone)]
pub struct FollowBot {
    pub speed: f32,
    /// Dead zone: ближе этой дистанции бот останавливается
    pub follow_distance: f32,
    /// Коэффициент сглаживания скорости (lerp per second)
    pub smoothing: f32,
    /// Насколько выше игрока бот держится
    pub hover_offset: f32,
    pub is_following: bool,
}

impl Default for FollowBot {
    fn default() -> Self {
        Self {
            speed: 200.0,
            follow_distance: 35.0,
            smoothing: 7.5,
            hover_offset: 10.0,
            is_following: false,
        }
    }
}
