//! Chase-политики архетипов: чистые функции решения без ECS
//!
//! Принимают offset до игрока и текущее движение, возвращают новое
//! движение + состояние + facing. Вынесены из системы ради unit-тестов.

use bevy::prelude::*;

use crate::components::{CharacterState, Enemy};
use crate::physics::sign;

/// Решение chase-политики за один тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseOutcome {
    pub velocity: Vec2,
    pub state: CharacterState,
    pub facing: f32,
}

/// Наземное преследование (Ground и Jumping архетипы)
///
/// Facing обновляется только вне горизонтальной deadzone (гистерезис
/// против джиттера над целью). Игрок высоко и почти ровно над головой —
/// недосягаем: стоп + Idle. `jump_threshold` = Some только у Jumping.
pub fn ground_chase(
    offset: Vec2,
    mut velocity: Vec2,
    mut facing: f32,
    grounded: bool,
    enemy: &Enemy,
    jump_threshold: Option<f32>,
) -> ChaseOutcome {
    let horizontal_distance = offset.x.abs();
    let vertical_distance = offset.y.abs();

    if horizontal_distance > enemy.horizontal_chase_threshold {
        facing = sign(offset.x);
    }

    let unreachable = vertical_distance > enemy.vertical_chase_threshold
        && horizontal_distance < enemy.horizontal_chase_threshold;
    if unreachable {
        velocity.x = 0.0;
        return ChaseOutcome {
            velocity,
            state: CharacterState::Idle,
            facing,
        };
    }

    velocity.x = facing * enemy.speed;
    if let Some(threshold) = jump_threshold {
        if offset.y > threshold && grounded {
            velocity.y = enemy.jump_velocity;
        }
    }

    ChaseOutcome {
        velocity,
        state: CharacterState::Chasing,
        facing,
    }
}

/// Летающее преследование: движение по обеим осям, fallback
/// недосягаемости не нужен
pub fn flying_chase(
    offset: Vec2,
    mut velocity: Vec2,
    mut facing: f32,
    enemy: &Enemy,
    vertical_speed: f32,
) -> ChaseOutcome {
    if offset.x.abs() > enemy.horizontal_chase_threshold {
        facing = sign(offset.x);
    }
    velocity.x = facing * enemy.speed;
    velocity.y = sign(offset.y) * vertical_speed;

    ChaseOutcome {
        velocity,
        state: CharacterState::Chasing,
        facing,
    }
}
