//! Минимальная 2D AABB-кинематика для headless симуляции
//!
//! Ось Y направлена вверх (Bevy convention): гравитация отрицательная,
//! прыжок — положительная скорость. One-way платформы блокируют только
//! падение сверху; collision exceptions дают drop-through.

use bevy::prelude::*;

/// Допуск на контакт с поверхностью
const SKIN: f32 = 0.05;

/// Запас к габаритам коллайдера при выводе contact damage дистанции
const CONTACT_RANGE_MARGIN: f32 = 5.0;

/// Статическая платформа уровня
#[derive(Component, Debug, Clone, Copy)]
pub struct Platform {
    pub half_extents: Vec2,
    /// true = блокирует только сверху, снизу и сбоку проходима
    pub one_way: bool,
}

/// Кинематическое тело: скорость, габариты, контакт с полом
#[derive(Component, Debug, Clone)]
pub struct KinematicBody {
    pub velocity: Vec2,
    pub half_extents: Vec2,
    pub gravity: f32,
    pub grounded: bool,
    /// Платформа под ногами на последнем контакте
    pub last_floor: Option<Entity>,
    /// Платформы, сквозь которые тело временно проходит (drop-through)
    pub collision_exceptions: Vec<Entity>,
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            half_extents: Vec2::new(8.0, 14.0),
            gravity: -800.0,
            grounded: false,
            last_floor: None,
            collision_exceptions: Vec::new(),
        }
    }
}

impl KinematicBody {
    pub fn add_collision_exception(&mut self, platform: Entity) {
        if !self.collision_exceptions.contains(&platform) {
            self.collision_exceptions.push(platform);
        }
    }

    pub fn remove_collision_exception(&mut self, platform: Entity) {
        self.collision_exceptions.retain(|e| *e != platform);
    }

    pub fn has_collision_exception(&self, platform: Entity) -> bool {
        self.collision_exceptions.contains(&platform)
    }
}

/// Снимок платформы для прохода резолвера (без повторных query lookups)
#[derive(Debug, Clone, Copy)]
pub struct PlatformRef {
    pub entity: Entity,
    pub center: Vec2,
    pub half_extents: Vec2,
    pub one_way: bool,
}

/// Собирает снимок всех платформ уровня один раз за тик
pub fn collect_platforms<'a>(
    iter: impl Iterator<Item = (Entity, &'a Transform, &'a Platform)>,
) -> Vec<PlatformRef> {
    iter.map(|(entity, transform, platform)| PlatformRef {
        entity,
        center: transform.translation.truncate(),
        half_extents: platform.half_extents,
        one_way: platform.one_way,
    })
    .collect()
}

/// Знак с нулём: sign(0) = 0
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Contact damage дистанция из габаритов коллайдера
pub fn contact_range_from_footprint(half_extents: Vec2) -> f32 {
    half_extents.x.max(half_extents.y) + CONTACT_RANGE_MARGIN
}

/// Интегрирует скорость за тик и резолвит столкновения с платформами
///
/// Два прохода: X против solid платформ, затем Y. Падающее тело
/// приземляется на верхнюю грань (one-way включительно), если его низ был
/// над гранью в начале тика; взлетающее упирается головой только в solid.
/// Обновляет `grounded` и `last_floor`.
pub fn move_and_slide(
    body: &mut KinematicBody,
    transform: &mut Transform,
    platforms: &[PlatformRef],
    delta: f32,
) {
    let prev_bottom = transform.translation.y - body.half_extents.y;
    let prev_top = transform.translation.y + body.half_extents.y;
    let mut pos = transform.translation.truncate();

    // Горизонтальный проход: one-way сбоку проходимы
    pos.x += body.velocity.x * delta;
    for platform in platforms {
        if platform.one_way || body.has_collision_exception(platform.entity) {
            continue;
        }
        let dx = pos.x - platform.center.x;
        let dy = pos.y - platform.center.y;
        let overlap_x = body.half_extents.x + platform.half_extents.x - dx.abs();
        let overlap_y = body.half_extents.y + platform.half_extents.y - dy.abs();
        if overlap_x > 0.0 && overlap_y > SKIN {
            pos.x += overlap_x * if dx < 0.0 { -1.0 } else { 1.0 };
            body.velocity.x = 0.0;
        }
    }

    // Вертикальный проход
    pos.y += body.velocity.y * delta;
    body.grounded = false;

    for platform in platforms {
        if body.has_collision_exception(platform.entity) {
            continue;
        }
        let dx = pos.x - platform.center.x;
        if dx.abs() >= body.half_extents.x + platform.half_extents.x {
            continue;
        }

        if body.velocity.y <= 0.0 {
            // Приземление: низ тела был над верхней гранью в начале тика
            let top = platform.center.y + platform.half_extents.y;
            let bottom = pos.y - body.half_extents.y;
            if prev_bottom >= top - SKIN && bottom <= top {
                pos.y = top + body.half_extents.y;
                body.velocity.y = 0.0;
                body.grounded = true;
                body.last_floor = Some(platform.entity);
            }
        } else if !platform.one_way {
            // Удар головой о нижнюю грань solid платформы
            let bottom_face = platform.center.y - platform.half_extents.y;
            let head = pos.y + body.half_extents.y;
            if prev_top <= bottom_face + SKIN && head >= bottom_face {
                pos.y = bottom_face - body.half_extents.y;
                body.velocity.y = 0.0;
            }
        }
    }

    transform.translation.x = pos.x;
    transform.translation.y = pos.y;
}

/// Результат вертикального рейкаста
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec2,
}

/// Ближайшая верхняя грань платформы строго под точкой (в пределах
/// `max_distance`), исключая перечисленные платформы
pub fn raycast_down(
    origin: Vec2,
    max_distance: f32,
    platforms: &[PlatformRef],
    exclusions: &[Entity],
) -> Option<RayHit> {
    let mut nearest: Option<RayHit> = None;
    for platform in platforms {
        if exclusions.contains(&platform.entity) {
            continue;
        }
        if (origin.x - platform.center.x).abs() > platform.half_extents.x {
            continue;
        }
        let top = platform.center.y + platform.half_extents.y;
        if top > origin.y || origin.y - top > max_distance {
            continue;
        }
        let point = Vec2::new(origin.x, top);
        match &nearest {
            Some(hit) if hit.point.y >= point.y => {}
            _ => nearest = Some(RayHit { entity: platform.entity, point }),
        }
    }
    nearest
}

/// Спавн платформы уровня
pub fn spawn_platform(
    commands: &mut Commands,
    center: Vec2,
    half_extents: Vec2,
    one_way: bool,
) -> Entity {
    commands
        .spawn((
            Transform::from_translation(center.extend(0.0)),
            Platform {
                half_extents,
                one_way,
            },
        ))
        .id()
}
