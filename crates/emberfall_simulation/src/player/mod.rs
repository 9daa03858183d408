//! Платформер-контроллер игрока и follow-бот

use bevy::prelude::*;

use crate::combat::begin_attack;
use crate::components::{
    anim, Attacker, Character, CharacterState, Enemy, Facing, FollowBot, Health, Player,
    PlayerController, PlayerInput, SpriteState, PLAYER_FACTION,
};
use crate::physics::{
    collect_platforms, move_and_slide, raycast_down, sign, KinematicBody, Platform, PlatformRef,
};
use crate::SimulationSet;

/// Комбо игрока, циклически
pub const PLAYER_COMBO: &[&str] = &[anim::PUNCH_CROSS, anim::PUNCH_JAB, anim::PUNCH];

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (player_controller, follow_bot_follow)
                .chain()
                .in_set(SimulationSet::Control),
        );
    }
}

/// Обработка ввода игрока за фиксированный тик
///
/// Порядок фиксирован: coyote → crouch → jump buffer → гравитация →
/// drop-through/прыжок → атака → бег → горизонталь → интеграция →
/// выбор анимации. Dead — ввод игнорируется.
pub fn player_controller(
    time: Res<Time<Fixed>>,
    platform_query: Query<(Entity, &Transform, &Platform)>,
    mut players: Query<
        (
            &mut PlayerController,
            &mut PlayerInput,
            &mut Attacker,
            &mut CharacterState,
            &mut KinematicBody,
            &mut Transform,
            &mut Facing,
            &mut SpriteState,
        ),
        (With<Player>, Without<Platform>),
    >,
) {
    let delta = time.delta_secs();
    let platforms = collect_platforms(platform_query.iter());

    for (mut pc, mut input, mut attacker, mut state, mut body, mut transform, mut facing, mut sprite) in
        players.iter_mut()
    {
        if state.is_dead() {
            continue;
        }

        let on_floor = body.grounded;

        // Coyote: прыжок разрешён ещё немного после схода с платформы
        if on_floor {
            pc.coyote_timer = pc.coyote_time;
        } else {
            pc.coyote_timer -= delta;
        }

        // Присед только на земле
        pc.is_crouching = input.down_held && on_floor;

        // Jump buffer: нажатие до приземления не теряется
        if input.jump_just_pressed {
            pc.jump_buffer_timer = pc.jump_buffer_time;
        } else {
            pc.jump_buffer_timer -= delta;
        }

        if !on_floor {
            body.velocity.y += body.gravity * delta;
        }

        let buffered_jump = pc.jump_buffer_timer > 0.0;
        let coyote_ok = pc.coyote_timer > 0.0;

        // Вниз + прыжок на полу = drop-through; иначе обычный прыжок
        if buffered_jump && on_floor && input.down_held {
            if try_drop_through(&mut pc, &mut body, &transform, &platforms) {
                pc.jump_buffer_timer = 0.0;
            }
        } else if buffered_jump && coyote_ok && !pc.is_crouching {
            body.velocity.y = pc.jump_velocity;
            *state = CharacterState::Jumping;
            pc.coyote_timer = 0.0;
            pc.jump_buffer_timer = 0.0;
        }

        update_drop_through(&mut pc, &mut body, delta);

        // Атака: на земле, не поверх другой атаки
        if input.attack_just_pressed && *state != CharacterState::Attacking && on_floor {
            begin_attack(&mut attacker, &mut state, &mut body, &mut sprite);
        }

        let direction = input.move_axis;

        // Double-tap: повторное нажатие в окне = бег
        if input.left_just_pressed {
            if pc.left_tap_timer > 0.0 {
                pc.is_running = true;
            }
            pc.left_tap_timer = pc.double_tap_time;
        } else {
            pc.left_tap_timer -= delta;
        }
        if input.right_just_pressed {
            if pc.right_tap_timer > 0.0 {
                pc.is_running = true;
            }
            pc.right_tap_timer = pc.double_tap_time;
        } else {
            pc.right_tap_timer -= delta;
        }

        // Бег сбрасывается: направление отпущено, присед или разворот
        if direction == 0.0
            || pc.is_crouching
            || (pc.is_running && input.left_just_pressed && body.velocity.x > 0.0)
            || (pc.is_running && input.right_just_pressed && body.velocity.x < 0.0)
        {
            pc.is_running = false;
        }

        if *state == CharacterState::Attacking {
            body.velocity.x = 0.0;
            pc.is_running = false;
        } else {
            let speed = if pc.is_crouching {
                pc.crouch_speed
            } else if pc.is_running {
                pc.run_speed
            } else {
                pc.speed
            };
            body.velocity.x = direction * speed;
        }

        move_and_slide(&mut body, &mut transform, &platforms, delta);

        select_animation(&pc, &body, &mut state, &mut facing, &mut sprite, direction);

        // Одноразовые флаги потреблены
        input.jump_just_pressed = false;
        input.attack_just_pressed = false;
        input.left_just_pressed = false;
        input.right_just_pressed = false;
    }
}

/// Drop-through: снять коллизию с текущей one-way платформой, если ниже
/// в пределах max_drop_distance есть другая поверхность
fn try_drop_through(
    pc: &mut PlayerController,
    body: &mut KinematicBody,
    transform: &Transform,
    platforms: &[PlatformRef],
) -> bool {
    let Some(floor) = body.last_floor else {
        return false;
    };
    let Some(platform) = platforms.iter().find(|p| p.entity == floor) else {
        return false;
    };
    if !platform.one_way {
        return false;
    }

    let origin = transform.translation.truncate();
    if raycast_down(origin, pc.max_drop_distance, platforms, &[floor]).is_none() {
        // Внизу пропасть — проваливаться некуда
        return false;
    }

    body.add_collision_exception(floor);
    pc.drop_through_platform = Some(floor);
    pc.drop_through_timer = pc.drop_through_duration;
    true
}

/// Возврат коллизии по истечении drop-through таймера
fn update_drop_through(pc: &mut PlayerController, body: &mut KinematicBody, delta: f32) {
    let Some(platform) = pc.drop_through_platform else {
        return;
    };
    pc.drop_through_timer -= delta;
    if pc.drop_through_timer > 0.0 {
        return;
    }
    body.remove_collision_exception(platform);
    pc.drop_through_platform = None;
    pc.drop_through_timer = 0.0;
}

/// Выбор состояния/анимации по приоритету:
/// воздух > атака > присед > движение > idle
fn select_animation(
    pc: &PlayerController,
    body: &KinematicBody,
    state: &mut CharacterState,
    facing: &mut Facing,
    sprite: &mut SpriteState,
    direction: f32,
) {
    if direction != 0.0 {
        facing.direction = sign(direction);
        sprite.face(facing.direction);
    }

    if !body.grounded {
        if body.velocity.y > 0.0 {
            *state = CharacterState::Jumping;
            sprite.play(anim::JUMP);
        } else {
            *state = CharacterState::Falling;
            sprite.play(anim::FALL);
        }
    } else if *state == CharacterState::Attacking {
        // Анимацию атаки не перебиваем
    } else if pc.is_crouching {
        *state = if direction != 0.0 {
            CharacterState::Walking
        } else {
            CharacterState::Idle
        };
        sprite.play(if direction != 0.0 {
            anim::CROUCH_WALK
        } else {
            anim::CROUCH
        });
    } else if direction != 0.0 {
        if pc.is_running {
            *state = CharacterState::Running;
            sprite.play(anim::RUN);
        } else {
            *state = CharacterState::Walking;
            sprite.play(anim::WALK);
        }
    } else {
        *state = CharacterState::Idle;
        sprite.play(anim::IDLE);
    }
}

/// Follow-бот: парит к точке над игроком, внутри dead zone зависает
///
/// Платформы игнорирует (левитация), скорость сглаживается lerp'ом.
pub fn follow_bot_follow(
    time: Res<Time<Fixed>>,
    players: Query<&Transform, (With<Player>, Without<FollowBot>)>,
    mut bots: Query<
        (&mut FollowBot, &mut KinematicBody, &mut Transform, &mut SpriteState),
        (Without<Player>, Without<Platform>, Without<Enemy>),
    >,
) {
    let delta = time.delta_secs();
    let Some(player_transform) = players.iter().next() else {
        return;
    };
    let player_position = player_transform.translation.truncate();

    for (mut bot, mut body, mut transform, mut sprite) in bots.iter_mut() {
        let target = player_position + Vec2::new(0.0, bot.hover_offset);
        let offset = target - transform.translation.truncate();
        let distance = offset.length();

        if bot.is_following {
            if distance <= bot.follow_distance {
                bot.is_following = false;
            }
        } else if distance > bot.follow_distance {
            bot.is_following = true;
        }

        let target_velocity = if bot.is_following {
            let direction = offset.normalize_or_zero();
            sprite.face(sign(direction.x));
            direction * bot.speed
        } else {
            Vec2::ZERO
        };

        let blend = (bot.smoothing * delta).min(1.0);
        body.velocity = body.velocity.lerp(target_velocity, blend);
        transform.translation += (body.velocity * delta).extend(0.0);
    }
}

/// Спавн игрока с контроллером и комбо
pub fn spawn_player(commands: &mut Commands, position: Vec2, save_id: &str) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Character::new("player", save_id, PLAYER_FACTION),
            CharacterState::default(),
            Health::new(100),
            Facing::default(),
            SpriteState::default(),
            KinematicBody {
                half_extents: Vec2::new(8.0, 14.0),
                ..Default::default()
            },
            Attacker {
                attack_damage: 25,
                attack_range: 60.0,
                combo_animations: PLAYER_COMBO,
                ..Default::default()
            },
            Player,
            PlayerController::default(),
            PlayerInput::default(),
        ))
        .id()
}

/// Спавн follow-бота (в save/load не участвует)
pub fn spawn_follow_bot(commands: &mut Commands, position: Vec2) -> Entity {
    let mut character = Character::new("bot", "", PLAYER_FACTION);
    character.savable = false;
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            character,
            Facing::default(),
            SpriteState::default(),
            KinematicBody {
                half_extents: Vec2::new(6.0, 6.0),
                gravity: 0.0,
                ..Default::default()
            },
            FollowBot::default(),
        ))
        .id()
}
