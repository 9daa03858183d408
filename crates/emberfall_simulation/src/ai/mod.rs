//! Enemy AI: per-tick решения, архетипы движения, spawn-пресеты

pub mod chase;

pub use chase::{flying_chase, ground_chase, ChaseOutcome};

use bevy::prelude::*;

use crate::combat::{begin_attack, DamageEvent};
use crate::components::{
    anim, Attacker, Character, CharacterState, Enemy, EnemyArchetype, Facing, Health, Player,
    SpriteState, ENEMY_FACTION,
};
use crate::physics::{
    collect_platforms, contact_range_from_footprint, move_and_slide, KinematicBody, Platform,
};
use crate::SimulationSet;

pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            init_contact_damage_range.in_set(SimulationSet::Spawn),
        )
        // Враги видят позицию игрока уже текущего тика
        .add_systems(
            FixedUpdate,
            enemy_decision
                .after(crate::player::player_controller)
                .in_set(SimulationSet::Control),
        );
    }
}

/// Выводит contact damage дистанцию из габаритов коллайдера, если она не
/// задана явно
pub fn init_contact_damage_range(
    mut spawned: Query<(&mut Enemy, &KinematicBody), Added<Enemy>>,
) {
    for (mut enemy, body) in spawned.iter_mut() {
        if enemy.contact_damage_range <= 0.0 {
            enemy.contact_damage_range = contact_range_from_footprint(body.half_extents);
        }
    }
}

/// Per-tick решение врага: attack gate → detection gate → idle
///
/// Игрок ищется по роли (маркер Player); если его нет в мире — тик
/// пропускается, только гравитация и интеграция. Dead — без решений и
/// без движения. Attacking/Hurt замораживают горизонталь.
pub fn enemy_decision(
    time: Res<Time<Fixed>>,
    platform_query: Query<(Entity, &Transform, &Platform)>,
    player_query: Query<(Entity, &Transform), (With<Player>, Without<Enemy>)>,
    mut enemies: Query<
        (
            Entity,
            &mut Enemy,
            &EnemyArchetype,
            &mut Attacker,
            &mut CharacterState,
            &mut KinematicBody,
            &mut Transform,
            &mut Facing,
            &mut SpriteState,
        ),
        (With<Enemy>, Without<Player>, Without<Platform>),
    >,
    mut damage: EventWriter<DamageEvent>,
) {
    let delta = time.delta_secs();
    let platforms = collect_platforms(platform_query.iter());
    let player = player_query.iter().next();

    for (entity, mut enemy, archetype, mut attacker, mut state, mut body, mut transform, mut facing, mut sprite) in
        enemies.iter_mut()
    {
        if state.is_dead() {
            continue;
        }

        if enemy.applies_gravity && !body.grounded {
            body.velocity.y += body.gravity * delta;
        }

        let Some((player_entity, player_transform)) = player else {
            // Игрок ещё не заспавнился: решений нет, пробуем в следующем тике
            move_and_slide(&mut body, &mut transform, &platforms, delta);
            continue;
        };

        let offset = player_transform.translation.truncate() - transform.translation.truncate();
        let distance = offset.length();

        if *state == CharacterState::Hurt {
            enemy.hurt_timer -= delta;
            if enemy.hurt_timer <= 0.0 {
                enemy.hurt_timer = 0.0;
                *state = CharacterState::Idle;
            }
        }

        if matches!(*state, CharacterState::Attacking | CharacterState::Hurt) {
            body.velocity.x = 0.0;
            move_and_slide(&mut body, &mut transform, &platforms, delta);
            continue;
        }

        // Attack gate: летающим grounded не нужен
        let attack_footing = body.grounded || !enemy.applies_gravity;
        if enemy.can_attack && distance <= attacker.attack_range && attack_footing {
            begin_attack(&mut attacker, &mut state, &mut body, &mut sprite);
            move_and_slide(&mut body, &mut transform, &platforms, delta);
            continue;
        }

        if distance <= enemy.detection_range {
            let outcome = match archetype {
                EnemyArchetype::Ground => {
                    ground_chase(offset, body.velocity, facing.direction, body.grounded, &enemy, None)
                }
                EnemyArchetype::Jumping { jump_threshold } => ground_chase(
                    offset,
                    body.velocity,
                    facing.direction,
                    body.grounded,
                    &enemy,
                    Some(*jump_threshold),
                ),
                EnemyArchetype::Flying { vertical_speed } => {
                    flying_chase(offset, body.velocity, facing.direction, &enemy, *vertical_speed)
                }
            };
            body.velocity = outcome.velocity;
            facing.direction = outcome.facing;
            *state = outcome.state;
            sprite.face(facing.direction);
            match *state {
                CharacterState::Chasing if !enemy.applies_gravity => sprite.play(anim::FLY),
                CharacterState::Chasing if body.velocity.y > 0.0 => sprite.play(anim::JUMP),
                CharacterState::Chasing => sprite.play(anim::WALK),
                _ => sprite.play(anim::IDLE),
            }
        } else {
            *state = CharacterState::Idle;
            body.velocity.x = 0.0;
            sprite.play(anim::IDLE);
        }

        move_and_slide(&mut body, &mut transform, &platforms, delta);

        if !enemy.can_attack {
            apply_contact_damage(&mut enemy, &attacker, distance, entity, player_entity, delta, &mut damage);
        }
    }
}

/// Contact damage с кулдауном для врагов без melee-атак
fn apply_contact_damage(
    enemy: &mut Enemy,
    attacker: &Attacker,
    distance: f32,
    source: Entity,
    player: Entity,
    delta: f32,
    damage: &mut EventWriter<DamageEvent>,
) {
    if enemy.contact_damage_timer > 0.0 {
        enemy.contact_damage_timer -= delta;
        return;
    }
    if distance > enemy.contact_damage_range {
        return;
    }
    damage.write(DamageEvent {
        target: player,
        amount: attacker.attack_damage,
        source: Some(source),
    });
    enemy.contact_damage_timer = enemy.contact_damage_cooldown;
}

/// Медленный наземный враг, урон только касанием
pub fn spawn_crawler(commands: &mut Commands, position: Vec2, save_id: &str) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Character::new("crawler", save_id, ENEMY_FACTION),
            CharacterState::default(),
            Health::new(30),
            Facing::default(),
            SpriteState::default(),
            KinematicBody {
                half_extents: Vec2::new(10.0, 8.0),
                ..Default::default()
            },
            Attacker {
                attack_damage: 10,
                ..Default::default()
            },
            Enemy {
                can_attack: false,
                speed: 40.0,
                ..Default::default()
            },
            EnemyArchetype::Ground,
        ))
        .id()
}

/// Прыгающий melee-враг
pub fn spawn_brute(commands: &mut Commands, position: Vec2, save_id: &str) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Character::new("brute", save_id, ENEMY_FACTION),
            CharacterState::default(),
            Health::new(50),
            Facing::default(),
            SpriteState::default(),
            KinematicBody {
                half_extents: Vec2::new(12.0, 16.0),
                ..Default::default()
            },
            Attacker {
                attack_damage: 10,
                attack_range: 30.0,
                ..Default::default()
            },
            Enemy {
                speed: 80.0,
                ..Default::default()
            },
            EnemyArchetype::Jumping {
                jump_threshold: 20.0,
            },
        ))
        .id()
}

/// Летающий жалящий враг
pub fn spawn_stinger(commands: &mut Commands, position: Vec2, save_id: &str) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position.extend(0.0)),
            Character::new("stinger", save_id, ENEMY_FACTION),
            CharacterState::default(),
            Health::new(20),
            Facing::default(),
            SpriteState::default(),
            KinematicBody {
                half_extents: Vec2::new(8.0, 8.0),
                ..Default::default()
            },
            Attacker {
                attack_damage: 5,
                attack_range: 25.0,
                ..Default::default()
            },
            Enemy {
                applies_gravity: false,
                ..Default::default()
            },
            EnemyArchetype::Flying {
                vertical_speed: 80.0,
            },
        ))
        .id()
}
