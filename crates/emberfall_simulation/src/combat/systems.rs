//! Combat системы: резолв атак, применение урона/лечения, despawn

use bevy::prelude::*;

use crate::combat::events::*;
use crate::combat::DEATH_SEQUENCE_TIME;
use crate::components::{anim, Attacker, Character, CharacterState, DespawnAfter, Enemy, Facing, Health, Player, SpriteState};
use crate::logger;
use crate::persistence::{gather_save_data, SaveManager};
use crate::physics::KinematicBody;
use crate::SimulationTick;

/// Тикает wind-up таймеры и резолвит истекшие атаки
///
/// Удар — point-in-time: все живые цели враждебной фракции в пределах
/// `attack_range` (от центра к центру) получают по DamageEvent. Таймер
/// продолжает идти даже если атакующего выбили в Hurt (начатая атака
/// долетает); Dead отменяет замах без удара.
pub fn resolve_attacks(
    time: Res<Time<Fixed>>,
    mut damage: EventWriter<DamageEvent>,
    mut attackers: Query<(
        Entity,
        &Character,
        &Transform,
        &mut Attacker,
        &mut CharacterState,
    )>,
    targets: Query<(Entity, &Character, &Transform), With<Health>>,
) {
    let delta = time.delta_secs();

    for (entity, character, transform, mut attacker, mut state) in attackers.iter_mut() {
        if !attacker.is_swinging() {
            continue;
        }
        attacker.attack_timer -= delta;
        if attacker.attack_timer > 0.0 {
            continue;
        }
        attacker.attack_timer = 0.0;

        if state.is_dead() {
            continue;
        }

        let origin = transform.translation.truncate();
        for (target, target_character, target_transform) in targets.iter() {
            if target == entity || target_character.faction_id == character.faction_id {
                continue;
            }
            let distance = origin.distance(target_transform.translation.truncate());
            if distance > attacker.attack_range {
                continue;
            }
            damage.write(DamageEvent {
                target,
                amount: attacker.attack_damage,
                source: Some(entity),
            });
        }

        attacker.advance_combo();
        // Hurt не перетираем: stun-выход разрулит владелец состояния
        if *state == CharacterState::Attacking {
            *state = CharacterState::Idle;
        }
    }
}

/// Применяет DamageEvent к целям
///
/// Dead — no-op (смерть идемпотентна). Летальный урон: Dead + стоп +
/// death-анимация + DespawnAfter + регистрация записи is_dead в pending.
/// Нелетальный: Hurt (врагам — взвод stun-таймера).
pub fn apply_damage(
    mut events: EventReader<DamageEvent>,
    mut dealt: EventWriter<DamageDealt>,
    mut health_changed: EventWriter<PlayerHealthChanged>,
    mut player_died: EventWriter<PlayerDied>,
    mut defeated: EventWriter<EnemyDefeated>,
    mut commands: Commands,
    mut save: ResMut<SaveManager>,
    tick: Res<SimulationTick>,
    mut targets: Query<(
        &Character,
        &Transform,
        &Facing,
        &mut Health,
        &mut CharacterState,
        &mut KinematicBody,
        &mut SpriteState,
        Option<&mut Enemy>,
        Option<&Player>,
    )>,
) {
    for event in events.read() {
        let Ok((character, transform, facing, mut health, mut state, mut body, mut sprite, enemy, player)) =
            targets.get_mut(event.target)
        else {
            continue;
        };

        if state.is_dead() {
            continue;
        }

        health.take_damage(event.amount);
        dealt.write(DamageDealt {
            target: event.target,
            amount: event.amount,
            source: event.source,
            tick: tick.0,
        });
        if player.is_some() {
            health_changed.write(PlayerHealthChanged {
                current: health.current,
                max: health.max,
            });
        }

        if health.is_alive() {
            *state = CharacterState::Hurt;
            if let Some(mut enemy) = enemy {
                enemy.hurt_timer = enemy.hurt_duration;
            }
            continue;
        }

        // Смерть: терминальное состояние, entity живёт до конца death-анимации
        *state = CharacterState::Dead;
        body.velocity = Vec2::ZERO;
        sprite.play(anim::DIE);
        commands.entity(event.target).insert(DespawnAfter {
            timer: DEATH_SEQUENCE_TIME,
        });

        if character.savable {
            save.register_pending_data(
                &character.save_id,
                gather_save_data(transform, &health, &state, facing),
            );
        }

        if player.is_some() {
            player_died.write(PlayerDied);
        }
        if enemy.is_some() {
            defeated.write(EnemyDefeated {
                entity: event.target,
            });
        }
        logger::log_info(&format!("{} died", character.name));
    }
}

/// Применяет HealEvent (мёртвых не лечим, current ≤ max)
pub fn apply_healing(
    mut events: EventReader<HealEvent>,
    mut health_changed: EventWriter<PlayerHealthChanged>,
    mut targets: Query<(&mut Health, &CharacterState, Option<&Player>)>,
) {
    for event in events.read() {
        let Ok((mut health, state, player)) = targets.get_mut(event.target) else {
            continue;
        };
        if state.is_dead() {
            continue;
        }
        health.heal(event.amount);
        if player.is_some() {
            health_changed.write(PlayerHealthChanged {
                current: health.current,
                max: health.max,
            });
        }
    }
}

/// Сброс комбо в начало после паузы без атак
pub fn tick_combo_reset(time: Res<Time<Fixed>>, mut attackers: Query<&mut Attacker>) {
    let delta = time.delta_secs();
    for mut attacker in attackers.iter_mut() {
        if attacker.combo_reset_timer <= 0.0 {
            continue;
        }
        attacker.combo_reset_timer -= delta;
        if attacker.combo_reset_timer <= 0.0 {
            attacker.combo_reset_timer = 0.0;
            attacker.combo_index = 0;
        }
    }
}

/// Удаление по истечении DespawnAfter (на границе тика, через Commands)
pub fn despawn_after_timeout(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut query: Query<(Entity, &mut DespawnAfter)>,
) {
    let delta = time.delta_secs();
    for (entity, mut despawn) in query.iter_mut() {
        despawn.timer -= delta;
        if despawn.timer <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
