//! Combat система: wind-up атаки, урон/лечение, смерть и отложенный despawn

pub mod events;
pub mod systems;

pub use events::{
    DamageDealt, DamageEvent, EnemyDefeated, HealEvent, PlayerDied, PlayerHealthChanged,
};
pub use systems::{
    apply_damage, apply_healing, despawn_after_timeout, resolve_attacks, tick_combo_reset,
};

use bevy::prelude::*;

use crate::components::{Attacker, CharacterState, SpriteState};
use crate::physics::KinematicBody;
use crate::SimulationSet;

/// Длительность death-секвенции до удаления из симуляции (секунды)
pub const DEATH_SEQUENCE_TIME: f32 = 0.8;

/// Старт атаки: стоп по X, переход в Attacking, анимация текущего шага
/// комбо, взвод wind-up таймера
///
/// Вызывающий обязан проверить свои предусловия (игрок — grounded и не в
/// атаке, враг — дистанция и attack gate).
pub fn begin_attack(
    attacker: &mut Attacker,
    state: &mut CharacterState,
    body: &mut KinematicBody,
    sprite: &mut SpriteState,
) {
    body.velocity.x = 0.0;
    *state = CharacterState::Attacking;
    sprite.play(attacker.current_animation());
    attacker.start_attack();
}

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageEvent>()
            .add_event::<HealEvent>()
            .add_event::<DamageDealt>()
            .add_event::<PlayerHealthChanged>()
            .add_event::<PlayerDied>()
            .add_event::<EnemyDefeated>()
            .add_systems(
                FixedUpdate,
                (resolve_attacks, apply_damage, apply_healing)
                    .chain()
                    .in_set(SimulationSet::Combat),
            )
            .add_systems(
                FixedUpdate,
                (tick_combo_reset, despawn_after_timeout)
                    .chain()
                    .in_set(SimulationSet::Cleanup),
            );
    }
}
