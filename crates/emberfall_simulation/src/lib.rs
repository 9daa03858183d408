//! EMBERFALL Simulation Core
//!
//! Headless ECS-симуляция геймплея 2D side-scroller'а:
//! - state machine персонажей (health, урон, смерть, despawn)
//! - combat (wind-up атаки, комбо, contact damage)
//! - enemy AI (ground / jumping / flying архетипы)
//! - платформер-контроллер (coyote time, jump buffer, drop-through, бег)
//! - save/load (слоты, pending-apply через смену сцен, настройки)
//!
//! Фиксированный шаг 60 Гц; рендер/ввод/аудио — забота фронтенда,
//! интеграция через события и компонент `PlayerInput`.

use bevy::prelude::*;

pub mod ai;
pub mod combat;
pub mod components;
pub mod game_state;
pub mod logger;
pub mod persistence;
pub mod physics;
pub mod player;

pub use ai::{spawn_brute, spawn_crawler, spawn_stinger, AIPlugin};
pub use combat::{
    begin_attack, CombatPlugin, DamageDealt, DamageEvent, EnemyDefeated, HealEvent, PlayerDied,
    PlayerHealthChanged,
};
pub use components::*;
pub use game_state::{GameState, GameStateChanged, GameStateManager};
pub use persistence::{
    apply_save_data, gather_save_data, ActiveScene, CharacterSaveData, LoadGameRequest,
    PersistencePlugin, SaveGameRequest, SaveManager, SceneChangeRequest,
};
pub use physics::{
    move_and_slide, raycast_down, spawn_platform, KinematicBody, Platform,
};
pub use player::{spawn_follow_bot, spawn_player, PlayerPlugin, PLAYER_COMBO};

/// Счётчик тиков симуляции (timestamp для combat-событий)
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimulationTick(pub u64);

fn advance_tick(mut tick: ResMut<SimulationTick>) {
    tick.0 += 1;
}

/// Порядок подсистем внутри фиксированного тика
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Tick,
    /// Применение pending save-данных и инициализация спавна
    Spawn,
    /// Решения игрока и врагов + интеграция движения
    Control,
    /// Резолв атак и применение урона
    Combat,
    /// Таймеры, despawn
    Cleanup,
    /// Save/load запросы
    Persistence,
}

/// Агрегирует все подсистемы core'а
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<SimulationTick>()
            .init_resource::<GameStateManager>()
            .add_event::<GameStateChanged>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Tick,
                    SimulationSet::Spawn,
                    SimulationSet::Control,
                    SimulationSet::Combat,
                    SimulationSet::Cleanup,
                    SimulationSet::Persistence,
                )
                    .chain(),
            )
            .add_systems(FixedUpdate, advance_tick.in_set(SimulationSet::Tick))
            .add_plugins((CombatPlugin, AIPlugin, PlayerPlugin, PersistencePlugin));
    }
}

/// Минимальный headless App со всей симуляцией
pub fn create_headless_app() -> App {
    logger::init_logger();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
    app
}

/// Продвигает симуляцию ровно на один фиксированный тик
///
/// В обход real-time аккумулятора: время двигается вручную, поэтому
/// тесты и headless-прогоны детерминированы и не ждут wall clock.
pub fn step_simulation(app: &mut App) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(timestep);
    app.world_mut().run_schedule(FixedUpdate);
}

/// N тиков подряд
pub fn step_simulation_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        step_simulation(app);
    }
}
