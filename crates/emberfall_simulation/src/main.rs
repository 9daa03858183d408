//! Headless прогон симуляции: уровень из платформ, игрок с ботом,
//! три архетипа врагов, автосейв в конце

use bevy::prelude::*;
use emberfall_simulation::*;

fn main() {
    println!("=== EMBERFALL Simulation (headless) ===\n");

    let mut app = create_headless_app();

    let started = app
        .world_mut()
        .resource_mut::<GameStateManager>()
        .start_game();
    app.world_mut().send_event(started);

    spawn_level(&mut app);
    app.world_mut().flush();

    for tick in 1..=600u32 {
        step_simulation(&mut app);
        if tick % 100 == 0 {
            report(&mut app, tick);
        }
    }

    app.world_mut().send_event(SaveGameRequest { slot: 0 });
    step_simulation(&mut app);

    println!("\nSimulation complete!");
}

fn spawn_level(app: &mut App) {
    let mut commands = app.world_mut().commands();

    // Пол + one-way уступ
    spawn_platform(&mut commands, Vec2::new(0.0, -10.0), Vec2::new(400.0, 10.0), false);
    spawn_platform(&mut commands, Vec2::new(120.0, 40.0), Vec2::new(60.0, 4.0), true);

    let player = spawn_player(&mut commands, Vec2::new(0.0, 14.0), "main::player");
    spawn_follow_bot(&mut commands, Vec2::new(-20.0, 30.0));

    spawn_crawler(&mut commands, Vec2::new(200.0, 8.0), "main::crawler_01");
    spawn_brute(&mut commands, Vec2::new(-250.0, 16.0), "main::brute_01");
    spawn_stinger(&mut commands, Vec2::new(100.0, 120.0), "main::stinger_01");

    println!("Spawned player {player:?}, follow bot and 3 enemies\n");
}

fn report(app: &mut App, tick: u32) {
    let world = app.world_mut();
    let mut players = world.query_filtered::<(&Health, &CharacterState, &Transform), With<Player>>();
    if let Some((health, state, transform)) = players.iter(world).next() {
        println!(
            "tick {tick:4}: player hp {}/{} state {:?} pos ({:.1}, {:.1})",
            health.current,
            health.max,
            state,
            transform.translation.x,
            transform.translation.y
        );
    }
    let mut enemies = world.query_filtered::<&CharacterState, With<Enemy>>();
    let alive = enemies.iter(world).filter(|s| !s.is_dead()).count();
    println!("            enemies alive: {alive}");
}
