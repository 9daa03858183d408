//! Интеграционные тесты платформер-контроллера: coyote time, jump
//! buffer, drop-through, присед, double-tap бег, комбо

use bevy::prelude::*;
use emberfall_simulation::*;

fn empty_app() -> App {
    create_headless_app()
}

fn spawn_solid(app: &mut App, center: Vec2, half_extents: Vec2) -> Entity {
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_platform(&mut commands, center, half_extents, false)
    };
    app.world_mut().flush();
    entity
}

fn spawn_one_way(app: &mut App, center: Vec2, half_extents: Vec2) -> Entity {
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_platform(&mut commands, center, half_extents, true)
    };
    app.world_mut().flush();
    entity
}

fn spawn_test_player(app: &mut App, position: Vec2) -> Entity {
    let entity = {
        let mut commands = app.world_mut().commands();
        spawn_player(&mut commands, position, "t::player")
    };
    app.world_mut().flush();
    entity
}

fn set_input(app: &mut App, player: Entity, f: impl FnOnce(&mut PlayerInput)) {
    let mut input = app.world_mut().get_mut::<PlayerInput>(player).unwrap();
    f(&mut input);
}

fn body_of(app: &App, player: Entity) -> &KinematicBody {
    app.world().get::<KinematicBody>(player).unwrap()
}

fn state_of(app: &App, player: Entity) -> CharacterState {
    *app.world().get::<CharacterState>(player).unwrap()
}

#[test]
fn test_walk_speed_and_facing() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));

    step_simulation(&mut app);
    set_input(&mut app, player, |i| i.move_axis = -1.0);
    step_simulation_ticks(&mut app, 2);

    assert_eq!(body_of(&app, player).velocity.x, -120.0);
    assert_eq!(state_of(&app, player), CharacterState::Walking);
    let sprite = app.world().get::<SpriteState>(player).unwrap();
    assert_eq!(sprite.animation, anim::WALK);
    assert!(sprite.flip_h);
}

#[test]
fn test_double_tap_enters_run_and_reversal_cancels() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(2000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    // Первое нажатие вправо
    set_input(&mut app, player, |i| {
        i.move_axis = 1.0;
        i.right_just_pressed = true;
    });
    step_simulation_ticks(&mut app, 3);
    assert_eq!(body_of(&app, player).velocity.x, 120.0);

    // Второе нажатие в окне 0.25s — бег
    set_input(&mut app, player, |i| i.right_just_pressed = true);
    step_simulation(&mut app);
    assert_eq!(body_of(&app, player).velocity.x, 200.0);
    assert_eq!(state_of(&app, player), CharacterState::Running);
    assert_eq!(
        app.world().get::<SpriteState>(player).unwrap().animation,
        anim::RUN
    );

    // Разворот на бегу сбрасывает бег
    set_input(&mut app, player, |i| {
        i.move_axis = -1.0;
        i.left_just_pressed = true;
    });
    step_simulation(&mut app);
    assert_eq!(body_of(&app, player).velocity.x, -120.0);
    assert_ne!(state_of(&app, player), CharacterState::Running);
}

#[test]
fn test_releasing_direction_cancels_run() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(2000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    set_input(&mut app, player, |i| {
        i.move_axis = 1.0;
        i.right_just_pressed = true;
    });
    step_simulation_ticks(&mut app, 2);
    set_input(&mut app, player, |i| i.right_just_pressed = true);
    step_simulation(&mut app);
    assert_eq!(state_of(&app, player), CharacterState::Running);

    set_input(&mut app, player, |i| i.move_axis = 0.0);
    step_simulation(&mut app);
    assert_eq!(body_of(&app, player).velocity.x, 0.0);

    // Бег не «запоминается» после остановки
    set_input(&mut app, player, |i| i.move_axis = 1.0);
    step_simulation(&mut app);
    assert_eq!(body_of(&app, player).velocity.x, 120.0);
}

#[test]
fn test_crouch_slows_and_suppresses_jump() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    set_input(&mut app, player, |i| {
        i.down_held = true;
        i.move_axis = 1.0;
    });
    step_simulation_ticks(&mut app, 2);
    assert_eq!(body_of(&app, player).velocity.x, 50.0);
    assert_eq!(
        app.world().get::<SpriteState>(player).unwrap().animation,
        anim::CROUCH_WALK
    );

    // Прыжок в приседе заблокирован (пол solid — drop-through тоже нет)
    set_input(&mut app, player, |i| {
        i.down_held = true;
        i.move_axis = 0.0;
        i.jump_just_pressed = true;
    });
    step_simulation_ticks(&mut app, 3);
    assert!(body_of(&app, player).grounded);
    assert_eq!(body_of(&app, player).velocity.y, 0.0);
    assert_eq!(
        app.world().get::<SpriteState>(player).unwrap().animation,
        anim::CROUCH
    );
}

#[test]
fn test_coyote_jump_after_leaving_ledge() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(20.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));

    set_input(&mut app, player, |i| i.move_axis = 1.0);
    // Идём вправо до схода с края (кромка опоры на x=28)
    for _ in 0..16 {
        set_input(&mut app, player, |i| i.move_axis = 1.0);
        step_simulation(&mut app);
    }
    assert!(!body_of(&app, player).grounded);

    // Сразу после схода прыжок ещё разрешён
    set_input(&mut app, player, |i| i.jump_just_pressed = true);
    step_simulation(&mut app);
    assert!(body_of(&app, player).velocity.y > 250.0);
    assert_eq!(state_of(&app, player), CharacterState::Jumping);
}

#[test]
fn test_no_jump_after_coyote_window_expires() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(20.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));

    for _ in 0..16 {
        set_input(&mut app, player, |i| i.move_axis = 1.0);
        step_simulation(&mut app);
    }
    assert!(!body_of(&app, player).grounded);

    // Окно coyote (0.12s = 7 тиков) истекает в свободном падении
    step_simulation_ticks(&mut app, 12);
    set_input(&mut app, player, |i| i.jump_just_pressed = true);
    step_simulation(&mut app);
    assert!(body_of(&app, player).velocity.y < 0.0);
}

#[test]
fn test_jump_buffer_fires_on_landing() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    // Чуть выше пола — короткое падение
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 20.0));

    step_simulation(&mut app);
    assert!(!body_of(&app, player).grounded);

    // Нажатие в воздухе незадолго до приземления
    set_input(&mut app, player, |i| i.jump_just_pressed = true);

    let mut max_upward = f32::MIN;
    for _ in 0..12 {
        step_simulation(&mut app);
        max_upward = max_upward.max(body_of(&app, player).velocity.y);
    }
    // Буфер сработал при касании пола
    assert!(max_upward > 250.0);
}

#[test]
fn test_drop_through_one_way_platform() {
    let mut app = empty_app();
    let ground = spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let ledge = spawn_one_way(&mut app, Vec2::new(0.0, 40.0), Vec2::new(50.0, 4.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 58.0));

    step_simulation_ticks(&mut app, 2);
    assert_eq!(body_of(&app, player).last_floor, Some(ledge));

    set_input(&mut app, player, |i| {
        i.down_held = true;
        i.jump_just_pressed = true;
    });
    step_simulation(&mut app);

    // Коллизия с уступом снята ровно на drop_through_duration
    assert!(body_of(&app, player).has_collision_exception(ledge));
    set_input(&mut app, player, |i| i.down_held = false);

    step_simulation_ticks(&mut app, 15);
    assert!(!body_of(&app, player).has_collision_exception(ledge));

    // Падает насквозь и приземляется на нижний пол
    step_simulation_ticks(&mut app, 30);
    let body = body_of(&app, player);
    assert!(body.grounded);
    assert_eq!(body.last_floor, Some(ground));
    let y = app.world().get::<Transform>(player).unwrap().translation.y;
    assert!((y - 14.0).abs() < 1e-3);
}

#[test]
fn test_drop_through_refused_over_pit() {
    let mut app = empty_app();
    // Единственная опора; до пола ниже слишком далеко
    let ledge = spawn_one_way(&mut app, Vec2::new(0.0, 196.0), Vec2::new(50.0, 4.0));
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 214.0));

    step_simulation_ticks(&mut app, 2);
    set_input(&mut app, player, |i| {
        i.down_held = true;
        i.jump_just_pressed = true;
    });
    step_simulation_ticks(&mut app, 2);

    assert!(!body_of(&app, player).has_collision_exception(ledge));
    assert!(body_of(&app, player).grounded);
}

#[test]
fn test_attack_freezes_horizontal_and_advances_combo() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    set_input(&mut app, player, |i| {
        i.move_axis = 1.0;
        i.attack_just_pressed = true;
    });
    step_simulation(&mut app);

    assert_eq!(state_of(&app, player), CharacterState::Attacking);
    assert_eq!(body_of(&app, player).velocity.x, 0.0);
    assert_eq!(
        app.world().get::<SpriteState>(player).unwrap().animation,
        anim::PUNCH_CROSS
    );

    // Резолв wind-up'а продвигает комбо
    step_simulation_ticks(&mut app, 25);
    let attacker = app.world().get::<Attacker>(player).unwrap();
    assert_eq!(attacker.combo_index, 1);
    assert_eq!(attacker.current_animation(), anim::PUNCH_JAB);
}

#[test]
fn test_combo_resets_after_idle_window() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    set_input(&mut app, player, |i| i.attack_just_pressed = true);
    step_simulation_ticks(&mut app, 26);
    set_input(&mut app, player, |i| i.attack_just_pressed = true);
    step_simulation_ticks(&mut app, 26);
    assert_eq!(app.world().get::<Attacker>(player).unwrap().combo_index, 2);

    // 3.5s без атак — комбо в начало
    step_simulation_ticks(&mut app, 211);
    assert_eq!(app.world().get::<Attacker>(player).unwrap().combo_index, 0);
}

#[test]
fn test_airborne_animation_precedence() {
    let mut app = empty_app();
    spawn_solid(&mut app, Vec2::new(0.0, -10.0), Vec2::new(1000.0, 10.0));
    let player = spawn_test_player(&mut app, Vec2::new(0.0, 14.0));
    step_simulation(&mut app);

    set_input(&mut app, player, |i| i.jump_just_pressed = true);
    step_simulation(&mut app);
    assert_eq!(
        app.world().get::<SpriteState>(player).unwrap().animation,
        anim::JUMP
    );

    // На нисходящей дуге — fall
    step_simulation_ticks(&mut app, 30);
    let sprite = app.world().get::<SpriteState>(player).unwrap();
    if !body_of(&app, player).grounded {
        assert_eq!(sprite.animation, anim::FALL);
    }
}
