//! Engine tick integration tests: intent, movement, animation selection and
//! footstep audio driven through one fixed-step schedule, without a window.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;

use chuckie::components::animation::{Animation, Facing};
use chuckie::components::inputcontrolled::InputControlled;
use chuckie::components::mapposition::MapPosition;
use chuckie::components::rigidbody::RigidBody;
use chuckie::components::signals::{MOVING, Signals};
use chuckie::components::sprite::Sprite;
use chuckie::error::AnimationError;
use chuckie::events::audio::AudioCmd;
use chuckie::game::{IDLE_CLIP, IDLE_SHEET, WALK_CLIP, WALK_SHEET, player_controller};
use chuckie::resources::animationstore::AnimationTable;
use chuckie::resources::input::InputState;
use chuckie::resources::worldtime::WorldTime;
use chuckie::spritesheet::parse_descriptor;
use chuckie::systems::animation::{animation, animation_controller};
use chuckie::systems::audio::{FootstepAudio, footstep_audio};
use chuckie::systems::inputcontroller::input_intent_controller;
use chuckie::systems::movement::movement;
use chuckie::systems::time::update_world_time;

const EPSILON: f32 = 1e-3;
const SPEED: f32 = 500.0;
const GRAVITY: f32 = 200.0;
const TICK_RATE: u32 = 50;

const DESCRIPTOR: &str = "\
# player clips
walk, 0, 0, 66, 92, 6, 5, loop
idle, 0, 0, 66, 92, 1, 0, loop, sheet=player_idle
";

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn player_table() -> Arc<AnimationTable> {
    let mut sheets = FxHashMap::default();
    sheets.insert(WALK_SHEET.to_string(), (396, 92));
    sheets.insert(IDLE_SHEET.to_string(), (66, 92));
    Arc::new(parse_descriptor(DESCRIPTOR, WALK_SHEET, &sheets).unwrap())
}

fn make_world() -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(WorldTime::fixed(TICK_RATE));
    world.insert_resource(InputState::default());
    world.insert_resource(FootstepAudio::new("steps"));
    world.init_resource::<Messages<AudioCmd>>();

    let player = world
        .spawn((
            MapPosition::new(150.0, 150.0),
            Sprite::new(IDLE_SHEET, 66.0, 92.0),
            Animation::with_clip(player_table(), IDLE_CLIP).unwrap(),
            player_controller(),
            RigidBody::with_gravity(GRAVITY),
            InputControlled::new(SPEED),
            Signals::default(),
        ))
        .id();
    (world, player)
}

fn make_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            input_intent_controller,
            movement,
            animation_controller,
            animation,
            footstep_audio,
        )
            .chain(),
    );
    schedule
}

fn tick(world: &mut World, schedule: &mut Schedule) {
    update_world_time(world);
    schedule.run(world);
}

fn hold(world: &mut World, left: bool, right: bool) {
    let mut input = world.resource_mut::<InputState>();
    input.move_left.active = left;
    input.move_right.active = right;
}

fn position(world: &World, e: Entity) -> Vector2 {
    world.get::<MapPosition>(e).unwrap().pos
}

fn clip(world: &World, e: Entity) -> String {
    world
        .get::<Animation>(e)
        .unwrap()
        .clip_name()
        .unwrap_or_default()
        .to_string()
}

fn drain_audio(world: &mut World) -> Vec<AudioCmd> {
    world.resource_mut::<Messages<AudioCmd>>().drain().collect()
}

#[test]
fn single_intent_walks_exactly_speed_per_tick() {
    let (mut world, player) = make_world();
    let mut schedule = make_schedule();
    let dt = world.resource::<WorldTime>().delta_f32();

    hold(&mut world, false, true);
    for _ in 0..20 {
        let before = position(&world, player).x;
        tick(&mut world, &mut schedule);
        assert!(approx_eq(position(&world, player).x - before, SPEED * dt));
        assert_eq!(clip(&world, player), WALK_CLIP);
    }

    hold(&mut world, true, false);
    for _ in 0..20 {
        let before = position(&world, player).x;
        tick(&mut world, &mut schedule);
        assert!(approx_eq(position(&world, player).x - before, -SPEED * dt));
        assert_eq!(clip(&world, player), WALK_CLIP);
    }
    assert_eq!(world.get::<Animation>(player).unwrap().facing, Facing::Left);
    assert!(world.get::<Sprite>(player).unwrap().flip_h);
}

#[test]
fn both_or_neither_intent_stands_idle() {
    let (mut world, player) = make_world();
    let mut schedule = make_schedule();

    for (left, right) in [(false, false), (true, true), (false, false)] {
        hold(&mut world, left, right);
        for _ in 0..10 {
            let before = position(&world, player).x;
            tick(&mut world, &mut schedule);
            assert_eq!(position(&world, player).x, before);
            assert_eq!(clip(&world, player), IDLE_CLIP);
            assert!(!world.get::<Signals>(player).unwrap().has_flag(MOVING));
        }
    }
}

#[test]
fn holding_a_direction_does_not_restart_the_walk_cycle() {
    let (mut world, player) = make_world();
    let mut schedule = make_schedule();
    hold(&mut world, false, true);

    // walk is 6 frames at 5 fps: one frame every 10 ticks at 50 Hz
    let mut frames = Vec::new();
    for _ in 0..30 {
        tick(&mut world, &mut schedule);
        frames.push(world.get::<Animation>(player).unwrap().frame_index());
    }
    assert_eq!(frames[8], 0);
    assert_eq!(frames[9], 1);
    assert_eq!(frames[19], 2);
    assert_eq!(frames[29], 3);
    assert!(frames.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn changing_clip_resets_frame_and_switches_sheet() {
    let (mut world, player) = make_world();
    let mut schedule = make_schedule();

    hold(&mut world, false, true);
    for _ in 0..25 {
        tick(&mut world, &mut schedule);
    }
    assert_eq!(world.get::<Animation>(player).unwrap().frame_index(), 2);
    assert_eq!(world.get::<Sprite>(player).unwrap().tex_key, WALK_SHEET);

    hold(&mut world, false, false);
    tick(&mut world, &mut schedule);
    assert_eq!(clip(&world, player), IDLE_CLIP);
    assert_eq!(world.get::<Animation>(player).unwrap().frame_index(), 0);
    assert_eq!(world.get::<Sprite>(player).unwrap().tex_key, IDLE_SHEET);

    hold(&mut world, false, true);
    tick(&mut world, &mut schedule);
    assert_eq!(world.get::<Animation>(player).unwrap().frame_index(), 0);
    assert_eq!(world.get::<Sprite>(player).unwrap().offset.x, 0.0);
}

#[test]
fn gravity_free_fall_is_monotonic_and_accelerating() {
    let (mut world, player) = make_world();
    let mut schedule = make_schedule();

    let start = position(&world, player).y;
    let mut last_y = start;
    let mut last_step = 0.0;
    for _ in 0..100 {
        tick(&mut world, &mut schedule);
        let y = position(&world, player).y;
        let step = y - last_y;
        assert!(y > last_y);
        assert!(step > last_step);
        last_y = y;
        last_step = step;
    }

    // semi-implicit Euler: d(M) = g * dt^2 * M(M+1)/2
    let dt = 1.0 / TICK_RATE as f32;
    let m = 100.0;
    let expected = GRAVITY * dt * dt * m * (m + 1.0) / 2.0;
    assert!((last_y - start - expected).abs() < 0.05);
}

#[test]
fn every_controlled_entity_is_simulated() {
    let (mut world, first) = make_world();
    let second = world
        .spawn((
            MapPosition::new(400.0, 150.0),
            Sprite::new(IDLE_SHEET, 66.0, 92.0),
            Animation::with_clip(player_table(), IDLE_CLIP).unwrap(),
            player_controller(),
            RigidBody::with_gravity(GRAVITY),
            InputControlled::new(SPEED),
            Signals::default(),
        ))
        .id();
    let mut schedule = make_schedule();

    hold(&mut world, true, false);
    tick(&mut world, &mut schedule);
    assert!(position(&world, first).x < 150.0);
    assert!(position(&world, second).x < 400.0);
    assert_eq!(clip(&world, second), WALK_CLIP);
}

#[test]
fn footsteps_start_and_stop_with_walking() {
    let (mut world, _player) = make_world();
    let mut schedule = make_schedule();

    tick(&mut world, &mut schedule);
    assert!(drain_audio(&mut world).is_empty());

    hold(&mut world, false, true);
    tick(&mut world, &mut schedule);
    assert_eq!(
        drain_audio(&mut world),
        vec![AudioCmd::PlayFxLooped { id: "steps".into() }]
    );
    for _ in 0..5 {
        tick(&mut world, &mut schedule);
    }
    assert!(drain_audio(&mut world).is_empty());

    hold(&mut world, true, true);
    tick(&mut world, &mut schedule);
    assert_eq!(
        drain_audio(&mut world),
        vec![AudioCmd::StopFx { id: "steps".into() }]
    );
}

#[test]
fn unknown_clip_request_fails() {
    let mut animation = Animation::with_clip(player_table(), IDLE_CLIP).unwrap();
    assert_eq!(
        animation.play("jump"),
        Err(AnimationError::UnknownClip {
            name: "jump".into()
        })
    );
    assert_eq!(animation.clip_name(), Some(IDLE_CLIP));
}
