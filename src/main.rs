//! Chuckie main entry point.
//!
//! A 2D side-scroller skeleton written in Rust using:
//! - **raylib** for windowing, graphics, and audio
//! - **bevy_ecs** for entity-component-system architecture
//!
//! # Main Loop
//!
//! 1. Load the configuration and open the window
//! 2. [`game::setup`] loads fonts, textures, animations and audio and spawns
//!    the player and the title label
//! 3. Every iteration advances the fixed simulation clock by one tick, runs
//!    input, simulation and rendering; raylib paces frames to `target_fps`
//! 4. On quit, [`game::teardown`] releases everything in reverse order
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config ./config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process::ExitCode;

use bevy_ecs::prelude::*;
use chuckie::error::{GameError, LoadError};
use chuckie::game;
use chuckie::resources::exitflag::{ExitFlag, Interrupt};
use chuckie::resources::gameconfig::GameConfig;
use chuckie::systems::animation::{animation, animation_controller};
use chuckie::systems::audio::{
    footstep_audio, forward_audio_cmds, poll_audio_messages, update_bevy_audio_cmds,
    update_bevy_audio_messages,
};
use chuckie::systems::input::{interrupt_quit, update_input_state};
use chuckie::systems::inputcontroller::input_intent_controller;
use chuckie::systems::movement::movement;
use chuckie::systems::render::render_system;
use chuckie::systems::time::update_world_time;
use clap::Parser;
use log::{error, info, warn};

/// Chuckie 2D
#[derive(Parser)]
#[command(version, about = "A tiny 2D side-scroller.")]
struct Cli {
    /// Configuration file (INI). Missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Override the assets directory from the configuration.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<GameConfig, LoadError> {
    let mut config = GameConfig::with_path(&cli.config);
    if config.config_path.exists() {
        config.load_from_file()?;
    } else {
        warn!(
            "Config file {} not found, using defaults",
            config.config_path.display()
        );
    }
    if let Some(dir) = &cli.assets {
        config.assets_dir = dir.clone();
    }
    Ok(config)
}

fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            interrupt_quit,
            update_input_state,
            input_intent_controller,
            movement,
            animation_controller,
            animation,
            footstep_audio,
            // audio systems must be together
            (
                forward_audio_cmds,
                update_bevy_audio_cmds,
                poll_audio_messages,
                update_bevy_audio_messages,
            )
                .chain(),
            render_system,
        )
            .chain(),
    );
    update
}

fn run(cli: Cli) -> Result<(), GameError> {
    let config = load_config(&cli)?;

    let mut builder = raylib::init();
    builder
        .size(config.window_width as i32, config.window_height as i32)
        .title(&config.title);
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    // Escape is a game binding, not a window close
    rl.set_exit_key(None);

    let mut world = World::new();
    if let Err(e) = game::setup(&mut rl, &thread, &mut world, &config) {
        game::teardown(&mut world);
        return Err(e);
    }
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    let interrupt = Interrupt::default();
    if let Err(e) = interrupt.install() {
        warn!("Interrupt handler not installed: {}", e);
    }
    world.insert_resource(interrupt);

    let mut update = build_schedule();
    info!(
        "Running at {} ticks/s, {} fps target",
        config.tick_rate, config.target_fps
    );

    // --------------- Main loop ---------------
    while !world.resource::<ExitFlag>().is_requested() {
        update_world_time(&mut world);
        update.run(&mut world);
        world.clear_trackers();
    }

    game::teardown(&mut world);
    Ok(())
}
