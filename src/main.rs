/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use env_logger::Env;
use log::{error, info};

use config::GameConfig;
use sim::event::GameEvent;
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const RESTART_MESSAGE_TICKS: u32 = 15;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();
    info!("maze {}x{}, seed {:?}", config.rules.width, config.rules.height, config.seed);

    let mut world = WorldState::new(config.rules.clone(), config.seed)?;

    let mut renderer = Renderer::new();
    let enhanced_keys = match renderer.init() {
        Ok(enhanced) => enhanced,
        Err(e) => {
            // Raw mode may already be on; leave the terminal usable.
            let _ = renderer.cleanup();
            return Err(e.into());
        }
    };

    let sound = SoundEngine::new(&config.assets_dir);

    let result = game_loop(&mut world, &mut renderer, sound.as_ref(), &config, enhanced_keys);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = &result {
        error!("game loop stopped: {e}");
    }

    println!();
    println!("Thanks for playing Lunar Labyrinth!");
    println!("Reached level {} with a score of {}", world.player.level, world.player.score);

    result
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
    enhanced_keys: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    kb.honor_release = enhanced_keys;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        info!("gamepad connected");
    }

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut events = Vec::new();

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_requested() || gp.quit_pressed() {
            break;
        }

        if kb.restart_pressed() || gp.restart_pressed() {
            match world.restart_level() {
                Ok(()) => world.set_message("A fresh labyrinth", RESTART_MESSAGE_TICKS),
                Err(e) => {
                    error!("restart failed: {e}");
                    world.set_message("The labyrinth refuses to shift", RESTART_MESSAGE_TICKS);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let mut input = kb.take_frame_input();
            gp.merge_into(&mut input);

            events.clear();
            step::step(world, input, &mut events);
            process_sound_events(sound, &events);

            last_tick = Instant::now();
        }

        renderer.render(world)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::Moved { .. } => sfx.play_move(),
            GameEvent::KeyCollected { .. } => sfx.play_key(),
            GameEvent::Trapped { .. } => sfx.play_trap(),
            GameEvent::LevelAdvanced { .. } => sfx.play_level(),
            _ => {}
        }
    }
}
