// crates/systems/flame_wii/src/main.rs - Wii Memory Emulator
mod config;
mod demo;

use crate::config::{ConfigError, EmulatorConfig, USAGE};
use crate::demo::DemoState;
use flame_audio::{AudioConfig, FlameAudio};
use flame_core::map::{MEM1_CACHED_BASE, REG_AUDIO_FREQ, REG_INPUT_STATE, REG_VIDEO_BG_COLOR};
use flame_core::{AddressSpace, MemoryBus};
use flame_display::{DisplayConfig, FlameDisplay};
use flame_input::FlameInput;
use log::{error, info, trace, warn};
use std::cell::RefCell;
use std::env;
use std::process;
use std::rc::Rc;
use std::time::Instant;
use thiserror::Error;

const MEM_TEST_PATTERN: u32 = 0xDEAD_BEEF;

#[derive(Error, Debug)]
enum WiiError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("Failed to create window: {0}")]
    Display(#[from] minifb::Error),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("Failed to initialize emulator: {}", e);
        if matches!(e, WiiError::Config(_)) {
            eprintln!("{}", USAGE);
        }
        process::exit(1);
    }
}

fn run() -> Result<(), WiiError> {
    let config = EmulatorConfig::from_args(env::args().skip(1))?;

    let display = Rc::new(RefCell::new(FlameDisplay::new(DisplayConfig {
        scale: config.scale,
        target_fps: config.target_fps,
        ..Default::default()
    })?));
    let input = Rc::new(RefCell::new(FlameInput::new()));

    // Audio is optional: without a device the tone register just stores its value.
    let audio = if config.mute {
        None
    } else {
        match FlameAudio::new(AudioConfig::default()) {
            Ok(audio) => Some(Rc::new(RefCell::new(audio))),
            Err(e) => {
                warn!("{}; continuing without audio", e);
                None
            }
        }
    };

    let mut bus = AddressSpace::new();
    bus.bind_video(&display);
    bus.bind_input(&input);
    if let Some(audio) = &audio {
        bus.bind_audio(audio);
    }

    info!("Wii Memory Emulator started - {} FPS", config.target_fps);
    info!("Controls:");
    info!("  Arrow Keys: Change background color (R/G channels)");
    info!("  A/B: Change audio tone frequency");
    info!("  Space: Toggle audio on/off");
    info!("  ESC/Close: Quit");

    run_loop(&mut bus, &display, &input, &config);
    Ok(())
}

fn run_loop(
    bus: &mut AddressSpace,
    display: &Rc<RefCell<FlameDisplay>>,
    input: &Rc<RefCell<FlameInput>>,
    config: &EmulatorConfig,
) {
    let mut demo = DemoState::new();
    let mut mem_test_done = false;
    let mut frame_count = 0u64;
    let mut last_fps_log = Instant::now();

    loop {
        let frame_start = Instant::now();

        // Poll input once per tick, before anything reads the input register
        {
            let keys = display.borrow().get_keys();
            let open = display.borrow().is_open();
            input.borrow_mut().update(&keys, open);
        }
        if input.borrow().should_quit() {
            break;
        }

        let buttons = bus.read32(REG_INPUT_STATE);
        let writes = demo.step(buttons);
        bus.write32(REG_VIDEO_BG_COLOR, writes.bg_color);
        bus.write32(REG_AUDIO_FREQ, writes.tone);
        trace!("buttons={:08X} bg={:08X} tone={}", buttons, writes.bg_color, writes.tone);

        if !mem_test_done {
            bus.write32(MEM1_CACHED_BASE, MEM_TEST_PATTERN);
            let read = bus.read32(MEM1_CACHED_BASE);
            info!("Memory test - Written: 0x{:08X}, Read: 0x{:08X}", MEM_TEST_PATTERN, read);
            mem_test_done = true;
        }

        if let Some(fault) = bus.bus_error() {
            warn!("Bus fault at 0x{:08X} this frame", fault.address());
            bus.ack_bus_error();
        }

        display.borrow_mut().present();

        frame_count += 1;
        if frame_count % config.fps_log_interval == 0 {
            let elapsed = frame_start.duration_since(last_fps_log).as_secs_f64();
            if elapsed > 0.0 {
                info!(
                    "FPS: {:.2} (last second: {})",
                    config.fps_log_interval as f64 / elapsed,
                    display.borrow().fps()
                );
            }
            last_fps_log = frame_start;
        }
    }

    info!("Done. {} frames.", frame_count);
}
