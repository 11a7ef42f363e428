//! RoboEyes - animated eyes for small displays
//!
//! Loads the screen and eye configuration, then runs an animation script on
//! the configured canvas until the script ends or a signal arrives.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roboeyes::{
    config::ConfigManager,
    eyes::Script,
    render::HeadlessDisplay,
    Animator, Renderer, ShutdownCoordinator,
};

/// CLI arguments for RoboEyes
#[derive(Parser, Debug)]
#[command(name = "roboeyes")]
#[command(about = "RoboEyes - Animated eyes for small SPI/I2C displays")]
#[command(version)]
#[command(long_about = "
RoboEyes - Animated eyes for small SPI/I2C displays

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration files
3. Built-in defaults (eye configuration always, screen with --fallback-defaults)

Script actions (comma separated):
  face:<default|happy|angry|tired>
  look:<C|L|R|T|B|TL|TR|BL|BR>[:<slow|medium|fast>]
  blink[:<left|right|both>[:<speed>]]
  close:<eye>[:<speed>]   open:<eye>[:<speed>]
  curious:<on|off>        wait:<duration, e.g. 2s or 500ms>
")]
pub struct CliArgs {
    /// Screen configuration file path
    #[arg(
        short,
        long,
        default_value = "screenconfig.toml",
        help = "Path to the screen configuration file"
    )]
    pub screen_config: PathBuf,

    /// Eye configuration file path
    #[arg(
        short,
        long,
        default_value = "eyeconfig.toml",
        help = "Path to the eye configuration file"
    )]
    pub eye_config: PathBuf,

    /// Use the built-in OLED screen when the screen file is missing
    #[arg(long, help = "Fall back to the built-in screen when the file is missing")]
    pub fallback_defaults: bool,

    /// Rotation override in degrees
    #[arg(long, help = "Rotation override (0, 90, 180, 270)")]
    pub rotate: Option<u16>,

    /// Frame rate override
    #[arg(long, help = "Frames per second override")]
    pub fps: Option<i32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", help = "Log level")]
    pub log_level: String,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long, help = "Print the resolved configuration as JSON and exit")]
    pub dump_config: bool,

    /// Animation script; the built-in demo runs when omitted
    #[arg(long, help = "Comma-separated animation actions")]
    pub script: Option<String>,

    /// Repeat the script until interrupted
    #[arg(long, help = "Repeat the script until interrupted")]
    pub loop_script: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    init_tracing(&args)?;

    info!("Starting RoboEyes v{}", env!("CARGO_PKG_VERSION"));

    let mut config = ConfigManager::load_app_config(
        &args.screen_config,
        &args.eye_config,
        args.fallback_defaults,
    )
    .context("Failed to load configuration")?;

    config
        .merge_with_cli_args(args.rotate, args.fps)
        .context("Final configuration validation failed")?;

    if args.dump_config {
        let json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize configuration")?;
        println!("{}", json);
        return Ok(());
    }

    if args.validate_config {
        let screen = &config.screen;
        info!("✅ Configuration is valid");
        info!("Configuration summary:");
        info!("  Screen: {} ({})", screen.kind, screen.driver);
        info!("  Resolution: {}x{}", screen.width, screen.height);
        info!("  Rotation: {}", screen.rotate);
        info!("  Color mode: {}", screen.mode);
        info!("  Interface: {}", screen.interface);
        if let Some(spi) = &screen.spi {
            info!(
                "  SPI: port {} device {} at {} Hz",
                spi.port, spi.device, spi.bus_speed_hz
            );
        }
        if let Some(gpio) = &screen.gpio {
            info!(
                "  GPIO: D/C {} CS {} RESET {} BACKLIGHT {}",
                gpio.data_command,
                gpio.chip_select,
                gpio.reset,
                gpio.backlight
                    .map(|pin| pin.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
        }
        if let Some(i2c) = &screen.i2c {
            info!("  I2C: address {:#04x} on port {}", i2c.address, i2c.port);
        }
        info!("  Frame rate: {} fps", config.eyes.render.fps);
        return Ok(());
    }

    let script = match &args.script {
        Some(text) => text.parse::<Script>().context("Invalid animation script")?,
        None => Script::demo().context("Built-in demo script is invalid")?,
    };

    let (width, height) = config.screen.canvas_size();
    let shutdown = ShutdownCoordinator::new();
    let state = Animator::initial_state(&config);
    let animator = Animator::new(state.clone(), &config);
    let renderer = Renderer::new(HeadlessDisplay::new(width, height), state, &config)
        .context("Failed to set up the renderer")?;

    let mut render_handle = tokio::spawn(renderer.run(shutdown.subscribe()));

    info!(
        "Animating {}x{} {} screen; press Ctrl+C to stop",
        width, height, config.screen.driver
    );

    let animation = async {
        loop {
            animator.run_script(&script).await;
            if !args.loop_script {
                break;
            }
        }
    };

    tokio::select! {
        _ = animation => {
            info!("Animation script finished");
        }
        result = ShutdownCoordinator::wait_for_signal() => {
            if let Err(e) = result {
                error!("Error setting up signal handlers: {}", e);
            }
        }
        joined = &mut render_handle => {
            // The render loop only ends by itself when a frame fails
            let sink = joined
                .context("Render task failed")?
                .context("Render loop failed")?;
            info!("Render loop ended after {} frames", sink.frames_presented());
            return Ok(());
        }
    }

    shutdown.trigger();

    let sink = render_handle
        .await
        .context("Render task failed")?
        .context("Render loop failed")?;
    info!("Presented {} frames", sink.frames_presented());

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs) -> Result<()> {
    let log_level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_str()
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
