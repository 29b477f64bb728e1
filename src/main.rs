//! ASCII Donut - a rotating torus shaded with text characters
//!
//! Usage:
//!   ascii_donut run                 - Animate in the terminal until Ctrl-C
//!   ascii_donut run --frames 500    - Stop after 500 frames
//!   ascii_donut dump --frames 10    - Write frames to ./frames/frame_XXX.txt
//!   ascii_donut check-config        - Validate and print the configuration

use anyhow::Context;
use ascii_donut::{Cadence, DonutConfig, FrameDriver, FrameDump, TerminalDisplay};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "ascii_donut")]
#[command(version = "0.1.0")]
#[command(about = "Rotating torus rendered as shaded text")]
struct Cli {
    /// Path to config file (defaults: donut.yaml, donut.yml, ./config/donut.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the torus in the terminal
    Run {
        /// Stop after this many frames
        #[arg(short, long)]
        frames: Option<u64>,
        /// Minimum time between frames in milliseconds (default: free-running)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Rasterize on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Render frames to text files instead of the terminal
    Dump {
        /// Number of frames to write
        #[arg(short, long, default_value_t = 10)]
        frames: u64,
        /// Output directory
        #[arg(short, long, default_value = "frames")]
        out: PathBuf,
        /// Rasterize on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Validate configuration file
    CheckConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    // Frames own stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            frames,
            interval_ms,
            parallel,
        } => run(cli.config.as_deref(), frames, interval_ms, parallel),
        Commands::Dump {
            frames,
            out,
            parallel,
        } => dump(cli.config.as_deref(), frames, &out, parallel),
        Commands::CheckConfig => check_config(cli.config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DonutConfig> {
    let config = DonutConfig::load_or_default(path).context("Error loading configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Animate in the terminal
fn run(
    config_path: Option<&Path>,
    frames: Option<u64>,
    interval_ms: Option<u64>,
    parallel: bool,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    config.render.parallel |= parallel;

    let cadence = match interval_ms {
        Some(ms) => Cadence::Throttled(Duration::from_millis(ms)),
        None => Cadence::FreeRunning,
    };

    let mut driver = FrameDriver::from_config(&config).context("Failed to build renderer")?;
    let mut terminal = TerminalDisplay::new().context("Failed to initialize terminal")?;
    terminal.check_fits(config.screen.width, config.screen.height);

    match driver.run(&mut terminal, cadence, frames) {
        Ok(_) => Ok(()),
        Err(ascii_donut::RenderError::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            Ok(())
        }
        Err(e) => Err(e).context("Rendering failed"),
    }
}

/// Write frames to text files
fn dump(
    config_path: Option<&Path>,
    frames: u64,
    out: &Path,
    parallel: bool,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    config.render.parallel |= parallel;

    let mut driver = FrameDriver::from_config(&config).context("Failed to build renderer")?;
    let mut sink = FrameDump::new(out)
        .with_context(|| format!("Failed to create output directory {}", out.display()))?;

    let written = driver
        .run(&mut sink, Cadence::FreeRunning, Some(frames))
        .context("Rendering failed")?;

    println!("Wrote {} frames to {}", written, sink.dir().display());
    println!("View with: cat {}", sink.dir().join("frame_000.txt").display());
    Ok(())
}

/// Validate configuration and print the effective values
fn check_config(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    println!("✓ Configuration is valid\n");
    println!("Screen: {}x{}", config.screen.width, config.screen.height);
    println!("Camera FOV: {}°", config.camera.fov_degrees);
    println!("\nTorus:");
    println!("  Minor radius: {}", config.torus.minor_radius);
    println!("  Major radius: {}", config.torus.major_radius);
    println!("  Position: {:?}", config.torus.position);
    println!("\nAnimation increments: {:?}", config.animation.increments);
    println!("Light position: {:?}", config.light.position);
    println!("Shading ramp: {:?}", config.shading.ramp);
    println!("Parallel: {}", config.render.parallel);
    Ok(())
}
