//! # Cubix Headless Client
//!
//! Runs the full client lifecycle against an in-memory world and a surface
//! that is never shown.
//!
//! ```bash
//! cubix_client --frames 600 --fps-limit Limit60FPS
//! RUST_LOG=debug cubix_client --config client.toml
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cubix::core::{ClientConfig, GameComponent, GameData, HookResult};
use cubix::headless::{self, MemoryWorld};
use cubix::shared::{block::ids, FpsLimitMethod};
use cubix::{Game, GameResult};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "cubix_client")]
#[command(about = "Cubix headless client")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short, long, default_value = "300")]
    frames: u64,

    /// Frame pacing strategy (LimitVSync, Limit30FPS, ..., LimitNone)
    #[arg(long)]
    fps_limit: Option<FpsLimitMethod>,

    /// World size along each axis
    #[arg(long, default_value = "64")]
    world_size: i32,
}

// ============================================================================
// Components
// ============================================================================

/// Logs session boundaries.
struct SessionLog;

impl GameComponent for SessionLog {
    fn name(&self) -> &'static str {
        "session-log"
    }

    fn init(&mut self, game: &mut GameData) -> HookResult {
        info!(user = %game.username, "session started");
        Ok(())
    }

    fn free(&mut self, game: &mut GameData) -> HookResult {
        info!(seconds = format_args!("{:.1}", game.time()), "session ended");
        Ok(())
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, fatal = err.is_fatal(), "client stopped");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> GameResult<()> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(method) = args.fps_limit {
        config.fps_limit = method;
    }

    let size = args.world_size;
    let collab = headless::collaborators(config.width, config.height, MemoryWorld::new(size, size, size));
    let mut game = Game::new(&config, collab)?;

    game.add_component(SessionLog)?;
    game.add_scheduled_task(1.0, |_, game| {
        info!(
            time = format_args!("{:.1}", game.time()),
            chunk_updates = game.chunk_updates,
            view_distance = game.view.current(),
            "tick"
        );
    })?;

    game.startup()?;
    for x in 0..size {
        for z in 0..size {
            game.change_block((x, 0, z), ids::STONE)?;
        }
    }
    game.run_with_limit(Some(args.frames))
}
