#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Dungeonion session.

mod config;
mod headless;
mod map_transfer;

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use dungeonion_core::MapSnapshot;
use dungeonion_rendering::{Color, Presentation, RenderingBackend};
use dungeonion_simulation::{Session, SessionConfig};
use dungeonion_system_enemy_ai as enemy_ai;
use dungeonion_system_round_director as round_director;
use dungeonion_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::FileConfig;
use headless::{Autopilot, HeadlessBackend};

const DEFAULT_FRAMES: u32 = 600;
const DEFAULT_FRAME_MS: u64 = 16;

/// Command-line arguments accepted by the `dungeonion` binary.
#[derive(Debug, Parser)]
#[command(name = "dungeonion", about = "Runs a headless Dungeonion arena session")]
struct CliArgs {
    /// Seed every random stream of the session is derived from.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long)]
    frames: Option<u32>,
    /// Simulated length of a frame in milliseconds.
    #[arg(long = "frame-ms")]
    frame_ms: Option<u64>,
    /// Player class to start as.
    #[arg(long)]
    class: Option<String>,
    /// TOML file overriding session defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// File holding a map transfer string or a JSON map snapshot to load.
    #[arg(long = "load-map")]
    load_map: Option<PathBuf>,
    /// Prints the final map as a transfer string.
    #[arg(long = "export-map")]
    export_map: bool,
    /// Buys a map expansion whenever the score covers it.
    #[arg(long = "expand-when-affordable")]
    expand_when_affordable: bool,
}

/// Entry point for the Dungeonion command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };

    let frames = args.frames.or(file.frames).unwrap_or(DEFAULT_FRAMES);
    let frame_time =
        Duration::from_millis(args.frame_ms.or(file.frame_ms).unwrap_or(DEFAULT_FRAME_MS));

    let mut session_config = SessionConfig::new(args.seed.or(file.seed).unwrap_or_default())
        .with_director(file.director.apply(round_director::Config::default()))
        .with_enemy_ai(file.enemy_ai.apply(enemy_ai::Config::default()));
    if let Some(name) = args.class.as_deref().or(file.class.as_deref()) {
        session_config = session_config
            .with_class_name(name)
            .with_context(|| format!("cannot start as '{name}'"))?;
    }
    if let Some(path) = &args.load_map {
        session_config = session_config.with_map(read_map(path)?);
    }

    let session = Session::new(session_config);
    println!("{}", query::welcome_banner(session.world()));

    let scene = session.scene().context("failed to describe the opening scene")?;
    let presentation = Presentation::new("Dungeonion", Color::from_rgb_u8(24, 20, 37), scene);
    let session = Rc::new(RefCell::new(session));
    let driver = Rc::clone(&session);

    HeadlessBackend::new(frames, frame_time, Autopilot::new(args.expand_when_affordable)).run(
        presentation,
        move |dt, input, scene| {
            let mut session = driver.borrow_mut();
            let _ = session.handle_frame(dt, input);
            match session.scene() {
                Ok(next) => *scene = next,
                Err(error) => warn!(%error, "scene could not be refreshed"),
            }
        },
    )?;

    let session = session.borrow();
    let hud = session.hud();
    println!(
        "round {} ({:?}) score {} enemies alive {} health {:.0}%",
        hud.round,
        hud.phase,
        hud.score,
        hud.enemies_alive,
        hud.player_health_ratio * 100.0
    );
    if args.export_map {
        println!("{}", map_transfer::encode(&session.map_snapshot())?);
    }
    Ok(())
}

fn read_map(path: &Path) -> Result<MapSnapshot> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    let trimmed = text.trim();
    let snapshot: MapSnapshot = if trimmed.starts_with(map_transfer::TRANSFER_HEADER) {
        map_transfer::decode(trimmed)?
    } else {
        serde_json::from_str(trimmed)
            .with_context(|| format!("map file {} is not a map snapshot", path.display()))?
    };
    info!(
        columns = snapshot.width,
        rows = snapshot.height,
        path = %path.display(),
        "map file read"
    );
    Ok(snapshot)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
