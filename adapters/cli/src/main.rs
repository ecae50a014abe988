#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Sanctuary session.

mod autopilot;
mod session;

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use sanctuary_core::Tuning;
use sanctuary_rendering::{LogBackend, RenderingBackend};
use tracing::{info, warn};

use crate::{autopilot::Autopilot, session::Session};

/// Headless Sanctuary runner driven by the built-in autopilot.
#[derive(Parser, Debug)]
#[command(name = "sanctuary", version, about = "Lead the dead to the sanctuary", long_about = None)]
struct Args {
    /// TOML file overriding the built-in tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for stage generation and zombie wandering
    #[arg(long, default_value_t = 0x5A4E_C7A2)]
    seed: u64,

    /// Maximum number of ticks to simulate
    #[arg(long, default_value_t = 36_000)]
    frames: u64,

    /// Stop after this many stage clears
    #[arg(long)]
    stages: Option<u32>,
}

/// Entry point for the Sanctuary command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let tuning = load_tuning(args.config.as_deref())?;
    let mut session = Session::new(tuning, args.seed);
    let mut autopilot = Autopilot::new();
    let mut backend = LogBackend::new();

    info!(
        seed = args.seed,
        frames = args.frames,
        "starting headless session"
    );

    for _ in 0..args.frames {
        let input = autopilot.decide(session.world(), session.phase());
        session.step(input);
        let scene = session.scene().context("failed to assemble scene")?;
        backend.present(&scene)?;

        if args.stages.is_some_and(|limit| session.clears() >= limit) {
            break;
        }
    }

    let summary = session.summary();
    if summary.clears == 0 {
        warn!(ticks = summary.ticks, "no stage was cleared");
    }
    info!(
        ticks = summary.ticks,
        phase = ?summary.phase,
        stage = summary.stage,
        loop_level = summary.loop_level,
        clears = summary.clears,
        carried_time = summary.carried_time,
        total_clear_time = summary.total_clear_time,
        prompts = backend.announcements(),
        presented = backend.frames(),
        "session finished"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning from {}", path.display()))?;
    let tuning: Tuning = toml::from_str(&text)
        .with_context(|| format!("failed to parse tuning in {}", path.display()))?;
    tuning
        .validate()
        .with_context(|| format!("invalid tuning in {}", path.display()))?;
    Ok(tuning)
}
