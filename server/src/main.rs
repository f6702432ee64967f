use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::config::{CountdownConfig, RoundEndSoundConfig};
use server::plugins::{BombCountdownPlugin, RoundEndSoundPlugin};
use server::sim::{SimComplete, SimPlugin};

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Bomb round plugin host", long_about = None)]
struct Args {
    // Bomb countdown plugin config
    #[arg(long, default_value = "BombCountdown.json")]
    countdown_config: PathBuf,

    // Round end sound plugin config
    #[arg(long, default_value = "RoundEndSound.json")]
    round_end_config: PathBuf,

    // Simulation tick rate in Hz
    #[arg(long, default_value_t = 64)]
    tick_rate: u64,
}

// Read a plugin config, falling back to defaults when the file is absent,
// the same materialize-on-absence behavior the game server has.
fn load_config<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

// Interval period for the requested tick rate. The rate is clamped so the
// period stays non-zero, which tokio's interval requires.
fn tick_period(tick_rate: u64) -> Duration {
    Duration::from_nanos(1_000_000_000 / tick_rate.clamp(1, 1_000_000_000))
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut countdown_config: CountdownConfig =
        load_config(&args.countdown_config).context("loading bomb countdown config")?;
    countdown_config.normalize();
    let mut round_end_config: RoundEndSoundConfig =
        load_config(&args.round_end_config).context("loading round end sound config")?;
    round_end_config.normalize();

    info!(
        start_from = countdown_config.start_from_second,
        announce = ?countdown_config.announce_seconds,
        "countdown config ready"
    );

    let countdown_seconds = countdown_config.start_from_second;
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(BombCountdownPlugin {
            config: countdown_config,
        })
        .add_plugins(RoundEndSoundPlugin {
            config: round_end_config,
        })
        .add_plugins(SimPlugin { countdown_seconds });

    info!("starting plugin host loop...");

    // Run the app in a loop manually at the configured tick rate
    let tick_duration = tick_period(args.tick_rate);
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frame: u64 = 0;
    loop {
        interval.tick().await;

        let update_start = Instant::now();
        app.update();
        let update_elapsed = update_start.elapsed();

        if update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                frame,
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        frame += 1;
        if app.world().resource::<SimComplete>().0 {
            info!("simulation complete after {frame} ticks");
            break;
        }
    }

    Ok(())
}
