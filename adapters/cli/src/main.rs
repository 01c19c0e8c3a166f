#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the Grid Shooter simulation headlessly.
//!
//! The loop advances a simulated clock by a fixed step per pass, feeds the
//! autopilot's axis samples through the dead-zone mapping, and draws the board
//! as text. Loss and win play a short status sequence before the next session
//! starts.

mod config;
mod input;
mod random;
mod simulation;

use std::{io, path::PathBuf, thread, time::Duration};

use anyhow::Result;
use clap::Parser;
use grid_shooter_rendering::{Renderer, StatusDisplay, TextRenderer};
use grid_shooter_world::{query, World};
use tracing_subscriber::EnvFilter;

use crate::{
    config::GameConfig,
    input::{Autopilot, AxisMapping, InputSource},
    random::ChaChaRandom,
    simulation::{Simulation, TickOutcome},
};

#[derive(Debug, Parser)]
#[command(name = "grid-shooter")]
#[command(about = "Run the Grid Shooter projectile simulation with an autopilot")]
struct Args {
    /// Seed of the process-lifetime random stream
    #[arg(long, default_value_t = 2024)]
    seed: u64,
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated milliseconds per loop pass
    #[arg(long, default_value_t = 20)]
    tick_ms: u64,
    /// Stop after this many loop passes
    #[arg(long, default_value_t = 3_000)]
    max_ticks: u64,
    /// Stop after this many sessions have ended
    #[arg(long, default_value_t = 3)]
    max_sessions: u32,
    /// Sleep between passes and hold status screens in wall-clock time
    #[arg(long)]
    realtime: bool,
    /// Draw the board every N passes; 0 disables drawing
    #[arg(long, default_value_t = 25)]
    render_every: u64,
    /// Color the board with ANSI escape codes
    #[arg(long)]
    ansi: bool,
}

/// Entry point for the Grid Shooter command-line interface.
fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let world = World::with_catalog(config.catalog().clone(), config.scoring());

    let hold = if args.realtime {
        config.transition_hold()
    } else {
        Duration::ZERO
    };
    let stdout = io::stdout();
    let mut display = TextRenderer::new(stdout.lock())
        .with_ansi(args.ansi)
        .with_hold(hold);
    display.show_lines(query::welcome_banner(&world), "")?;

    let mut simulation = Simulation::new(world, &config, ChaChaRandom::new(args.seed));
    let mut input = Autopilot::default();
    let mapping = AxisMapping::default();
    let step = Duration::from_millis(args.tick_ms);
    let mut now = Duration::ZERO;
    let mut sessions_ended = 0;
    let mut ticks = 0;

    tracing::info!(seed = args.seed, "session started");
    simulation.start(now);

    while ticks < args.max_ticks {
        ticks += 1;
        now += step;
        let (x, y) = input.poll_axes();
        let outcome = simulation.tick(now, mapping.resolve(x, y));
        for event in simulation.last_events() {
            tracing::trace!(?event, "event");
        }

        if args.render_every != 0 && ticks % args.render_every == 0 {
            let world = simulation.world();
            display.render(query::grid_view(world), query::cursor(world))?;
        }

        let screens = match outcome {
            TickOutcome::Running => None,
            TickOutcome::Lost { score, best } => Some(("GAME OVER".to_owned(), score, best)),
            TickOutcome::Won { wave, score, best } => {
                Some((format!("WAVE {wave} CLEARED - YOU WIN"), score, best))
            }
        };
        if let Some((headline, score, best)) = screens {
            let world = simulation.world();
            display.render(query::grid_view(world), query::cursor(world))?;
            show_transition(&mut display, &headline, score, best)?;

            sessions_ended += 1;
            if sessions_ended >= args.max_sessions {
                break;
            }
            simulation.start(now);
            tracing::info!(session = sessions_ended + 1, "session started");
        }

        if args.realtime {
            thread::sleep(step);
        }
    }

    tracing::info!(
        ticks,
        sessions_ended,
        best_score = query::best_score(simulation.world()),
        "simulation finished"
    );
    Ok(())
}

/// Builds the log filter from `RUST_LOG`-style directives, falling back to
/// `info` when they are absent or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Plays the loss or win status sequence; each screen holds for the
/// display's configured duration.
fn show_transition<D: StatusDisplay>(
    display: &mut D,
    headline: &str,
    score: u32,
    best: u32,
) -> Result<()> {
    display.show_lines(headline, &format!("SCORE {score}"))?;
    display.show_lines("BEST SCORE", &best.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn log_directives_raise_verbosity_above_info() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn missing_or_malformed_directives_default_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("grid_shooter=loud")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
