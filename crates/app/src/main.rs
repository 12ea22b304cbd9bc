use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use murasaki_cursor_core::{replay, smoothing, FollowerConfig, Replay};
use tracing_subscriber::EnvFilter;

fn main() -> murasaki_cursor_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay {
            script,
            frame_interval,
            summary,
        } => run_replay(config, &script, frame_interval, summary),
        Commands::Settle { distance, epsilon } => run_settle(&config, distance, epsilon),
        Commands::Selector => {
            println!("{}", config.interactive.selector());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> murasaki_cursor_core::Result<FollowerConfig> {
    match path {
        Some(path) => {
            tracing::debug!(?path, "loading follower config");
            FollowerConfig::from_json_file(path)
        }
        None => Ok(FollowerConfig::default()),
    }
}

fn run_replay(
    config: FollowerConfig,
    script: &Path,
    frame_interval: f64,
    summary: bool,
) -> murasaki_cursor_core::Result<()> {
    let steps = replay::load_script(script)?;
    tracing::info!(?script, steps = steps.len(), "replaying pointer script");

    let mut host = Replay::with_frame_interval(config, frame_interval)?;
    host.run(&steps)?;
    let report = host.finish();

    if summary {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for frame in &report.frames {
            println!("{}", serde_json::to_string(frame)?);
        }
    }

    tracing::info!(
        frames = report.frames.len(),
        dropped_events = report.dropped_events,
        suppressed_callbacks = report.suppressed_callbacks,
        "replay finished"
    );
    Ok(())
}

/// Longest simulation the `settle` command will run.
const MAX_SIMULATED_STEPS: u32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SettleReport {
    bound: u32,
    /// `None` when the simulation did not settle or the bound was too long
    /// to simulate.
    simulated: Option<u32>,
}

fn settle_report(
    config: &FollowerConfig,
    distance: f64,
    epsilon: f64,
) -> murasaki_cursor_core::Result<SettleReport> {
    if !distance.is_finite() {
        return Err("distance must be finite".into());
    }
    if !(epsilon.is_finite() && epsilon > 0.0) {
        return Err("epsilon must be positive".into());
    }
    let bound = smoothing::steps_to_settle(distance, config.damping, epsilon)
        .ok_or("jump does not settle within a representable number of frames")?;
    let simulated = if bound <= MAX_SIMULATED_STEPS {
        smoothing::simulate_settle(distance, config.damping, epsilon, bound.saturating_add(16))
    } else {
        None
    };
    Ok(SettleReport { bound, simulated })
}

fn run_settle(config: &FollowerConfig, distance: f64, epsilon: f64) -> murasaki_cursor_core::Result<()> {
    let report = settle_report(config, distance, epsilon)?;

    println!("damping:   {}", config.damping);
    println!("bound:     {} frames", report.bound);
    match report.simulated {
        Some(steps) => println!("simulated: {steps} frames"),
        None if report.bound > MAX_SIMULATED_STEPS => println!("simulated: skipped"),
        None => println!("simulated: did not settle"),
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Pointer follower replay tool", long_about = None)]
struct Cli {
    /// Optional JSON follower config; missing fields use the defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON pointer script and print every overlay write.
    Replay {
        /// Path to the script (a JSON array of steps).
        script: PathBuf,
        /// Simulated display refresh interval in milliseconds.
        #[arg(long, default_value_t = 1000.0 / 60.0)]
        frame_interval: f64,
        /// Print the full report instead of one JSON line per frame.
        #[arg(long)]
        summary: bool,
    },
    /// Report how many frames a jump takes to settle.
    Settle {
        /// Jump distance in pixels.
        distance: f64,
        /// Residual distance considered settled.
        #[arg(long, default_value_t = 0.01)]
        epsilon: f64,
    },
    /// Print the CSS selector for the interactive predicate.
    Selector,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_matches_closed_form_for_defaults() {
        let report = settle_report(&FollowerConfig::default(), 1000.0, 0.01).unwrap();
        assert_eq!(report.bound, 71);
        assert_eq!(report.simulated, Some(71));
    }

    #[test]
    fn settle_rejects_infinite_distance() {
        let result = settle_report(&FollowerConfig::default(), f64::INFINITY, 0.01);
        assert!(result.is_err());
        assert!(run_settle(&FollowerConfig::default(), f64::NAN, 0.01).is_err());
    }

    #[test]
    fn settle_rejects_tiny_damping_instead_of_overflowing() {
        let config = FollowerConfig {
            damping: 1e-12,
            ..Default::default()
        };
        config.validate().unwrap();
        assert!(settle_report(&config, 1000.0, 0.01).is_err());
    }

    #[test]
    fn settle_skips_simulation_for_very_long_bounds() {
        let config = FollowerConfig {
            damping: 1e-6,
            ..Default::default()
        };
        let report = settle_report(&config, 1000.0, 0.01).unwrap();
        assert!(report.bound > MAX_SIMULATED_STEPS);
        assert_eq!(report.simulated, None);
    }
}
