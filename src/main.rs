use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use actionguard::clock::ManualClock;
use actionguard::config::PlatformLimits;
use actionguard::guard::{Fingerprint, RateLimitGuard};

#[derive(Parser)]
#[command(
    name = "actionguard",
    version,
    about = "Safety rate-limit guard for social media automation"
)]
struct Cli {
    /// Path to a YAML platform limits file; defaults to the built-in table
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate whether an action is currently safe to perform
    Check {
        /// Platform name, e.g. "instagram"
        platform: String,
        /// Action kind, e.g. "posts"
        kind: String,
    },
    /// Print the effective daily caps table
    Limits,
    /// Replay recorded actions against a simulated clock until the guard trips
    Simulate {
        /// Platform name, e.g. "instagram"
        platform: String,
        /// Action kind, e.g. "posts"
        kind: String,
        /// Maximum number of actions to attempt
        #[arg(long, default_value_t = 50)]
        count: u32,
        /// Simulated seconds between attempts
        #[arg(long, default_value_t = 400)]
        step_secs: i64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let limits = match &cli.config {
        Some(path) => PlatformLimits::from_file(path)?,
        None => PlatformLimits::default(),
    };

    match cli.command {
        Command::Check { platform, kind } => {
            let guard = RateLimitGuard::new(limits);
            let decision = guard.evaluate(&platform, &kind);
            println!("{}/{}: {}", platform, kind, decision);
            if !decision.is_safe() {
                std::process::exit(1);
            }
        }
        Command::Limits => {
            let mut entries: Vec<_> = limits.entries().collect();
            entries.sort();
            for (platform, kind, cap) in entries {
                println!("{:<12} {:<12} {:>6}/day", platform, kind, cap);
            }
        }
        Command::Simulate {
            platform,
            kind,
            count,
            step_secs,
        } => {
            let clock = Arc::new(ManualClock::new(Utc::now()));
            let guard = RateLimitGuard::new(limits).with_clock(clock.clone());

            info!(platform = %platform, kind = %kind, count = count, "Starting simulation");
            for attempt in 1..=count {
                let decision = guard.evaluate(&platform, &kind);
                println!("attempt {:>3}: {}", attempt, decision);
                if !decision.is_safe() {
                    if decision.auto_stop() {
                        info!("Auto-stop engaged, halting simulation");
                        break;
                    }
                    clock.advance(ChronoDuration::seconds(step_secs));
                    continue;
                }
                guard.record(
                    &platform,
                    &kind,
                    Fingerprint::of(&format!("simulated action {}", attempt)),
                )?;
                clock.advance(ChronoDuration::seconds(step_secs));
            }
            println!("retained audit records: {}", guard.recent_activity().len());
        }
    }

    Ok(())
}
