//! # Genopack
//!
//! Per-individual statistics, phase checks and concordance over plain-text
//! call files.
//!
//! ## Usage
//! ```bash
//! # Missing / het / hom counts
//! genopack stats --genotypes geno.txt
//!
//! # Check phased pairs against genotypes, as JSON Lines
//! genopack --format json check --genotypes geno.txt --phase phase.txt --out check.jsonl
//!
//! # Compare two runs with the byte-per-call backend and span timings
//! genopack --backend bytes --profile compare --left run1.txt --right run2.txt
//! ```

use std::time::Instant;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use genopack::config::{Command, Config};
use genopack::pipelines::{CheckPipeline, ComparePipeline, StatsPipeline};
use genopack::utils::threading::configure_global_pool;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber; span close events carry timings when profiling
fn init_logging(level: Level, profile: bool) {
    let span_events = if profile {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(span_events)
                .with_target(false)
                .with_timer(fmt::time::uptime())
                .with_filter(LevelFilter::from_level(level)),
        )
        .init();
}

fn run() -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Config::parse_and_validate().context("invalid arguments")?;

    // Span timings are logged at INFO, so profiling raises the floor
    let level = if config.profile {
        config.log_level().max(Level::INFO)
    } else {
        config.log_level()
    };
    init_logging(level, config.profile);

    let n_threads = config.nthreads();
    configure_global_pool(n_threads).context("configuring thread pool")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = config.backend.name(),
        n_threads,
        "genopack"
    );

    match config.command {
        Command::Stats { .. } => StatsPipeline::new(config)
            .run()
            .context("stats failed")?,
        Command::Check { .. } => CheckPipeline::new(config)
            .run()
            .context("phase check failed")?,
        Command::Compare { .. } => ComparePipeline::new(config)
            .run()
            .context("compare failed")?,
    }

    info!(elapsed_s = start.elapsed().as_secs_f64(), "completed");
    Ok(())
}
