//! MarkerField CLI - headless stress-test harness.
//!
//! Seeds a field of candidate markers, sweeps a simulated camera across
//! the seed bounds, and reports how the visibility engine behaved:
//! scans dispatched, events dropped by the throttle, stale results
//! discarded, and what ended up shown.

mod error;
mod harness;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use markerfield::StrategyKind;

/// Reconciliation strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Create/destroy drawables per reconciliation.
    Materialize,
    /// Keep all drawables allocated and toggle opacity.
    Opacity,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Materialize => StrategyKind::Materialize,
            StrategyArg::Opacity => StrategyKind::OpacityToggle,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "markerfield",
    version = markerfield::VERSION,
    about = "Viewport-driven marker visibility stress harness"
)]
pub struct Args {
    /// Number of candidate markers to seed.
    #[arg(long, default_value_t = 500)]
    pub markers: usize,

    /// Reconciliation strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Opacity)]
    pub strategy: StrategyArg,

    /// Minimum interval between accepted reconciliations, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,

    /// Number of simulated camera steps.
    #[arg(long, default_value_t = 240)]
    pub steps: usize,

    /// Delay between camera steps, in milliseconds.
    #[arg(long, default_value_t = 16)]
    pub step_ms: u64,

    /// RNG seed for deterministic marker placement.
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = harness::run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
