//! Simulated pan session over a seeded marker field.
//!
//! The harness plays the role of the host application: it owns the
//! render-owning context (the main thread), feeds viewport-change events
//! to the engine, and pumps completed reconciliations once per step, the
//! way a frame loop would.

use std::thread;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use markerfield::{
    CameraSnapshot, EngineConfig, GeoBounds, GeoPoint, HeadlessSurface, MarkerEngine,
    StrategyKind, ViewQuad,
};

use crate::error::CliError;
use crate::Args;

/// Synthesize a camera sweeping west to east across the seed bounds at
/// `t` in `[0, 1]`, with a visible region 40% of the bounds' extent.
fn camera_at(t: f64, bounds: &GeoBounds) -> CameraSnapshot {
    let lat = bounds.center().lat;
    let lon = bounds.min_lon + t * bounds.width();
    let half_lat = bounds.height() * 0.2;
    let half_lon = bounds.width() * 0.2;
    CameraSnapshot {
        target: GeoPoint::new(lat, lon),
        visible_region: ViewQuad::new(
            GeoPoint::new(lat - half_lat, lon - half_lon),
            GeoPoint::new(lat + half_lat, lon - half_lon),
            GeoPoint::new(lat + half_lat, lon + half_lon),
            GeoPoint::new(lat - half_lat, lon + half_lon),
        ),
    }
}

/// Run the simulated pan session.
pub fn run(args: Args) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeCreation)?;

    let strategy: StrategyKind = args.strategy.into();
    let config = EngineConfig::default()
        .with_marker_count(args.markers)
        .with_min_interval(Duration::from_millis(args.interval_ms))
        .with_strategy(strategy);
    let seed_bounds = config.seed_bounds;

    println!("MarkerField stress harness v{}", markerfield::VERSION);
    println!("================================");
    println!();
    println!("Markers:   {}", args.markers);
    println!("Strategy:  {:?}", strategy);
    println!("Interval:  {} ms", args.interval_ms);
    println!("Steps:     {} x {} ms", args.steps, args.step_ms);
    println!();

    let mut surface = HeadlessSurface::new();
    let mut engine = match args.seed {
        Some(seed) => MarkerEngine::with_rng(
            config,
            runtime.handle().clone(),
            &mut surface,
            StdRng::seed_from_u64(seed),
        )?,
        None => MarkerEngine::new(config, runtime.handle().clone(), &mut surface)?,
    };

    let started = Instant::now();
    let step_delay = Duration::from_millis(args.step_ms);
    for step in 0..args.steps {
        let t = if args.steps > 1 {
            step as f64 / (args.steps - 1) as f64
        } else {
            0.0
        };
        engine.on_viewport_changed(camera_at(t, &seed_bounds), &mut surface);
        engine.pump(&mut surface)?;
        thread::sleep(step_delay);
    }

    // Let in-flight scans land before reporting.
    let drain_deadline = Instant::now() + Duration::from_secs(2);
    while engine.is_reconcile_in_flight() && Instant::now() < drain_deadline {
        engine.pump(&mut surface)?;
        thread::sleep(Duration::from_millis(5));
    }
    let elapsed = started.elapsed();

    let stats = engine.scheduler_stats();
    info!(
        dispatched = stats.dispatched,
        dropped = stats.dropped,
        applied = stats.applied,
        stale_dropped = stats.stale_dropped,
        "session complete"
    );

    println!("Session summary");
    println!("---------------");
    println!("Elapsed:            {:.2}s", elapsed.as_secs_f64());
    println!("Scans dispatched:   {}", stats.dispatched);
    println!("Events throttled:   {}", stats.dropped);
    println!("Diffs applied:      {}", stats.applied);
    println!("Stale discarded:    {}", stats.stale_dropped);
    println!("Live drawables:     {}", surface.handle_count());
    match strategy {
        StrategyKind::Materialize => {
            println!("Markers shown:      {}", engine.shown_count());
        }
        StrategyKind::OpacityToggle => {
            println!("Markers shown:      {}", surface.visible_handle_count());
        }
    }

    Ok(())
}
