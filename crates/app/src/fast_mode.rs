//! Headless `--fast` mode: a blocking loop that steps the app as fast as it
//! can instead of pacing it against the wall clock, then writes the final
//! `TrafficStats` as JSON to stdout.

use std::io::Write;
use std::time::{Duration, Instant};

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use simulation::stats::TrafficStats;
use simulation::TickCounter;

pub fn run_fast(mut app: App, ticks: u64, timestep: Duration) {
    // Every update advances the clock by exactly one fixed step.
    app.insert_resource(TimeUpdateStrategy::ManualDuration(timestep));

    // Initial update so Startup systems build the scene.
    app.update();

    let start = Instant::now();
    advance(&mut app, ticks);
    info!("ran {ticks} ticks in {:?}", start.elapsed());

    let stats = app.world().resource::<TrafficStats>();
    match serde_json::to_string_pretty(stats) {
        Ok(json) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{json}") {
                error!("failed to write stats: {e}");
            }
        }
        Err(e) => error!("failed to serialize stats: {e}"),
    }
}

/// Run full app updates until `ticks` more fixed steps have executed.
/// Full updates keep the event buffers rotating.
fn advance(app: &mut App, ticks: u64) {
    let target = current_tick(app).saturating_add(ticks);
    while current_tick(app) < target {
        app.update();
    }
}

fn current_tick(app: &App) -> u64 {
    app.world().get_resource::<TickCounter>().map_or(0, |t| t.0)
}
