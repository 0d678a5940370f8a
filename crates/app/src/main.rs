use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::sim_rng::SimRng;
use simulation::stats::{update_stats, TrafficStats};
use simulation::{SimulationPlugin, SimulationSet, TickCounter};

mod config;
mod fast_mode;
mod scene;

use config::RunConfig;

/// Fixed simulation step: 10 Hz.
const TIMESTEP: Duration = Duration::from_millis(100);

/// Ticks between stats log lines (10 simulated seconds).
const STATS_INTERVAL: u64 = 100;

/// Total ticks to run before exiting.
#[derive(Resource)]
struct RunLength(u64);

fn main() {
    let fast = std::env::args().any(|arg| arg == "--fast");

    let mut app = App::new();
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(16))),
    )
    .add_plugins(LogPlugin::default());

    let config = RunConfig::from_env();
    let params = match config.load_params() {
        Ok(params) => params,
        Err(e) => {
            error!("failed to load traffic parameters: {e}");
            std::process::exit(1);
        }
    };

    app.add_plugins(SimulationPlugin)
        .insert_resource(params)
        .insert_resource(SimRng::from_seed_u64(config.seed))
        .add_systems(Startup, scene::build_demo_scene)
        .add_systems(
            FixedUpdate,
            log_stats
                .after(update_stats)
                .in_set(SimulationSet::PostSim),
        );
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .set_timestep(TIMESTEP);

    let ticks = (config.seconds / TIMESTEP.as_secs_f32()).ceil() as u64;
    info!(
        "running {:.1} simulated seconds ({ticks} ticks), seed {}",
        config.seconds, config.seed
    );

    if fast {
        fast_mode::run_fast(app, ticks, TIMESTEP);
        return;
    }

    app.insert_resource(RunLength(ticks))
        .add_systems(Update, exit_when_done);
    app.run();
}

fn log_stats(tick: Res<TickCounter>, stats: Res<TrafficStats>) {
    if tick.0 == 0 || !tick.0.is_multiple_of(STATS_INTERVAL) {
        return;
    }
    info!(
        "tick {}: {} active, {} spawned, {} spawn failures, {} rides completed",
        tick.0,
        stats.active_vehicles,
        stats.spawned,
        stats.spawn_failures(),
        stats.rides_completed
    );
}

fn exit_when_done(
    tick: Res<TickCounter>,
    run: Res<RunLength>,
    stats: Res<TrafficStats>,
    mut exit: EventWriter<AppExit>,
) {
    if tick.0 >= run.0 {
        info!("done: {stats:?}");
        exit.send(AppExit::Success);
    }
}
