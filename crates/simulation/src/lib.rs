use bevy::prelude::*;

pub mod params;
pub mod path_curve;
pub mod road;
pub mod sensor;
pub mod sim_rng;
pub mod simulation_sets;
pub mod spawner;
pub mod speed_regulator;
pub mod stats;
pub mod vehicle;

#[cfg(test)]
mod integration_tests;

pub mod test_harness;

pub use simulation_sets::SimulationSet;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Global tick counter incremented each FixedUpdate.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

pub fn tick_counter(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Simulation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        app.init_resource::<TickCounter>().add_systems(
            FixedUpdate,
            tick_counter.in_set(SimulationSet::PreSim),
        );

        app.add_plugins((
            params::ParamsPlugin,
            sim_rng::SimRngPlugin,
            sensor::SensorPlugin,
            vehicle::VehiclePlugin,
            spawner::SpawnerPlugin,
            stats::StatsPlugin,
        ));
    }
}
