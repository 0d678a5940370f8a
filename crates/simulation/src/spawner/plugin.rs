//! Plugin registration for the vehicle spawner.

use bevy::prelude::*;

use super::systems::run_vehicle_spawners;
use super::types::{RequestSpawn, SpawnFailed, VehicleSpawned};
use crate::vehicle::process_recalls;

pub struct SpawnerPlugin;

impl Plugin for SpawnerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<VehicleSpawned>()
            .add_event::<SpawnFailed>()
            .add_event::<RequestSpawn>()
            .add_systems(
                FixedUpdate,
                run_vehicle_spawners
                    .after(crate::tick_counter)
                    .after(process_recalls)
                    .in_set(crate::SimulationSet::PreSim),
            );
    }
}
