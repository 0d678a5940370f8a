//! Plugin registration for vehicles.

use bevy::prelude::*;

use super::systems::{drive_vehicles, process_recalls};
use super::types::{RecallVehicle, RideEnded};
use crate::sensor::poll_proximity_sensors;

pub struct VehiclePlugin;

impl Plugin for VehiclePlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RideEnded>()
            .add_event::<RecallVehicle>()
            .add_systems(
                FixedUpdate,
                process_recalls.in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(
                FixedUpdate,
                drive_vehicles
                    .after(poll_proximity_sensors)
                    .in_set(crate::SimulationSet::Simulation),
            );
    }
}
