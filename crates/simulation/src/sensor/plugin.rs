//! Plugin registration for proximity sensing.

use bevy::prelude::*;

use super::spatial::{refresh_collider_snapshot, BuiltinSpatialQuery, SpatialQueryBackend};
use super::systems::poll_proximity_sensors;
use super::types::{SensorHitTraced, SensorRayTraced};

pub struct SensorPlugin;

impl Plugin for SensorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialQueryBackend>()
            .init_resource::<BuiltinSpatialQuery>()
            .add_event::<SensorRayTraced>()
            .add_event::<SensorHitTraced>()
            .add_systems(
                FixedUpdate,
                (
                    refresh_collider_snapshot.run_if(resource_exists::<BuiltinSpatialQuery>),
                    poll_proximity_sensors,
                )
                    .chain()
                    .in_set(crate::SimulationSet::Simulation),
            );
    }
}
