use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::spawner::{SpawnError, SpawnFailed, VehicleSpawned};
use crate::vehicle::{RideEndReason, RideEnded, Vehicle};

/// Running totals of pool and ride activity.
#[derive(Resource, Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub spawned: u64,
    pub pool_exhausted: u64,
    pub placement_blocked: u64,
    pub stale_handles: u64,
    pub missing_path: u64,
    pub rides_completed: u64,
    pub paths_lost: u64,
    pub recalled: u64,
    /// Vehicles active at the end of the last tick.
    pub active_vehicles: u32,
}

impl TrafficStats {
    pub fn spawn_failures(&self) -> u64 {
        self.pool_exhausted + self.placement_blocked + self.stale_handles + self.missing_path
    }
}

pub fn update_stats(
    mut spawned: EventReader<VehicleSpawned>,
    mut failed: EventReader<SpawnFailed>,
    mut ended: EventReader<RideEnded>,
    vehicles: Query<&Vehicle>,
    mut stats: ResMut<TrafficStats>,
) {
    stats.spawned += spawned.read().count() as u64;

    for failure in failed.read() {
        match failure.error {
            SpawnError::PoolExhausted => stats.pool_exhausted += 1,
            SpawnError::PlacementBlocked { .. } => stats.placement_blocked += 1,
            SpawnError::StaleHandle { .. } => stats.stale_handles += 1,
            SpawnError::MissingPath => stats.missing_path += 1,
        }
    }

    for ride in ended.read() {
        match ride.reason {
            RideEndReason::ReachedEnd => stats.rides_completed += 1,
            RideEndReason::PathLost => stats.paths_lost += 1,
            RideEndReason::Recalled => stats.recalled += 1,
        }
    }

    stats.active_vehicles = vehicles.iter().filter(|v| v.is_active()).count() as u32;
}

pub struct StatsPlugin;

impl Plugin for StatsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrafficStats>().add_systems(
            FixedUpdate,
            update_stats.in_set(crate::SimulationSet::PostSim),
        );
    }
}
