//! System functions for proximity sensing.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::tasks::{ComputeTaskPool, TaskPool};

use crate::vehicle::{Vehicle, VehicleBody};

use super::fan::{build_rays, ray_length};
use super::reduction::{reduce_hits, ReductionInput};
use super::spatial::{SpatialQuery, SpatialQueryBackend};
use super::types::{
    ProximitySensor, RayHit, SensorHitTraced, SensorRay, SensorRayTraced, SensorReading,
    VehicleSnapshot,
};

/// Tick every armed sensor and run the polls that fall due.
///
/// Each poll blocks until all of its rays have returned, then reduces the
/// hits and writes the preferred speed back to the vehicle.
pub fn poll_proximity_sensors(
    time: Res<Time<Fixed>>,
    backend: Option<Res<SpatialQueryBackend>>,
    mut vehicles: Query<(
        Entity,
        &mut Vehicle,
        Option<&mut ProximitySensor>,
        &Transform,
        Option<&VehicleBody>,
    )>,
    mut ray_events: EventWriter<SensorRayTraced>,
    mut hit_events: EventWriter<SensorHitTraced>,
) {
    let delta = time.timestep();

    let snapshots: HashMap<Entity, VehicleSnapshot> = vehicles
        .iter()
        .map(|(entity, vehicle, _, _, body)| {
            (
                entity,
                VehicleSnapshot {
                    current_speed: vehicle.current_speed(),
                    half_length: body.map(VehicleBody::half_length),
                },
            )
        })
        .collect();

    for (entity, mut vehicle, sensor, transform, body) in &mut vehicles {
        let Some(mut sensor) = sensor else {
            continue;
        };
        if !vehicle.is_active() || !sensor.tick(delta) {
            continue;
        }

        let params = &sensor.params;
        if params.sample_count == 0 || params.max_fan_angle < 0.0 {
            continue;
        }

        let own_half_length = body.map_or(0.0, VehicleBody::half_length);
        let origin = transform.translation + transform.rotation * params.start_offset();
        let length = ray_length(
            vehicle.current_speed(),
            vehicle.regulator.deceleration_rate,
            params.safe_distance,
            params.buffer_distance,
            own_half_length,
        );
        let rays = build_rays(
            origin,
            transform.forward().as_vec3(),
            params.sample_count,
            params.max_fan_angle,
            length,
        );

        if params.draw_debug_rays {
            for ray in &rays {
                ray_events.send(SensorRayTraced {
                    vehicle: entity,
                    origin: ray.origin,
                    end: ray.end,
                });
            }
        }

        let preferred_speed = match backend.as_deref() {
            // No scene to query: stop rather than drive blind.
            None => 0.0,
            Some(backend) => {
                let results = cast_rays_joined(backend.0.as_ref(), &rays, entity);

                if params.draw_debug_hits {
                    // Same order as the reduction, which stops at the first
                    // hit that is not a measurable vehicle.
                    for hit in results.iter().flatten() {
                        let is_vehicle = snapshots
                            .get(&hit.entity)
                            .and_then(VehicleSnapshot::measurable_half_length)
                            .is_some();
                        if !is_vehicle {
                            break;
                        }
                        hit_events.send(SensorHitTraced {
                            vehicle: entity,
                            point: hit.point,
                        });
                    }
                }

                let input = ReductionInput {
                    start_speed: vehicle.start_speed,
                    max_preferred_speed: vehicle.max_preferred_speed,
                    safe_distance: params.safe_distance,
                    buffer_distance: params.buffer_distance,
                    own_half_length,
                };
                reduce_hits(results.iter().flatten(), &input, |e| {
                    snapshots.get(&e).copied()
                })
            }
        };

        let reading = SensorReading {
            vehicle: entity,
            ride: vehicle.ride,
            preferred_speed,
        };
        apply_reading(&mut vehicle, &reading);
    }
}

/// Write a reading's preferred speed to the vehicle it was taken for.
/// Readings for an inactive vehicle, or for an earlier ride, are discarded.
/// Returns whether the reading was applied.
pub fn apply_reading(vehicle: &mut Vehicle, reading: &SensorReading) -> bool {
    if !vehicle.is_active() || vehicle.ride != reading.ride {
        return false;
    }
    vehicle.regulator.preferred_speed = reading.preferred_speed;
    true
}

/// Cast every ray on the compute pool and wait for all of them. Results are
/// returned in ray order.
pub(crate) fn cast_rays_joined(
    backend: &dyn SpatialQuery,
    rays: &[SensorRay],
    ignore: Entity,
) -> Vec<Vec<RayHit>> {
    let pool = ComputeTaskPool::get_or_init(TaskPool::default);
    pool.scope(|scope| {
        for ray in rays {
            scope.spawn(async move { backend.cast_ray(ray.origin, ray.end, Some(ignore)) });
        }
    })
}
