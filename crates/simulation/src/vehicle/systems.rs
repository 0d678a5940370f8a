//! System functions for vehicles.

use bevy::prelude::*;

use crate::path_curve::PathCurve;
use crate::road::AttachedToRoad;
use crate::sensor::ProximitySensor;
use crate::sim_rng::SimRng;

use super::types::{Presence, RecallVehicle, RideEndReason, RideEnded, Vehicle};

/// Activate a vehicle at `location`, arm its sensor for an immediate poll
/// and make it visible and collidable.
pub fn activate_vehicle(
    vehicle: &mut Vehicle,
    sensor: Option<&mut ProximitySensor>,
    presence: &mut Presence,
    location: Vec3,
    path: Option<&PathCurve>,
    rng: &mut SimRng,
) {
    vehicle.activate(location, path, rng);
    if let Some(sensor) = sensor {
        sensor.start();
    }
    presence.set_all(true);
}

/// Deactivate a vehicle, disarm its sensor and hide it. Returns `false`
/// and changes nothing if it was already inactive.
pub fn deactivate_vehicle(
    vehicle: &mut Vehicle,
    sensor: Option<&mut ProximitySensor>,
    presence: &mut Presence,
) -> bool {
    if !vehicle.deactivate() {
        return false;
    }
    if let Some(sensor) = sensor {
        sensor.stop();
    }
    presence.set_all(false);
    true
}

/// Advance every active vehicle by one fixed step.
pub fn drive_vehicles(
    time: Res<Time<Fixed>>,
    roads: Query<&PathCurve>,
    mut vehicles: Query<(
        Entity,
        &mut Vehicle,
        &mut Transform,
        &mut Presence,
        Option<&mut ProximitySensor>,
        Option<&AttachedToRoad>,
    )>,
    mut ride_ended: EventWriter<RideEnded>,
) {
    let dt = time.timestep().as_secs_f32();

    for (entity, mut vehicle, mut transform, mut presence, mut sensor, attached) in &mut vehicles {
        if !vehicle.is_active() {
            continue;
        }

        let road = attached.map(|a| a.0);
        let Some(path) = road.and_then(|r| roads.get(r).ok()) else {
            warn!("vehicle {entity:?} lost its road path, deactivating");
            if deactivate_vehicle(&mut vehicle, sensor.as_deref_mut(), &mut presence) {
                ride_ended.send(RideEnded {
                    vehicle: entity,
                    road,
                    reason: RideEndReason::PathLost,
                });
            }
            continue;
        };

        vehicle.regulator.advance(dt);
        vehicle.distance_along_path += vehicle.current_speed() * dt;

        if vehicle.distance_along_path >= path.length() {
            if deactivate_vehicle(&mut vehicle, sensor.as_deref_mut(), &mut presence) {
                ride_ended.send(RideEnded {
                    vehicle: entity,
                    road,
                    reason: RideEndReason::ReachedEnd,
                });
            }
            continue;
        }

        let (location, rotation) = path.pose(vehicle.distance_along_path);
        transform.translation = location;
        transform.rotation = rotation;
    }
}

/// Deactivate vehicles named by [`RecallVehicle`] requests. Requests for
/// inactive or unknown vehicles are ignored.
pub fn process_recalls(
    mut requests: EventReader<RecallVehicle>,
    mut vehicles: Query<(
        &mut Vehicle,
        &mut Presence,
        Option<&mut ProximitySensor>,
        Option<&AttachedToRoad>,
    )>,
    mut ride_ended: EventWriter<RideEnded>,
) {
    for request in requests.read() {
        let Ok((mut vehicle, mut presence, mut sensor, attached)) =
            vehicles.get_mut(request.vehicle)
        else {
            debug!("recall for unknown vehicle {:?}", request.vehicle);
            continue;
        };
        if deactivate_vehicle(&mut vehicle, sensor.as_deref_mut(), &mut presence) {
            ride_ended.send(RideEnded {
                vehicle: request.vehicle,
                road: attached.map(|a| a.0),
                reason: RideEndReason::Recalled,
            });
        }
    }
}
