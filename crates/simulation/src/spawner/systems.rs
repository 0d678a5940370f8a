//! System functions for the vehicle spawner.

use bevy::prelude::*;

use crate::path_curve::PathCurve;
use crate::road::AttachedToRoad;
use crate::sensor::{ColliderShape, ColliderSnapshot, ProximitySensor, StaticObstacle};
use crate::sim_rng::SimRng;
use crate::vehicle::{activate_vehicle, deactivate_vehicle, Presence, Vehicle, VehicleBody};

use super::types::{
    RequestSpawn, SpawnError, SpawnFailed, SpawnSlot, VehicleSpawned, VehicleSpawner,
};

/// State of one pool entry at the time of a spawn attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Inactive,
    Active,
    /// The entity no longer exists or lost its vehicle components.
    Missing,
}

/// Pick the pool index a spawn attempt should use.
///
/// Fails with `PoolExhausted` when no entry is inactive. `Any` picks an
/// inactive entry uniformly. An explicit index of an active entry falls back
/// to a free pick unless `allow_active` is set.
pub fn choose_slot(
    requested: SpawnSlot,
    states: &[SlotState],
    allow_active: bool,
    rng: &mut SimRng,
) -> Result<usize, SpawnError> {
    let inactive: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|(_, s)| **s == SlotState::Inactive)
        .map(|(i, _)| i)
        .collect();

    let free_pick = |rng: &mut SimRng| {
        rng.index(inactive.len())
            .map(|i| inactive[i])
            .ok_or(SpawnError::PoolExhausted)
    };

    if inactive.is_empty() {
        return Err(SpawnError::PoolExhausted);
    }

    match requested {
        SpawnSlot::Index(i) => match states.get(i) {
            Some(SlotState::Inactive) => Ok(i),
            Some(SlotState::Active) if allow_active => Ok(i),
            Some(SlotState::Active) => free_pick(rng),
            Some(SlotState::Missing) => Err(SpawnError::StaleHandle { slot: i }),
            None => free_pick(rng),
        },
        SpawnSlot::Any => free_pick(rng),
    }
}

type PooledVehicle = (
    Entity,
    &'static mut Vehicle,
    &'static mut Transform,
    &'static mut Presence,
    Option<&'static mut ProximitySensor>,
    Option<&'static VehicleBody>,
    Option<&'static AttachedToRoad>,
);

/// Build pools for newly seen spawners, fire due spawn timers and serve
/// explicit spawn requests.
#[allow(clippy::too_many_arguments)]
pub fn run_vehicle_spawners(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<SimRng>,
    mut requests: EventReader<RequestSpawn>,
    mut spawners: Query<(Entity, &mut VehicleSpawner, Option<&PathCurve>)>,
    mut vehicles: Query<PooledVehicle>,
    obstacles: Query<(Entity, &StaticObstacle, &Transform), Without<Vehicle>>,
    mut spawned: EventWriter<VehicleSpawned>,
    mut failed: EventWriter<SpawnFailed>,
) {
    let delta = time.timestep();
    let requests: Vec<RequestSpawn> = requests.read().copied().collect();

    let mut static_colliders = ColliderSnapshot::default();
    for (entity, obstacle, transform) in &obstacles {
        static_colliders.push(entity, transform, obstacle.half_extents);
    }

    for (road, mut spawner, path) in &mut spawners {
        let mut attempts: Vec<SpawnSlot> = Vec::new();

        if !spawner.is_built() {
            let pool = build_pool(road, &mut spawner, path, &mut vehicles);
            let first = rng.index(pool + 1).unwrap_or(0);
            attempts.push(SpawnSlot::from_index(first, pool));
        } else if let Some(slot) = spawner.tick(delta) {
            attempts.push(slot);
        }

        attempts.extend(requests.iter().filter(|r| r.road == road).map(|r| r.slot));

        for slot in attempts {
            let attempt = attempt_spawn(
                road,
                &spawner,
                path,
                slot,
                &mut vehicles,
                &static_colliders,
                &mut rng,
            );
            match attempt {
                Ok((vehicle, index)) => {
                    spawned.send(VehicleSpawned {
                        road,
                        vehicle,
                        slot: index,
                    });
                    spawner.schedule_next(true, SpawnSlot::Any, &mut rng);
                }
                Err(error) => {
                    let retry_slot = error.retry_slot(slot);
                    match error {
                        SpawnError::MissingPath | SpawnError::StaleHandle { .. } => {
                            warn!("spawn on road {road:?} failed: {error}");
                        }
                        SpawnError::PoolExhausted | SpawnError::PlacementBlocked { .. } => {
                            debug!("spawn on road {road:?} failed: {error}");
                        }
                    }
                    failed.send(SpawnFailed {
                        road,
                        error,
                        retry_slot,
                    });
                    spawner.schedule_next(false, retry_slot, &mut rng);
                }
            }
        }
    }
}

/// Collect the road's vehicles into its pool, park them and fix the spawn
/// pose. Returns the pool length.
fn build_pool(
    road: Entity,
    spawner: &mut VehicleSpawner,
    path: Option<&PathCurve>,
    vehicles: &mut Query<PooledVehicle>,
) -> usize {
    let mut pool: Vec<Entity> = Vec::new();
    for (entity, mut vehicle, _, mut presence, mut sensor, _, attached) in vehicles.iter_mut() {
        if attached.map(|a| a.0) != Some(road) {
            continue;
        }
        deactivate_vehicle(&mut vehicle, sensor.as_deref_mut(), &mut presence);
        pool.push(entity);
    }
    pool.sort();

    let spawn_pose = match path {
        Some(path) => {
            let (location, rotation) = path.pose(path.project_to_distance(spawner.anchor));
            Transform::from_translation(location).with_rotation(rotation)
        }
        None => Transform::from_translation(spawner.anchor),
    };

    debug!("road {road:?}: built pool of {} vehicles", pool.len());
    let len = pool.len();
    spawner.build_pool(pool, spawn_pose);
    len
}

/// One spawn attempt. On success returns the activated vehicle and its
/// pool index.
fn attempt_spawn(
    road: Entity,
    spawner: &VehicleSpawner,
    path: Option<&PathCurve>,
    slot: SpawnSlot,
    vehicles: &mut Query<PooledVehicle>,
    static_colliders: &ColliderSnapshot,
    rng: &mut SimRng,
) -> Result<(Entity, usize), SpawnError> {
    let Some(path) = path else {
        return Err(SpawnError::MissingPath);
    };

    let states: Vec<SlotState> = spawner
        .pool()
        .iter()
        .map(|&e| match vehicles.get(e) {
            Ok((_, vehicle, ..)) if vehicle.is_active() => SlotState::Active,
            Ok(_) => SlotState::Inactive,
            Err(_) => SlotState::Missing,
        })
        .collect();

    let index = choose_slot(slot, &states, spawner.params.allow_active_slot_respawn, rng)?;
    let entity = spawner.pool()[index];
    let pose = spawner.spawn_pose();

    let own_shape = match vehicles.get(entity) {
        Ok((.., body, _)) => ColliderShape {
            entity,
            center: pose.translation,
            rotation: pose.rotation,
            half_extents: body.map_or(Vec3::ZERO, |b| b.half_extents),
        },
        Err(_) => return Err(SpawnError::StaleHandle { slot: index }),
    };

    // Blocked by anything the sensors treat as solid: collidable bodies
    // (driving or parked) and static obstacles.
    let mut blockers = static_colliders.clone();
    for (other, _, transform, presence, _, body, _) in vehicles.iter() {
        if let Some(body) = body.filter(|_| other != entity && presence.collidable) {
            blockers.push(other, transform, body.half_extents);
        }
    }
    if blockers.overlaps_any(&own_shape) {
        return Err(SpawnError::PlacementBlocked { slot: index });
    }

    let Ok((_, mut vehicle, mut transform, mut presence, mut sensor, ..)) =
        vehicles.get_mut(entity)
    else {
        return Err(SpawnError::StaleHandle { slot: index });
    };
    *transform = pose;
    activate_vehicle(
        &mut vehicle,
        sensor.as_deref_mut(),
        &mut presence,
        pose.translation,
        Some(path),
        rng,
    );
    debug!("road {road:?}: spawned {entity:?} from slot {index}");
    Ok((entity, index))
}
