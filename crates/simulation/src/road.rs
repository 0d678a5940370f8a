//! Road scene construction.
//!
//! A road is an entity carrying the [`PathCurve`] and a [`VehicleSpawner`].
//! Its vehicle pool is a fixed set of vehicle entities built alongside it,
//! each pointing back at the road through [`AttachedToRoad`]. Vehicles are
//! never spawned or despawned after this point, only activated and
//! deactivated.

use bevy::prelude::*;

use crate::params::TrafficParams;
use crate::path_curve::PathCurve;
use crate::sensor::ProximitySensor;
use crate::spawner::VehicleSpawner;
use crate::vehicle::{Presence, Vehicle, VehicleBody};

/// Back-reference from a pooled vehicle to the road that owns it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachedToRoad(pub Entity);

/// Default box of a pooled vehicle: 2 x 1.5 x 4.5 world units.
pub const DEFAULT_BODY_HALF_EXTENTS: Vec3 = Vec3::new(1.0, 0.75, 2.25);

/// Everything needed to build a road and its vehicle pool.
#[derive(Debug, Clone)]
pub struct RoadBlueprint {
    pub path: PathCurve,
    /// World location the spawn pose is projected from.
    pub anchor: Vec3,
    pub pool_size: usize,
    pub body: VehicleBody,
}

impl RoadBlueprint {
    pub fn new(path: PathCurve) -> Self {
        let anchor = path.start();
        Self {
            path,
            anchor,
            pool_size: 3,
            body: VehicleBody {
                half_extents: DEFAULT_BODY_HALF_EXTENTS,
            },
        }
    }

    pub fn with_anchor(mut self, anchor: Vec3) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_body(mut self, half_extents: Vec3) -> Self {
        self.body = VehicleBody { half_extents };
        self
    }

    /// Spawn the road and its pooled vehicles into `world`, using the
    /// current [`TrafficParams`] (or defaults when the resource is absent).
    /// Returns the road entity.
    pub fn spawn(self, world: &mut World) -> Entity {
        let params = world
            .get_resource::<TrafficParams>()
            .cloned()
            .unwrap_or_default();

        let parked = Transform::from_translation(self.path.start());
        let road = world
            .spawn((
                self.path,
                VehicleSpawner::new(params.spawner.clone(), self.anchor),
            ))
            .id();

        for _ in 0..self.pool_size {
            world.spawn((
                Vehicle::new(&params.vehicle),
                ProximitySensor::new(params.sensor.clone()),
                self.body,
                Presence::default(),
                parked,
                AttachedToRoad(road),
            ));
        }
        road
    }
}

/// Spawn a road with a pool of `pool_size` default-sized vehicles whose
/// spawn pose is projected from the start of `path`.
pub fn spawn_road_with_pool(world: &mut World, path: PathCurve, pool_size: usize) -> Entity {
    RoadBlueprint::new(path)
        .with_pool_size(pool_size)
        .spawn(world)
}
