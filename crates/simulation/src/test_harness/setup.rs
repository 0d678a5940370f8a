//! Builder methods for roads, parameters and obstacles in integration tests.

use bevy::prelude::*;

use crate::params::TrafficParams;
use crate::road::RoadBlueprint;
use crate::sensor::StaticObstacle;
use crate::vehicle::{Presence, Vehicle, VehicleBody};

use super::TestTraffic;

impl TestTraffic {
    /// Replace the traffic parameters. Roads added afterwards use them.
    pub fn with_params(mut self, params: TrafficParams) -> Self {
        self.app.insert_resource(params);
        self
    }

    /// Add a road and its vehicle pool.
    pub fn with_road(mut self, blueprint: RoadBlueprint) -> Self {
        self.add_road(blueprint);
        self
    }

    /// Add a road and its vehicle pool, returning the road entity.
    pub fn add_road(&mut self, blueprint: RoadBlueprint) -> Entity {
        blueprint.spawn(self.app.world_mut())
    }

    /// Add a static box obstacle.
    pub fn with_obstacle(mut self, center: Vec3, half_extents: Vec3) -> Self {
        self.add_obstacle(center, half_extents);
        self
    }

    /// Add a static box obstacle, returning its entity.
    pub fn add_obstacle(&mut self, center: Vec3, half_extents: Vec3) -> Entity {
        self.app
            .world_mut()
            .spawn((
                StaticObstacle { half_extents },
                Transform::from_translation(center),
            ))
            .id()
    }

    /// Add a collidable vehicle that is not driven by any road, moving at
    /// `speed` as far as sensors can tell. Its rotation looks along `facing`.
    pub fn add_parked_vehicle(
        &mut self,
        location: Vec3,
        facing: Vec3,
        half_extents: Vec3,
        speed: f32,
    ) -> Entity {
        let params = self
            .app
            .world()
            .get_resource::<TrafficParams>()
            .cloned()
            .unwrap_or_default();
        let mut vehicle = Vehicle::new(&params.vehicle);
        vehicle.regulator.current_speed = speed;

        self.app
            .world_mut()
            .spawn((
                vehicle,
                VehicleBody { half_extents },
                Presence {
                    visible: true,
                    collidable: true,
                    ticking: false,
                },
                Transform::from_translation(location).looking_to(facing, Vec3::Y),
            ))
            .id()
    }
}
