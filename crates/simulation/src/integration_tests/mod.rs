//! Integration tests using the `TestTraffic` harness.
//!
//! These tests spin up a headless Bevy App with `SimulationPlugin` and verify
//! behavior across the spawner, sensor and vehicle systems working together.

use bevy::prelude::*;

use crate::params::TrafficParams;
use crate::path_curve::PathCurve;
use crate::road::RoadBlueprint;

mod simulation_phases;

/// Straight road from the origin along -Z (the default forward axis).
fn straight_road(length: f32) -> RoadBlueprint {
    RoadBlueprint::new(PathCurve::straight(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -length),
    ))
}

/// Default parameters with every ride cruising at exactly `speed`.
fn fixed_speed_params(speed: f32) -> TrafficParams {
    let mut params = TrafficParams::default();
    params.vehicle.min_preferred_speed = speed;
    params.vehicle.max_preferred_speed = speed;
    params
}
