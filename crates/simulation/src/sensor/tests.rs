//! Tests for the proximity sensor.

use std::f32::consts::FRAC_PI_4;
use std::time::Duration;

use bevy::prelude::*;

use crate::params::{SensorParams, VehicleParams};
use crate::sim_rng::SimRng;
use crate::vehicle::Vehicle;

use super::fan::{braking_distance, build_rays, fan_directions, ray_length};
use super::reduction::{reduce_hits, ReductionInput};
use super::spatial::{ColliderShape, ColliderSnapshot, SpatialQuery};
use super::systems::{apply_reading, cast_rays_joined};
use super::types::{ProximitySensor, RayHit, SensorReading, VehicleSnapshot};

// ---------------------------------------------------------------------------
// Braking distance and fan geometry
// ---------------------------------------------------------------------------

#[test]
fn test_braking_distance() {
    assert_eq!(braking_distance(50.0, 1.0), 1250.0);
    assert_eq!(braking_distance(20.0, 4.0), 50.0);
    for speed in [0.0, 10.0, 140.0] {
        assert_eq!(braking_distance(speed, 0.0), 0.0);
        assert_eq!(braking_distance(speed, -2.0), 0.0);
    }
}

#[test]
fn test_ray_length_adds_margins() {
    // 1250 braking + 100 safe + 50 buffer + 2 half-length
    assert_eq!(ray_length(50.0, 1.0, 100.0, 50.0, 2.0), 1402.0);
    assert_eq!(ray_length(0.0, 1.0, 100.0, 50.0, 0.0), 150.0);
}

#[test]
fn test_single_sample_points_forward() {
    let dirs = fan_directions(Vec3::NEG_Z, 1, 60.0);
    assert_eq!(dirs, vec![Vec3::NEG_Z]);
}

#[test]
fn test_fan_is_symmetric() {
    let forward = Vec3::NEG_Z;
    let dirs = fan_directions(forward, 3, 90.0);
    assert_eq!(dirs.len(), 3);
    assert!(dirs[1].distance(forward) < 1e-5);
    assert!((dirs[0].angle_between(forward) - FRAC_PI_4).abs() < 1e-4);
    assert!((dirs[2].angle_between(forward) - FRAC_PI_4).abs() < 1e-4);
    // Mirror images across the forward axis.
    assert!((dirs[0].x + dirs[2].x).abs() < 1e-5);
    assert!((dirs[0].z - dirs[2].z).abs() < 1e-5);
    for d in &dirs {
        assert!((d.length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_zero_samples_yields_no_rays() {
    assert!(fan_directions(Vec3::NEG_Z, 0, 30.0).is_empty());
}

#[test]
fn test_build_rays_length() {
    let rays = build_rays(Vec3::ONE, Vec3::X, 2, 20.0, 10.0);
    assert_eq!(rays.len(), 2);
    for ray in rays {
        assert_eq!(ray.origin, Vec3::ONE);
        assert!((ray.origin.distance(ray.end) - 10.0).abs() < 1e-4);
    }
}

// ---------------------------------------------------------------------------
// Reduction
// ---------------------------------------------------------------------------

const START_SPEED: f32 = 80.0;

fn input() -> ReductionInput {
    ReductionInput {
        start_speed: START_SPEED,
        max_preferred_speed: 140.0,
        safe_distance: 100.0,
        buffer_distance: 50.0,
        own_half_length: 2.0,
    }
}

fn hit(raw: u32, distance: f32) -> RayHit {
    RayHit {
        distance,
        entity: Entity::from_raw(raw),
        point: Vec3::ZERO,
    }
}

/// Entities 1..=9 are vehicles with half-length 2 and speed `raw * 10`;
/// entity 20 is a vehicle without a body; anything else is not a vehicle.
fn lookup(entity: Entity) -> Option<VehicleSnapshot> {
    match entity.index() {
        1..=9 => Some(VehicleSnapshot {
            current_speed: entity.index() as f32 * 10.0,
            half_length: Some(2.0),
        }),
        20 => Some(VehicleSnapshot {
            current_speed: 30.0,
            half_length: None,
        }),
        21 => Some(VehicleSnapshot {
            current_speed: 30.0,
            half_length: Some(0.0),
        }),
        _ => None,
    }
}

// full safe distance = 100 + 50 + 2 + 2 = 154, doubled = 308

#[test]
fn test_no_hits_resumes_start_speed() {
    let hits: Vec<RayHit> = Vec::new();
    assert_eq!(reduce_hits(&hits, &input(), lookup), START_SPEED);
}

#[test]
fn test_unknown_entity_brakes_to_zero() {
    let hits = vec![hit(3, 400.0), hit(2, 100.0), hit(99, 900.0)];
    assert_eq!(reduce_hits(&hits, &input(), lookup), 0.0);
}

#[test]
fn test_vehicle_without_body_brakes_to_zero() {
    assert_eq!(reduce_hits(&[hit(20, 500.0)], &input(), lookup), 0.0);
    assert_eq!(reduce_hits(&[hit(21, 500.0)], &input(), lookup), 0.0);
}

#[test]
fn test_vehicle_inside_safe_distance_matches_its_speed() {
    assert_eq!(reduce_hits(&[hit(4, 150.0)], &input(), lookup), 40.0);
}

#[test]
fn test_vehicle_inside_doubled_envelope_matches_its_speed() {
    assert_eq!(reduce_hits(&[hit(6, 300.0)], &input(), lookup), 60.0);
    assert_eq!(reduce_hits(&[hit(6, 308.0)], &input(), lookup), 60.0);
}

#[test]
fn test_far_vehicle_alone_keeps_start_speed() {
    assert_eq!(reduce_hits(&[hit(1, 309.0)], &input(), lookup), START_SPEED);
}

#[test]
fn test_last_matching_hit_wins_over_nearest() {
    let hits = vec![hit(1, 50.0), hit(3, 250.0)];
    assert_eq!(reduce_hits(&hits, &input(), lookup), 30.0);
}

#[test]
fn test_far_hits_after_close_hit_take_minimum() {
    let hits = vec![hit(5, 100.0), hit(2, 500.0), hit(9, 600.0)];
    assert_eq!(reduce_hits(&hits, &input(), lookup), 20.0);
}

#[test]
fn test_close_hit_overwrites_earlier_far_minimum() {
    let hits = vec![hit(1, 500.0), hit(7, 100.0)];
    assert_eq!(reduce_hits(&hits, &input(), lookup), 70.0);
}

// ---------------------------------------------------------------------------
// Spatial snapshot
// ---------------------------------------------------------------------------

fn box_at(snapshot: &mut ColliderSnapshot, raw: u32, center: Vec3, rotation: Quat, half: Vec3) {
    snapshot.push(
        Entity::from_raw(raw),
        &Transform::from_translation(center).with_rotation(rotation),
        half,
    );
}

#[test]
fn test_ray_hits_box_at_entry_face() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::new(0.0, 0.0, -50.0), Quat::IDENTITY, Vec3::new(1.0, 1.0, 2.0));
    let hits = snapshot.cast_ray(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), None);
    assert_eq!(hits.len(), 1);
    assert!((hits[0].distance - 48.0).abs() < 1e-4);
    assert!(hits[0].point.distance(Vec3::new(0.0, 0.0, -48.0)) < 1e-4);
}

#[test]
fn test_ray_respects_box_rotation() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(
        &mut snapshot,
        1,
        Vec3::new(0.0, 0.0, -50.0),
        Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        Vec3::new(1.0, 1.0, 4.0),
    );
    let hits = snapshot.cast_ray(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), None);
    assert_eq!(hits.len(), 1);
    assert!((hits[0].distance - 49.0).abs() < 1e-3);
}

#[test]
fn test_ray_stops_at_end_point() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::new(0.0, 0.0, -50.0), Quat::IDENTITY, Vec3::ONE);
    assert!(snapshot.cast_ray(Vec3::ZERO, Vec3::new(0.0, 0.0, -40.0), None).is_empty());
}

#[test]
fn test_ray_misses_lateral_box() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::new(10.0, 0.0, -50.0), Quat::IDENTITY, Vec3::ONE);
    assert!(snapshot.cast_ray(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), None).is_empty());
}

#[test]
fn test_hits_sorted_and_ignore_respected() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::new(0.0, 0.0, -80.0), Quat::IDENTITY, Vec3::ONE);
    box_at(&mut snapshot, 2, Vec3::new(0.0, 0.0, -20.0), Quat::IDENTITY, Vec3::ONE);
    box_at(&mut snapshot, 3, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);

    let hits = snapshot.cast_ray(
        Vec3::ZERO,
        Vec3::new(0.0, 0.0, -100.0),
        Some(Entity::from_raw(3)),
    );
    let order: Vec<u32> = hits.iter().map(|h| h.entity.index()).collect();
    assert_eq!(order, vec![2, 1]);

    // Without ignore, the box around the origin reports distance 0.
    let hits = snapshot.cast_ray(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), None);
    assert_eq!(hits[0].entity, Entity::from_raw(3));
    assert_eq!(hits[0].distance, 0.0);
}

#[test]
fn test_joined_cast_preserves_ray_order() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::new(-30.0, 0.0, -30.0), Quat::IDENTITY, Vec3::splat(2.0));
    box_at(&mut snapshot, 2, Vec3::new(30.0, 0.0, -30.0), Quat::IDENTITY, Vec3::splat(2.0));

    let rays = build_rays(Vec3::ZERO, Vec3::NEG_Z, 3, 90.0, 100.0);
    let results = cast_rays_joined(&snapshot, &rays, Entity::from_raw(50));
    assert_eq!(results.len(), 3);
    // -45° yaw turns -Z toward +X, +45° toward -X.
    assert_eq!(results[0].len(), 1);
    assert_eq!(results[0][0].entity, Entity::from_raw(2));
    assert!(results[1].is_empty());
    assert_eq!(results[2].len(), 1);
    assert_eq!(results[2][0].entity, Entity::from_raw(1));
}

fn shape(raw: u32, center: Vec3, rotation: Quat, half: Vec3) -> ColliderShape {
    ColliderShape {
        entity: Entity::from_raw(raw),
        center,
        rotation,
        half_extents: half,
    }
}

#[test]
fn test_box_overlap_axis_aligned() {
    let car = Vec3::new(1.0, 0.75, 2.25);
    let a = shape(1, Vec3::ZERO, Quat::IDENTITY, car);
    let near = shape(2, Vec3::new(0.0, 0.0, -4.0), Quat::IDENTITY, car);
    let touching = shape(3, Vec3::new(0.0, 0.0, -4.5), Quat::IDENTITY, car);
    let beside = shape(4, Vec3::new(2.5, 0.0, 0.0), Quat::IDENTITY, car);

    assert!(a.overlaps(&near));
    assert!(near.overlaps(&a));
    assert!(!a.overlaps(&touching));
    assert!(!a.overlaps(&beside));
}

#[test]
fn test_box_overlap_reaches_rotated_corners() {
    let a = shape(1, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    let turned = Quat::from_rotation_y(FRAC_PI_4);

    // The turned box's corner reaches x = 2.3 - sqrt(2), inside `a`.
    let corner_in = shape(2, Vec3::new(2.3, 0.0, 0.0), turned, Vec3::ONE);
    assert!(a.overlaps(&corner_in));
    assert!(corner_in.overlaps(&a));

    let corner_out = shape(3, Vec3::new(2.5, 0.0, 0.0), turned, Vec3::ONE);
    assert!(!a.overlaps(&corner_out));
}

#[test]
fn test_point_inside_box_overlaps() {
    let wall = shape(1, Vec3::new(0.0, 0.0, -1.0), Quat::IDENTITY, Vec3::splat(3.0));
    let point = shape(2, Vec3::ZERO, Quat::IDENTITY, Vec3::ZERO);
    assert!(wall.overlaps(&point));
}

#[test]
fn test_snapshot_overlap_skips_own_entity() {
    let mut snapshot = ColliderSnapshot::default();
    box_at(&mut snapshot, 1, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    let own = shape(1, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE);
    assert!(!snapshot.overlaps_any(&own));

    box_at(&mut snapshot, 2, Vec3::new(0.5, 0.0, 0.0), Quat::IDENTITY, Vec3::ONE);
    assert!(snapshot.overlaps_any(&own));
}

// ---------------------------------------------------------------------------
// Poll timer and reading application
// ---------------------------------------------------------------------------

#[test]
fn test_sensor_timer_cadence() {
    let mut sensor = ProximitySensor::new(SensorParams::default());
    assert!(!sensor.tick(Duration::from_secs(1)), "disarmed sensor never polls");

    sensor.start();
    assert!(sensor.tick(Duration::ZERO), "first poll is immediate");
    assert!(!sensor.tick(Duration::from_millis(60)));
    assert!(sensor.tick(Duration::from_millis(60)));
    assert!(!sensor.tick(Duration::from_millis(20)));

    sensor.stop();
    assert!(!sensor.is_armed());
    assert!(!sensor.tick(Duration::from_secs(5)));
}

#[test]
fn test_reading_discarded_for_inactive_or_later_ride() {
    let mut vehicle = Vehicle::new(&VehicleParams::default());
    let reading = SensorReading {
        vehicle: Entity::from_raw(1),
        ride: 0,
        preferred_speed: 12.0,
    };
    assert!(!apply_reading(&mut vehicle, &reading), "inactive vehicle");

    let mut rng = SimRng::from_seed_u64(5);
    vehicle.activate(Vec3::ZERO, None, &mut rng);
    vehicle.deactivate();
    vehicle.activate(Vec3::ZERO, None, &mut rng);
    assert_eq!(vehicle.ride, 2);
    let cruising = vehicle.preferred_speed();

    assert!(!apply_reading(&mut vehicle, &SensorReading { ride: 1, ..reading }));
    assert_eq!(vehicle.preferred_speed(), cruising);

    assert!(apply_reading(&mut vehicle, &SensorReading { ride: 2, ..reading }));
    assert_eq!(vehicle.preferred_speed(), 12.0);
}
