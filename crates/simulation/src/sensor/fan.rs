//! Ray fan geometry.

use bevy::prelude::*;

use super::types::SensorRay;

/// Distance needed to stop from `speed` at a constant `deceleration`.
/// Zero when the deceleration is not positive.
pub fn braking_distance(speed: f32, deceleration: f32) -> f32 {
    if deceleration <= 0.0 {
        return 0.0;
    }
    (speed * speed) / (2.0 * deceleration)
}

/// Length of every ray in a poll.
pub fn ray_length(
    current_speed: f32,
    deceleration: f32,
    safe_distance: f32,
    buffer_distance: f32,
    own_half_length: f32,
) -> f32 {
    braking_distance(current_speed, deceleration)
        + safe_distance
        + buffer_distance
        + own_half_length
}

/// `count` unit directions spread evenly across `max_angle_deg` of yaw,
/// centered on `forward`. Ordered from the most negative angle to the most
/// positive; a single sample points straight ahead.
pub fn fan_directions(forward: Vec3, count: u8, max_angle_deg: f32) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![forward];
    }
    let half = max_angle_deg * 0.5;
    let step = max_angle_deg / (count - 1) as f32;
    (0..count)
        .map(|i| {
            let angle = -half + i as f32 * step;
            Quat::from_rotation_y(angle.to_radians()) * forward
        })
        .collect()
}

/// Rays from `origin` along each fan direction, `length` long.
pub fn build_rays(
    origin: Vec3,
    forward: Vec3,
    count: u8,
    max_angle_deg: f32,
    length: f32,
) -> Vec<SensorRay> {
    fan_directions(forward, count, max_angle_deg)
        .into_iter()
        .map(|dir| SensorRay {
            origin,
            end: origin + dir * length,
        })
        .collect()
}
