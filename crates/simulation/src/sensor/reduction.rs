//! Reduction of ray hits into a preferred speed.

use bevy::prelude::*;

use super::types::{RayHit, VehicleSnapshot};

/// Per-poll inputs of the reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReductionInput {
    /// Cruising speed of the current ride.
    pub start_speed: f32,
    /// Initial candidate before any hit is considered.
    pub max_preferred_speed: f32,
    pub safe_distance: f32,
    pub buffer_distance: f32,
    pub own_half_length: f32,
}

/// Fold `hits` (ray emission order, then per-ray hit order) into a preferred
/// speed. `lookup` resolves a hit entity to a vehicle snapshot, or `None`
/// when the entity is not a vehicle.
pub fn reduce_hits<'a>(
    hits: impl IntoIterator<Item = &'a RayHit>,
    input: &ReductionInput,
    lookup: impl Fn(Entity) -> Option<VehicleSnapshot>,
) -> f32 {
    let mut safe_to_accelerate = true;
    let mut candidate = input.max_preferred_speed;

    for hit in hits {
        let Some(other) = lookup(hit.entity) else {
            return 0.0;
        };
        let Some(other_half_length) = other.measurable_half_length() else {
            return 0.0;
        };

        let full_safe_distance = input.safe_distance
            + input.buffer_distance
            + input.own_half_length
            + other_half_length;

        if hit.distance <= full_safe_distance || hit.distance <= full_safe_distance * 2.0 {
            // Later hits overwrite earlier ones, nearer or not.
            safe_to_accelerate = false;
            candidate = other.current_speed;
        } else {
            candidate = candidate.min(other.current_speed);
        }
    }

    if safe_to_accelerate {
        input.start_speed
    } else {
        candidate
    }
}
