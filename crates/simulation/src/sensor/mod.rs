//! Forward-looking proximity sensing.
//!
//! Every active vehicle polls a fan of rays ahead of it on a fixed interval.
//! The rays are sized by the vehicle's braking distance plus its safety
//! margins, cast concurrently against the spatial query backend, joined, and
//! reduced in emission order into a new preferred speed:
//!
//! - nothing ahead: resume the ride's cruising (start) speed
//! - anything that is not a measurable vehicle: brake to zero
//! - a vehicle inside twice the full safety envelope: match its speed
//! - vehicles further out only matter once something is inside the envelope
//!
//! Readings are tagged with the ride they were taken for and discarded if
//! the vehicle was deactivated or re-spawned in the meantime.

mod fan;
mod plugin;
mod reduction;
mod spatial;
mod systems;
mod types;

#[cfg(test)]
mod tests;

pub use fan::{braking_distance, build_rays, fan_directions, ray_length};
pub use plugin::SensorPlugin;
pub use reduction::{reduce_hits, ReductionInput};
pub use spatial::{
    refresh_collider_snapshot, BuiltinSpatialQuery, ColliderShape, ColliderSnapshot,
    SpatialQuery, SpatialQueryBackend, StaticObstacle,
};
pub use systems::{apply_reading, poll_proximity_sensors};
pub use types::{
    ProximitySensor, RayHit, SensorHitTraced, SensorRay, SensorRayTraced, SensorReading,
    VehicleSnapshot,
};
