//! Spatial query backend for sensor rays.
//!
//! Sensors only see the scene through the [`SpatialQuery`] trait held in
//! [`SpatialQueryBackend`]. The built-in backend is a [`ColliderSnapshot`]
//! of oriented boxes rebuilt each tick from collidable vehicle bodies and
//! [`StaticObstacle`]s, wrapped in `Arc` so concurrent ray tasks can share it
//! without cloning. Hosts with their own physics scene remove the
//! [`BuiltinSpatialQuery`] marker and insert a backend of their own.

use std::sync::Arc;

use bevy::prelude::*;

use super::types::RayHit;
use crate::vehicle::{Presence, Vehicle, VehicleBody};

/// Ray-cast contract. Implementations are called from several compute
/// threads at once and must not rely on interior mutability.
pub trait SpatialQuery: Send + Sync {
    /// All hits on the segment `origin..end`, nearest first. `ignore` is
    /// excluded from the results.
    fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<Entity>) -> Vec<RayHit>;
}

#[derive(Resource, Clone)]
pub struct SpatialQueryBackend(pub Arc<dyn SpatialQuery>);

impl Default for SpatialQueryBackend {
    fn default() -> Self {
        Self(Arc::new(ColliderSnapshot::default()))
    }
}

/// Marker: while present, `refresh_collider_snapshot` replaces the backend
/// with a fresh [`ColliderSnapshot`] every tick.
#[derive(Resource, Default)]
pub struct BuiltinSpatialQuery;

/// Non-vehicle geometry that blocks sensor rays (barriers, props, debris).
#[derive(Component, Debug, Clone, Copy)]
pub struct StaticObstacle {
    pub half_extents: Vec3,
}

/// An oriented box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderShape {
    pub entity: Entity,
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

impl ColliderShape {
    /// Entry distance of the ray `origin + dir * t`, `t ∈ [0, max_len]`,
    /// using a slab test in the box's local frame. `dir` must be unit length.
    /// A ray starting inside the box hits at distance 0.
    pub fn intersect(&self, origin: Vec3, dir: Vec3, max_len: f32) -> Option<f32> {
        let inv = self.rotation.inverse();
        let local_origin = inv * (origin - self.center);
        let local_dir = inv * dir;

        let mut t_min = 0.0_f32;
        let mut t_max = max_len;
        for axis in 0..3 {
            let o = local_origin[axis];
            let d = local_dir[axis];
            let h = self.half_extents[axis];
            if d.abs() < 1e-8 {
                if o.abs() > h {
                    return None;
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t0 = (-h - o) * inv_d;
            let mut t1 = (h - o) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(t_min)
    }

    /// Separating axis test between two oriented boxes. Boxes that only
    /// touch do not overlap.
    pub fn overlaps(&self, other: &ColliderShape) -> bool {
        let offset = other.center - self.center;
        if offset.length() >= self.half_extents.length() + other.half_extents.length() {
            return false;
        }

        let a = box_axes(self.rotation);
        let b = box_axes(other.rotation);
        let mut candidates: Vec<Vec3> = Vec::with_capacity(15);
        candidates.extend(a);
        candidates.extend(b);
        for ea in a {
            for eb in b {
                let cross = ea.cross(eb);
                // Parallel edges are already covered by the face axes.
                if cross.length_squared() > 1e-6 {
                    candidates.push(cross.normalize());
                }
            }
        }

        candidates.into_iter().all(|axis| {
            let ra = projected_radius(&a, self.half_extents, axis);
            let rb = projected_radius(&b, other.half_extents, axis);
            offset.dot(axis).abs() < ra + rb
        })
    }
}

fn box_axes(rotation: Quat) -> [Vec3; 3] {
    [rotation * Vec3::X, rotation * Vec3::Y, rotation * Vec3::Z]
}

fn projected_radius(axes: &[Vec3; 3], half_extents: Vec3, axis: Vec3) -> f32 {
    (0..3)
        .map(|i| half_extents[i] * axes[i].dot(axis).abs())
        .sum()
}

#[derive(Debug, Clone, Default)]
pub struct ColliderSnapshot {
    pub colliders: Vec<ColliderShape>,
}

impl ColliderSnapshot {
    pub fn push(&mut self, entity: Entity, transform: &Transform, half_extents: Vec3) {
        self.colliders.push(ColliderShape {
            entity,
            center: transform.translation,
            rotation: transform.rotation,
            half_extents,
        });
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Whether `shape` overlaps any collider other than its own entity.
    pub fn overlaps_any(&self, shape: &ColliderShape) -> bool {
        self.colliders
            .iter()
            .any(|c| c.entity != shape.entity && c.overlaps(shape))
    }
}

impl SpatialQuery for ColliderSnapshot {
    fn cast_ray(&self, origin: Vec3, end: Vec3, ignore: Option<Entity>) -> Vec<RayHit> {
        let segment = end - origin;
        let length = segment.length();
        if length <= 0.0 {
            return Vec::new();
        }
        let dir = segment / length;

        let mut hits: Vec<RayHit> = self
            .colliders
            .iter()
            .filter(|c| Some(c.entity) != ignore)
            .filter_map(|c| {
                c.intersect(origin, dir, length).map(|t| RayHit {
                    distance: t,
                    entity: c.entity,
                    point: origin + dir * t,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Rebuild the built-in collider snapshot from collidable vehicle bodies and
/// static obstacles.
pub fn refresh_collider_snapshot(
    vehicles: Query<(Entity, &Presence, &VehicleBody, &Transform), With<Vehicle>>,
    obstacles: Query<(Entity, &StaticObstacle, &Transform)>,
    backend: Option<ResMut<SpatialQueryBackend>>,
) {
    let Some(mut backend) = backend else {
        return;
    };

    let mut snapshot = ColliderSnapshot::default();
    for (entity, presence, body, transform) in &vehicles {
        if presence.collidable {
            snapshot.push(entity, transform, body.half_extents);
        }
    }
    for (entity, obstacle, transform) in &obstacles {
        snapshot.push(entity, transform, obstacle.half_extents);
    }
    backend.0 = Arc::new(snapshot);
}
