//! Types for the proximity sensor.

use std::time::Duration;

use bevy::prelude::*;

use crate::params::SensorParams;

/// Shortest poll period a sensor timer will run with.
const MIN_POLL_INTERVAL: f32 = 0.001;

/// Per-vehicle sensor: tunables plus the repeating poll timer.
#[derive(Component, Debug, Clone)]
pub struct ProximitySensor {
    pub params: SensorParams,
    timer: Timer,
    armed: bool,
    poll_requested: bool,
}

impl ProximitySensor {
    pub fn new(params: SensorParams) -> Self {
        let period = params.poll_interval.max(MIN_POLL_INTERVAL);
        Self {
            params,
            timer: Timer::from_seconds(period, TimerMode::Repeating),
            armed: false,
            poll_requested: false,
        }
    }

    /// Arm the poll timer from zero and request an immediate first poll.
    pub fn start(&mut self) {
        self.timer.reset();
        self.armed = true;
        self.poll_requested = true;
    }

    /// Disarm the poll timer. Pending poll requests are dropped.
    pub fn stop(&mut self) {
        self.armed = false;
        self.poll_requested = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Advance the poll timer by `delta`; returns `true` when a poll is due.
    /// Several timer periods elapsing in one tick still yield a single poll.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.armed {
            return false;
        }
        self.timer.tick(delta);
        let due = self.poll_requested || self.timer.just_finished();
        self.poll_requested = false;
        due
    }
}

/// One forward ray of a poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRay {
    pub origin: Vec3,
    pub end: Vec3,
}

/// A single intersection reported by the spatial query backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the impact point.
    pub distance: f32,
    pub entity: Entity,
    pub point: Vec3,
}

/// What the reduction may read about another vehicle. Taken once per tick
/// before any sensor polls, so it can lag the vehicle's latest state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshot {
    pub current_speed: f32,
    /// Half of the body's extent along its forward axis; `None` when the
    /// vehicle has no body.
    pub half_length: Option<f32>,
}

impl VehicleSnapshot {
    /// Half-length of a body that can be used in distance math.
    pub fn measurable_half_length(&self) -> Option<f32> {
        self.half_length.filter(|h| *h > 0.0)
    }
}

/// Result of one poll, tagged with the ride it was taken for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub vehicle: Entity,
    pub ride: u32,
    pub preferred_speed: f32,
}

/// Emitted for every ray cast by a sensor with `draw_debug_rays` set.
#[derive(Event, Debug, Clone, Copy)]
pub struct SensorRayTraced {
    pub vehicle: Entity,
    pub origin: Vec3,
    pub end: Vec3,
}

/// Emitted for every vehicle hit seen by a sensor with `draw_debug_hits` set.
#[derive(Event, Debug, Clone, Copy)]
pub struct SensorHitTraced {
    pub vehicle: Entity,
    pub point: Vec3,
}
