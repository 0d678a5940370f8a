//! Types for vehicles.

use bevy::prelude::*;

use crate::params::VehicleParams;
use crate::path_curve::PathCurve;
use crate::sim_rng::SimRng;
use crate::speed_regulator::SpeedRegulator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VehicleState {
    #[default]
    Inactive,
    Active,
}

#[derive(Component, Debug, Clone)]
pub struct Vehicle {
    pub state: VehicleState,
    /// Arc length travelled along the road path.
    pub distance_along_path: f32,
    pub regulator: SpeedRegulator,
    /// Cruising speed drawn for the current ride.
    pub start_speed: f32,
    pub min_preferred_speed: f32,
    pub max_preferred_speed: f32,
    /// Incremented on every activation.
    pub ride: u32,
}

impl Vehicle {
    pub fn new(params: &VehicleParams) -> Self {
        Self {
            state: VehicleState::Inactive,
            distance_along_path: 0.0,
            regulator: SpeedRegulator::new(params),
            start_speed: 0.0,
            min_preferred_speed: params.min_preferred_speed,
            max_preferred_speed: params.max_preferred_speed,
            ride: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == VehicleState::Active
    }

    pub fn current_speed(&self) -> f32 {
        self.regulator.current_speed
    }

    pub fn preferred_speed(&self) -> f32 {
        self.regulator.preferred_speed
    }

    /// Start a new ride from `location`: draw a cruising speed, begin at a
    /// standstill and pick up the path at the projection of `location`.
    /// Without a path the ride starts at distance 0.
    pub fn activate(&mut self, location: Vec3, path: Option<&PathCurve>, rng: &mut SimRng) {
        self.start_speed = rng.range_f32(self.min_preferred_speed, self.max_preferred_speed);
        self.regulator.preferred_speed = self.start_speed;
        self.regulator.current_speed = 0.0;
        self.distance_along_path = path.map_or(0.0, |p| p.project_to_distance(location));
        self.ride = self.ride.wrapping_add(1);
        self.state = VehicleState::Active;
    }

    /// End the current ride. Speed and distance keep their last values until
    /// the next activation. Returns `false` if the vehicle was not active.
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = VehicleState::Inactive;
        true
    }
}

/// Oriented box used for sensing, spawn blocking and the collider snapshot.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct VehicleBody {
    pub half_extents: Vec3,
}

impl VehicleBody {
    /// Half of the body's extent along its forward axis.
    pub fn half_length(&self) -> f32 {
        self.half_extents.z
    }
}

/// Placement flags read by renderers and the collider snapshot.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Presence {
    pub visible: bool,
    pub collidable: bool,
    pub ticking: bool,
}

impl Presence {
    pub fn set_all(&mut self, on: bool) {
        self.visible = on;
        self.collidable = on;
        self.ticking = on;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RideEndReason {
    /// Travelled past the end of the path.
    ReachedEnd,
    /// The road entity or its path disappeared mid-ride.
    PathLost,
    /// Deactivated by a [`RecallVehicle`] request.
    Recalled,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct RideEnded {
    pub vehicle: Entity,
    pub road: Option<Entity>,
    pub reason: RideEndReason,
}

/// Request to take an active vehicle off the road.
#[derive(Event, Debug, Clone, Copy)]
pub struct RecallVehicle {
    pub vehicle: Entity,
}
