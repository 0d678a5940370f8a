//! Data-driven traffic parameters.
//!
//! Every tunable of the simulation lives in the [`TrafficParams`] resource so
//! it can be loaded from JSON and tuned without recompilation. The defaults
//! describe an ordinary city road.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vehicle parameters
// ---------------------------------------------------------------------------

/// Kinematic tunables shared by every pooled vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleParams {
    /// Lower bound of the per-ride cruising speed (world units/second).
    pub min_preferred_speed: f32,
    /// Upper bound of the per-ride cruising speed.
    pub max_preferred_speed: f32,
    /// Interpolation rate used while speeding up from a rolling start.
    pub acceleration_rate: f32,
    /// Interpolation rate used when pulling away from standstill.
    pub initial_acceleration_rate: f32,
    /// Interpolation rate used while slowing down; also sizes braking distance.
    pub deceleration_rate: f32,
}

impl Default for VehicleParams {
    fn default() -> Self {
        Self {
            min_preferred_speed: 20.0,
            max_preferred_speed: 140.0,
            acceleration_rate: 2.0,
            initial_acceleration_rate: 0.5,
            deceleration_rate: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor parameters
// ---------------------------------------------------------------------------

/// Forward-looking proximity sensor tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorParams {
    /// Number of rays per poll.
    pub sample_count: u8,
    /// Total yaw spread of the ray fan in degrees.
    pub max_fan_angle: f32,
    /// Seconds between polls.
    pub poll_interval: f32,
    /// Ray origin offset in the vehicle's local frame.
    pub start_offset: [f32; 3],
    /// Minimum gap kept to the vehicle ahead.
    pub safe_distance: f32,
    /// Extra margin on top of `safe_distance`.
    pub buffer_distance: f32,
    /// Emit a `SensorRayTraced` event for every ray cast.
    pub draw_debug_rays: bool,
    /// Emit a `SensorHitTraced` event for every vehicle hit.
    pub draw_debug_hits: bool,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            sample_count: 1,
            max_fan_angle: 0.0,
            poll_interval: 0.1,
            start_offset: [0.0; 3],
            safe_distance: 100.0,
            buffer_distance: 50.0,
            draw_debug_rays: false,
            draw_debug_hits: false,
        }
    }
}

impl SensorParams {
    pub fn start_offset(&self) -> Vec3 {
        Vec3::from_array(self.start_offset)
    }
}

// ---------------------------------------------------------------------------
// Spawner parameters
// ---------------------------------------------------------------------------

/// Pool scheduler tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerParams {
    /// Shortest delay between successful spawns (seconds).
    pub min_spawn_interval: f32,
    /// Longest delay between successful spawns (seconds).
    pub max_spawn_interval: f32,
    /// Retry failed spawns on the fixed `retry_interval` cadence.
    pub retry_spawn: bool,
    /// Delay before retrying a failed spawn (seconds).
    pub retry_interval: f32,
    /// Allow an explicit pool index to re-place a vehicle that is already
    /// driving. When false an active explicit slot falls back to a free pick.
    pub allow_active_slot_respawn: bool,
}

impl Default for SpawnerParams {
    fn default() -> Self {
        Self {
            min_spawn_interval: 1.0,
            max_spawn_interval: 2.0,
            retry_spawn: true,
            retry_interval: 1.0,
            allow_active_slot_respawn: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TrafficParams resource
// ---------------------------------------------------------------------------

/// All simulation tunables. Roads built through
/// [`spawn_road_with_pool`](crate::road::spawn_road_with_pool) copy these
/// values into their components, so changing the resource affects roads built
/// afterwards.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrafficParams {
    pub vehicle: VehicleParams,
    pub sensor: SensorParams,
    pub spawner: SpawnerParams,
}

impl TrafficParams {
    /// Parse and validate parameters from a JSON document. Missing fields
    /// keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a JSON parameter file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject parameter sets the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ParamsError> {
        let v = &self.vehicle;
        if v.min_preferred_speed < 0.0 {
            return Err(ParamsError::Invalid("min_preferred_speed must be >= 0".into()));
        }
        if v.max_preferred_speed < v.min_preferred_speed {
            return Err(ParamsError::Invalid(
                "max_preferred_speed must be >= min_preferred_speed".into(),
            ));
        }
        if v.acceleration_rate < 0.0 || v.initial_acceleration_rate < 0.0 {
            return Err(ParamsError::Invalid("acceleration rates must be >= 0".into()));
        }
        if v.deceleration_rate < 0.0 {
            return Err(ParamsError::Invalid("deceleration_rate must be >= 0".into()));
        }

        let s = &self.sensor;
        if s.sample_count == 0 {
            return Err(ParamsError::Invalid("sample_count must be >= 1".into()));
        }
        if !(0.0..=360.0).contains(&s.max_fan_angle) {
            return Err(ParamsError::Invalid("max_fan_angle must be in [0, 360]".into()));
        }
        if s.poll_interval <= 0.0 {
            return Err(ParamsError::Invalid("poll_interval must be > 0".into()));
        }
        if s.safe_distance < 0.0 || s.buffer_distance < 0.0 {
            return Err(ParamsError::Invalid(
                "safe_distance and buffer_distance must be >= 0".into(),
            ));
        }

        let p = &self.spawner;
        if p.min_spawn_interval < 0.0 || p.max_spawn_interval < p.min_spawn_interval {
            return Err(ParamsError::Invalid(
                "spawn interval bounds must satisfy 0 <= min <= max".into(),
            ));
        }
        if p.retry_interval < 0.0 {
            return Err(ParamsError::Invalid("retry_interval must be >= 0".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ParamsError
// ---------------------------------------------------------------------------

/// Errors that can occur while loading traffic parameters.
#[derive(Debug)]
pub enum ParamsError {
    /// The parameter file could not be read.
    Io(std::io::Error),
    /// The document is not valid JSON for `TrafficParams`.
    Parse(serde_json::Error),
    /// The values parsed but violate a constraint.
    Invalid(String),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::Io(e) => write!(f, "I/O error: {e}"),
            ParamsError::Parse(e) => write!(f, "Parse error: {e}"),
            ParamsError::Invalid(msg) => write!(f, "Invalid parameters: {msg}"),
        }
    }
}

impl std::error::Error for ParamsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamsError::Io(e) => Some(e),
            ParamsError::Parse(e) => Some(e),
            ParamsError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ParamsError {
    fn from(e: std::io::Error) -> Self {
        ParamsError::Io(e)
    }
}

impl From<serde_json::Error> for ParamsError {
    fn from(e: serde_json::Error) -> Self {
        ParamsError::Parse(e)
    }
}

pub struct ParamsPlugin;

impl Plugin for ParamsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrafficParams>();
    }
}
