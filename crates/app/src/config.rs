//! Runner configuration from environment variables.
//!
//! - `ROAD_TRAFFIC_PARAMS`: path to a JSON `TrafficParams` file
//! - `ROAD_TRAFFIC_SEED`: RNG seed (u64)
//! - `ROAD_TRAFFIC_SECONDS`: simulated seconds to run

use std::path::PathBuf;

use bevy::prelude::*;

use simulation::params::{ParamsError, TrafficParams};

pub const PARAMS_VAR: &str = "ROAD_TRAFFIC_PARAMS";
pub const SEED_VAR: &str = "ROAD_TRAFFIC_SEED";
pub const SECONDS_VAR: &str = "ROAD_TRAFFIC_SECONDS";

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SECONDS: f32 = 60.0;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub params_path: Option<PathBuf>,
    pub seed: u64,
    pub seconds: f32,
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self {
            params_path: std::env::var_os(PARAMS_VAR).map(PathBuf::from),
            seed: parse_var(SEED_VAR).unwrap_or(DEFAULT_SEED),
            seconds: parse_var::<f32>(SECONDS_VAR)
                .filter(|s| *s > 0.0)
                .unwrap_or(DEFAULT_SECONDS),
        }
    }

    /// Parameters from `params_path`, or defaults when none is set.
    pub fn load_params(&self) -> Result<TrafficParams, ParamsError> {
        match &self.params_path {
            Some(path) => TrafficParams::load(path),
            None => Ok(TrafficParams::default()),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring {name}={raw:?}: not a valid value");
            None
        }
    }
}
