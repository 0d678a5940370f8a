//! # TestTraffic: headless integration test harness
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running integration tests without a window or renderer.

mod queries;
mod setup;

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;

use crate::sim_rng::SimRng;
use crate::SimulationPlugin;

/// Fixed step used by the harness: 10 Hz.
pub const TEST_TIMESTEP: Duration = Duration::from_millis(100);

/// Seed used by [`TestTraffic::new`].
pub const TEST_SEED: u64 = 7;

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// Use builder methods to set up roads and obstacles, then call `tick()` to
/// advance the simulation and query/assert on the resulting ECS state.
pub struct TestTraffic {
    app: App,
}

impl Default for TestTraffic {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTraffic {
    /// Create an empty scene seeded with [`TEST_SEED`].
    pub fn new() -> Self {
        Self::with_seed(TEST_SEED)
    }

    /// Create an empty scene with an explicit RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SimulationPlugin);

        app.insert_resource(SimRng::from_seed_u64(seed));
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .set_timestep(TEST_TIMESTEP);

        // Run one update so Startup systems execute.
        app.update();

        Self { app }
    }
}
