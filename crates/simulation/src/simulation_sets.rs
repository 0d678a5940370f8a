//! Deterministic simulation ordering via `SystemSet` phases.
//!
//! # FixedUpdate phases (`SimulationSet`)
//!
//! ```text
//! PreSim  →  Simulation  →  PostSim
//! ```
//!
//! * **PreSim** – Tick counter, vehicle pool build, spawn timers and spawn
//!   attempts. Vehicles activated here are sensed and driven in the same tick.
//! * **Simulation** – Collider snapshot refresh, proximity sensor polls and
//!   vehicle drive, chained in that order.
//! * **PostSim** – Aggregation of lifecycle events into `TrafficStats`.
//!   These systems only *read* simulation state.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain: `PreSim` → `Simulation` → `PostSim`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Tick counter, pool build, spawning.
    PreSim,
    /// Sensing and driving.
    Simulation,
    /// Statistics.
    PostSim,
}
