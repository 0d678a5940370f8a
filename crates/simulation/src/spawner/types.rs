//! Types for the vehicle spawner.

use std::fmt;
use std::time::Duration;

use bevy::prelude::*;

use crate::params::SpawnerParams;
use crate::sim_rng::SimRng;

/// Which pool entry a spawn attempt should use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpawnSlot {
    /// Any inactive vehicle, picked uniformly.
    #[default]
    Any,
    /// A specific pool index.
    Index(usize),
}

impl SpawnSlot {
    /// Map a raw pool index to a slot. Indices past the end of the pool
    /// request a free pick.
    pub fn from_index(index: usize, pool_len: usize) -> Self {
        if index < pool_len {
            SpawnSlot::Index(index)
        } else {
            SpawnSlot::Any
        }
    }
}

/// Why a spawn attempt did not place a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnError {
    /// The road has no path to place vehicles on.
    MissingPath,
    /// Every pooled vehicle is already driving.
    PoolExhausted,
    /// The vehicle at this pool index no longer exists.
    StaleHandle { slot: usize },
    /// Another active vehicle overlaps the spawn pose.
    PlacementBlocked { slot: usize },
}

impl SpawnError {
    /// Slot the retry should use after this failure.
    pub fn retry_slot(&self, requested: SpawnSlot) -> SpawnSlot {
        match self {
            SpawnError::StaleHandle { .. } => SpawnSlot::Any,
            _ => requested,
        }
    }
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::MissingPath => write!(f, "road has no path"),
            SpawnError::PoolExhausted => write!(f, "no inactive vehicle in pool"),
            SpawnError::StaleHandle { slot } => {
                write!(f, "pool slot {slot} refers to a missing vehicle")
            }
            SpawnError::PlacementBlocked { slot } => {
                write!(f, "spawn pose blocked for pool slot {slot}")
            }
        }
    }
}

impl std::error::Error for SpawnError {}

/// The single pending spawn of a spawner.
#[derive(Debug, Clone)]
pub struct PendingSpawn {
    pub timer: Timer,
    pub slot: SpawnSlot,
}

#[derive(Component, Debug, Clone)]
pub struct VehicleSpawner {
    pub params: SpawnerParams,
    /// World location projected onto the path to find the spawn pose.
    pub anchor: Vec3,
    pool: Vec<Entity>,
    pool_built: bool,
    spawn_pose: Transform,
    pending: Option<PendingSpawn>,
}

impl VehicleSpawner {
    pub fn new(params: SpawnerParams, anchor: Vec3) -> Self {
        Self {
            params,
            anchor,
            pool: Vec::new(),
            pool_built: false,
            spawn_pose: Transform::from_translation(anchor),
            pending: None,
        }
    }

    pub fn pool(&self) -> &[Entity] {
        &self.pool
    }

    pub fn is_built(&self) -> bool {
        self.pool_built
    }

    pub fn spawn_pose(&self) -> Transform {
        self.spawn_pose
    }

    pub fn pending(&self) -> Option<&PendingSpawn> {
        self.pending.as_ref()
    }

    /// Install the pool and spawn pose. Later calls are ignored.
    pub fn build_pool(&mut self, pool: Vec<Entity>, spawn_pose: Transform) {
        if self.pool_built {
            return;
        }
        self.pool = pool;
        self.spawn_pose = spawn_pose;
        self.pool_built = true;
    }

    /// Replace the pending spawn. A failed attempt with `retry_spawn` set
    /// waits `retry_interval`; anything else waits a uniform draw from the
    /// spawn interval range. Returns the delay in seconds.
    pub fn schedule_next(&mut self, succeeded: bool, slot: SpawnSlot, rng: &mut SimRng) -> f32 {
        let delay = if self.params.retry_spawn && !succeeded {
            self.params.retry_interval
        } else {
            rng.range_f32(self.params.min_spawn_interval, self.params.max_spawn_interval)
        };
        let delay = delay.max(0.0);
        self.pending = Some(PendingSpawn {
            timer: Timer::from_seconds(delay, TimerMode::Once),
            slot,
        });
        delay
    }

    /// Advance the pending timer; returns its slot once it fires.
    pub fn tick(&mut self, delta: Duration) -> Option<SpawnSlot> {
        let pending = self.pending.as_mut()?;
        pending.timer.tick(delta);
        if !pending.timer.finished() {
            return None;
        }
        self.pending.take().map(|p| p.slot)
    }
}

/// A vehicle was placed and activated.
#[derive(Event, Debug, Clone, Copy)]
pub struct VehicleSpawned {
    pub road: Entity,
    pub vehicle: Entity,
    pub slot: usize,
}

/// A spawn attempt failed; a retry has been scheduled with `retry_slot`.
#[derive(Event, Debug, Clone, Copy)]
pub struct SpawnFailed {
    pub road: Entity,
    pub error: SpawnError,
    pub retry_slot: SpawnSlot,
}

/// Ask a road's spawner to attempt a spawn this tick, independent of its
/// pending timer.
#[derive(Event, Debug, Clone, Copy)]
pub struct RequestSpawn {
    pub road: Entity,
    pub slot: SpawnSlot,
}
