//! Pool-based vehicle spawning with retry scheduling.
//!
//! Each road owns a [`VehicleSpawner`] and a fixed pool of vehicles. The
//! spawner keeps at most one pending spawn timer. When it fires, a pool slot
//! is chosen, the vehicle is placed at the spawn pose and activated, and the
//! next spawn is scheduled: a random interval after a success, the fixed
//! retry interval after a failure.

mod plugin;
mod systems;
mod types;


pub use plugin::SpawnerPlugin;
pub use systems::{choose_slot, run_vehicle_spawners, SlotState};
pub use types::{
    PendingSpawn, RequestSpawn, SpawnError, SpawnFailed, SpawnSlot, VehicleSpawned,
    VehicleSpawner,
};
