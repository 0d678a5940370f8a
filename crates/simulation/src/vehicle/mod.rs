//! Vehicles driving along a road path.
//!
//! A vehicle is built once, inactive, when its road is created and then
//! cycles between Inactive and Active for the rest of the run. While active
//! it advances its speed regulator, moves along the path and is placed at
//! the path pose for its distance. Reaching the end of the path, losing the
//! path, or being recalled deactivates it and emits [`RideEnded`].

mod plugin;
mod systems;
mod types;


pub use plugin::VehiclePlugin;
pub use systems::{activate_vehicle, deactivate_vehicle, drive_vehicles, process_recalls};
pub use types::{
    Presence, RecallVehicle, RideEndReason, RideEnded, Vehicle, VehicleBody, VehicleState,
};
