//! Query and simulation-tick methods for `TestTraffic`.

use bevy::prelude::*;

use crate::road::AttachedToRoad;
use crate::spawner::VehicleSpawner;
use crate::stats::TrafficStats;
use crate::vehicle::Vehicle;
use crate::TickCounter;

use super::TestTraffic;

impl TestTraffic {
    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Run N fixed-update ticks by directly executing the `FixedUpdate`
    /// schedule. This bypasses Bevy's time system entirely, so every tick
    /// advances by exactly one fixed timestep.
    ///
    /// A `yield_now()` is inserted between ticks so that compute pool threads
    /// get a chance to make progress on a low-core CI runner.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.world_mut().run_schedule(FixedUpdate);
            std::thread::yield_now();
        }
    }

    /// Tick until `done` returns true or `max_ticks` have run. Returns the
    /// number of ticks executed.
    pub fn tick_until(&mut self, max_ticks: u32, mut done: impl FnMut(&mut Self) -> bool) -> u32 {
        for n in 0..max_ticks {
            if done(self) {
                return n;
            }
            self.tick(1);
        }
        max_ticks
    }

    // -----------------------------------------------------------------------
    // Queries (note: Bevy's World::query() requires &mut World)
    // -----------------------------------------------------------------------

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn stats(&self) -> &TrafficStats {
        self.resource::<TrafficStats>()
    }

    pub fn tick_count(&self) -> u64 {
        self.resource::<TickCounter>().0
    }

    /// Vehicles attached to `road`, in pool order.
    pub fn pooled_vehicles(&mut self, road: Entity) -> Vec<Entity> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &AttachedToRoad)>();
        let mut pool: Vec<Entity> = query
            .iter(world)
            .filter(|(_, attached)| attached.0 == road)
            .map(|(entity, _)| entity)
            .collect();
        pool.sort();
        pool
    }

    /// Active vehicles attached to `road`, in pool order.
    pub fn active_vehicles(&mut self, road: Entity) -> Vec<Entity> {
        self.pooled_vehicles(road)
            .into_iter()
            .filter(|&e| self.vehicle(e).is_active())
            .collect()
    }

    /// The vehicle component of `entity`. Panics if it has none.
    pub fn vehicle(&self, entity: Entity) -> &Vehicle {
        self.app
            .world()
            .get::<Vehicle>(entity)
            .expect("entity is not a vehicle")
    }

    pub fn transform(&self, entity: Entity) -> Transform {
        *self
            .app
            .world()
            .get::<Transform>(entity)
            .expect("entity has no transform")
    }

    pub fn spawner(&self, road: Entity) -> &VehicleSpawner {
        self.app
            .world()
            .get::<VehicleSpawner>(road)
            .expect("entity is not a road")
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Every `E` sent since the harness was built. The harness never runs
    /// the main schedule after construction, so event buffers are not
    /// swapped between ticks.
    pub fn events<E: Event + Clone>(&self) -> Vec<E> {
        self.app
            .world()
            .resource::<Events<E>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    pub fn send_event<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }
}
