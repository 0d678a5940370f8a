//! Smoothed speed control.
//!
//! The regulator does not apply a fixed acceleration. Each tick it closes a
//! fraction `dt * rate` of the gap between current and preferred speed, so a
//! large change in the target produces a strong initial response that decays
//! as the gap shrinks.

use crate::params::VehicleParams;

/// Gap below which the current speed snaps onto the preferred speed.
pub const SPEED_SNAP_EPSILON: f32 = 1.0e-4;

/// Squared gap below which interpolation returns the target outright.
const INTERP_SMALL_NUMBER: f32 = 1.0e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRegulator {
    pub current_speed: f32,
    pub preferred_speed: f32,
    /// Rate while speeding up from a standstill (`current_speed == 0`).
    pub initial_acceleration_rate: f32,
    /// Rate while speeding up from a rolling start.
    pub acceleration_rate: f32,
    /// Rate while slowing down.
    pub deceleration_rate: f32,
}

impl SpeedRegulator {
    pub fn new(params: &VehicleParams) -> Self {
        Self {
            current_speed: 0.0,
            preferred_speed: 0.0,
            initial_acceleration_rate: params.initial_acceleration_rate,
            acceleration_rate: params.acceleration_rate,
            deceleration_rate: params.deceleration_rate,
        }
    }

    /// Rate that applies to the next `advance` call.
    pub fn effective_rate(&self) -> f32 {
        if self.current_speed < self.preferred_speed {
            if self.current_speed == 0.0 {
                self.initial_acceleration_rate
            } else {
                self.acceleration_rate
            }
        } else {
            self.deceleration_rate
        }
    }

    /// Move `current_speed` toward `preferred_speed` over `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        let rate = self.effective_rate();
        let mut speed = interp_to(self.current_speed, self.preferred_speed, dt, rate);

        if speed < 0.0 {
            speed = 0.0;
        }
        if (speed - self.preferred_speed).abs() < SPEED_SNAP_EPSILON {
            speed = self.preferred_speed;
        }
        self.current_speed = speed;
    }
}

/// First-order approach of `current` to `target`. A non-positive `rate`
/// jumps straight to the target.
pub fn interp_to(current: f32, target: f32, dt: f32, rate: f32) -> f32 {
    if rate <= 0.0 {
        return target;
    }
    let gap = target - current;
    if gap * gap < INTERP_SMALL_NUMBER {
        return target;
    }
    current + gap * (dt * rate).clamp(0.0, 1.0)
}
