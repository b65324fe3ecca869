//! Driver intent and smoothed control state.
//!
//! [`DriveInput`] is the normalised per-frame contract produced by whatever
//! captures keys or joystick motion. It only sets *targets*; the values the
//! force model reads follow those targets through [`approach`], which models
//! pedal and steering-rack lag rather than physical momentum.

use serde::{Deserialize, Serialize};

use crate::config::VehicleConfig;
use crate::numeric::approach;

/// Logical driving intent for one frame, already merged and debounced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "Each flag mirrors one independent driver intent."
)]
pub struct DriveInput {
    /// Accelerate forwards.
    pub forward: bool,
    /// Accelerate in reverse.
    pub backward: bool,
    /// Steer left.
    pub left: bool,
    /// Steer right.
    pub right: bool,
    /// Apply the brakes; overrides any throttle intent.
    pub brake: bool,
    /// Engage nitro while held.
    pub nitro: bool,
}

impl DriveInput {
    /// Intent with only `forward` set.
    #[must_use]
    pub const fn forward() -> Self {
        Self {
            forward: true,
            backward: false,
            left: false,
            right: false,
            brake: false,
            nitro: false,
        }
    }

    /// Intent with only `brake` set.
    #[must_use]
    pub const fn brake() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            brake: true,
            nitro: false,
        }
    }

    const fn throttle_target(self) -> f32 {
        if self.brake {
            return 0.0;
        }
        match (self.forward, self.backward) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn steer_direction(self) -> f32 {
        match (self.left, self.right) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

/// A control channel with a target and a lagging current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Value the force model reads.
    pub current: f32,
    /// Value the driver is asking for.
    pub target: f32,
}

impl Control {
    /// Moves `current` toward `target` at `rate`.
    pub fn settle(&mut self, rate: f32, dt: f32) {
        self.current = approach(self.current, self.target, rate, dt);
    }
}

/// Throttle, brake and steering channels of one vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Throttle in `[-1, 1]`; negative drives in reverse.
    pub throttle: Control,
    /// Brake pedal in `[0, 1]`.
    pub brake: Control,
    /// Steering in `[-1, 1]`; positive turns left.
    pub steering: Control,
}

impl Controls {
    /// Maps a frame of driver intent onto control targets.
    ///
    /// The steering target gains `steer_increment_rate · dt` while a direction
    /// is held and relaxes toward centre otherwise.
    pub fn apply(&mut self, input: DriveInput, dt: f32, config: &VehicleConfig) {
        self.throttle.target = input.throttle_target();
        self.brake.target = if input.brake { 1.0 } else { 0.0 };

        let direction = input.steer_direction();
        let steer = &mut self.steering.target;
        if direction == 0.0 {
            *steer = approach(*steer, 0.0, config.steer_centering_rate, dt);
        } else {
            *steer += direction * config.steer_increment_rate * dt.max(0.0);
        }
        *steer = steer.clamp(-1.0, 1.0);
    }

    /// Advances every channel toward its target.
    ///
    /// The throttle opens at `throttle_rise_rate` and closes at the faster
    /// `throttle_fall_rate`.
    pub fn settle(&mut self, dt: f32, config: &VehicleConfig) {
        let throttle_rate = if self.throttle.target.abs() > self.throttle.current.abs() {
            config.throttle_rise_rate
        } else {
            config.throttle_fall_rate
        };
        self.throttle.settle(throttle_rate, dt);
        self.brake.settle(config.brake_rate, dt);
        self.steering.settle(config.steering_rate, dt);
    }
}
