//! Helpers for running a vehicle through a fixed input script.

use offroad::config::VehicleConfig;
use offroad::{DriveInput, GroundQuery, PhysicsResult, PlayArea, VehicleDynamics};

/// Fixed step used by the integration tests, 60 Hz.
pub const FRAME: f32 = 1.0 / 60.0;

/// Vehicle with default tuning inside a play area of half-width `limit`.
#[must_use]
pub fn test_vehicle(limit: f32) -> VehicleDynamics {
    VehicleDynamics::new(VehicleConfig::default(), PlayArea::new(limit))
}

/// Runs `frames` steps with constant `input` and collects every result.
pub fn drive<G: GroundQuery>(
    vehicle: &mut VehicleDynamics,
    input: DriveInput,
    frames: usize,
    ground: &G,
) -> Vec<PhysicsResult> {
    (0..frames)
        .map(|_| {
            vehicle.apply_input(input, FRAME);
            vehicle.step_on(FRAME, ground)
        })
        .collect()
}

/// Runs `seconds` of simulated time at [`FRAME`] and returns the last result.
///
/// # Panics
/// Panics if `seconds` rounds to zero frames.
pub fn drive_for<G: GroundQuery>(
    vehicle: &mut VehicleDynamics,
    input: DriveInput,
    seconds: f32,
    ground: &G,
) -> PhysicsResult {
    let frames = frames_in(seconds);
    drive(vehicle, input, frames, ground)
        .pop()
        .unwrap_or_else(|| panic!("{seconds} s is shorter than one frame"))
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Test durations are small, non-negative and rounded first."
)]
fn frames_in(seconds: f32) -> usize {
    (seconds / FRAME).round().max(0.0) as usize
}
