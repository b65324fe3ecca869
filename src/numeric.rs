//! Numeric helpers shared by the terrain and vehicle models.
//!
//! Everything here is total: non-finite inputs collapse to a neutral value
//! rather than propagating `NaN` into the simulation.

use crate::{MAX_DELTA_SECONDS, MPS_TO_KMH};

/// Moves `current` toward `target` with a first-order low-pass filter.
///
/// The blend factor is `min(1, dt * rate)`, so a long frame snaps to the
/// target instead of overshooting it.
///
/// # Examples
///
/// ```
/// use offroad::numeric::approach;
/// let half = approach(0.0, 1.0, 5.0, 0.1);
/// assert!((half - 0.5).abs() < 1e-6);
/// // A huge delta never overshoots.
/// assert_eq!(approach(0.0, 1.0, 5.0, 10.0), 1.0);
/// ```
#[must_use]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let blend = (dt * rate).clamp(0.0, 1.0);
    if !blend.is_finite() {
        return current;
    }
    current + (target - current) * blend
}

/// Clamps a frame delta into `[0, max]`, mapping non-finite input to zero.
///
/// ```
/// use offroad::numeric::clamp_delta;
/// assert_eq!(clamp_delta(0.5, 0.1), 0.1);
/// assert_eq!(clamp_delta(f32::NAN, 0.1), 0.0);
/// assert_eq!(clamp_delta(-1.0, 0.1), 0.0);
/// ```
#[must_use]
pub fn clamp_delta(dt: f32, max: f32) -> f32 {
    if !dt.is_finite() {
        return 0.0;
    }
    let ceiling = if max.is_finite() && max > 0.0 {
        max
    } else {
        MAX_DELTA_SECONDS
    };
    dt.clamp(0.0, ceiling)
}

/// Converts metres per second to kilometres per hour.
#[must_use]
pub const fn mps_to_kmh(speed: f32) -> f32 {
    speed * MPS_TO_KMH
}

/// Converts kilometres per hour to metres per second.
#[must_use]
pub const fn kmh_to_mps(speed: f32) -> f32 {
    speed / MPS_TO_KMH
}

/// Converts a grid index into a float coordinate.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid indices stay far below 2^24 so the conversion is exact."
)]
#[must_use]
pub const fn index_to_f32(index: u32) -> f32 {
    index as f32
}

/// Floors a cell-space coordinate into a signed cell index.
///
/// Returns `None` for non-finite input or values outside the `i32` range.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The floored value is checked against the i32 domain first."
)]
#[must_use]
pub fn floor_to_cell(value: f32) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < -2_147_483_648.0 || floored >= 2_147_483_648.0 {
        return None;
    }
    Some(floored as i32)
}

/// Smoothstep easing on `[0, 1]`, clamping the input first.
#[must_use]
pub fn smoothstep(t: f32) -> f32 {
    let x = t.clamp(0.0, 1.0);
    x * x * (3.0 - 2.0 * x)
}
