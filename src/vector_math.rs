//! Heading-relative vector helpers.
//! Small wrappers over `glam` for yaw bases and guarded normalisation.
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::EPSILON;

/// Returns the unit forward vector for a yaw heading.
///
/// A heading of zero faces `+Z`; positive headings rotate toward `+X`
/// (right-handed rotation about `+Y`).
///
/// # Examples
/// ```
/// use offroad::vector_math::forward_from_heading;
/// let forward = forward_from_heading(std::f32::consts::FRAC_PI_2);
/// assert!((forward.x - 1.0).abs() < 1e-6);
/// assert!(forward.z.abs() < 1e-6);
/// ```
#[must_use]
pub fn forward_from_heading(heading: f32) -> Vec3 {
    let (sin, cos) = heading.sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// Returns the unit vector pointing to the driver's right, `forward × up`.
///
/// Facing `+z` in the right-handed Y-up frame, right is `-x`.
#[must_use]
pub fn right_from_heading(heading: f32) -> Vec3 {
    let (sin, cos) = heading.sin_cos();
    Vec3::new(-cos, 0.0, sin)
}

/// Splits the horizontal part of `velocity` into forward and lateral speeds.
///
/// The vertical component is ignored so that falling does not register as
/// sideways slip.
#[must_use]
pub fn planar_components(velocity: Vec3, heading: f32) -> (f32, f32) {
    let planar = Vec3::new(velocity.x, 0.0, velocity.z);
    (
        planar.dot(forward_from_heading(heading)),
        planar.dot(right_from_heading(heading)),
    )
}

/// Wraps an angle into `[-π, π)`.
///
/// ```
/// use offroad::vector_math::wrap_angle;
/// assert!((wrap_angle(std::f32::consts::TAU + 0.5) - 0.5).abs() < 1e-5);
/// assert!((wrap_angle(-4.0) - (std::f32::consts::TAU - 4.0)).abs() < 1e-5);
/// assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
/// ```
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    (angle + PI).rem_euclid(TAU) - PI
}

/// Returns the unit vector in the direction of `vector`.
///
/// Non-finite input and vectors shorter than [`EPSILON`] yield
/// [`Vec3::ZERO`] so callers can skip the contribution.
///
/// ```
/// use glam::Vec3;
/// use offroad::vec_normalize;
/// let unit = vec_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((unit - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
/// assert_eq!(vec_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() || vector.length_squared() < EPSILON * EPSILON {
        return Vec3::ZERO;
    }
    vector.normalize_or_zero()
}
