//! Analytic ground surfaces implementing [`GroundQuery`].

use offroad::terrain::{GroundFns, GroundQuery};

/// Level ground at `height` with no roughness.
///
/// # Examples
/// ```
/// use offroad::GroundQuery;
/// use test_utils::flat_ground;
/// let ground = flat_ground(2.0);
/// assert_eq!(ground.height_at(10.0, -4.0), 2.0);
/// assert_eq!(ground.roughness_at(10.0, -4.0), 0.0);
/// ```
#[must_use]
pub fn flat_ground(height: f32) -> impl GroundQuery {
    GroundFns::new(move |_x, _z| height, |_x, _z| 0.0)
}

/// Plane rising by `grade` metres per metre along `+z`.
///
/// # Examples
/// ```
/// use offroad::GroundQuery;
/// use test_utils::ramp;
/// let ground = ramp(0.1);
/// assert!((ground.height_at(0.0, 10.0) - 1.0).abs() < 1e-6);
/// ```
#[must_use]
pub fn ramp(grade: f32) -> impl GroundQuery {
    GroundFns::new(move |_x, z| z * grade, |_x, _z| 0.0)
}

/// Sinusoidal ripples along `z` with the given amplitude and wavelength.
///
/// Roughness reports the peak-to-trough height so the cosmetic bounce has
/// something to react to.
#[must_use]
pub fn washboard(amplitude: f32, wavelength: f32) -> impl GroundQuery {
    let k = std::f32::consts::TAU / wavelength.max(f32::EPSILON);
    GroundFns::new(
        move |_x, z| amplitude * (z * k).sin(),
        move |_x, _z| 2.0 * amplitude.abs(),
    )
}
