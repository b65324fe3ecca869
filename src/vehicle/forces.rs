//! Force contributions for the vehicle body.
//!
//! Each helper returns a force in newtons and is total: degenerate inputs
//! (standstill, zero-length directions, non-positive `dt`) skip the
//! contribution instead of dividing by zero. Resistive forces are capped at
//! `mass · |v| / dt` so that on their own they can stop a component within a
//! step but never reverse it.

use glam::Vec3;

use crate::vector_math::vec_normalize;
use crate::{BRAKE_STANDSTILL_SPEED, EPSILON, GRAVITY};

/// Largest force magnitude that removes at most `speed` within `dt`.
const fn stopping_cap(mass: f32, speed: f32, dt: f32) -> f32 {
    if dt > 0.0 {
        mass * speed.abs() / dt
    } else {
        f32::INFINITY
    }
}

/// Constant downward pull on the body.
#[must_use]
pub const fn gravity(mass: f32) -> Vec3 {
    Vec3::new(0.0, -GRAVITY * mass, 0.0)
}

/// Drive force along the heading, scaled by a throttle in `[-1, 1]`.
#[must_use]
pub fn engine(forward: Vec3, throttle: f32, engine_force: f32) -> Vec3 {
    forward * throttle.clamp(-1.0, 1.0) * engine_force
}

/// Brake force opposing the forward velocity component.
///
/// Below [`BRAKE_STANDSTILL_SPEED`] the brakes do nothing, which keeps the
/// sign of a near-zero forward speed from chattering.
///
/// ```
/// use glam::Vec3;
/// use offroad::vehicle::forces::braking;
/// // 1000 kg at 0.5 m/s, 60 Hz: at most 30 kN may be applied.
/// let force = braking(Vec3::Z, 0.5, 1.0, 50_000.0, 1000.0, 1.0 / 60.0);
/// assert!((force.z + 30_000.0).abs() < 1.0);
/// assert_eq!(braking(Vec3::Z, 0.05, 1.0, 50_000.0, 1000.0, 1.0 / 60.0), Vec3::ZERO);
/// ```
#[must_use]
pub fn braking(
    forward: Vec3,
    forward_speed: f32,
    brake: f32,
    braking_force: f32,
    mass: f32,
    dt: f32,
) -> Vec3 {
    if forward_speed.abs() < BRAKE_STANDSTILL_SPEED || brake <= 0.0 {
        return Vec3::ZERO;
    }
    let magnitude = (braking_force * brake.min(1.0)).min(stopping_cap(mass, forward_speed, dt));
    -forward * forward_speed.signum() * magnitude
}

/// Inputs to the lateral tyre model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TyreGrip {
    /// Peak grip as an acceleration.
    pub grip: f32,
    /// Exponent of the `(1 - slip)` falloff.
    pub curve_exponent: f32,
    /// Fraction of peak grip kept at full slip.
    pub floor: f32,
}

impl TyreGrip {
    /// Grip coefficient in `[floor, 1]` for a slip ratio in `[0, 1]`.
    #[must_use]
    pub fn coefficient(&self, slip: f32) -> f32 {
        let falloff = (1.0 - slip.clamp(0.0, 1.0)).powf(self.curve_exponent.max(0.0));
        let floor = self.floor.clamp(0.0, 1.0);
        floor + (1.0 - floor) * falloff
    }
}

/// Sideways tyre friction opposing lateral velocity.
///
/// The slip ratio `|v_lat| / (speed + ε)` selects a grip coefficient through
/// [`TyreGrip::coefficient`]: full grip when rolling straight, fading as the
/// body slides. The result never removes more than the existing lateral
/// velocity in one step.
#[must_use]
pub fn lateral_friction(
    right: Vec3,
    lateral_speed: f32,
    planar_speed: f32,
    tyre: &TyreGrip,
    mass: f32,
    dt: f32,
) -> Vec3 {
    if lateral_speed.abs() < EPSILON {
        return Vec3::ZERO;
    }
    let slip = lateral_speed.abs() / (planar_speed.abs() + EPSILON);
    let accel = tyre.grip * tyre.coefficient(slip);
    let magnitude = (accel * mass).min(stopping_cap(mass, lateral_speed, dt));
    -right * lateral_speed.signum() * magnitude
}

/// Quadratic air drag opposing `velocity`.
#[must_use]
pub fn drag(velocity: Vec3, coefficient: f32, mass: f32, dt: f32) -> Vec3 {
    let direction = vec_normalize(velocity);
    if direction == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let speed = velocity.length();
    let magnitude = (coefficient * speed * speed).min(stopping_cap(mass, speed, dt));
    -direction * magnitude
}

/// Rolling resistance opposing horizontal motion while grounded.
///
/// The coefficient grows by `growth` per m/s, so resistance rises mildly with
/// speed.
#[must_use]
pub fn rolling_resistance(
    velocity: Vec3,
    coefficient: f32,
    growth: f32,
    mass: f32,
    dt: f32,
) -> Vec3 {
    let planar = Vec3::new(velocity.x, 0.0, velocity.z);
    let direction = vec_normalize(planar);
    if direction == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let speed = planar.length();
    let effective = coefficient * (1.0 + growth * speed);
    let magnitude = (mass * GRAVITY * effective).min(stopping_cap(mass, speed, dt));
    -direction * magnitude
}

/// Gravity component along the heading on sloped ground.
///
/// `slope` is rise over run along `forward`; uphill slopes push back, downhill
/// slopes pull forward.
#[must_use]
pub fn slope(forward: Vec3, slope: f32, factor: f32, mass: f32) -> Vec3 {
    if !slope.is_finite() {
        return Vec3::ZERO;
    }
    let sine = slope / (1.0 + slope * slope).sqrt();
    -forward * mass * GRAVITY * sine * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LATERAL_CURVE_EXPONENT, LATERAL_GRIP, LATERAL_GRIP_FLOOR};
    use approx::assert_relative_eq;
    use rstest::rstest;

    const MASS: f32 = 1000.0;
    const DT: f32 = 1.0 / 60.0;

    fn tyre() -> TyreGrip {
        TyreGrip {
            grip: LATERAL_GRIP,
            curve_exponent: LATERAL_CURVE_EXPONENT,
            floor: LATERAL_GRIP_FLOOR,
        }
    }

    #[test]
    fn engine_scales_with_throttle() {
        assert_eq!(engine(Vec3::Z, 0.5, 100.0), Vec3::new(0.0, 0.0, 50.0));
        assert_eq!(engine(Vec3::Z, -3.0, 100.0), Vec3::new(0.0, 0.0, -100.0));
    }

    #[rstest]
    #[case::forward(10.0, -1.0)]
    #[case::reverse(-10.0, 1.0)]
    fn braking_opposes_motion(#[case] forward_speed: f32, #[case] sign: f32) {
        let force = braking(Vec3::Z, forward_speed, 1.0, 15_000.0, MASS, DT);
        assert_relative_eq!(force.z, sign * 15_000.0);
    }

    #[test]
    fn braking_cannot_reverse_within_a_step() {
        let speed = 0.2;
        let force = braking(Vec3::Z, speed, 1.0, 1.0e9, MASS, DT);
        let new_speed = speed + force.z / MASS * DT;
        assert!(new_speed >= -1e-6, "brakes reversed motion: {new_speed}");
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.5, 0.25)]
    #[case(1.0, 0.0)]
    fn grip_follows_slip_curve(#[case] slip: f32, #[case] expected: f32) {
        assert_relative_eq!(tyre().coefficient(slip), expected, epsilon = 1e-6);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.5, 0.4)]
    #[case(1.0, 0.2)]
    fn grip_floor_keeps_bite_in_a_slide(#[case] slip: f32, #[case] expected: f32) {
        let floored = TyreGrip {
            floor: 0.2,
            ..tyre()
        };
        assert_relative_eq!(floored.coefficient(slip), expected, epsilon = 1e-6);
    }

    #[test]
    fn full_slide_has_no_grip_by_default() {
        let force = lateral_friction(Vec3::X, 5.0, 5.0, &tyre(), MASS, DT);
        assert_relative_eq!(force.length(), 0.0, epsilon = 1e-3);
    }

    #[rstest]
    #[case(0.05, 20.0)]
    #[case(-3.0, 3.0)]
    #[case(8.0, 10.0)]
    fn lateral_friction_never_reverses(#[case] lateral: f32, #[case] speed: f32) {
        let right = Vec3::X;
        let force = lateral_friction(right, lateral, speed, &tyre(), MASS, DT);
        let after = lateral + force.dot(right) / MASS * DT;
        assert!(
            after * lateral.signum() >= -1e-6,
            "lateral {lateral} became {after}"
        );
        assert!(after.abs() <= lateral.abs() + 1e-6);
    }

    #[test]
    fn drag_grows_quadratically() {
        let slow = drag(Vec3::new(0.0, 0.0, 10.0), 0.4, MASS, DT);
        let fast = drag(Vec3::new(0.0, 0.0, 20.0), 0.4, MASS, DT);
        assert_relative_eq!(fast.z / slow.z, 4.0, epsilon = 1e-4);
        assert!(slow.z < 0.0);
    }

    #[test]
    fn resistive_forces_skip_standstill() {
        assert_eq!(drag(Vec3::ZERO, 0.4, MASS, DT), Vec3::ZERO);
        assert_eq!(rolling_resistance(Vec3::ZERO, 0.015, 0.01, MASS, DT), Vec3::ZERO);
        assert_eq!(
            rolling_resistance(Vec3::new(0.0, -5.0, 0.0), 0.015, 0.01, MASS, DT),
            Vec3::ZERO
        );
    }

    #[test]
    fn rolling_resistance_grows_with_speed() {
        let slow = rolling_resistance(Vec3::new(1.0, 0.0, 0.0), 0.015, 0.01, MASS, DT);
        let fast = rolling_resistance(Vec3::new(30.0, 0.0, 0.0), 0.015, 0.01, MASS, DT);
        assert!(fast.x < slow.x);
    }

    #[test]
    fn slope_pushes_back_uphill() {
        let uphill = slope(Vec3::Z, 0.2, 1.0, MASS);
        let downhill = slope(Vec3::Z, -0.2, 1.0, MASS);
        assert!(uphill.z < 0.0);
        assert!(downhill.z > 0.0);
        assert_relative_eq!(uphill.z, -downhill.z);
    }
}
