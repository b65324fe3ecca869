//! Heading basis and normalisation helpers.

use std::f32::consts::{FRAC_PI_2, PI};

use approx::assert_relative_eq;
use glam::Vec3;
use offroad::vec_normalize;
use offroad::vector_math::{forward_from_heading, planar_components, right_from_heading};

#[test]
fn normalize_returns_zero_for_nan() {
    let result = vec_normalize(Vec3::new(f32::NAN, 1.0, 0.0));
    assert_eq!(result, Vec3::ZERO);
}

#[test]
fn normalize_returns_normalized_vector() {
    let result = vec_normalize(Vec3::new(3.0, 0.0, 0.0));
    assert_relative_eq!(result.x, 1.0);
    assert_relative_eq!(result.length(), 1.0);
}

#[test]
fn heading_zero_faces_positive_z() {
    let forward = forward_from_heading(0.0);
    assert_relative_eq!(forward.z, 1.0);
    assert_relative_eq!(forward.x, 0.0);
}

#[test]
fn right_is_forward_cross_up() {
    for heading in [0.0, FRAC_PI_2, PI, -1.2] {
        let forward = forward_from_heading(heading);
        let right = right_from_heading(heading);
        assert_relative_eq!(forward.dot(right), 0.0, epsilon = 1e-6);
        let expected = forward.cross(Vec3::Y);
        assert_relative_eq!((right - expected).length(), 0.0, epsilon = 1e-6);
    }
}

#[test]
fn planar_components_split_velocity() {
    let (forward, lateral) = planar_components(Vec3::new(3.0, -9.0, 4.0), 0.0);
    assert_relative_eq!(forward, 4.0);
    // Facing +z, +x lies to the driver's left.
    assert_relative_eq!(lateral, -3.0);
}
