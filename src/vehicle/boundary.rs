//! Square play-area containment.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned square centred on the origin that the vehicle cannot leave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    limit: f32,
}

impl PlayArea {
    /// Creates an area spanning `[-limit, limit]` on `x` and `z`.
    ///
    /// Negative limits are mirrored; non-finite limits leave the area
    /// unbounded.
    #[must_use]
    pub fn new(limit: f32) -> Self {
        let bounded = if limit.is_finite() {
            limit.abs()
        } else {
            f32::MAX
        };
        Self { limit: bounded }
    }

    /// Half extent of the area.
    #[must_use]
    pub const fn limit(&self) -> f32 {
        self.limit
    }

    /// Whether `position` lies inside the area (inclusive).
    #[must_use]
    pub fn contains(&self, position: Vec3) -> bool {
        position.x.abs() <= self.limit && position.z.abs() <= self.limit
    }

    /// Clamps `position` into the area.
    ///
    /// On every axis that crossed the wall, the matching velocity component is
    /// scaled by `restitution` to soften the impact. Returns `true` if any axis
    /// was clamped.
    ///
    /// ```
    /// use glam::Vec3;
    /// use offroad::vehicle::PlayArea;
    /// let area = PlayArea::new(10.0);
    /// let mut position = Vec3::new(12.0, 0.0, 3.0);
    /// let mut velocity = Vec3::new(8.0, 0.0, 1.0);
    /// assert!(area.contain(&mut position, &mut velocity, 0.5));
    /// assert_eq!(position.x, 10.0);
    /// assert_eq!(velocity, Vec3::new(4.0, 0.0, 1.0));
    /// ```
    pub fn contain(&self, position: &mut Vec3, velocity: &mut Vec3, restitution: f32) -> bool {
        let hit_x = clamp_axis(&mut position.x, &mut velocity.x, self.limit, restitution);
        let hit_z = clamp_axis(&mut position.z, &mut velocity.z, self.limit, restitution);
        hit_x || hit_z
    }
}

fn clamp_axis(coordinate: &mut f32, velocity: &mut f32, limit: f32, restitution: f32) -> bool {
    if coordinate.abs() <= limit {
        return false;
    }
    *coordinate = coordinate.clamp(-limit, limit);
    *velocity *= restitution;
    true
}
