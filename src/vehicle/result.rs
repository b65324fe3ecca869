//! Per-step output consumed by presentation code.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::numeric::mps_to_kmh;

/// Whether the chassis rests on the terrain this step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundState {
    /// At or below ride height; snapped onto the surface.
    #[default]
    Grounded,
    /// Above ride height; only gravity and drag act vertically.
    Airborne,
}

impl GroundState {
    /// `true` for [`GroundState::Grounded`].
    #[must_use]
    pub const fn is_grounded(self) -> bool {
        matches!(self, Self::Grounded)
    }
}

/// Immutable snapshot of a vehicle after one physics step.
///
/// The field set is fixed for a given [`PhysicsResult::VERSION`]; consumers
/// such as mesh transforms, cameras and telemetry sinks can rely on every
/// field being populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsResult {
    /// Authoritative chassis position (without the cosmetic bounce).
    pub position: Vec3,
    /// Yaw heading in radians.
    pub rotation: f32,
    /// Speed in m/s.
    pub speed: f32,
    /// Front wheel angle in radians.
    pub steering_angle: f32,
    /// Whether the chassis is on the ground.
    pub ground_contact: bool,
    /// Surface normal under the chassis; world up in this model.
    pub ground_normal: Vec3,
    /// Wheel spin in rad/s, derived from the forward speed.
    pub wheel_rotation_speed: f32,
    /// Whether nitro is engaged.
    pub nitro_active: bool,
    /// Cosmetic suspension bounce to add to the rendered height.
    pub bounce: f32,
    /// Set on the step a wall impact is reported (rate limited).
    pub boundary_impact: bool,
    /// Set on the step the vehicle was automatically reset.
    pub recovered: bool,
}

impl PhysicsResult {
    /// Layout version of this snapshot.
    pub const VERSION: u32 = 1;

    /// Speed in km/h, as shown on a speedometer.
    #[must_use]
    pub const fn speed_kmh(&self) -> f32 {
        mps_to_kmh(self.speed)
    }

    /// Ground state as an enum.
    #[must_use]
    pub const fn ground_state(&self) -> GroundState {
        if self.ground_contact {
            GroundState::Grounded
        } else {
            GroundState::Airborne
        }
    }

    /// Position a renderer should draw the chassis at, bounce included.
    #[must_use]
    pub fn render_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.bounce
    }
}
