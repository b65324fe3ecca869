//! Arcade vehicle model.
//!
//! The model is a single rigid body with a yaw heading. Driver intent is
//! smoothed into [`Controls`], turned into forces in [`forces`], integrated by
//! [`VehicleDynamics`] and published as a [`PhysicsResult`] snapshot.

mod boundary;
mod dynamics;
pub mod forces;
mod input;
mod result;

pub use boundary::PlayArea;
pub use dynamics::VehicleDynamics;
pub use input::{Control, Controls, DriveInput};
pub use result::{GroundState, PhysicsResult};
