//! Utility helpers for tests.
//!
//! Ground fixtures stand in for the generated terrain where a test needs a
//! surface with a known shape, and the driving helpers run a vehicle for a
//! fixed number of frames.

pub mod driving;
pub mod ground;

pub use driving::{drive, drive_for, test_vehicle, FRAME};
pub use ground::{flat_ground, ramp, washboard};
