//! Procedural terrain and the ground query seam used by vehicle physics.
//!
//! [`TerrainHeightField`] owns the cached sample grid. Vehicle code never
//! touches it directly; it reads the ground through [`GroundQuery`] or plain
//! `Fn(x, z)` closures, so tests and replays can substitute any surface.

mod heightfield;
mod noise;

pub use heightfield::{procedural_height, radial_falloff, TerrainHeightField};
pub use noise::GradientNoise;

/// Read-only ground surface queried by the vehicle every step.
///
/// Implementations must be pure: the same coordinates always return the same
/// values within a session.
pub trait GroundQuery {
    /// Terrain elevation at world `(x, z)`.
    fn height_at(&self, x: f32, z: f32) -> f32;
    /// Local height variance at world `(x, z)`; `0` on level ground.
    fn roughness_at(&self, x: f32, z: f32) -> f32;
}

impl<G: GroundQuery + ?Sized> GroundQuery for &G {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        (**self).height_at(x, z)
    }

    fn roughness_at(&self, x: f32, z: f32) -> f32 {
        (**self).roughness_at(x, z)
    }
}

/// Adapts a pair of closures into a [`GroundQuery`].
///
/// ```
/// use offroad::terrain::{GroundFns, GroundQuery};
/// let ramp = GroundFns::new(|x: f32, _z: f32| x * 0.1, |_x: f32, _z: f32| 0.0);
/// assert!((ramp.height_at(10.0, 0.0) - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GroundFns<H, R> {
    height: H,
    roughness: R,
}

impl<H, R> GroundFns<H, R>
where
    H: Fn(f32, f32) -> f32,
    R: Fn(f32, f32) -> f32,
{
    /// Wraps `height` and `roughness` query functions.
    pub const fn new(height: H, roughness: R) -> Self {
        Self { height, roughness }
    }
}

impl<H, R> GroundQuery for GroundFns<H, R>
where
    H: Fn(f32, f32) -> f32,
    R: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        (self.height)(x, z)
    }

    fn roughness_at(&self, x: f32, z: f32) -> f32 {
        (self.roughness)(x, z)
    }
}
