//! Cached procedural height field.
//!
//! The field is built once from layered [`GradientNoise`] and stored as a
//! `(resolution + 1)²` grid of samples, row-major with `x` varying fastest.
//! Grid vertex `(i, j)` sits at world `(-size/2 + i·cell, -size/2 + j·cell)`.
//! Queries bilinearly interpolate the cache; anything outside the sampled
//! cells reads as height `0`.

use glam::Vec3;
use log::debug;

use super::{GradientNoise, GroundQuery};
use crate::config::TerrainConfig;
use crate::numeric::{floor_to_cell, index_to_f32, smoothstep};
use crate::MAX_TERRAIN_RESOLUTION;

/// Immutable terrain elevation grid with continuous queries.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainHeightField {
    size: f32,
    resolution: u32,
    cell_size: f32,
    roughness_spacing: f32,
    boundary_margin: f32,
    heights: Vec<f32>,
    min_height: f32,
    max_height: f32,
}

impl TerrainHeightField {
    /// Builds the field described by `config`.
    ///
    /// The configuration is expected to have passed
    /// [`crate::config::SimConfig::validate`]; degenerate sizes still produce a
    /// usable (flat) field rather than panicking, and resolutions above
    /// [`MAX_TERRAIN_RESOLUTION`] are capped.
    #[must_use]
    pub fn generate(config: &TerrainConfig) -> Self {
        let noise = GradientNoise::new(config.seed);
        let resolution = config.resolution.clamp(1, MAX_TERRAIN_RESOLUTION);
        let cell = config.size / index_to_f32(resolution);
        let half = config.half_extent();
        let side = resolution as usize + 1;
        let mut heights = Vec::with_capacity(side * side);
        for j in 0..=resolution {
            let z = -half + index_to_f32(j) * cell;
            for i in 0..=resolution {
                let x = -half + index_to_f32(i) * cell;
                heights.push(procedural_height(config, &noise, x, z));
            }
        }
        let field = Self::assemble(config, resolution, heights);
        debug!(
            "terrain generated: {side}x{side} samples over {} units, heights {:.2}..{:.2}",
            field.size, field.min_height, field.max_height
        );
        field
    }

    /// Wraps precomputed samples, e.g. heights loaded from an editor.
    ///
    /// Returns `None` unless `heights` holds exactly `(resolution + 1)²`
    /// finite values and `resolution` is non-zero.
    #[must_use]
    pub fn from_samples(config: &TerrainConfig, heights: Vec<f32>) -> Option<Self> {
        let side = config.resolution as usize + 1;
        if config.resolution == 0
            || heights.len() != side * side
            || heights.iter().any(|h| !h.is_finite())
        {
            return None;
        }
        Some(Self::assemble(config, config.resolution, heights))
    }

    /// A level field at `height`, handy for tests and tooling.
    #[must_use]
    pub fn flat(config: &TerrainConfig, height: f32) -> Self {
        let resolution = config.resolution.clamp(1, MAX_TERRAIN_RESOLUTION);
        let side = resolution as usize + 1;
        Self::assemble(config, resolution, vec![height; side * side])
    }

    fn assemble(config: &TerrainConfig, resolution: u32, heights: Vec<f32>) -> Self {
        let (min_height, max_height) = heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        Self {
            size: config.size,
            resolution,
            cell_size: config.size / index_to_f32(resolution),
            roughness_spacing: config.roughness_spacing,
            boundary_margin: config.boundary_margin,
            heights,
            min_height,
            max_height,
        }
    }

    /// Side length of the square domain.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Grid subdivisions per side.
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.resolution
    }

    /// World distance between neighbouring samples.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Half the side length.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    /// Half extent of the drivable square (terrain half extent minus margin).
    #[must_use]
    pub fn boundary_limit(&self) -> f32 {
        self.half_extent() - self.boundary_margin
    }

    /// Lowest and highest cached sample.
    #[must_use]
    pub const fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    /// All cached samples, row-major with `x` varying fastest.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.heights
    }

    /// Cached sample at grid vertex `(i, j)`.
    #[must_use]
    pub fn sample(&self, i: u32, j: u32) -> Option<f32> {
        if i > self.resolution || j > self.resolution {
            return None;
        }
        let side = self.resolution as usize + 1;
        self.heights.get(j as usize * side + i as usize).copied()
    }

    /// World-space position of grid vertex `(i, j)` for mesh builders.
    #[must_use]
    pub fn vertex(&self, i: u32, j: u32) -> Option<Vec3> {
        let half = self.half_extent();
        self.sample(i, j).map(|h| {
            Vec3::new(
                -half + index_to_f32(i) * self.cell_size,
                h,
                -half + index_to_f32(j) * self.cell_size,
            )
        })
    }

    /// Bilinearly interpolated height at world `(x, z)`.
    ///
    /// Returns `0.0` when the containing cell lies outside the grid.
    ///
    /// ```
    /// use offroad::config::TerrainConfig;
    /// use offroad::terrain::TerrainHeightField;
    /// let field = TerrainHeightField::flat(&TerrainConfig::default(), 2.0);
    /// assert_eq!(field.height_at(10.0, -4.0), 2.0);
    /// assert_eq!(field.height_at(1.0e6, 0.0), 0.0);
    /// ```
    #[must_use]
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let half = self.half_extent();
        let gx = (x + half) / self.cell_size;
        let gz = (z + half) / self.cell_size;
        let (Some(ix), Some(iz)) = (self.cell_index(gx), self.cell_index(gz)) else {
            return 0.0;
        };
        let tx = gx - gx.floor();
        let tz = gz - gz.floor();
        let corners = (
            self.sample(ix, iz),
            self.sample(ix + 1, iz),
            self.sample(ix, iz + 1),
            self.sample(ix + 1, iz + 1),
        );
        let (Some(h00), Some(h10), Some(h01), Some(h11)) = corners else {
            return 0.0;
        };
        let near = h00 + (h10 - h00) * tx;
        let far = h01 + (h11 - h01) * tx;
        near + (far - near) * tz
    }

    /// Spread of heights sampled at four points around `(x, z)`.
    ///
    /// A cheap finite-difference proxy for local terrain variance: `0` on
    /// level ground, growing with slope and bumpiness.
    #[must_use]
    pub fn roughness_at(&self, x: f32, z: f32) -> f32 {
        let s = self.roughness_spacing;
        let probes = [
            self.height_at(x + s, z),
            self.height_at(x - s, z),
            self.height_at(x, z + s),
            self.height_at(x, z - s),
        ];
        let (lo, hi) = probes
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });
        hi - lo
    }

    /// Cell index along one axis, `None` outside `[0, resolution - 1]`.
    fn cell_index(&self, grid: f32) -> Option<u32> {
        let cell = u32::try_from(floor_to_cell(grid)?).ok()?;
        (cell < self.resolution).then_some(cell)
    }
}

impl GroundQuery for TerrainHeightField {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        Self::height_at(self, x, z)
    }

    fn roughness_at(&self, x: f32, z: f32) -> f32 {
        Self::roughness_at(self, x, z)
    }
}

/// Unsampled terrain elevation at `(x, z)`: summed octaves times falloff.
#[must_use]
pub fn procedural_height(config: &TerrainConfig, noise: &GradientNoise, x: f32, z: f32) -> f32 {
    let falloff = radial_falloff(
        x.hypot(z),
        config.flat_radius,
        config.falloff_width,
    );
    if falloff <= 0.0 {
        return 0.0;
    }
    let summed: f32 = config
        .octaves
        .iter()
        .map(|octave| noise.sample(x * octave.frequency, z * octave.frequency) * octave.amplitude)
        .sum();
    summed * falloff
}

/// Height multiplier: `0` inside `flat_radius`, easing to `1` over `width`.
///
/// ```
/// use offroad::terrain::radial_falloff;
/// assert_eq!(radial_falloff(10.0, 30.0, 40.0), 0.0);
/// assert_eq!(radial_falloff(80.0, 30.0, 40.0), 1.0);
/// ```
#[must_use]
pub fn radial_falloff(distance: f32, flat_radius: f32, width: f32) -> f32 {
    if distance <= flat_radius {
        return 0.0;
    }
    if width <= 0.0 {
        return 1.0;
    }
    smoothstep((distance - flat_radius) / width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> TerrainConfig {
        TerrainConfig {
            size: 100.0,
            resolution: 50,
            flat_radius: 10.0,
            falloff_width: 10.0,
            ..TerrainConfig::default()
        }
    }

    #[rstest]
    fn grid_has_expected_sample_count(config: TerrainConfig) {
        let field = TerrainHeightField::generate(&config);
        assert_eq!(field.samples().len(), 51 * 51);
        assert_relative_eq!(field.cell_size(), 2.0);
    }

    #[rstest]
    fn samples_match_the_procedural_function(config: TerrainConfig) {
        let field = TerrainHeightField::generate(&config);
        let noise = GradientNoise::new(config.seed);
        for (i, j) in [(0, 0), (7, 31), (49, 12), (25, 49)] {
            let vertex = field
                .vertex(i, j)
                .unwrap_or_else(|| panic!("vertex ({i}, {j}) should exist"));
            let expected = procedural_height(&config, &noise, vertex.x, vertex.z);
            assert_relative_eq!(vertex.y, expected, epsilon = 1e-5);
            assert_relative_eq!(field.height_at(vertex.x, vertex.z), vertex.y, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn spawn_area_is_level(config: TerrainConfig) {
        let field = TerrainHeightField::generate(&config);
        for (x, z) in [(0.0, 0.0), (3.0, -4.0), (-6.0, 5.0), (0.0, 7.9)] {
            assert_relative_eq!(field.height_at(x, z), 0.0);
        }
    }

    #[rstest]
    #[case(51.0, 0.0)]
    #[case(0.0, -50.5)]
    #[case(50.0, 50.0)]
    #[case(f32::NAN, 0.0)]
    fn out_of_domain_reads_zero(config: TerrainConfig, #[case] x: f32, #[case] z: f32) {
        let field = TerrainHeightField::flat(&config, 3.0);
        assert_relative_eq!(field.height_at(x, z), 0.0);
    }

    #[rstest]
    fn interpolates_between_samples(config: TerrainConfig) {
        let side = 51 * 51;
        // Height equals the x grid index, so interpolation is linear in x.
        let heights: Vec<f32> = (0..side)
            .map(|n| index_to_f32(u32::try_from(n % 51).unwrap_or(0)))
            .collect();
        let field = TerrainHeightField::from_samples(&config, heights)
            .unwrap_or_else(|| panic!("samples should be accepted"));
        // x = -50 is index 0; each cell is 2 units wide.
        assert_relative_eq!(field.height_at(-49.0, 0.0), 0.5, epsilon = 1e-5);
        assert_relative_eq!(field.height_at(-45.0, 12.3), 2.5, epsilon = 1e-5);
    }

    #[rstest]
    fn rejects_mismatched_samples(config: TerrainConfig) {
        assert!(TerrainHeightField::from_samples(&config, vec![0.0; 10]).is_none());
    }

    #[rstest]
    fn roughness_is_zero_on_flat_ground(config: TerrainConfig) {
        let field = TerrainHeightField::flat(&config, 1.0);
        assert_relative_eq!(field.roughness_at(4.0, 4.0), 0.0);
    }

    #[rstest]
    fn roughness_tracks_slope(config: TerrainConfig) {
        let side = 51 * 51;
        let heights: Vec<f32> = (0..side)
            .map(|n| index_to_f32(u32::try_from(n % 51).unwrap_or(0)))
            .collect();
        let field = TerrainHeightField::from_samples(&config, heights)
            .unwrap_or_else(|| panic!("samples should be accepted"));
        // Slope of 0.5 per unit, probes one spacing either side.
        assert_relative_eq!(
            field.roughness_at(0.0, 0.0),
            config.roughness_spacing,
            epsilon = 1e-4
        );
    }

    #[test]
    fn falloff_ramps_monotonically() {
        let mut previous = 0.0;
        for step in 0..100_u8 {
            let value = radial_falloff(f32::from(step), 30.0, 40.0);
            assert!(value >= previous);
            previous = value;
        }
        assert_relative_eq!(radial_falloff(50.0, 30.0, 40.0), 0.5);
        assert_relative_eq!(radial_falloff(31.0, 30.0, 0.0), 1.0);
    }
}
