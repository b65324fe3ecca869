//! Seeded 2D gradient noise backed by [`noise::Perlin`].
//!
//! Perlin noise hashes lattice corners through a seeded permutation table and
//! blends the corner gradients with a quintic fade. There is no RNG state: the
//! same `(seed, x, y)` always yields the same value, and samplers can be
//! shared freely between threads.

use noise::{NoiseFn, Perlin, Seedable};

/// Seeded gradient noise sampler.
#[derive(Debug, Clone)]
pub struct GradientNoise {
    perlin: Perlin,
}

impl GradientNoise {
    /// Creates a sampler for `seed`.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Seed the permutation table was built from.
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.perlin.seed()
    }

    /// Samples the noise field at `(x, y)`.
    ///
    /// Output is clamped to `[-1, 1]` and is zero on lattice points.
    /// Non-finite coordinates return zero.
    ///
    /// ```
    /// use offroad::terrain::GradientNoise;
    /// let noise = GradientNoise::new(42);
    /// let a = noise.sample(3.25, -7.5);
    /// assert_eq!(a, noise.sample(3.25, -7.5));
    /// assert!((-1.0..=1.0).contains(&a));
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        reason = "The sample is clamped to [-1, 1] before narrowing."
    )]
    #[must_use]
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        if !x.is_finite() || !y.is_finite() {
            return 0.0;
        }
        let value = self.perlin.get([f64::from(x), f64::from(y)]);
        value.clamp(-1.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(5.0, -3.0)]
    #[case(-120.0, 77.0)]
    fn vanishes_on_lattice_points(#[case] x: f32, #[case] y: f32) {
        assert_relative_eq!(GradientNoise::new(9).sample(x, y), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn stays_in_unit_range() {
        let noise = GradientNoise::new(123);
        for i in 0..200_u16 {
            for j in 0..200_u16 {
                let x = f32::from(i) * 0.137 - 13.0;
                let y = f32::from(j) * 0.291 - 29.0;
                let value = noise.sample(x, y);
                assert!((-1.0..=1.0).contains(&value), "{value} at ({x}, {y})");
            }
        }
    }

    #[test]
    fn same_seed_same_field() {
        let a = GradientNoise::new(5);
        let b = GradientNoise::new(5);
        assert_eq!(a.seed(), 5);
        for i in 0..50_u8 {
            let x = f32::from(i) * 0.61 + 0.3;
            assert_eq!(a.sample(x, -x), b.sample(x, -x));
        }
    }

    #[test]
    fn seeds_produce_different_fields() {
        let a = GradientNoise::new(1);
        let b = GradientNoise::new(2);
        let differs = (0..50_u8).any(|i| {
            let x = f32::from(i) * 0.37 + 0.5;
            (a.sample(x, 0.5) - b.sample(x, 0.5)).abs() > 1e-3
        });
        assert!(differs);
    }

    #[test]
    fn is_continuous_across_cell_edges() {
        let noise = GradientNoise::new(77);
        for edge in [-3.0_f32, 0.0, 1.0, 8.0] {
            let below = noise.sample(edge - 1e-4, 0.4);
            let above = noise.sample(edge + 1e-4, 0.4);
            assert!((below - above).abs() < 1e-2, "jump at x = {edge}");
        }
    }

    #[test]
    fn non_finite_input_is_zero() {
        assert_relative_eq!(GradientNoise::new(0).sample(f32::NAN, 1.0), 0.0);
    }
}
