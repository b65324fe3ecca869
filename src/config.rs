//! Simulation configuration.
//!
//! All tunables are plain data with defaults taken from [`crate::constants`].
//! Files may be TOML or JSON and only need to name the values they override;
//! every struct is `#[serde(default)]`.
//!
//! ```
//! use offroad::config::SimConfig;
//! let config = SimConfig::from_toml_str("[vehicle]\nmax_speed_kmh = 90.0\n").unwrap();
//! assert_eq!(config.vehicle.max_speed_kmh, 90.0);
//! assert_eq!(config.terrain.resolution, offroad::TERRAIN_RESOLUTION);
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for [`SimConfig`].
    #[error("invalid TOML config: {0}")]
    Toml(Box<toml::de::Error>),
    /// The file is not valid JSON for [`SimConfig`].
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `toml` nor `json`.
    #[error("unsupported config format `{extension}` (expected toml or json)")]
    UnsupportedFormat {
        /// Extension found on the path, possibly empty.
        extension: String,
    },
    /// A value parsed but is outside its usable range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human readable explanation.
        reason: String,
    },
}

/// One layer of the terrain noise stack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    /// Lattice cells per world unit.
    pub frequency: f32,
    /// Height contributed at full noise amplitude.
    pub amplitude: f32,
}

/// Shape of the procedural terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Side length of the square domain centred on the origin.
    pub size: f32,
    /// Grid subdivisions per side.
    pub resolution: u32,
    /// Seed mixed into the lattice hash.
    pub seed: u32,
    /// Noise layers, summed in order.
    pub octaves: Vec<NoiseOctave>,
    /// Radius of the level spawn area.
    pub flat_radius: f32,
    /// Width of the ramp between the flat area and full hills.
    pub falloff_width: f32,
    /// Probe offset for roughness queries.
    pub roughness_spacing: f32,
    /// Gap between the terrain edge and the play-area wall.
    pub boundary_margin: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: TERRAIN_SIZE,
            resolution: TERRAIN_RESOLUTION,
            seed: TERRAIN_SEED,
            octaves: vec![
                NoiseOctave {
                    frequency: 0.01,
                    amplitude: 7.0,
                },
                NoiseOctave {
                    frequency: 0.04,
                    amplitude: 2.0,
                },
                NoiseOctave {
                    frequency: 0.15,
                    amplitude: 0.5,
                },
            ],
            flat_radius: FLAT_RADIUS,
            falloff_width: FALLOFF_WIDTH,
            roughness_spacing: ROUGHNESS_SPACING,
            boundary_margin: BOUNDARY_MARGIN,
        }
    }
}

impl TerrainConfig {
    /// Half the side length of the terrain domain.
    #[must_use]
    pub fn half_extent(&self) -> f32 {
        self.size * 0.5
    }

    /// Half extent of the drivable square inside the terrain.
    #[must_use]
    pub fn boundary_limit(&self) -> f32 {
        self.half_extent() - self.boundary_margin
    }

    fn validate(&self) -> Result<(), ConfigError> {
        positive("terrain.size", self.size)?;
        if self.resolution < 2 {
            return Err(invalid("terrain.resolution", "must be at least 2"));
        }
        if self.resolution > MAX_TERRAIN_RESOLUTION {
            return Err(invalid(
                "terrain.resolution",
                format!("must be at most {MAX_TERRAIN_RESOLUTION}"),
            ));
        }
        if self.octaves.is_empty() {
            return Err(invalid("terrain.octaves", "at least one octave is required"));
        }
        if self
            .octaves
            .iter()
            .any(|o| !o.frequency.is_finite() || !o.amplitude.is_finite() || o.frequency <= 0.0)
        {
            return Err(invalid(
                "terrain.octaves",
                "frequencies must be positive and amplitudes finite",
            ));
        }
        non_negative("terrain.flat_radius", self.flat_radius)?;
        non_negative("terrain.falloff_width", self.falloff_width)?;
        positive("terrain.roughness_spacing", self.roughness_spacing)?;
        non_negative("terrain.boundary_margin", self.boundary_margin)?;
        if self.boundary_limit() <= 0.0 {
            return Err(invalid(
                "terrain.boundary_margin",
                format!(
                    "margin {} leaves no play area inside a terrain of size {}",
                    self.boundary_margin, self.size
                ),
            ));
        }
        Ok(())
    }
}

/// Tuning for one vehicle class.
///
/// Forces are in newtons, rates are per second unless noted, and
/// multiplicative damping factors are applied once per step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Chassis mass in kilograms.
    pub mass: f32,
    /// Engine force at full throttle.
    pub engine_force: f32,
    /// Brake force at full pedal.
    pub braking_force: f32,
    /// Rolling resistance coefficient at standstill.
    pub rolling_resistance: f32,
    /// Fractional growth of rolling resistance per m/s.
    pub rolling_resistance_growth: f32,
    /// Quadratic drag coefficient.
    pub drag_coefficient: f32,
    /// Peak lateral grip as an acceleration.
    pub lateral_grip: f32,
    /// Exponent of the grip falloff with slip.
    pub lateral_curve_exponent: f32,
    /// Fraction of peak grip kept at full slip.
    pub lateral_grip_floor: f32,
    /// Top speed without nitro, km/h.
    pub max_speed_kmh: f32,
    /// Top speed multiplier with nitro.
    pub nitro_multiplier: f32,
    /// Wheel angle at full lock, radians.
    pub max_steering_angle: f32,
    /// Yaw acceleration at full lock and saturated speed.
    pub steer_rate: f32,
    /// Forward speed at which steering reaches half authority.
    pub steer_speed_reference: f32,
    /// Per-step yaw rate multiplier.
    pub angular_damping: f32,
    /// Wheel radius for cosmetic spin.
    pub wheel_radius: f32,
    /// Fraction of the slope gravity component applied while grounded.
    pub slope_factor: f32,
    /// Throttle opening rate.
    pub throttle_rise_rate: f32,
    /// Throttle closing rate.
    pub throttle_fall_rate: f32,
    /// Brake response rate.
    pub brake_rate: f32,
    /// Rate at which the wheels follow the steering target.
    pub steering_rate: f32,
    /// Steering target gained per second while held.
    pub steer_increment_rate: f32,
    /// Steering target return-to-centre rate.
    pub steer_centering_rate: f32,
    /// Ride height above the terrain.
    pub suspension_height: f32,
    /// Minimum chassis clearance over the terrain.
    pub ground_clearance: f32,
    /// Landing speed that triggers a bounce.
    pub bounce_threshold: f32,
    /// Landing speed to bounce velocity ratio.
    pub bounce_factor: f32,
    /// Cap on injected bounce velocity.
    pub max_bounce_velocity: f32,
    /// Bounce spring constant.
    pub bounce_stiffness: f32,
    /// Per-step bounce damping multiplier.
    pub bounce_damping: f32,
    /// Bounce velocity gained per unit roughness per m/s.
    pub roughness_bounce: f32,
    /// Fraction of wall-normal velocity kept after an impact.
    pub boundary_restitution: f32,
    /// Minimum time between reported wall impacts.
    pub boundary_cooldown_secs: f32,
    /// Speed below which a throttling vehicle counts as stuck.
    pub stuck_speed_threshold: f32,
    /// Throttle magnitude required to count as stuck.
    pub stuck_throttle_threshold: f32,
    /// Stuck time before an automatic reset.
    pub stuck_reset_secs: f32,
    /// Horizontal spawn location; `y` is an offset above the ride height.
    pub spawn_position: Vec3,
    /// Spawn heading in radians.
    pub spawn_heading: f32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: VEHICLE_MASS,
            engine_force: ENGINE_FORCE,
            braking_force: BRAKING_FORCE,
            rolling_resistance: ROLLING_RESISTANCE,
            rolling_resistance_growth: ROLLING_RESISTANCE_GROWTH,
            drag_coefficient: DRAG_COEFFICIENT,
            lateral_grip: LATERAL_GRIP,
            lateral_curve_exponent: LATERAL_CURVE_EXPONENT,
            lateral_grip_floor: LATERAL_GRIP_FLOOR,
            max_speed_kmh: MAX_SPEED_KMH,
            nitro_multiplier: NITRO_MULTIPLIER,
            max_steering_angle: MAX_STEERING_ANGLE,
            steer_rate: STEER_RATE,
            steer_speed_reference: STEER_SPEED_REFERENCE,
            angular_damping: ANGULAR_DAMPING,
            wheel_radius: WHEEL_RADIUS,
            slope_factor: SLOPE_FACTOR,
            throttle_rise_rate: THROTTLE_RISE_RATE,
            throttle_fall_rate: THROTTLE_FALL_RATE,
            brake_rate: BRAKE_RATE,
            steering_rate: STEERING_RATE,
            steer_increment_rate: STEER_INCREMENT_RATE,
            steer_centering_rate: STEER_CENTERING_RATE,
            suspension_height: SUSPENSION_HEIGHT,
            ground_clearance: GROUND_CLEARANCE,
            bounce_threshold: BOUNCE_THRESHOLD,
            bounce_factor: BOUNCE_FACTOR,
            max_bounce_velocity: MAX_BOUNCE_VELOCITY,
            bounce_stiffness: BOUNCE_STIFFNESS,
            bounce_damping: BOUNCE_DAMPING,
            roughness_bounce: ROUGHNESS_BOUNCE,
            boundary_restitution: BOUNDARY_RESTITUTION,
            boundary_cooldown_secs: BOUNDARY_COOLDOWN_SECONDS,
            stuck_speed_threshold: STUCK_SPEED_THRESHOLD,
            stuck_throttle_threshold: STUCK_THROTTLE_THRESHOLD,
            stuck_reset_secs: STUCK_RESET_SECONDS,
            spawn_position: Vec3::ZERO,
            spawn_heading: 0.0,
        }
    }
}

impl VehicleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("vehicle.mass", self.mass)?;
        non_negative("vehicle.engine_force", self.engine_force)?;
        non_negative("vehicle.braking_force", self.braking_force)?;
        non_negative("vehicle.rolling_resistance", self.rolling_resistance)?;
        non_negative("vehicle.drag_coefficient", self.drag_coefficient)?;
        non_negative("vehicle.lateral_grip", self.lateral_grip)?;
        unit_interval("vehicle.lateral_grip_floor", self.lateral_grip_floor)?;
        positive("vehicle.max_speed_kmh", self.max_speed_kmh)?;
        if !self.nitro_multiplier.is_finite() || self.nitro_multiplier < 1.0 {
            return Err(invalid("vehicle.nitro_multiplier", "must be at least 1.0"));
        }
        unit_interval("vehicle.angular_damping", self.angular_damping)?;
        unit_interval("vehicle.bounce_damping", self.bounce_damping)?;
        unit_interval("vehicle.boundary_restitution", self.boundary_restitution)?;
        positive("vehicle.wheel_radius", self.wheel_radius)?;
        non_negative("vehicle.suspension_height", self.suspension_height)?;
        if !self.spawn_position.is_finite() {
            return Err(invalid("vehicle.spawn_position", "must be finite"));
        }
        Ok(())
    }
}

/// Frame-loop settings shared by the plugin and the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivingConfig {
    /// Largest frame delta integrated in one step.
    pub max_delta_seconds: f32,
}

impl Default for DrivingConfig {
    fn default() -> Self {
        Self {
            max_delta_seconds: MAX_DELTA_SECONDS,
        }
    }
}

/// Complete configuration for one simulation session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Terrain generation parameters.
    pub terrain: TerrainConfig,
    /// Vehicle tuning.
    pub vehicle: VehicleConfig,
    /// Frame-loop settings.
    pub driving: DrivingConfig,
}

impl SimConfig {
    /// Loads and validates a config file, choosing the parser by extension.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read, does not parse,
    /// has an unknown extension, or fails [`SimConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let extension = file
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Read {
            path: file.to_path_buf(),
            source,
        })?;
        match extension.as_str() {
            "toml" => Self::from_toml_str(&text),
            "json" => Self::from_json_str(&text),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Toml(Box::new(e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Json`] or [`ConfigError::Invalid`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its usable range.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terrain.validate()?;
        self.vehicle.validate()?;
        positive("driving.max_delta_seconds", self.driving.max_delta_seconds)?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a positive number, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(
            field,
            format!("expected a non-negative number, got {value}"),
        ))
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a value in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_validate() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn default_boundary_sits_inside_terrain() {
        let terrain = TerrainConfig::default();
        assert!(terrain.boundary_limit() < terrain.half_extent());
        assert!(terrain.boundary_limit() > terrain.flat_radius);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{"terrain": {"seed": 7}}"#)
            .unwrap_or_else(|e| panic!("json should parse: {e}"));
        assert_eq!(config.terrain.seed, 7);
        assert_eq!(config.vehicle, VehicleConfig::default());
    }

    #[test]
    fn spawn_position_parses_as_array() {
        let config = SimConfig::from_toml_str("[vehicle]\nspawn_position = [5.0, 0.0, -3.0]\n")
            .unwrap_or_else(|e| panic!("toml should parse: {e}"));
        assert_eq!(config.vehicle.spawn_position, Vec3::new(5.0, 0.0, -3.0));
    }

    #[rstest]
    #[case::zero_mass("[vehicle]\nmass = 0.0\n", "vehicle.mass")]
    #[case::weak_nitro("[vehicle]\nnitro_multiplier = 0.5\n", "vehicle.nitro_multiplier")]
    #[case::no_octaves("[terrain]\noctaves = []\n", "terrain.octaves")]
    #[case::tiny_grid("[terrain]\nresolution = 1\n", "terrain.resolution")]
    #[case::huge_grid("[terrain]\nresolution = 4000000000\n", "terrain.resolution")]
    #[case::margin_too_wide("[terrain]\nsize = 20.0\nboundary_margin = 10.0\n", "terrain.boundary_margin")]
    #[case::bad_damping("[vehicle]\nangular_damping = 1.5\n", "vehicle.angular_damping")]
    #[case::zero_dt("[driving]\nmax_delta_seconds = 0.0\n", "driving.max_delta_seconds")]
    fn invalid_values_are_rejected(#[case] text: &str, #[case] expected_field: &str) {
        match SimConfig::from_toml_str(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected_field),
            other => panic!("expected Invalid({expected_field}), got {other:?}"),
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            SimConfig::from_toml_str("[vehicle\nmass = 1"),
            Err(ConfigError::Toml(_))
        ));
    }
}
