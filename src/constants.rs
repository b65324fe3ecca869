//! Physical constants and default tuning shared across the simulation.
//!
//! The defaults form one internally consistent tuning set. Every value that
//! varies per vehicle class or per map is also exposed through
//! [`crate::config`] so it can be overridden without recompiling.

/// Gravitational acceleration magnitude in m/s².
pub const GRAVITY: f32 = 9.8;
/// Conversion factor from metres per second to kilometres per hour.
pub const MPS_TO_KMH: f32 = 3.6;
/// Largest frame delta the simulation will integrate in one step, in seconds.
pub const MAX_DELTA_SECONDS: f32 = 0.1;
/// Generic epsilon used to guard divisions and normalisations.
pub const EPSILON: f32 = 1e-4;
/// Forward speeds below this magnitude (m/s) are treated as standstill by the
/// brakes.
pub const BRAKE_STANDSTILL_SPEED: f32 = 0.1;

/// Side length of the square terrain domain.
pub const TERRAIN_SIZE: f32 = 400.0;
/// Grid subdivisions per terrain side.
pub const TERRAIN_RESOLUTION: u32 = 128;
/// Largest accepted terrain resolution; keeps the sample grid allocatable.
pub const MAX_TERRAIN_RESOLUTION: u32 = 4096;
/// Default noise seed.
pub const TERRAIN_SEED: u32 = 1337;
/// Radius around the origin that is always level.
pub const FLAT_RADIUS: f32 = 30.0;
/// Distance over which hills fade in beyond [`FLAT_RADIUS`].
pub const FALLOFF_WIDTH: f32 = 40.0;
/// Offset used by the four roughness probes.
pub const ROUGHNESS_SPACING: f32 = 0.5;

/// Vehicle mass in kilograms.
pub const VEHICLE_MASS: f32 = 1000.0;
/// Peak engine force in newtons.
pub const ENGINE_FORCE: f32 = 12_000.0;
/// Peak braking force in newtons.
pub const BRAKING_FORCE: f32 = 15_000.0;
/// Rolling resistance coefficient at standstill.
pub const ROLLING_RESISTANCE: f32 = 0.015;
/// Fractional growth of rolling resistance per m/s of speed.
pub const ROLLING_RESISTANCE_GROWTH: f32 = 0.01;
/// Quadratic air drag coefficient (N per (m/s)²).
pub const DRAG_COEFFICIENT: f32 = 0.4;
/// Peak lateral grip, expressed as an acceleration in m/s².
pub const LATERAL_GRIP: f32 = 18.0;
/// Exponent of the `(1 - slip)` grip falloff curve.
pub const LATERAL_CURVE_EXPONENT: f32 = 2.0;
/// Fraction of peak lateral grip kept at full sideways slip.
///
/// Zero follows the pure `(1 - slip)^exponent` curve; raise it to let a car in
/// a full sideways slide keep some bite.
pub const LATERAL_GRIP_FLOOR: f32 = 0.0;
/// Top speed without nitro.
pub const MAX_SPEED_KMH: f32 = 120.0;
/// Speed ceiling multiplier while nitro is engaged.
pub const NITRO_MULTIPLIER: f32 = 1.5;
/// Front wheel lock angle in radians.
pub const MAX_STEERING_ANGLE: f32 = 0.6;
/// Yaw acceleration at full lock and saturated speed, rad/s².
pub const STEER_RATE: f32 = 10.0;
/// Forward speed (m/s) at which steering reaches half its authority.
pub const STEER_SPEED_REFERENCE: f32 = 4.0;
/// Per-step multiplier bleeding off yaw rate.
pub const ANGULAR_DAMPING: f32 = 0.9;
/// Wheel radius in metres, used for cosmetic wheel spin.
pub const WHEEL_RADIUS: f32 = 0.4;
/// Fraction of the gravity slope component applied along the heading.
pub const SLOPE_FACTOR: f32 = 0.6;

/// Rate at which the throttle opens.
pub const THROTTLE_RISE_RATE: f32 = 2.0;
/// Rate at which the throttle closes.
pub const THROTTLE_FALL_RATE: f32 = 5.0;
/// Brake response rate.
pub const BRAKE_RATE: f32 = 10.0;
/// Rate at which the wheels follow the steering target.
pub const STEERING_RATE: f32 = 8.0;
/// Steering target gained per second while a direction is held.
pub const STEER_INCREMENT_RATE: f32 = 4.0;
/// Rate at which the steering target returns to centre.
pub const STEER_CENTERING_RATE: f32 = 6.0;

/// Ride height of the chassis above the terrain.
pub const SUSPENSION_HEIGHT: f32 = 0.5;
/// Minimum gap kept between chassis origin and the terrain.
pub const GROUND_CLEARANCE: f32 = 0.05;
/// Downward landing speed (m/s) above which a bounce is injected.
pub const BOUNCE_THRESHOLD: f32 = 2.0;
/// Fraction of the landing speed turned into bounce velocity.
pub const BOUNCE_FACTOR: f32 = 0.3;
/// Cap on injected bounce velocity.
pub const MAX_BOUNCE_VELOCITY: f32 = 3.0;
/// Spring constant of the cosmetic bounce.
pub const BOUNCE_STIFFNESS: f32 = 60.0;
/// Per-step multiplier applied to the bounce offset and velocity.
pub const BOUNCE_DAMPING: f32 = 0.9;
/// Bounce velocity gained per unit roughness per m/s of speed.
pub const ROUGHNESS_BOUNCE: f32 = 0.4;

/// Gap between the terrain edge and the play-area wall.
pub const BOUNDARY_MARGIN: f32 = 10.0;
/// Fraction of the wall-normal velocity kept after an impact.
pub const BOUNDARY_RESTITUTION: f32 = 0.5;
/// Minimum time between two reported wall impacts.
pub const BOUNDARY_COOLDOWN_SECONDS: f32 = 0.5;

/// Speed (m/s) below which a throttling vehicle counts as stuck.
pub const STUCK_SPEED_THRESHOLD: f32 = 0.5;
/// Throttle magnitude required before stuck time accumulates.
pub const STUCK_THROTTLE_THRESHOLD: f32 = 0.5;
/// Stuck duration that triggers an automatic reset.
pub const STUCK_RESET_SECONDS: f32 = 3.0;
