//! Single-body vehicle integrator.
//!
//! [`VehicleDynamics`] owns all mutable state of one vehicle and advances it
//! with [`VehicleDynamics::step`]. The ground is supplied per call as pure
//! query functions, so several simulations can run side by side over
//! different surfaces without sharing anything.
//!
//! Each step runs, in order: control smoothing, force accumulation,
//! semi-implicit Euler velocity update, speed ceiling, yaw integration,
//! position update, play-area containment, ground resolution, cosmetic bounce
//! and stuck recovery.

use glam::Vec3;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::forces::{self, TyreGrip};
use super::{Controls, DriveInput, GroundState, PhysicsResult, PlayArea};
use crate::config::VehicleConfig;
use crate::numeric::{clamp_delta, kmh_to_mps};
use crate::terrain::{GroundQuery, TerrainHeightField};
use crate::vector_math::{forward_from_heading, planar_components, right_from_heading, wrap_angle};
use crate::{EPSILON, MAX_DELTA_SECONDS};

/// Distance ahead of and behind the chassis used to estimate the slope.
const SLOPE_PROBE_DISTANCE: f32 = 1.0;

/// Mutable state and tuning of one simulated vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDynamics {
    config: VehicleConfig,
    area: PlayArea,
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    rotation: f32,
    angular_velocity: f32,
    controls: Controls,
    ground: GroundState,
    nitro_active: bool,
    max_speed_kmh: f32,
    bounce: f32,
    bounce_velocity: f32,
    boundary_cooldown: f32,
    stuck_time: f32,
}

impl VehicleDynamics {
    /// Creates a vehicle at its spawn point over level ground.
    #[must_use]
    pub fn new(config: VehicleConfig, area: PlayArea) -> Self {
        let mut vehicle = Self {
            max_speed_kmh: config.max_speed_kmh,
            config,
            area,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            rotation: 0.0,
            angular_velocity: 0.0,
            controls: Controls::default(),
            ground: GroundState::Grounded,
            nitro_active: false,
            bounce: 0.0,
            bounce_velocity: 0.0,
            boundary_cooldown: 0.0,
            stuck_time: 0.0,
        };
        vehicle.reset();
        vehicle
    }

    /// Creates a vehicle confined to `terrain`'s play area and spawned on it.
    #[must_use]
    pub fn for_terrain(config: VehicleConfig, terrain: &TerrainHeightField) -> Self {
        let mut vehicle = Self::new(config, PlayArea::new(terrain.boundary_limit()));
        vehicle.reset_on(terrain);
        vehicle
    }

    /// Restores the spawn state over level ground and returns the position.
    ///
    /// Calling it repeatedly yields the same state.
    pub fn reset(&mut self) -> Vec3 {
        self.reset_over(|_, _| 0.0)
    }

    /// Restores the spawn state at ride height above `ground`.
    pub fn reset_on<G: GroundQuery + ?Sized>(&mut self, ground: &G) -> Vec3 {
        self.reset_over(|x, z| ground.height_at(x, z))
    }

    fn reset_over<H: Fn(f32, f32) -> f32>(&mut self, height_fn: H) -> Vec3 {
        let spawn = self.config.spawn_position;
        let terrain = finite_or_zero(height_fn(spawn.x, spawn.z));
        self.position = Vec3::new(
            spawn.x,
            terrain + self.config.suspension_height + spawn.y.max(0.0),
            spawn.z,
        );
        self.velocity = Vec3::ZERO;
        self.acceleration = Vec3::ZERO;
        self.rotation = wrap_angle(self.config.spawn_heading);
        self.angular_velocity = 0.0;
        self.controls = Controls::default();
        self.ground = GroundState::Grounded;
        self.nitro_active = false;
        self.max_speed_kmh = self.config.max_speed_kmh;
        self.bounce = 0.0;
        self.bounce_velocity = 0.0;
        self.boundary_cooldown = 0.0;
        self.stuck_time = 0.0;
        debug!("vehicle reset to {}", self.position);
        self.position
    }

    /// Feeds one frame of driver intent into the control targets.
    ///
    /// Nitro is a discrete mode: toggling it rescales the speed ceiling
    /// immediately, without smoothing.
    pub fn apply_input(&mut self, input: DriveInput, dt: f32) {
        let frame = clamp_delta(dt, MAX_DELTA_SECONDS);
        self.controls.apply(input, frame, &self.config);
        if input.nitro != self.nitro_active {
            self.set_nitro(input.nitro);
        }
    }

    fn set_nitro(&mut self, active: bool) {
        self.nitro_active = active;
        let multiplier = if active {
            self.config.nitro_multiplier
        } else {
            1.0
        };
        self.max_speed_kmh = self.config.max_speed_kmh * multiplier;
        debug!(
            "nitro {}; speed ceiling {:.0} km/h",
            if active { "engaged" } else { "released" },
            self.max_speed_kmh
        );
    }

    /// Advances the vehicle by `dt` seconds over the given ground.
    ///
    /// `dt` is clamped to [`MAX_DELTA_SECONDS`]; non-finite or negative deltas
    /// integrate nothing. Non-finite ground samples read as `0`.
    pub fn step<H, R>(&mut self, dt: f32, height_fn: H, roughness_fn: R) -> PhysicsResult
    where
        H: Fn(f32, f32) -> f32,
        R: Fn(f32, f32) -> f32,
    {
        let frame = clamp_delta(dt, MAX_DELTA_SECONDS);
        self.boundary_cooldown = (self.boundary_cooldown - frame).max(0.0);

        self.controls.settle(frame, &self.config);

        let forward = forward_from_heading(self.rotation);
        let (forward_speed, lateral_speed) = planar_components(self.velocity, self.rotation);
        let force = self.accumulate_forces(forward, forward_speed, lateral_speed, frame, &height_fn);
        self.acceleration = force / self.config.mass.max(EPSILON);

        self.velocity += self.acceleration * frame;
        self.stop_at_standstill(forward, forward_speed);
        self.enforce_speed_cap();

        self.integrate_yaw(frame);
        self.position += self.velocity * frame;

        let boundary_impact = self.contain();
        self.resolve_ground(&height_fn, &roughness_fn, frame);
        self.settle_bounce(frame);
        let recovered = self.recover_if_needed(frame, &height_fn);

        self.snapshot(boundary_impact, recovered)
    }

    /// [`VehicleDynamics::step`] over a [`GroundQuery`] implementation.
    pub fn step_on<G: GroundQuery + ?Sized>(&mut self, dt: f32, ground: &G) -> PhysicsResult {
        self.step(
            dt,
            |x, z| ground.height_at(x, z),
            |x, z| ground.roughness_at(x, z),
        )
    }

    fn accumulate_forces<H: Fn(f32, f32) -> f32>(
        &self,
        forward: Vec3,
        forward_speed: f32,
        lateral_speed: f32,
        dt: f32,
        height_fn: &H,
    ) -> Vec3 {
        let cfg = &self.config;
        let mass = cfg.mass;
        let mut force = forces::gravity(mass);
        force += forces::engine(forward, self.controls.throttle.current, cfg.engine_force);
        force += forces::braking(
            forward,
            forward_speed,
            self.controls.brake.current,
            cfg.braking_force,
            mass,
            dt,
        );
        force += forces::lateral_friction(
            right_from_heading(self.rotation),
            lateral_speed,
            forward_speed.hypot(lateral_speed),
            &self.tyre(),
            mass,
            dt,
        );
        force += forces::drag(self.velocity, cfg.drag_coefficient, mass, dt);
        if self.ground.is_grounded() {
            force += forces::rolling_resistance(
                self.velocity,
                cfg.rolling_resistance,
                cfg.rolling_resistance_growth,
                mass,
                dt,
            );
            let slope = self.slope_along(forward, height_fn);
            force += forces::slope(forward, slope, cfg.slope_factor, mass);
        }
        force
    }

    const fn tyre(&self) -> TyreGrip {
        TyreGrip {
            grip: self.config.lateral_grip,
            curve_exponent: self.config.lateral_curve_exponent,
            floor: self.config.lateral_grip_floor,
        }
    }

    /// Rise over run of the terrain along `forward` at the chassis.
    fn slope_along<H: Fn(f32, f32) -> f32>(&self, forward: Vec3, height_fn: &H) -> f32 {
        let ahead = self.position + forward * SLOPE_PROBE_DISTANCE;
        let behind = self.position - forward * SLOPE_PROBE_DISTANCE;
        let rise = finite_or_zero(height_fn(ahead.x, ahead.z))
            - finite_or_zero(height_fn(behind.x, behind.z));
        rise / (2.0 * SLOPE_PROBE_DISTANCE)
    }

    /// Zeroes the forward component if resistance alone pushed it through zero.
    fn stop_at_standstill(&mut self, forward: Vec3, previous_forward: f32) {
        let (current_forward, _) = planar_components(self.velocity, self.rotation);
        let crossed = previous_forward * current_forward < 0.0;
        let driven = self.controls.throttle.current * current_forward > 0.0;
        if crossed && !driven {
            self.velocity -= forward * current_forward;
        }
    }

    fn enforce_speed_cap(&mut self) {
        let cap = self.speed_cap();
        let speed = self.velocity.length();
        if speed > cap && speed > EPSILON {
            self.velocity *= cap / speed;
        }
    }

    fn integrate_yaw(&mut self, dt: f32) {
        let cfg = &self.config;
        let (forward_speed, _) = planar_components(self.velocity, self.rotation);
        let authority =
            forward_speed / (forward_speed.abs() + cfg.steer_speed_reference.max(EPSILON));
        self.angular_velocity += self.controls.steering.current * cfg.steer_rate * authority * dt;
        self.angular_velocity *= cfg.angular_damping;
        self.rotation = wrap_angle(self.rotation + self.angular_velocity * dt);
    }

    /// Keeps the chassis inside the play area; reports rate-limited impacts.
    fn contain(&mut self) -> bool {
        let hit = self.area.contain(
            &mut self.position,
            &mut self.velocity,
            self.config.boundary_restitution,
        );
        if !hit || self.boundary_cooldown > 0.0 {
            return false;
        }
        self.boundary_cooldown = self.config.boundary_cooldown_secs;
        debug!(
            "boundary impact at ({:.1}, {:.1})",
            self.position.x, self.position.z
        );
        true
    }

    fn resolve_ground<H, R>(&mut self, height_fn: &H, roughness_fn: &R, dt: f32)
    where
        H: Fn(f32, f32) -> f32,
        R: Fn(f32, f32) -> f32,
    {
        let cfg = &self.config;
        let (x, z) = (self.position.x, self.position.z);
        let terrain = finite_or_zero(height_fn(x, z));
        let ride_height = terrain + cfg.suspension_height;

        if self.position.y <= ride_height {
            let impact = -self.velocity.y;
            if impact > cfg.bounce_threshold {
                self.bounce_velocity += (impact * cfg.bounce_factor).min(cfg.max_bounce_velocity);
            }
            let roughness = finite_or_zero(roughness_fn(x, z)).max(0.0);
            let planar_speed = self.velocity.x.hypot(self.velocity.z);
            self.bounce_velocity += roughness * planar_speed * cfg.roughness_bounce * dt;
            self.bounce_velocity = self
                .bounce_velocity
                .clamp(-cfg.max_bounce_velocity, cfg.max_bounce_velocity);

            self.velocity.y = self.velocity.y.max(0.0);
            self.position.y = ride_height;
            self.ground = GroundState::Grounded;
        } else {
            self.ground = GroundState::Airborne;
        }

        let floor = terrain + cfg.ground_clearance;
        if self.position.y < floor {
            self.position.y = floor;
            self.velocity.y = self.velocity.y.max(0.0);
        }
    }

    /// Cosmetic spring; never feeds back into the authoritative position.
    fn settle_bounce(&mut self, dt: f32) {
        let cfg = &self.config;
        self.bounce_velocity -= cfg.bounce_stiffness * self.bounce * dt;
        self.bounce += self.bounce_velocity * dt;
        self.bounce_velocity *= cfg.bounce_damping;
        self.bounce *= cfg.bounce_damping;
    }

    fn recover_if_needed<H: Fn(f32, f32) -> f32>(&mut self, dt: f32, height_fn: &H) -> bool {
        let finite = self.position.is_finite()
            && self.velocity.is_finite()
            && self.rotation.is_finite()
            && self.angular_velocity.is_finite();
        if !finite {
            warn!("vehicle state became non-finite; resetting to spawn");
            self.reset_over(height_fn);
            return true;
        }

        let cfg = &self.config;
        let planar_speed = self.velocity.x.hypot(self.velocity.z);
        let straining = self.controls.throttle.current.abs() > cfg.stuck_throttle_threshold;
        if self.ground.is_grounded() && straining && planar_speed < cfg.stuck_speed_threshold {
            self.stuck_time += dt;
        } else {
            self.stuck_time = 0.0;
        }

        if self.stuck_time > 0.0 && self.stuck_time >= cfg.stuck_reset_secs {
            info!(
                "vehicle stuck for {:.1}s at ({:.1}, {:.1}); resetting to spawn",
                self.stuck_time, self.position.x, self.position.z
            );
            self.reset_over(height_fn);
            return true;
        }
        false
    }

    fn snapshot(&self, boundary_impact: bool, recovered: bool) -> PhysicsResult {
        let (forward_speed, _) = planar_components(self.velocity, self.rotation);
        PhysicsResult {
            position: self.position,
            rotation: self.rotation,
            speed: self.velocity.length(),
            steering_angle: self.controls.steering.current * self.config.max_steering_angle,
            ground_contact: self.ground.is_grounded(),
            ground_normal: Vec3::Y,
            wheel_rotation_speed: forward_speed / self.config.wheel_radius.max(EPSILON),
            nitro_active: self.nitro_active,
            bounce: self.bounce,
            boundary_impact,
            recovered,
        }
    }

    /// Overrides the velocity, e.g. when restoring a replay.
    ///
    /// Non-finite velocities are ignored.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        if velocity.is_finite() {
            self.velocity = velocity;
        }
    }

    /// Teleports the chassis to `position` facing `heading`.
    ///
    /// The position is clamped into the play area. Motion is left untouched.
    pub fn place(&mut self, position: Vec3, heading: f32) {
        if !position.is_finite() || !heading.is_finite() {
            return;
        }
        let mut clamped = position;
        let mut ignored = Vec3::ZERO;
        self.area.contain(&mut clamped, &mut ignored, 1.0);
        self.position = clamped;
        self.rotation = wrap_angle(heading);
    }

    /// Current speed ceiling in m/s, nitro included.
    #[must_use]
    pub const fn speed_cap(&self) -> f32 {
        kmh_to_mps(self.max_speed_kmh)
    }

    /// Current speed ceiling in km/h, nitro included.
    #[must_use]
    pub const fn max_speed_kmh(&self) -> f32 {
        self.max_speed_kmh
    }

    /// Authoritative position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Linear velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Acceleration applied during the last step.
    #[must_use]
    pub const fn acceleration(&self) -> Vec3 {
        self.acceleration
    }

    /// Yaw heading in radians.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Yaw rate in rad/s.
    #[must_use]
    pub const fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Smoothed control channels.
    #[must_use]
    pub const fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Ground state after the last step.
    #[must_use]
    pub const fn ground_state(&self) -> GroundState {
        self.ground
    }

    /// Whether nitro is engaged.
    #[must_use]
    pub const fn nitro_active(&self) -> bool {
        self.nitro_active
    }

    /// Cosmetic bounce offset.
    #[must_use]
    pub const fn bounce(&self) -> f32 {
        self.bounce
    }

    /// Time spent stuck so far.
    #[must_use]
    pub const fn stuck_time(&self) -> f32 {
        self.stuck_time
    }

    /// Tuning this vehicle was built with.
    #[must_use]
    pub const fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Area the vehicle is confined to.
    #[must_use]
    pub const fn play_area(&self) -> PlayArea {
        self.area
    }
}

const fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
