//! Bevy integration for the driving simulation.
//!
//! [`DrivingPlugin`] advances every [`Vehicle`] once per frame. Input arrives
//! through the [`DriveIntent`] component, the ground comes from the optional
//! [`Terrain`] resource (level ground at `y = 0` when it is absent) and the
//! latest [`PhysicsResult`] is mirrored into [`Telemetry`] and the entity's
//! [`Transform`]. The simulation stays the single writer of vehicle state;
//! presentation code only reads the components.

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, info};

use crate::config::DrivingConfig;
use crate::numeric::clamp_delta;
use crate::terrain::TerrainHeightField;
use crate::vehicle::{DriveInput, PhysicsResult, VehicleDynamics};
use crate::MAX_DELTA_SECONDS;

/// Simulated vehicle driven by [`vehicle_physics_system`].
#[derive(Component, Debug, Clone, PartialEq)]
#[require(DriveIntent, Telemetry, Transform)]
pub struct Vehicle(pub VehicleDynamics);

/// Driver intent for the current frame.
///
/// Input systems overwrite this each frame; the physics system only reads it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveIntent(pub DriveInput);

/// Snapshot produced by the most recent physics step, if any.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry(pub Option<PhysicsResult>);

/// Heightfield the vehicles drive on.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Terrain(pub TerrainHeightField);

/// Runtime configuration for the physics system.
///
/// # Examples
///
/// ```ignore
/// use bevy::prelude::*;
/// use offroad::plugin::DrivingSettings;
///
/// let mut app = App::new();
/// app.insert_resource(DrivingSettings {
///     max_delta_seconds: 0.05,
/// });
/// ```
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct DrivingSettings {
    /// Longest frame the simulation integrates in one step.
    ///
    /// Frame hitches beyond this are truncated so a stall cannot launch the
    /// vehicle through the terrain.
    pub max_delta_seconds: f32,
}

impl Default for DrivingSettings {
    fn default() -> Self {
        Self {
            max_delta_seconds: MAX_DELTA_SECONDS,
        }
    }
}

impl From<&DrivingConfig> for DrivingSettings {
    fn from(config: &DrivingConfig) -> Self {
        Self {
            max_delta_seconds: config.max_delta_seconds,
        }
    }
}

/// Raised when a vehicle hits the play-area wall.
///
/// Impacts are rate-limited by the vehicle's boundary cooldown, so a vehicle
/// grinding along the wall raises one event per cooldown window.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BoundaryImpact {
    /// Vehicle that hit the wall.
    pub entity: Entity,
    /// Position after containment.
    pub position: Vec3,
    /// Speed after the restitution was applied, in m/s.
    pub speed: f32,
}

/// Raised when a vehicle was reset to its spawn point.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehicleRecovered {
    /// Vehicle that was reset.
    pub entity: Entity,
    /// Spawn position it was moved to.
    pub position: Vec3,
}

const fn level_ground(_x: f32, _z: f32) -> f32 {
    0.0
}

/// Advances every vehicle by the clamped frame time.
///
/// Writes the yaw rotation and the rendered position (chassis plus cosmetic
/// bounce) into the entity's `Transform`, and triggers [`BoundaryImpact`] and
/// [`VehicleRecovered`] events for the observers.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn vehicle_physics_system(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<DrivingSettings>,
    terrain: Option<Res<Terrain>>,
    mut vehicles: Query<(
        Entity,
        &mut Vehicle,
        &DriveIntent,
        &mut Telemetry,
        &mut Transform,
    )>,
) {
    let dt = clamp_delta(time.delta_secs(), settings.max_delta_seconds);
    for (entity, mut vehicle, intent, mut telemetry, mut transform) in &mut vehicles {
        vehicle.0.apply_input(intent.0, dt);
        let result = match terrain.as_deref() {
            Some(Terrain(field)) => vehicle.0.step_on(dt, field),
            None => vehicle.0.step(dt, level_ground, level_ground),
        };

        transform.translation = result.render_position();
        transform.rotation = Quat::from_rotation_y(result.rotation);
        telemetry.0 = Some(result);

        if result.boundary_impact {
            commands.trigger(BoundaryImpact {
                entity,
                position: result.position,
                speed: result.speed,
            });
        }
        if result.recovered {
            commands.trigger(VehicleRecovered {
                entity,
                position: result.position,
            });
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_boundary_impact(event: On<BoundaryImpact>) {
    let BoundaryImpact {
        entity,
        position,
        speed,
    } = event.event();
    debug!(
        "{entity:?} hit the boundary at ({:.1}, {:.1}), {speed:.1} m/s",
        position.x, position.z
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_recovery(event: On<VehicleRecovered>) {
    let VehicleRecovered { entity, position } = event.event();
    info!("{entity:?} recovered to spawn at {position}");
}

/// Plugin running the vehicle simulation in `Update`.
///
/// Initialises [`DrivingSettings`] if the app has not inserted one. The
/// [`Terrain`] resource is optional and may be inserted before or after the
/// plugin.
///
/// ```ignore
/// use bevy::prelude::*;
/// use offroad::plugin::DrivingPlugin;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(DrivingPlugin)
///     .run();
/// ```
#[derive(Default)]
pub struct DrivingPlugin;

impl Plugin for DrivingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrivingSettings>();
        app.add_observer(log_boundary_impact);
        app.add_observer(log_recovery);
        app.add_systems(Update, vehicle_physics_system);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VehicleConfig;
    use crate::vehicle::PlayArea;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_settings() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(DrivingPlugin);
        assert_eq!(
            app.world().get_resource::<DrivingSettings>(),
            Some(&DrivingSettings::default())
        );
    }

    #[rstest]
    fn vehicle_requires_intent_and_telemetry() {
        let mut app = App::new();
        let dynamics = VehicleDynamics::new(VehicleConfig::default(), PlayArea::new(50.0));
        let entity = app.world_mut().spawn(Vehicle(dynamics)).id();
        assert!(app.world().get::<DriveIntent>(entity).is_some());
        assert_eq!(app.world().get::<Telemetry>(entity), Some(&Telemetry(None)));
        assert!(app.world().get::<Transform>(entity).is_some());
    }

    #[rstest]
    fn settings_follow_driving_config() {
        let config = DrivingConfig {
            max_delta_seconds: 0.02,
        };
        assert_relative_eq!(DrivingSettings::from(&config).max_delta_seconds, 0.02);
    }
}
