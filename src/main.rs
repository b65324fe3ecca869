//! Headless driver for the off-road simulation.
//!
//! Builds the terrain, spawns one vehicle and drives a scripted lap through
//! the Bevy plugin, logging telemetry once per simulated second.
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use log::info;
use offroad::plugin::{DriveIntent, DrivingSettings, Telemetry, Terrain, Vehicle};
use offroad::{init_logging, DriveInput, DrivingPlugin, SimConfig, TerrainHeightField, VehicleDynamics};

/// Frames simulated per second of driving.
const FRAME_RATE: u32 = 60;

/// Length of one pass of the scripted lap, in seconds.
const LAP_SECONDS: f32 = 10.0;

/// An arcade off-road driving simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// TOML or JSON file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated seconds to drive
    #[arg(short, long, default_value_t = 20)]
    seconds: u32,
    /// Keep nitro engaged while the throttle is open
    #[arg(long)]
    nitro: bool,
}

/// Input for the lap at `elapsed` seconds: straight, left sweep, right sweep,
/// then a braking zone before the next pass.
fn scripted_input(elapsed: f32, nitro: bool) -> DriveInput {
    let phase = elapsed.rem_euclid(LAP_SECONDS);
    let braking = phase >= LAP_SECONDS - 1.0;
    DriveInput {
        forward: !braking,
        left: (4.0..6.5).contains(&phase),
        right: (6.5..8.0).contains(&phase),
        brake: braking,
        nitro: nitro && !braking,
        ..DriveInput::default()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimConfig::default(),
    };

    let terrain = TerrainHeightField::generate(&config.terrain);
    let dynamics = VehicleDynamics::for_terrain(config.vehicle.clone(), &terrain);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(DrivingPlugin)
        .insert_resource(DrivingSettings::from(&config.driving))
        .insert_resource(Terrain(terrain))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / f64::from(FRAME_RATE),
        )));
    let car = app.world_mut().spawn(Vehicle(dynamics)).id();

    let frame = 1.0 / offroad::numeric::index_to_f32(FRAME_RATE);
    let total_frames = args.seconds.saturating_mul(FRAME_RATE);
    info!("driving {} s ({total_frames} frames)", args.seconds);

    for tick in 0..total_frames {
        let elapsed = offroad::numeric::index_to_f32(tick) * frame;
        let input = scripted_input(elapsed, args.nitro);
        if let Some(mut intent) = app.world_mut().get_mut::<DriveIntent>(car) {
            intent.0 = input;
        }
        app.update();

        if tick % FRAME_RATE == 0 {
            if let Some(Telemetry(Some(result))) = app.world().get::<Telemetry>(car) {
                info!("t={elapsed:.0}s {}", serde_json::to_string(result)?);
            }
        }
    }

    if let Some(Telemetry(Some(result))) = app.world().get::<Telemetry>(car) {
        info!(
            "finished at ({:.1}, {:.1}, {:.1}) doing {:.0} km/h",
            result.position.x,
            result.position.y,
            result.position.z,
            result.speed_kmh()
        );
    }
    Ok(())
}
