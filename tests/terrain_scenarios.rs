//! Properties of the generated terrain and of vehicles driving over it.

use approx::assert_relative_eq;
use offroad::config::TerrainConfig;
use offroad::{DriveInput, TerrainHeightField, VehicleDynamics};
use rstest::{fixture, rstest};
use test_utils::drive;

#[fixture]
fn terrain() -> TerrainHeightField {
    TerrainHeightField::generate(&TerrainConfig::default())
}

#[rstest]
fn generation_is_deterministic(terrain: TerrainHeightField) {
    let again = TerrainHeightField::generate(&TerrainConfig::default());
    assert_eq!(terrain.samples(), again.samples());
}

#[rstest]
fn seeds_change_the_landscape(terrain: TerrainHeightField) {
    let other = TerrainHeightField::generate(&TerrainConfig {
        seed: 7,
        ..TerrainConfig::default()
    });
    assert_ne!(terrain.samples(), other.samples());
}

#[rstest]
fn spawn_area_is_level(terrain: TerrainHeightField) {
    for step in 0..=20_u8 {
        let t = f32::from(step) / 20.0;
        for (x, z) in [(t * 25.0, 0.0), (0.0, -t * 25.0), (t * 17.0, t * 17.0)] {
            assert_relative_eq!(terrain.height_at(x, z), 0.0);
            assert_relative_eq!(terrain.roughness_at(x, z), 0.0);
        }
    }
}

#[rstest]
fn terrain_has_relief_outside_the_spawn_area(terrain: TerrainHeightField) {
    let (lo, hi) = terrain.height_range();
    assert!(hi - lo > 1.0, "range {lo}..{hi} is too flat");
}

#[rstest]
fn heights_are_continuous_across_cell_edges(terrain: TerrainHeightField) {
    let cell = terrain.cell_size();
    let half = terrain.half_extent();
    let delta = 1.0e-3;
    for i in 1..60_u16 {
        let edge = -half + f32::from(i) * cell;
        for z in [-150.0, -75.0, 42.5, 120.0] {
            let before = terrain.height_at(edge - delta, z);
            let after = terrain.height_at(edge + delta, z);
            assert!(
                (after - before).abs() < 0.01,
                "jump of {} at x = {edge}",
                after - before
            );
            let across_z_before = terrain.height_at(z, edge - delta);
            let across_z_after = terrain.height_at(z, edge + delta);
            assert!((across_z_after - across_z_before).abs() < 0.01);
        }
    }
}

#[rstest]
fn outside_the_domain_reads_zero(terrain: TerrainHeightField) {
    let far = terrain.half_extent() + 10.0;
    assert_relative_eq!(terrain.height_at(far, 0.0), 0.0);
    assert_relative_eq!(terrain.height_at(0.0, -far), 0.0);
    assert_relative_eq!(terrain.height_at(f32::NAN, 3.0), 0.0);
}

#[rstest]
fn boundary_sits_inside_the_terrain(terrain: TerrainHeightField) {
    let config = TerrainConfig::default();
    assert_relative_eq!(
        terrain.boundary_limit(),
        config.size / 2.0 - config.boundary_margin
    );
}

#[rstest]
fn vehicle_never_sinks_below_the_terrain(terrain: TerrainHeightField) {
    let mut vehicle = VehicleDynamics::for_terrain(Default::default(), &terrain);
    let limit = terrain.boundary_limit();
    let script = [
        (DriveInput::forward(), 300),
        (
            DriveInput {
                left: true,
                nitro: true,
                ..DriveInput::forward()
            },
            240,
        ),
        (
            DriveInput {
                right: true,
                ..DriveInput::forward()
            },
            360,
        ),
        (DriveInput::forward(), 600),
        (DriveInput::brake(), 120),
    ];
    for (input, frames) in script {
        for result in drive(&mut vehicle, input, frames, &terrain) {
            let ground = terrain.height_at(result.position.x, result.position.z);
            assert!(
                result.position.y >= ground - 1e-4,
                "sank to {} below ground {ground}",
                result.position.y
            );
            assert!(result.position.x.abs() <= limit + 1e-4);
            assert!(result.position.z.abs() <= limit + 1e-4);
            assert!(result.position.is_finite());
        }
    }
}

#[rstest]
fn spawning_on_terrain_uses_ride_height(terrain: TerrainHeightField) {
    let mut vehicle = VehicleDynamics::for_terrain(Default::default(), &terrain);
    let spawn = vehicle.reset_on(&terrain);
    let expected = terrain.height_at(spawn.x, spawn.z) + vehicle.config().suspension_height;
    assert_relative_eq!(spawn.y, expected);
}
