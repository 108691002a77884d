use bevy::prelude::*;

use bevy_skyterra::config::{CAMERA_FAR, CAMERA_NEAR, CAMERA_START_RADIUS};
use bevy_skyterra::params::RenderParams;
use bevy_skyterra::systems::PipelineSet;
use bevy_skyterra::systems::camera::{OrbitCamPlugin, OrbitCamera};
use bevy_skyterra::systems::sky::SkyPlugin;
use bevy_skyterra::systems::sun::SunPlugin;
use bevy_skyterra::systems::terrain::TerrainPlugin;
use bevy_skyterra::systems::ui::SettingsPanelPlugin;

fn main() -> bevy::app::AppExit {
    App::new()
        .add_plugins(DefaultPlugins)
        .insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.0)))
        .init_resource::<RenderParams>()
        // the per-frame pipeline: sun angles, then the broadcast vector,
        // then uniforms, then the height and normal map passes
        .configure_sets(
            Update,
            (
                PipelineSet::AdvanceSun,
                PipelineSet::BroadcastSun,
                PipelineSet::PushUniforms,
                PipelineSet::HeightPass,
                PipelineSet::NormalPass,
            )
                .chain(),
        )
        .add_plugins(OrbitCamPlugin)
        .add_plugins(SunPlugin)
        .add_plugins(SkyPlugin)
        .add_plugins(TerrainPlugin)
        .add_plugins(SettingsPanelPlugin)
        .add_systems(Startup, setup)
        .run()
}

// scene setup here
fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_xyz(0.0, 2000.0, CAMERA_START_RADIUS)
            .looking_at(Vec3::ZERO, Vec3::Y),
        OrbitCamera::new(CAMERA_START_RADIUS, 0.5).with_target(Vec3::ZERO),
    ));
}
