//! Sky dome: a large inverted sphere running the scattering shader.
//! The uniform update is a pure copy of panel params plus the broadcast
//! sun vector, so re-running it with unchanged inputs writes identical
//! uniforms.

use bevy::prelude::*;

pub mod material;
pub mod scattering;

use material::{SkyMaterial, SkyUniform};

use crate::config::SKY_DOME_RADIUS;
use crate::params::RenderParams;
use crate::systems::PipelineSet;
use crate::systems::sun::SunDirection;

pub struct SkyPlugin;

impl Plugin for SkyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<SkyMaterial>::default())
            .add_systems(Startup, spawn_dome)
            .add_systems(Update, update_uniforms.in_set(PipelineSet::PushUniforms));
    }
}

// sky dome tag
#[derive(Component)]
pub struct SkyDome;

fn spawn_dome(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<SkyMaterial>>,
) {
    commands.spawn((
        SkyDome,
        Mesh3d(meshes.add(Sphere::new(SKY_DOME_RADIUS).mesh().uv(32, 64))),
        MeshMaterial3d(materials.add(SkyMaterial {
            sky_uniform: SkyUniform::default(),
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
}

fn update_uniforms(
    params: Res<RenderParams>,
    sun: Res<SunDirection>,
    camera_query: Query<&Transform, With<Camera3d>>,
    dome_query: Query<&MeshMaterial3d<SkyMaterial>, With<SkyDome>>,
    mut materials: ResMut<Assets<SkyMaterial>>,
) {
    let camera_position = if let Ok(camera_transform) = camera_query.single() {
        camera_transform.translation
    } else {
        Vec3::ZERO // fallback
    };

    if let Ok(material_handle) = dome_query.single() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            let atmosphere = &params.atmosphere;
            material.sky_uniform = SkyUniform {
                sun_direction: sun.direction,
                turbidity: atmosphere.turbidity,
                camera_position,
                rayleigh: atmosphere.rayleigh,
                mie_coefficient: atmosphere.mie_coefficient,
                mie_direction: atmosphere.mie_direction,
                luminance: atmosphere.luminance,
                sun_exposure: atmosphere.sun_exposure,
            };
        }
    }
}
