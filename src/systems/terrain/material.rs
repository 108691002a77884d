use bevy::asset::Asset;
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::*;

// uniform block shared by the terrain vertex and fragment stages
#[derive(ShaderType, Clone, Copy, Debug)]
#[repr(C)]
pub struct TerrainUniform {
    pub light_direction: Vec3,
    /// lerp(INTENSITY_LOW, INTENSITY_HIGH, sun altitude)
    pub light_intensity: f32,
    pub displacement_scale: f32,
    pub _padding: Vec3,
}

// terrain material
// height map displaces vertices, normal map shades them, two diffuse
// textures blend by height and slope
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct TerrainMaterial {
    #[texture(0)]
    #[sampler(1)]
    pub height_map: Handle<Image>,
    #[texture(2)]
    #[sampler(3)]
    pub normal_map: Handle<Image>,
    #[texture(4)]
    #[sampler(5)]
    pub low_texture: Handle<Image>,
    #[texture(6)]
    #[sampler(7)]
    pub high_texture: Handle<Image>,
    #[uniform(8)]
    pub terrain_uniform: TerrainUniform,
}

impl Material for TerrainMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/terrain.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/terrain.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }
}
