use bevy::asset::Asset;
use bevy::pbr::{MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::mesh::MeshVertexBufferLayoutRef;
use bevy::render::render_resource::*;

// uniform block for the sky dome shader
// vec3s are paired with scalars to satisfy WGSL 16-byte alignment
#[derive(ShaderType, Clone, Copy, Debug)]
#[repr(C)]
pub struct SkyUniform {
    pub sun_direction: Vec3,
    pub turbidity: f32,
    pub camera_position: Vec3,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_direction: f32,
    pub luminance: f32,
    pub sun_exposure: f32,
}

impl Default for SkyUniform {
    fn default() -> Self {
        Self {
            sun_direction: Vec3::new(0.0, 1.0, 0.0),
            turbidity: 10.0,
            camera_position: Vec3::ZERO,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_direction: 0.8,
            luminance: 1.0,
            sun_exposure: 250.0,
        }
    }
}

// sky dome material
// drawn on the inside of a sphere enclosing the whole scene, so culling
// has to be off
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SkyMaterial {
    #[uniform(0)]
    pub sky_uniform: SkyUniform,
}

impl Material for SkyMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/sky.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Opaque
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
