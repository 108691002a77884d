//! Terrain: a displaced grid fed by two off-screen map passes.
//!
//! The height pass writes the procedural height field into a texture
//! target, the normal pass derives a normal texture from it, and the
//! terrain material consumes both, so the ordering is enforced by the
//! data flowing through `TerrainMaps` rather than by call sites.

use bevy::image::Image;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

pub mod heightfield;
pub mod material;
pub mod mesh;
pub mod normalmap;

use heightfield::HeightField;
use material::{TerrainMaterial, TerrainUniform};
use normalmap::NormalMap;

use crate::config::{
    ANIMATION_RATE, DIFFUSE_TEXTURE_RESOLUTION, INTENSITY_HIGH, INTENSITY_LOW,
    MAP_RESOLUTION, NOISE_SEED, TERRAIN_GRID_RESOLUTION, TERRAIN_SIZE,
};
use crate::params::RenderParams;
use crate::systems::PipelineSet;
use crate::systems::sun::SunDirection;

pub struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<TerrainMaterial>::default())
            .add_systems(Startup, setup)
            .add_systems(Update, update_uniforms.in_set(PipelineSet::PushUniforms))
            .add_systems(Update, height_pass.in_set(PipelineSet::HeightPass))
            .add_systems(Update, normal_pass.in_set(PipelineSet::NormalPass))
            .add_systems(Update, update_visibility);
    }
}

// terrain patch tag
#[derive(Component)]
pub struct Terrain;

/// CPU-side pass state plus the two texture targets it writes. Owned
/// for the whole application lifetime; the targets are only rewritten
/// in frames where their producing pass actually ran.
#[derive(Resource)]
pub struct TerrainMaps {
    pub height_field: HeightField,
    pub normal_map: NormalMap,
    pub height_target: Handle<Image>,
    pub normal_target: Handle<Image>,
    pub time_offset: f32,
    last_scale: f32,
    last_strength: f32,
    height_dirty: bool,
}

/// Terrain light intensity from sun altitude, clamped into [0, 1] and
/// interpolated between the low and high bounds. Exact at both ends.
pub fn light_intensity(sun_altitude: f32) -> f32 {
    let t = sun_altitude.clamp(0.0, 1.0);
    (1.0 - t) * INTENSITY_LOW + t * INTENSITY_HIGH
}

fn map_target(resolution: usize) -> Image {
    Image::new_fill(
        Extent3d {
            width: resolution as u32,
            height: resolution as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        // data texture, not color, so no srgb
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
}

// cheap deterministic per-pixel hash for the diffuse texture speckle
fn pseudo_hash(seed: u32) -> u32 {
    let mut h = seed.wrapping_mul(2654435761);
    h ^= h >> 16;
    h = h.wrapping_mul(2246822507);
    h ^= h >> 13;
    h
}

/// Procedural stand-in for a loaded diffuse texture: flat base color
/// with hashed per-pixel speckle.
fn generate_diffuse_texture(size: usize, base: [u8; 3], variation: u8, seed: u32) -> Image {
    let mut data = vec![0u8; size * size * 4];
    let span = variation as i32 * 2 + 1;
    for i in 0..size * size {
        let jitter = (pseudo_hash(i as u32 ^ seed) % span as u32) as i32 - variation as i32;
        let offset = i * 4;
        for c in 0..3 {
            data[offset + c] = (base[c] as i32 + jitter).clamp(0, 255) as u8;
        }
        data[offset + 3] = 255;
    }
    Image::new(
        Extent3d {
            width: size as u32,
            height: size as u32,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    )
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<TerrainMaterial>>,
    mut images: ResMut<Assets<Image>>,
    params: Res<RenderParams>,
) {
    // first computation of both maps; they stay static until the panel
    // turns animation on or edits a pass input
    let mut height_field = HeightField::new(MAP_RESOLUTION, NOISE_SEED);
    height_field.regenerate(params.terrain.heightmap_scale, 0.0);
    let mut normal_map = NormalMap::new(MAP_RESOLUTION);
    normal_map.derive(&height_field, params.terrain.normal_strength);

    let mut height_image = map_target(MAP_RESOLUTION);
    height_field.write_to_image(&mut height_image);
    let mut normal_image = map_target(MAP_RESOLUTION);
    normal_map.write_to_image(&mut normal_image);

    let height_target = images.add(height_image);
    let normal_target = images.add(normal_image);

    let grass = images.add(generate_diffuse_texture(
        DIFFUSE_TEXTURE_RESOLUTION,
        [62, 108, 48],
        14,
        0x67a3,
    ));
    let rock = images.add(generate_diffuse_texture(
        DIFFUSE_TEXTURE_RESOLUTION,
        [118, 110, 102],
        10,
        0x20c1,
    ));

    commands.spawn((
        Terrain,
        Mesh3d(meshes.add(mesh::build_grid(TERRAIN_SIZE, TERRAIN_GRID_RESOLUTION))),
        MeshMaterial3d(materials.add(TerrainMaterial {
            height_map: height_target.clone(),
            normal_map: normal_target.clone(),
            low_texture: grass,
            high_texture: rock,
            terrain_uniform: TerrainUniform {
                light_direction: Vec3::Y,
                light_intensity: INTENSITY_LOW,
                displacement_scale: params.terrain.displacement_scale,
                _padding: Vec3::ZERO,
            },
        })),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    commands.insert_resource(TerrainMaps {
        height_field,
        normal_map,
        height_target,
        normal_target,
        time_offset: 0.0,
        last_scale: params.terrain.heightmap_scale,
        last_strength: params.terrain.normal_strength,
        height_dirty: false,
    });

    info!(
        "terrain ready: {}x{} grid, {}x{} map targets",
        TERRAIN_GRID_RESOLUTION, TERRAIN_GRID_RESOLUTION, MAP_RESOLUTION, MAP_RESOLUTION
    );
}

// regenerate the height target when animating or when the panel edited
// a height input. Hidden terrain skips both passes entirely.
fn height_pass(
    time: Res<Time>,
    params: Res<RenderParams>,
    mut maps: ResMut<TerrainMaps>,
    mut images: ResMut<Assets<Image>>,
) {
    if !params.terrain.visible {
        return;
    }

    if params.terrain.animate {
        maps.time_offset += time.delta_secs() * ANIMATION_RATE;
    }

    let scale_changed = params.terrain.heightmap_scale != maps.last_scale;
    if !params.terrain.animate && !scale_changed {
        return;
    }

    maps.last_scale = params.terrain.heightmap_scale;
    let time_offset = maps.time_offset;
    maps.height_field
        .regenerate(params.terrain.heightmap_scale, time_offset);

    let maps = &mut *maps;
    if let Some(image) = images.get_mut(&maps.height_target) {
        maps.height_field.write_to_image(image);
    }
    maps.height_dirty = true;
}

// derive the normal target whenever the height target changed this
// frame, or the panel edited the strength
fn normal_pass(
    params: Res<RenderParams>,
    mut maps: ResMut<TerrainMaps>,
    mut images: ResMut<Assets<Image>>,
) {
    if !params.terrain.visible {
        return;
    }

    let strength_changed = params.terrain.normal_strength != maps.last_strength;
    if !maps.height_dirty && !strength_changed {
        return;
    }

    maps.last_strength = params.terrain.normal_strength;
    maps.height_dirty = false;

    let maps = &mut *maps;
    maps.normal_map
        .derive(&maps.height_field, params.terrain.normal_strength);
    if let Some(image) = images.get_mut(&maps.normal_target) {
        maps.normal_map.write_to_image(image);
    }
}

fn update_uniforms(
    params: Res<RenderParams>,
    sun: Res<SunDirection>,
    terrain_query: Query<&MeshMaterial3d<TerrainMaterial>, With<Terrain>>,
    mut materials: ResMut<Assets<TerrainMaterial>>,
) {
    if let Ok(material_handle) = terrain_query.single() {
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.terrain_uniform.light_direction = sun.direction;
            material.terrain_uniform.light_intensity = light_intensity(sun.altitude);
            material.terrain_uniform.displacement_scale = params.terrain.displacement_scale;
        }
    }
}

fn update_visibility(
    params: Res<RenderParams>,
    mut terrain_query: Query<&mut Visibility, With<Terrain>>,
) {
    if let Ok(mut visibility) = terrain_query.single_mut() {
        *visibility = if params.terrain.visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_intensity_hits_the_bounds_exactly() {
        assert_eq!(light_intensity(0.0), INTENSITY_LOW);
        assert_eq!(light_intensity(1.0), INTENSITY_HIGH);
    }

    #[test]
    fn light_intensity_clamps_outside_the_ramp() {
        assert_eq!(light_intensity(-0.8), INTENSITY_LOW);
        assert_eq!(light_intensity(3.0), INTENSITY_HIGH);
        let mid = light_intensity(0.5);
        assert!(mid > INTENSITY_LOW && mid < INTENSITY_HIGH);
    }

    #[test]
    fn diffuse_texture_stays_near_its_base_color() {
        let image = generate_diffuse_texture(16, [100, 150, 50], 10, 99);
        let data = image.data.as_ref().expect("texture has data");
        for pixel in data.chunks(4) {
            assert!((pixel[0] as i32 - 100).abs() <= 10);
            assert!((pixel[1] as i32 - 150).abs() <= 10);
            assert!((pixel[2] as i32 - 50).abs() <= 10);
            assert_eq!(pixel[3], 255);
        }
    }
}
