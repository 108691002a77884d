//! Flat grid mesh for the terrain patch. Displacement happens in the
//! vertex shader from the height target, so the grid itself never
//! changes after construction.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

/// Build a `resolution` x `resolution` vertex grid on the XZ plane,
/// centered at the origin, UVs spanning [0, 1], normals up.
pub fn build_grid(size: f32, resolution: u32) -> Mesh {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();
    let mut uvs: Vec<Vec2> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    let max_index = (resolution - 1) as f32;
    for z in 0..resolution {
        for x in 0..resolution {
            let u = x as f32 / max_index;
            let v = z as f32 / max_index;
            vertices.push(Vec3::new(
                (u - 0.5) * size,
                0.0,
                (v - 0.5) * size,
            ));
            normals.push(Vec3::Y);
            uvs.push(Vec2::new(u, v));

            // two triangles per grid cell
            if x != resolution - 1 && z != resolution - 1 {
                let i = x + z * resolution;
                indices.push(i);
                indices.push(i + resolution);
                indices.push(i + resolution + 1);

                indices.push(i);
                indices.push(i + resolution + 1);
                indices.push(i + 1);
            }
        }
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    mesh.insert_indices(Indices::U32(indices));
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh
}

/// The displacement rule the vertex shader applies, stated host-side:
/// move along the vertex normal by the sampled height times the scale.
pub fn displaced_position(
    position: Vec3,
    normal: Vec3,
    height: f32,
    displacement_scale: f32,
) -> Vec3 {
    position + normal * (displacement_scale * height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_displacement_scale_leaves_the_grid_untouched() {
        for height in [0.0, 0.25, 1.0] {
            let position = Vec3::new(12.0, 0.0, -40.0);
            let displaced = displaced_position(position, Vec3::Y, height, 0.0);
            assert_eq!(displaced, position);
        }
    }

    #[test]
    fn displacement_moves_along_the_normal() {
        let position = Vec3::new(1.0, 0.0, 2.0);
        let displaced = displaced_position(position, Vec3::Y, 0.5, 600.0);
        assert_eq!(displaced, Vec3::new(1.0, 300.0, 2.0));
    }

    #[test]
    fn grid_dimensions_and_extent() {
        let mesh = build_grid(8000.0, 16);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|attr| attr.as_float3())
            .expect("grid must have positions");
        assert_eq!(positions.len(), 16 * 16);
        for p in positions {
            assert!(p[0].abs() <= 4000.0 + 1e-3);
            assert_eq!(p[1], 0.0);
            assert!(p[2].abs() <= 4000.0 + 1e-3);
        }
        // (res-1)^2 cells, 2 triangles each
        let index_count = mesh.indices().map(|i| i.len()).unwrap_or(0);
        assert_eq!(index_count, 15 * 15 * 6);
    }
}
