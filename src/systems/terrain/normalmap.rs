//! normalmap.rs
//!
//! Normal derivation pass. Central finite differences over the height
//! field give a per-texel gradient, scaled by the panel's normal
//! strength and packed into the usual rgb encoding (n * 0.5 + 0.5).
//! Runs at the same cadence as the height pass: re-derived only in
//! frames where the height field itself was regenerated.

use bevy::image::Image;
use bevy::prelude::*;

use super::heightfield::HeightField;

pub struct NormalMap {
    resolution: usize,
    texels: Vec<Vec3>,
}

impl NormalMap {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            texels: vec![Vec3::Z; resolution * resolution],
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Unit normal at a texel, +Z is the unperturbed up direction.
    pub fn texel(&self, x: usize, y: usize) -> Vec3 {
        self.texels[y * self.resolution + x]
    }

    /// Derive normals from the height field. A constant field produces
    /// the up vector at every texel no matter the strength.
    pub fn derive(&mut self, height: &HeightField, strength: f32) {
        debug_assert_eq!(self.resolution, height.resolution());
        for y in 0..self.resolution {
            for x in 0..self.resolution {
                let xi = x as isize;
                let yi = y as isize;
                let dx = (height.value(xi + 1, yi) - height.value(xi - 1, yi)) * 0.5;
                let dy = (height.value(xi, yi + 1) - height.value(xi, yi - 1)) * 0.5;
                self.texels[y * self.resolution + x] =
                    Vec3::new(-dx * strength, -dy * strength, 1.0).normalize();
            }
        }
    }

    /// Upload into the normal render target.
    pub fn write_to_image(&self, image: &mut Image) {
        if let Some(data) = image.data.as_mut() {
            for (i, normal) in self.texels.iter().enumerate() {
                let encoded = *normal * 0.5 + Vec3::splat(0.5);
                let offset = i * 4;
                if offset + 3 < data.len() {
                    data[offset] = (encoded.x * 255.0) as u8;
                    data[offset + 1] = (encoded.y * 255.0) as u8;
                    data[offset + 2] = (encoded.z * 255.0) as u8;
                    data[offset + 3] = 255;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn flat_field_yields_up_normals_for_any_strength() {
        // freshly constructed field is constant zero
        let height = HeightField::new(32, 0);
        for strength in [0.0, 1.0, 12.0, 64.0] {
            let mut normals = NormalMap::new(32);
            normals.derive(&height, strength);
            for y in 0..32 {
                for x in 0..32 {
                    let n = normals.texel(x, y);
                    assert!(
                        (n - Vec3::Z).length() < EPSILON,
                        "texel ({x},{y}) = {n:?} at strength {strength}"
                    );
                }
            }
        }
    }

    #[test]
    fn derived_normals_are_unit_length() {
        let mut height = HeightField::new(32, 11);
        height.regenerate(4.0, 0.0);
        let mut normals = NormalMap::new(32);
        normals.derive(&height, 24.0);
        for y in 0..32 {
            for x in 0..32 {
                assert!((normals.texel(x, y).length() - 1.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn stronger_influence_tilts_normals_further() {
        let mut height = HeightField::new(32, 11);
        height.regenerate(4.0, 0.0);

        let mut weak = NormalMap::new(32);
        weak.derive(&height, 1.0);
        let mut strong = NormalMap::new(32);
        strong.derive(&height, 32.0);

        // compare average deviation from up across the map
        let deviation = |map: &NormalMap| -> f32 {
            let mut sum = 0.0;
            for y in 0..32 {
                for x in 0..32 {
                    sum += 1.0 - map.texel(x, y).z;
                }
            }
            sum
        };
        assert!(deviation(&strong) > deviation(&weak));
    }

    #[test]
    fn packing_round_trips_the_up_vector() {
        let encoded = Vec3::Z * 0.5 + Vec3::splat(0.5);
        let bytes = [
            (encoded.x * 255.0) as u8,
            (encoded.y * 255.0) as u8,
            (encoded.z * 255.0) as u8,
        ];
        let decoded = Vec3::new(
            bytes[0] as f32 / 255.0 * 2.0 - 1.0,
            bytes[1] as f32 / 255.0 * 2.0 - 1.0,
            bytes[2] as f32 / 255.0 * 2.0 - 1.0,
        );
        // one quantization step of tolerance
        assert!((decoded - Vec3::Z).length() < 2.0 / 255.0);
    }
}
