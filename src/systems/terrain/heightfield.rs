//! heightfield.rs
//!
//! Procedural height pass. Evaluates fBm noise per texel into a scalar
//! buffer in [0, 1], then uploads it into the height render target
//! (red channel). The buffer is regenerated every frame only while the
//! panel has animation on; otherwise it is computed once and left
//! static. Evaluation happens on the CPU rather than in a fullscreen
//! GPU pass; at 512x512 the texel loop fits comfortably in a frame and
//! stays directly testable.

use bevy::image::Image;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Square scalar field parameterized by a per-axis scale and a time
/// offset. The time axis is fed straight into the third noise
/// dimension, so animation is a smooth slice sweep.
pub struct HeightField {
    resolution: usize,
    values: Vec<f32>,
    noise: Fbm<Perlin>,
}

impl HeightField {
    pub fn new(resolution: usize, seed: u32) -> Self {
        Self {
            resolution,
            values: vec![0.0; resolution * resolution],
            noise: Fbm::<Perlin>::new(seed)
                .set_octaves(4)
                .set_persistence(0.5),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Height at a texel, indices clamped to the field edge.
    pub fn value(&self, x: isize, y: isize) -> f32 {
        let x = x.clamp(0, self.resolution as isize - 1) as usize;
        let y = y.clamp(0, self.resolution as isize - 1) as usize;
        self.values[y * self.resolution + x]
    }

    /// Re-evaluate every texel. Same scale and time offset always
    /// reproduce the same field.
    pub fn regenerate(&mut self, scale: f32, time_offset: f32) {
        let max_index = (self.resolution - 1) as f64;
        for y in 0..self.resolution {
            for x in 0..self.resolution {
                let u = x as f64 / max_index * scale as f64;
                let v = y as f64 / max_index * scale as f64;
                let sample = self.noise.get([u, v, time_offset as f64]);
                // fbm sits roughly in [-1, 1]; remap and clamp into [0, 1]
                self.values[y * self.resolution + x] =
                    ((0.5 + 0.5 * sample) as f32).clamp(0.0, 1.0);
            }
        }
    }

    /// Upload into the height render target, height in the red channel.
    pub fn write_to_image(&self, image: &mut Image) {
        if let Some(data) = image.data.as_mut() {
            for (i, &height) in self.values.iter().enumerate() {
                let byte = (height * 255.0) as u8;
                let offset = i * 4;
                if offset + 3 < data.len() {
                    data[offset] = byte;
                    data[offset + 1] = byte;
                    data[offset + 2] = byte;
                    data[offset + 3] = 255;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regeneration_is_deterministic() {
        let mut a = HeightField::new(32, 7);
        let mut b = HeightField::new(32, 7);
        a.regenerate(3.0, 1.25);
        b.regenerate(3.0, 1.25);
        for y in 0..32 {
            for x in 0..32 {
                assert_eq!(a.value(x, y), b.value(x, y));
            }
        }
    }

    #[test]
    fn values_stay_in_unit_range() {
        let mut field = HeightField::new(64, 42);
        field.regenerate(8.0, 0.0);
        for y in 0..64 {
            for x in 0..64 {
                let h = field.value(x, y);
                assert!((0.0..=1.0).contains(&h), "height {h} out of range");
            }
        }
    }

    #[test]
    fn time_offset_changes_the_field() {
        let mut field = HeightField::new(32, 7);
        field.regenerate(3.0, 0.0);
        let before = field.value(10, 10);
        field.regenerate(3.0, 5.0);
        let after = field.value(10, 10);
        assert_ne!(before, after);
    }

    #[test]
    fn edge_indices_are_clamped() {
        let mut field = HeightField::new(16, 3);
        field.regenerate(2.0, 0.0);
        assert_eq!(field.value(-5, 0), field.value(0, 0));
        assert_eq!(field.value(40, 15), field.value(15, 15));
    }
}
