//! params.rs
//!
//! All user-tunable render parameters live here, in one resource written
//! only by the settings panel. The pipeline systems read them each frame
//! and derive shader uniforms from them, so re-running an update with
//! unchanged values always produces the same uniform set.

use std::ops::RangeInclusive;

use bevy::prelude::*;

// Panel ranges. The egui sliders are built from these, and clamp() below
// re-applies them in case a caller bypasses the panel.
pub const TURBIDITY_RANGE: RangeInclusive<f32> = 0.1..=150.0;
pub const RAYLEIGH_RANGE: RangeInclusive<f32> = 0.0..=6.0;
pub const MIE_COEFFICIENT_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const MIE_DIRECTION_RANGE: RangeInclusive<f32> = -0.99..=0.99;
pub const LUMINANCE_RANGE: RangeInclusive<f32> = 0.1..=1.2;
pub const SUN_EXPOSURE_RANGE: RangeInclusive<f32> = 0.0..=5000.0;

pub const HEIGHTMAP_SCALE_RANGE: RangeInclusive<f32> = 0.5..=16.0;
pub const NORMAL_STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=64.0;
pub const DISPLACEMENT_SCALE_RANGE: RangeInclusive<f32> = 0.0..=2000.0;

#[derive(Resource, Clone, Debug)]
pub struct RenderParams {
    pub atmosphere: AtmosphereParams,
    pub terrain: TerrainParams,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            atmosphere: AtmosphereParams::default(),
            terrain: TerrainParams::default(),
        }
    }
}

/// Inputs to the sky scattering shader. Artistic approximations, not
/// physical constants; the ranges are what the panel exposes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmosphereParams {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_direction: f32,
    pub luminance: f32,
    pub sun_exposure: f32,
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_direction: 0.8,
            luminance: 1.0,
            sun_exposure: 250.0,
        }
    }
}

impl AtmosphereParams {
    /// Re-apply the panel ranges. Values normally arrive pre-clamped from
    /// the sliders; this exists for callers that construct params directly.
    pub fn clamp(&mut self) {
        self.turbidity = clamp_to(self.turbidity, TURBIDITY_RANGE);
        self.rayleigh = clamp_to(self.rayleigh, RAYLEIGH_RANGE);
        self.mie_coefficient = clamp_to(self.mie_coefficient, MIE_COEFFICIENT_RANGE);
        self.mie_direction = clamp_to(self.mie_direction, MIE_DIRECTION_RANGE);
        self.luminance = clamp_to(self.luminance, LUMINANCE_RANGE);
        self.sun_exposure = clamp_to(self.sun_exposure, SUN_EXPOSURE_RANGE);
    }
}

/// Drives the height pass, normal pass and terrain shader uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainParams {
    pub heightmap_scale: f32,
    pub animate: bool,
    pub normal_strength: f32,
    pub displacement_scale: f32,
    pub visible: bool,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            heightmap_scale: 3.0,
            animate: false,
            normal_strength: 12.0,
            displacement_scale: 600.0,
            visible: true,
        }
    }
}

impl TerrainParams {
    pub fn clamp(&mut self) {
        self.heightmap_scale = clamp_to(self.heightmap_scale, HEIGHTMAP_SCALE_RANGE);
        self.normal_strength = clamp_to(self.normal_strength, NORMAL_STRENGTH_RANGE);
        self.displacement_scale = clamp_to(self.displacement_scale, DISPLACEMENT_SCALE_RANGE);
    }
}

fn clamp_to(value: f32, range: RangeInclusive<f32>) -> f32 {
    value.clamp(*range.start(), *range.end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_inside_panel_ranges() {
        let mut atmosphere = AtmosphereParams::default();
        let before = atmosphere;
        atmosphere.clamp();
        assert_eq!(atmosphere, before);

        let mut terrain = TerrainParams::default();
        let before = terrain;
        terrain.clamp();
        assert_eq!(terrain, before);
    }

    #[test]
    fn clamp_pulls_out_of_range_values_back() {
        let mut params = AtmosphereParams {
            turbidity: 1e6,
            rayleigh: -3.0,
            mie_coefficient: 2.0,
            mie_direction: -1.0,
            luminance: 0.0,
            sun_exposure: 1e9,
        };
        params.clamp();
        assert_eq!(params.turbidity, 150.0);
        assert_eq!(params.rayleigh, 0.0);
        assert_eq!(params.mie_coefficient, 1.0);
        assert_eq!(params.mie_direction, -0.99);
        assert_eq!(params.luminance, 0.1);
        assert_eq!(params.sun_exposure, 5000.0);
    }
}
