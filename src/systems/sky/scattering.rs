//! scattering.rs
//!
//! Host-side statement of the sky shader's math, after the analytic
//! daylight model of Preetham et al. with a Henyey-Greenstein Mie phase.
//! `assets/shaders/sky.wgsl` evaluates the same expressions per fragment;
//! this module is the reference the tests pin down. Optical depth along
//! the view ray is closed-form (no ray marching), so the whole thing is a
//! pure function of view direction, sun direction and the panel params.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::params::AtmosphereParams;

const UP: Vec3 = Vec3::Y;

// Rayleigh scattering coefficients at sea level for ~680/550/450nm
const RAYLEIGH_TOTAL: Vec3 = Vec3::new(5.804543e-6, 1.3562912e-5, 3.0265902e-5);

// K coefficients for the Mie approximation, same wavelengths
const MIE_K: Vec3 = Vec3::new(1.8399918e14, 2.7798024e14, 4.0790479e14);
const MIE_V: f32 = 0.434;

// sun intensity falloff as it approaches the horizon
const SUN_INTENSITY_MAX: f32 = 1000.0;
const SUN_CUTOFF_ANGLE: f32 = PI / 1.95;
const SUN_FALLOFF_STEEPNESS: f32 = 1.5;

// optical lengths at zenith
const RAYLEIGH_ZENITH_LENGTH: f32 = 8.4e3;
const MIE_ZENITH_LENGTH: f32 = 1.25e3;

/// Rayleigh phase, depends only on the scattering angle.
pub fn rayleigh_phase(cos_theta: f32) -> f32 {
    3.0 / (16.0 * PI) * (1.0 + cos_theta * cos_theta)
}

/// Henyey-Greenstein phase for aerosols. `g` is the panel's
/// mie_direction, forward-biased for positive values.
pub fn hg_phase(cos_theta: f32, g: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 + g2 - 2.0 * g * cos_theta).max(1e-8).powf(1.5);
    (1.0 - g2) / (4.0 * PI * denom)
}

/// Mie extinction coefficient per color channel. Turbidity sets the
/// aerosol density, the panel coefficient scales the whole term.
pub fn total_mie(turbidity: f32, mie_coefficient: f32) -> Vec3 {
    let c = (0.2 * turbidity) * 10e-18;
    MIE_K * (MIE_V * c * mie_coefficient)
}

/// Sun intensity as a function of the cosine of its zenith angle,
/// fading out below the horizon.
pub fn sun_intensity(zenith_cos: f32) -> f32 {
    let zenith_angle = zenith_cos.clamp(-1.0, 1.0).acos();
    SUN_INTENSITY_MAX
        * (1.0 - (-((SUN_CUTOFF_ANGLE - zenith_angle) / SUN_FALLOFF_STEEPNESS)).exp()).max(0.0)
}

/// Closed-form optical path lengths through the atmosphere for a view
/// ray, returned as (rayleigh, mie). Uses the flat-earth cutoff fit so
/// the lengths stay finite at the horizon.
pub fn optical_lengths(view: Vec3) -> (f32, f32) {
    let zenith_cos = UP.dot(view).max(0.0);
    let zenith_deg = zenith_cos.acos().to_degrees();
    let denom = zenith_cos + 0.15 * (93.885 - zenith_deg).max(0.01).powf(-1.253);
    (RAYLEIGH_ZENITH_LENGTH / denom, MIE_ZENITH_LENGTH / denom)
}

/// HDR sky radiance for one view ray. Always finite and non-negative
/// for in-range params and unit input vectors.
pub fn sky_radiance(view: Vec3, sun: Vec3, params: &AtmosphereParams) -> Vec3 {
    let sun_e = sun_intensity(UP.dot(sun));
    // fade the rayleigh term out as the sun sets, gives the red shift
    let sun_fade = 1.0 - (1.0 - sun.y.exp()).clamp(0.0, 1.0);

    let beta_r = (RAYLEIGH_TOTAL * (params.rayleigh - (1.0 - sun_fade)))
        .max(Vec3::ZERO);
    let beta_m = total_mie(params.turbidity, params.mie_coefficient);

    let (s_r, s_m) = optical_lengths(view);
    let extinction = (-(beta_r * s_r + beta_m * s_m)).exp();

    let cos_theta = view.dot(sun);
    let beta_r_theta = beta_r * rayleigh_phase(cos_theta);
    let beta_m_theta = beta_m * hg_phase(cos_theta, params.mie_direction);
    let beta_sum = (beta_r + beta_m).max(Vec3::splat(1e-20));

    let in_scatter = (beta_r_theta + beta_m_theta) / beta_sum;
    let mut radiance =
        (sun_e * in_scatter * (Vec3::ONE - extinction)).powf(1.5);
    // darken toward the horizon-facing half when the sun is low
    let horizon_mix = (1.0 - UP.dot(sun)).powf(5.0).clamp(0.0, 1.0);
    radiance = radiance.lerp(
        radiance * (sun_e * in_scatter * extinction).powf(0.5),
        horizon_mix,
    );

    // residual extinction glow plus a tiny floor so nights are not pure black
    let base = radiance + extinction * 0.1;
    base * 0.04 + Vec3::new(0.0, 0.0003, 0.00075)
}

/// Exposure tone map to display range, scaled by the luminance setting.
pub fn tonemap(radiance: Vec3, params: &AtmosphereParams) -> Vec3 {
    let mapped = Vec3::ONE - (-(radiance * params.sun_exposure)).exp();
    (mapped * params.luminance).clamp(Vec3::ZERO, Vec3::ONE)
}

/// Full view-ray evaluation: radiance then tone map. What the fragment
/// shader writes, minus the sun disc.
pub fn sky_color(view: Vec3, sun: Vec3, params: &AtmosphereParams) -> Vec3 {
    tonemap(sky_radiance(view, sun, params), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction_grid(steps: usize) -> Vec<Vec3> {
        let mut dirs = Vec::new();
        for i in 0..steps {
            for j in 0..steps {
                let azimuth = std::f32::consts::TAU * (i as f32 / steps as f32);
                // include below-horizon rays
                let elevation = -0.4 + 1.9 * (j as f32 / (steps - 1) as f32);
                dirs.push(
                    Vec3::new(
                        elevation.cos() * azimuth.cos(),
                        elevation.sin(),
                        elevation.cos() * azimuth.sin(),
                    )
                    .normalize(),
                );
            }
        }
        dirs
    }

    fn assert_finite_non_negative(params: &AtmosphereParams) {
        for sun in direction_grid(6) {
            for view in direction_grid(6) {
                let radiance = sky_radiance(view, sun, params);
                for channel in radiance.to_array() {
                    assert!(
                        channel.is_finite() && channel >= 0.0,
                        "bad radiance {radiance:?} for sun {sun:?} view {view:?} params {params:?}"
                    );
                }
                let color = sky_color(view, sun, params);
                for channel in color.to_array() {
                    assert!((0.0..=1.0).contains(&channel));
                }
            }
        }
    }

    #[test]
    fn radiance_is_sane_at_turbidity_bounds() {
        let mut low = AtmosphereParams::default();
        low.turbidity = 0.1;
        assert_finite_non_negative(&low);

        let mut high = AtmosphereParams::default();
        high.turbidity = 150.0;
        assert_finite_non_negative(&high);
    }

    #[test]
    fn radiance_is_sane_at_mie_and_rayleigh_extremes() {
        let mut params = AtmosphereParams::default();
        params.rayleigh = 0.0;
        params.mie_coefficient = 0.0;
        assert_finite_non_negative(&params);

        params.rayleigh = 6.0;
        params.mie_coefficient = 1.0;
        params.mie_direction = 0.99;
        assert_finite_non_negative(&params);

        params.mie_direction = -0.99;
        assert_finite_non_negative(&params);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let params = AtmosphereParams::default();
        let view = Vec3::new(0.3, 0.5, -0.2).normalize();
        let sun = Vec3::new(0.1, 0.8, 0.3).normalize();
        let first = sky_color(view, sun, &params);
        let second = sky_color(view, sun, &params);
        // same inputs, bit-identical output
        assert_eq!(first, second);
    }

    #[test]
    fn zero_exposure_maps_to_black() {
        let mut params = AtmosphereParams::default();
        params.sun_exposure = 0.0;
        let view = Vec3::new(0.0, 0.4, -1.0).normalize();
        let sun = Vec3::new(0.0, 0.6, -1.0).normalize();
        assert_eq!(sky_color(view, sun, &params), Vec3::ZERO);
    }

    #[test]
    fn sky_is_brighter_toward_the_sun() {
        let params = AtmosphereParams::default();
        let sun = Vec3::new(0.0, 0.35, -1.0).normalize();
        let toward = sky_radiance(Vec3::new(0.0, 0.4, -1.0).normalize(), sun, &params);
        let away = sky_radiance(Vec3::new(0.0, 0.4, 1.0).normalize(), sun, &params);
        assert!(toward.length() > away.length());
    }
}
