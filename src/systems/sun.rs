//! sun.rs
//!
//! Sun trajectory model. One system advances the angle pair each frame,
//! a second converts it into the single authoritative `SunDirection`
//! that both the sky and terrain uniform updates read. Keeping the
//! conversion in one place means the two shaders can never disagree
//! about where the sun is.

use std::ops::RangeInclusive;

use bevy::prelude::*;

use crate::config::{HORIZONTAL_ANGLE_INCREMENT, SUN_DISTANCE, SUN_MARKER_RADIUS};
use crate::systems::PipelineSet;

pub const VERTICAL_ANGLE_RANGE: RangeInclusive<f32> =
    -std::f32::consts::PI..=std::f32::consts::PI;
pub const HORIZONTAL_ANGLE_RANGE: RangeInclusive<f32> =
    -std::f32::consts::FRAC_PI_2..=std::f32::consts::FRAC_PI_2;
pub const ANGULAR_STEP_RANGE: RangeInclusive<f32> = 0.0..=0.01;

pub struct SunPlugin;

impl Plugin for SunPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SunAngles>()
            .init_resource::<SunDirection>()
            .add_systems(Startup, spawn_marker)
            .add_systems(Update, advance_angles.in_set(PipelineSet::AdvanceSun))
            .add_systems(Update, broadcast_direction.in_set(PipelineSet::BroadcastSun));
    }
}

// marker tag for the white helper sphere at the sun position
#[derive(Component)]
pub struct SunMarker;

/// Angle pair driving the sun. The panel edits all fields; in manual
/// mode the automatic step is pinned to zero so direct edits are the
/// only thing moving the sun.
#[derive(Resource, Clone, Debug)]
pub struct SunAngles {
    pub vertical: f32,
    pub horizontal: f32,
    pub angular_step: f32,
    pub manual: bool,
    pub show_marker: bool,
}

impl Default for SunAngles {
    fn default() -> Self {
        Self {
            vertical: -0.03,
            horizontal: -std::f32::consts::FRAC_PI_2,
            angular_step: 0.0005,
            manual: false,
            show_marker: true,
        }
    }
}

impl SunAngles {
    /// One tick of the automatic trajectory. The angles accumulate
    /// without wraparound; see DESIGN.md for why normalization is
    /// deliberately left out.
    pub fn advance(&mut self) {
        let step = self.effective_step();
        self.vertical += step;
        self.horizontal -= HORIZONTAL_ANGLE_INCREMENT * step;
    }

    pub fn effective_step(&self) -> f32 {
        if self.manual { 0.0 } else { self.angular_step }
    }

    /// `sin(horizontal) * sin(vertical)`, the y component of the unit
    /// sun vector. Feeds the terrain light intensity ramp.
    pub fn altitude(&self) -> f32 {
        self.horizontal.sin() * self.vertical.sin()
    }
}

/// The one sun vector for this frame, recomputed every tick and read by
/// every consumer. Nothing else in the pipeline does trajectory math.
#[derive(Resource, Clone, Debug, Default)]
pub struct SunDirection {
    pub position: Vec3,
    /// normalized `position`
    pub direction: Vec3,
    pub altitude: f32,
}

/// Spherical angle pair to world position. The returned vector always
/// has magnitude `distance`.
pub fn compute_sun_position(vertical: f32, horizontal: f32, distance: f32) -> Vec3 {
    Vec3::new(
        distance * horizontal.cos(),
        distance * horizontal.sin() * vertical.sin(),
        distance * horizontal.sin() * vertical.cos(),
    )
}

fn spawn_marker(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        SunMarker,
        Mesh3d(meshes.add(Sphere::new(SUN_MARKER_RADIUS).mesh().uv(16, 8))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        })),
        Transform::from_translation(Vec3::new(SUN_DISTANCE, 0.0, 0.0)),
    ));
}

fn advance_angles(mut angles: ResMut<SunAngles>) {
    angles.advance();
}

fn broadcast_direction(
    angles: Res<SunAngles>,
    mut sun: ResMut<SunDirection>,
    mut marker: Query<(&mut Transform, &mut Visibility), With<SunMarker>>,
) {
    sun.position = compute_sun_position(angles.vertical, angles.horizontal, SUN_DISTANCE);
    sun.direction = sun.position.normalize_or_zero();
    sun.altitude = angles.altitude();

    if let Ok((mut transform, mut visibility)) = marker.single_mut() {
        transform.translation = sun.position;
        *visibility = if angles.show_marker {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-3;

    #[test]
    fn sun_position_preserves_distance() {
        let distance = 400_000.0;
        for i in 0..32 {
            for j in 0..32 {
                let vertical = -std::f32::consts::PI
                    + std::f32::consts::TAU * (i as f32 / 31.0);
                let horizontal = -std::f32::consts::FRAC_PI_2
                    + std::f32::consts::PI * (j as f32 / 31.0);
                let position = compute_sun_position(vertical, horizontal, distance);
                assert!(
                    (position.length() - distance).abs() < distance * 1e-5,
                    "|{position:?}| != {distance} at v={vertical} h={horizontal}"
                );
            }
        }
    }

    #[test]
    fn manual_angles_give_expected_position() {
        // vertical straight up, horizontal zero puts the sun on +X
        let position =
            compute_sun_position(std::f32::consts::FRAC_PI_2, 0.0, 1000.0);
        assert!((position - Vec3::new(1000.0, 0.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn automatic_advance_accumulates_linearly() {
        let mut angles = SunAngles {
            vertical: 0.0,
            horizontal: 0.0,
            angular_step: 0.0005,
            manual: false,
            show_marker: false,
        };
        for _ in 0..1000 {
            angles.advance();
        }
        // 1000 * 0.0005, no clamping or wraparound
        assert!((angles.vertical - 0.5).abs() < 1e-4);
        assert!(
            (angles.horizontal - (-HORIZONTAL_ANGLE_INCREMENT * 0.5)).abs() < 1e-4
        );
    }

    #[test]
    fn manual_mode_pins_the_step_to_zero() {
        let mut angles = SunAngles {
            vertical: 0.4,
            horizontal: 0.2,
            angular_step: 0.01,
            manual: true,
            show_marker: false,
        };
        for _ in 0..100 {
            angles.advance();
        }
        assert_eq!(angles.vertical, 0.4);
        assert_eq!(angles.horizontal, 0.2);
    }

    #[test]
    fn altitude_matches_unit_vector_y() {
        let angles = SunAngles {
            vertical: 0.7,
            horizontal: 0.3,
            ..default()
        };
        let unit = compute_sun_position(0.7, 0.3, 1.0);
        assert!((angles.altitude() - unit.y).abs() < 1e-6);
    }
}
