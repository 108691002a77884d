use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct OrbitCamPlugin;

impl Plugin for OrbitCamPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update);
    }
}

// camera component
#[derive(Component, Debug)]
pub struct OrbitCamera {
    pub radius: f32,
    pub sensitivity: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,

    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            radius: 10_000.0,
            sensitivity: 0.5,
            yaw: 0.0,
            pitch: 0.15,
            target: Vec3::ZERO,

            min_radius: 500.0,
            max_radius: 120_000.0,
        }
    }
}

impl OrbitCamera {
    pub fn new(radius: f32, sensitivity: f32) -> Self {
        Self {
            radius,
            sensitivity,
            ..default()
        }
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    // spherical to cartesian around the target
    pub fn calculate_position(&self) -> Vec3 {
        let x = self.radius * self.pitch.cos() * self.yaw.cos();
        let y = self.radius * self.pitch.sin();
        let z = self.radius * self.pitch.cos() * self.yaw.sin();

        self.target + Vec3::new(x, y, z)
    }
}

fn update(
    mut camera_query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    let mut drag = Vec2::ZERO;
    if mouse_buttons.pressed(MouseButton::Left) {
        for motion in mouse_motion.read() {
            drag += motion.delta;
        }
    } else {
        mouse_motion.clear();
    }

    let mut zoom = 0.0;
    for scroll in scroll_events.read() {
        zoom += scroll.y;
    }

    for (mut transform, mut camera) in camera_query.iter_mut() {
        camera.yaw += drag.x * camera.sensitivity * 0.01;
        camera.pitch += drag.y * camera.sensitivity * 0.01;
        // keep the camera off the poles so look_at stays stable
        camera.pitch = camera.pitch.clamp(-1.5, 1.5);

        camera.radius -= zoom * camera.radius * 0.1;
        camera.radius = camera.radius.clamp(camera.min_radius, camera.max_radius);

        transform.translation = camera.calculate_position();
        transform.look_at(camera.target, Vec3::Y);
    }
}
