//! ui.rs
//!
//! Settings panel. The sliders are bounded by the documented parameter
//! ranges, so values reaching the pipeline are already clamped. egui is
//! immediate mode: the panel re-emits the current values every frame
//! and the pipeline re-derives uniforms from them, which makes an
//! unchanged edit a no-op by construction.

use bevy::prelude::*;
use bevy_egui::{EguiContextPass, EguiContexts, EguiPlugin, egui};

use crate::params::{
    DISPLACEMENT_SCALE_RANGE, HEIGHTMAP_SCALE_RANGE, LUMINANCE_RANGE,
    MIE_COEFFICIENT_RANGE, MIE_DIRECTION_RANGE, NORMAL_STRENGTH_RANGE,
    RAYLEIGH_RANGE, RenderParams, SUN_EXPOSURE_RANGE, TURBIDITY_RANGE,
};
use crate::systems::sun::{
    ANGULAR_STEP_RANGE, HORIZONTAL_ANGLE_RANGE, SunAngles, VERTICAL_ANGLE_RANGE,
};

pub struct SettingsPanelPlugin;

impl Plugin for SettingsPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_systems(EguiContextPass, settings_panel);
    }
}

fn settings_panel(
    mut contexts: EguiContexts,
    mut params: ResMut<RenderParams>,
    mut sun: ResMut<SunAngles>,
) {
    egui::Window::new("settings")
        .default_width(300.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.collapsing("atmosphere", |ui| {
                let a = &mut params.atmosphere;
                ui.add(egui::Slider::new(&mut a.turbidity, TURBIDITY_RANGE).text("turbidity"));
                ui.add(egui::Slider::new(&mut a.rayleigh, RAYLEIGH_RANGE).text("rayleigh"));
                ui.add(
                    egui::Slider::new(&mut a.mie_coefficient, MIE_COEFFICIENT_RANGE)
                        .text("mie coefficient"),
                );
                ui.add(
                    egui::Slider::new(&mut a.mie_direction, MIE_DIRECTION_RANGE)
                        .text("mie direction"),
                );
                ui.add(egui::Slider::new(&mut a.luminance, LUMINANCE_RANGE).text("luminance"));
                ui.add(
                    egui::Slider::new(&mut a.sun_exposure, SUN_EXPOSURE_RANGE)
                        .text("sun exposure"),
                );
            });

            ui.collapsing("sun", |ui| {
                ui.checkbox(&mut sun.manual, "manual control");
                // live fields: these show the automatic drift while not manual
                ui.add(
                    egui::Slider::new(&mut sun.vertical, VERTICAL_ANGLE_RANGE)
                        .text("vertical angle"),
                );
                ui.add(
                    egui::Slider::new(&mut sun.horizontal, HORIZONTAL_ANGLE_RANGE)
                        .text("horizontal angle"),
                );
                ui.add(
                    egui::Slider::new(&mut sun.angular_step, ANGULAR_STEP_RANGE)
                        .text("angular step"),
                );
                ui.checkbox(&mut sun.show_marker, "show sun marker");
            });

            ui.collapsing("terrain", |ui| {
                let t = &mut params.terrain;
                ui.checkbox(&mut t.visible, "visible");
                ui.checkbox(&mut t.animate, "animate height field");
                ui.add(
                    egui::Slider::new(&mut t.heightmap_scale, HEIGHTMAP_SCALE_RANGE)
                        .text("heightmap scale"),
                );
                ui.add(
                    egui::Slider::new(&mut t.normal_strength, NORMAL_STRENGTH_RANGE)
                        .text("normal strength"),
                );
                ui.add(
                    egui::Slider::new(&mut t.displacement_scale, DISPLACEMENT_SCALE_RANGE)
                        .text("displacement scale"),
                );
            });
        });
}
