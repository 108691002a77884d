use bevy::prelude::*;

pub mod camera;
pub mod sky;
pub mod sun;
pub mod terrain;
pub mod ui;

/// Per-frame pipeline stages, chained in this order so each stage only
/// consumes state produced upstream: the advanced sun angles feed the
/// broadcast direction, the broadcast feeds both uniform sets, and the
/// height pass feeds the normal pass. Bevy's render schedule then draws
/// the main scene from whatever the passes wrote.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineSet {
    AdvanceSun,
    BroadcastSun,
    PushUniforms,
    HeightPass,
    NormalPass,
}
