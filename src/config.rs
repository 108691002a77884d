// World measurements
// the sky dome has to enclose everything, the sun marker sits just inside it
pub const SKY_DOME_RADIUS: f32 = 450_000.0;
pub const SUN_DISTANCE: f32 = 400_000.0;
pub const SUN_MARKER_RADIUS: f32 = 20_000.0;

// Terrain patch
pub const TERRAIN_SIZE: f32 = 8_000.0;
pub const TERRAIN_GRID_RESOLUTION: u32 = 256;

// Off-screen map targets (height pass + derived normal pass)
pub const MAP_RESOLUTION: usize = 512;
pub const DIFFUSE_TEXTURE_RESOLUTION: usize = 256;
pub const NOISE_SEED: u32 = 1337;

// Sun trajectory
// the horizontal angle drifts against the vertical sweep at this ratio
pub const HORIZONTAL_ANGLE_INCREMENT: f32 = 0.25;

// Terrain lighting bounds, interpolated by sun altitude
pub const INTENSITY_LOW: f32 = 0.15;
pub const INTENSITY_HIGH: f32 = 1.0;

// Height field animation, scales the frame delta into noise time
pub const ANIMATION_RATE: f32 = 0.25;

// Camera
pub const CAMERA_NEAR: f32 = 100.0;
pub const CAMERA_FAR: f32 = 2_000_000.0;
pub const CAMERA_START_RADIUS: f32 = 12_000.0;
