//! Gameplay tuning for a session. Time is measured in seconds, distances in scene units.

use std::ops::RangeInclusive;

/// Nominal frame delta used for every rate-based calculation.
pub const FIXED_DELTA: f32 = 1.0 / 60.0;
/// Tolerance for comparing accumulated timers against their intervals.
pub const TIME_EPSILON: f32 = 1e-4;

pub const SCROLL_SPEED: f32 = 160.0;

pub const FLAP_IMPULSE: f32 = 300.0;
pub const FLAP_ANGULAR_IMPULSE: f32 = 1.0;
pub const MAX_VERTICAL_VELOCITY: f32 = 400.0;

/// Free-fall time after which the bird starts tilting nose-down.
pub const FALL_TILT_DELAY: f32 = 0.1;
/// Angular impulse per unit of time while falling, scaled by [`FIXED_DELTA`] each frame.
pub const FALL_ANGULAR_IMPULSE: f32 = -20000.0;

pub const MIN_ROTATION_DEGREES: f32 = -20.0;
pub const MAX_ROTATION_DEGREES: f32 = 30.0;
pub const MAX_ANGULAR_VELOCITY: f32 = 2.0;

pub const SPAWN_INTERVAL: f32 = 1.5;
pub const SPAWN_X: f32 = 352.0;
pub const SPAWN_Y: RangeInclusive<f32> = 234.0..=382.0;

pub const DEATH_ROTATION_DEGREES: f32 = -80.0;
