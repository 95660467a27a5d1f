//! Per-surface wall-run tuning.

use bevy::prelude::*;

use crate::config::ControllerConfig;

/// Wall-run tuning attached to a wall's collider entity.
///
/// When the environment probe hits a wall carrying this component, the
/// override is stored with the wall contact and replaces the global wall-run
/// defaults from [`ControllerConfig`] for jumps off that wall and for the
/// sustain gravity while running along it.
///
/// ```rust
/// use bevy::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// // A slippery wall: short runs, weak jumps.
/// let slippery = WallSurfaceOverride::new(Vec3::splat(6.0), 40.0, 4.0);
/// assert_eq!(slippery.run_gravity, 4.0);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct WallSurfaceOverride {
    /// Replaces [`ControllerConfig::wall_run_jump_vector`].
    pub jump_impulse_vector: Vec3,
    /// Replaces [`ControllerConfig::wall_run_jump_multiplier`].
    pub jump_impulse_multiplier: f32,
    /// Replaces [`ControllerConfig::wall_run_gravity`].
    pub run_gravity: f32,
}

impl WallSurfaceOverride {
    pub fn new(jump_impulse_vector: Vec3, jump_impulse_multiplier: f32, run_gravity: f32) -> Self {
        Self {
            jump_impulse_vector,
            jump_impulse_multiplier,
            run_gravity,
        }
    }

    /// An override carrying the same values as the config's global defaults.
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            jump_impulse_vector: config.wall_run_jump_vector,
            jump_impulse_multiplier: config.wall_run_jump_multiplier,
            run_gravity: config.wall_run_gravity,
        }
    }
}
