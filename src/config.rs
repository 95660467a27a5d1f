//! Controller configuration components.
//!
//! This module defines the tuning constants for a first-person controller:
//! movement speeds, jump vectors, wall-run behavior, camera feedback, drag,
//! probe geometry and key bindings.

use bevy::prelude::*;

use crate::error::ConfigError;

/// Configuration parameters for the first-person controller.
///
/// Angles (fov, tilt) are in degrees. Distances are in world units.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ControllerConfig {
    // === Movement Settings ===
    /// Base horizontal speed.
    pub player_speed: f32,

    /// Horizontal speed while the run key is held.
    pub player_speed_run: f32,

    /// Speed multiplier while grounded.
    pub ground_speed_multiplier: f32,

    /// Speed multiplier while airborne or wall-running.
    ///
    /// Smaller than the ground multiplier so air strafing cannot dominate.
    pub air_speed_multiplier: f32,

    // === Jump Settings ===
    /// Impulse applied when jumping from the ground.
    pub jump_impulse: Vec3,

    /// Default wall-run jump vector, scaled componentwise by the jump direction.
    pub wall_run_jump_vector: Vec3,

    /// Default wall-run jump multiplier.
    pub wall_run_jump_multiplier: f32,

    // === Camera Settings ===
    /// Look sensitivity (degrees per look axis unit).
    pub sensitivity: f32,

    /// Field of view outside of wall runs.
    pub static_fov: f32,

    /// Field of view while wall-running.
    pub wall_run_fov: f32,

    /// Rate at which the fov approaches its target (per second).
    pub fov_change_rate: f32,

    /// Camera roll outside of wall runs.
    pub static_tilt: f32,

    /// Camera roll magnitude while wall-running.
    pub wall_run_tilt: f32,

    /// Rate at which the roll approaches its target (per second).
    pub tilt_change_rate: f32,

    // === Physics Settings ===
    /// Linear drag while grounded.
    pub ground_drag: f32,

    /// Linear drag while airborne.
    pub air_drag: f32,

    /// Default downward force applied every tick while wall-running.
    pub wall_run_gravity: f32,

    // === Probe Settings ===
    /// Half height of the body, used when the backend cannot measure the collider.
    pub body_half_height: f32,

    /// Extra reach of the strict ground check below the body.
    pub ground_check_margin: f32,

    /// Extra reach of the slope check below the body.
    pub slope_check_margin: f32,

    /// Range of the sideways wall checks.
    pub wall_check_distance: f32,

    /// Angle (radians) under which a ground normal still counts as flat.
    ///
    /// Zero keeps the exact comparison against world up, so any tilted normal
    /// counts as a slope.
    pub slope_normal_epsilon: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Movement settings
            player_speed: 6.0,
            player_speed_run: 12.0,
            ground_speed_multiplier: 10.0,
            air_speed_multiplier: 2.0,

            // Jump settings
            jump_impulse: Vec3::new(0.0, 10.0, 0.0),
            wall_run_jump_vector: Vec3::splat(10.0),
            wall_run_jump_multiplier: 50.0,

            // Camera settings
            sensitivity: 8.0,
            static_fov: 70.0,
            wall_run_fov: 80.0,
            fov_change_rate: 5.0,
            static_tilt: 0.0,
            wall_run_tilt: 10.0,
            tilt_change_rate: 10.0,

            // Physics settings
            ground_drag: 6.0,
            air_drag: 1.0,
            wall_run_gravity: 1.0,

            // Probe settings
            body_half_height: 1.0,
            ground_check_margin: 0.2,
            slope_check_margin: 0.5,
            wall_check_distance: 1.0,
            slope_normal_epsilon: 0.0,
        }
    }
}

impl ControllerConfig {
    /// Length of the strict ground check for a body of the given half height.
    #[inline]
    pub fn ground_check_distance(&self, half_height: f32) -> f32 {
        half_height + self.ground_check_margin
    }

    /// Length of the slope check for a body of the given half height.
    #[inline]
    pub fn slope_check_distance(&self, half_height: f32) -> f32 {
        half_height + self.slope_check_margin
    }

    /// Create a config tuned for a responsive player.
    pub fn player() -> Self {
        Self {
            player_speed: 7.0,
            player_speed_run: 13.0,
            sensitivity: 6.0,
            ..default()
        }
    }

    /// Create a config with long, slow wall runs and more air control.
    pub fn floaty() -> Self {
        Self {
            air_speed_multiplier: 4.0,
            wall_run_gravity: 0.25,
            air_drag: 0.5,
            ..default()
        }
    }

    /// Builder: set walk and run speeds.
    pub fn with_speeds(mut self, walk: f32, run: f32) -> Self {
        self.player_speed = walk;
        self.player_speed_run = run;
        self
    }

    /// Builder: set ground and air speed multipliers.
    pub fn with_multipliers(mut self, ground: f32, air: f32) -> Self {
        self.ground_speed_multiplier = ground;
        self.air_speed_multiplier = air;
        self
    }

    /// Builder: set the ground jump impulse.
    pub fn with_jump_impulse(mut self, impulse: Vec3) -> Self {
        self.jump_impulse = impulse;
        self
    }

    /// Builder: set the default wall-run jump vector and multiplier.
    pub fn with_wall_run_jump(mut self, vector: Vec3, multiplier: f32) -> Self {
        self.wall_run_jump_vector = vector;
        self.wall_run_jump_multiplier = multiplier;
        self
    }

    /// Builder: set the default wall-run sustain gravity.
    pub fn with_wall_run_gravity(mut self, gravity: f32) -> Self {
        self.wall_run_gravity = gravity;
        self
    }

    /// Builder: set look sensitivity.
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Builder: set static and wall-run field of view.
    pub fn with_fov(mut self, static_fov: f32, wall_run_fov: f32) -> Self {
        self.static_fov = static_fov;
        self.wall_run_fov = wall_run_fov;
        self
    }

    /// Builder: set static and wall-run camera roll.
    pub fn with_tilt(mut self, static_tilt: f32, wall_run_tilt: f32) -> Self {
        self.static_tilt = static_tilt;
        self.wall_run_tilt = wall_run_tilt;
        self
    }

    /// Builder: set the fov and tilt smoothing rates.
    pub fn with_change_rates(mut self, fov: f32, tilt: f32) -> Self {
        self.fov_change_rate = fov;
        self.tilt_change_rate = tilt;
        self
    }

    /// Builder: set ground and air drag.
    pub fn with_drag(mut self, ground: f32, air: f32) -> Self {
        self.ground_drag = ground;
        self.air_drag = air;
        self
    }

    /// Builder: set the fallback body half height.
    pub fn with_body_half_height(mut self, half_height: f32) -> Self {
        self.body_half_height = half_height;
        self
    }

    /// Builder: treat ground normals within `angle` radians of up as flat.
    pub fn with_slope_epsilon(mut self, angle: f32) -> Self {
        self.slope_normal_epsilon = angle;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("player_speed", self.player_speed),
            ("player_speed_run", self.player_speed_run),
            ("ground_speed_multiplier", self.ground_speed_multiplier),
            ("air_speed_multiplier", self.air_speed_multiplier),
            ("wall_run_jump_multiplier", self.wall_run_jump_multiplier),
            ("sensitivity", self.sensitivity),
            ("fov_change_rate", self.fov_change_rate),
            ("tilt_change_rate", self.tilt_change_rate),
            ("ground_drag", self.ground_drag),
            ("air_drag", self.air_drag),
            ("wall_run_gravity", self.wall_run_gravity),
            ("ground_check_margin", self.ground_check_margin),
            ("slope_check_margin", self.slope_check_margin),
            ("slope_normal_epsilon", self.slope_normal_epsilon),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let positive = [
            ("body_half_height", self.body_half_height),
            ("wall_check_distance", self.wall_check_distance),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        for (field, value) in [
            ("static_fov", self.static_fov),
            ("wall_run_fov", self.wall_run_fov),
        ] {
            if !(value > 0.0 && value < 180.0) {
                return Err(ConfigError::FovOutOfRange { field, value });
            }
        }

        Ok(())
    }
}

/// Key bindings read by [`crate::input::DesktopInputPlugin`].
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct ControllerKeys {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    /// Jump (and wall-run jump).
    pub jump: KeyCode,
    /// Hold to run.
    pub run: KeyCode,
}

impl Default for ControllerKeys {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            jump: KeyCode::Space,
            run: KeyCode::ShiftLeft,
        }
    }
}
