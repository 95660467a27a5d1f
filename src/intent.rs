//! Per-tick input snapshot.
//!
//! The snapshot is the whole input contract of the controller. Anything can
//! fill it (keyboard and mouse through [`crate::input::DesktopInputPlugin`],
//! a gamepad, an AI, a replay) from a system in
//! [`crate::CharacterControllerSet::Input`].

use bevy::prelude::*;

/// Input sampled for the current tick.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// let mut input = InputSnapshot::default();
/// input.set_move(Vec2::new(1.0, 0.0)); // straight ahead
/// input.set_run(true);
/// assert!(input.is_moving());
///
/// input.set_move(Vec2::new(3.0, -2.0));
/// assert_eq!(input.move_axes, Vec2::new(1.0, -1.0));
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct InputSnapshot {
    /// Movement axes, each in `[-1, 1]`: `x` is forward, `y` is strafe right.
    pub move_axes: Vec2,
    /// Look delta in axis units: `x` turns right, `y` looks up.
    pub look_delta: Vec2,
    /// Jump was pressed this tick (press edge, not held state).
    pub jump_pressed: bool,
    /// Run key is held.
    pub run_held: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the movement axes, clamping each to `[-1, 1]`.
    pub fn set_move(&mut self, axes: Vec2) {
        self.move_axes = axes.clamp(Vec2::NEG_ONE, Vec2::ONE);
    }

    /// Set the look delta.
    pub fn set_look(&mut self, delta: Vec2) {
        self.look_delta = delta;
    }

    /// Set whether jump was pressed this tick.
    pub fn set_jump_pressed(&mut self, pressed: bool) {
        self.jump_pressed = pressed;
    }

    /// Set whether run is held.
    pub fn set_run(&mut self, held: bool) {
        self.run_held = held;
    }

    /// Check if there is active movement input.
    pub fn is_moving(&self) -> bool {
        self.move_axes.length_squared() > 1e-6
    }

    /// Reset everything to neutral.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
