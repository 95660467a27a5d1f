//! Core character controller component.

use bevy::prelude::*;

use crate::camera::CameraFeedback;
use crate::config::{ControllerConfig, ControllerKeys};
use crate::intent::InputSnapshot;
use crate::probe::{ProbeResult, WallContact};
use crate::state::LocomotionState;

/// Core character controller component.
///
/// This is the **central hub** for the controller's per-tick state: the latest
/// probe, the state decided from it, the latched jump request, and the force
/// accumulators the backend uses to keep controller forces separate from any
/// other forces on the body.
///
/// Spawning it pulls in [`ControllerConfig`], [`ControllerKeys`],
/// [`InputSnapshot`] and [`CameraFeedback`] with default values when they are
/// not provided explicitly.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// let controller = CharacterController::new();
/// assert_eq!(controller.state, LocomotionState::Airborne);
/// assert!(!controller.is_grounded());
/// ```
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(ControllerConfig, ControllerKeys, InputSnapshot, CameraFeedback)]
pub struct CharacterController {
    /// Result of the latest environment probe.
    pub probe: ProbeResult,

    /// State decided from the latest probe.
    pub state: LocomotionState,

    /// A jump press waiting for the next fixed tick.
    ///
    /// Latched from [`InputSnapshot::jump_pressed`] and consumed by the first
    /// fixed tick that sees it, whether or not a jump was possible then.
    pub jump_requested: bool,

    /// Half height used by the last probe (measured collider or config fallback).
    pub body_half_height: f32,

    // === Force Accumulation ===
    /// Forces accumulated during the current fixed tick.
    pub(crate) accumulated_force: Vec3,

    /// Forces written to the physics engine last fixed tick.
    pub(crate) applied_force: Vec3,
}

impl CharacterController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if grounded (strict ground check).
    pub fn is_grounded(&self) -> bool {
        self.state == LocomotionState::Grounded
    }

    /// Check if wall-running on either side.
    pub fn is_wall_running(&self) -> bool {
        self.state.is_wall_running()
    }

    /// The wall contact matching the current wall-running state.
    pub fn active_wall(&self) -> Option<&WallContact> {
        self.state.wall_side().and_then(|side| self.probe.wall(side))
    }

    /// Take the latched jump request, clearing it.
    pub fn take_jump_request(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    /// Add a force (in engine force units) to this tick's accumulator.
    pub fn add_force(&mut self, force: Vec3) {
        self.accumulated_force += force;
    }

    /// Begin a new fixed tick.
    ///
    /// Returns the force written to the engine last tick so the backend can
    /// remove it, and clears the accumulator.
    pub(crate) fn prepare_new_frame(&mut self) -> Vec3 {
        self.accumulated_force = Vec3::ZERO;
        std::mem::take(&mut self.applied_force)
    }

    /// Finish the fixed tick.
    ///
    /// Returns the accumulated force for the backend to write and remembers it
    /// for the next [`Self::prepare_new_frame`].
    pub(crate) fn finalize_frame(&mut self) -> Vec3 {
        self.applied_force = self.accumulated_force;
        self.accumulated_force
    }
}
