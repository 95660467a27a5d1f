//! Locomotion state and state marker components.
//!
//! The state is decided from scratch every tick from the latest probe. There
//! is no transition table and no enter/exit hooks: everything that depends on
//! the state is re-derived from the current value alone, so flickering at
//! wall edges is expected behavior.

use bevy::prelude::*;

use crate::probe::{ProbeResult, WallSide};

/// What the body is currently doing.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocomotionState {
    Grounded,
    #[default]
    Airborne,
    WallRunningLeft,
    WallRunningRight,
}

impl LocomotionState {
    /// Whether this is one of the wall-running states.
    pub fn is_wall_running(self) -> bool {
        self.wall_side().is_some()
    }

    /// Side of the wall being run along, if wall-running.
    pub fn wall_side(self) -> Option<WallSide> {
        match self {
            LocomotionState::WallRunningLeft => Some(WallSide::Left),
            LocomotionState::WallRunningRight => Some(WallSide::Right),
            LocomotionState::Grounded | LocomotionState::Airborne => None,
        }
    }
}

/// Decide the locomotion state from a probe.
///
/// Priority order: strict ground contact, then the left wall, then the right
/// wall, then airborne. Ground contact wins over walls and the left wall wins
/// when both sides are touching.
pub fn decide_state(probe: &ProbeResult) -> LocomotionState {
    if probe.grounded {
        LocomotionState::Grounded
    } else if probe.wall_left.is_some() {
        LocomotionState::WallRunningLeft
    } else if probe.wall_right.is_some() {
        LocomotionState::WallRunningRight
    } else {
        LocomotionState::Airborne
    }
}

/// Marker component indicating the character is grounded.
///
/// Kept in sync with the controller's [`LocomotionState`] so other systems can
/// filter queries with `With<Grounded>`.
///
/// ```rust
/// use bevy::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// fn footsteps(q: Query<&Transform, With<Grounded>>) {
///     for _transform in &q {
///         // play a footstep
///     }
/// }
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne and not on a wall.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the character is wall-running.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct WallRunning {
    /// Side of the wall.
    pub side: WallSide,
    /// Normal of the wall surface.
    pub normal: Vec3,
}

impl Default for WallRunning {
    fn default() -> Self {
        Self {
            side: WallSide::Left,
            normal: Vec3::X,
        }
    }
}

impl WallRunning {
    pub fn new(side: WallSide, normal: Vec3) -> Self {
        Self { side, normal }
    }

    pub fn is_left(&self) -> bool {
        self.side == WallSide::Left
    }

    pub fn is_right(&self) -> bool {
        self.side == WallSide::Right
    }
}
