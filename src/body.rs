//! Drag and gravity switching.

use crate::config::ControllerConfig;
use crate::state::LocomotionState;

/// Rigid body settings for a locomotion state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyConfig {
    /// Linear drag to set, or `None` to leave the current drag untouched.
    pub drag: Option<f32>,
    /// Whether engine gravity is enabled.
    pub gravity_enabled: bool,
}

/// Body settings for a state.
///
/// Wall-running turns engine gravity off (the force model applies its own
/// sustain gravity instead) and leaves drag alone, so whatever the previous
/// grounded or airborne tick set carries over into the wall run. That carry
/// over is existing behavior, kept on purpose until someone decides what a
/// wall run's drag should be.
pub fn body_config_for(state: LocomotionState, config: &ControllerConfig) -> BodyConfig {
    match state {
        LocomotionState::Grounded => BodyConfig {
            drag: Some(config.ground_drag),
            gravity_enabled: true,
        },
        LocomotionState::Airborne => BodyConfig {
            drag: Some(config.air_drag),
            gravity_enabled: true,
        },
        LocomotionState::WallRunningLeft | LocomotionState::WallRunningRight => BodyConfig {
            drag: None,
            gravity_enabled: false,
        },
    }
}
