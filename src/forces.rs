//! Force model.
//!
//! Computes everything the controller pushes into the rigid body during one
//! fixed tick. The computation is pure; [`crate::systems::apply_locomotion_forces`]
//! hands the result to the physics backend.

use bevy::prelude::*;

use crate::backend::ForceMode;
use crate::config::ControllerConfig;
use crate::intent::InputSnapshot;
use crate::probe::ProbeResult;
use crate::state::LocomotionState;

/// Whether the wall-run jump direction (`up + wall_normal`) is normalized.
///
/// It is not: the jump force grows with how squarely the wall was hit.
pub const WALL_JUMP_DIRECTION_NORMALIZED: bool = false;

/// Forces for one fixed tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionForces {
    /// Horizontal thrust, applied as [`ForceMode::Acceleration`].
    pub movement: Vec3,
    /// Ground jump, applied as [`ForceMode::Impulse`].
    pub jump: Option<Vec3>,
    /// Wall-run jump, applied as [`ForceMode::Force`] for this tick only.
    ///
    /// A continuous force for a single tick acts as a strong nudge rather
    /// than an instantaneous velocity change.
    pub wall_jump: Option<Vec3>,
    /// Wall-run sustain gravity, applied as [`ForceMode::Force`].
    pub wall_run_gravity: Option<Vec3>,
}

impl LocomotionForces {
    /// Every non-empty force with its integration mode, in application order.
    pub fn commands(&self) -> impl Iterator<Item = (Vec3, ForceMode)> {
        let movement =
            (self.movement != Vec3::ZERO).then_some((self.movement, ForceMode::Acceleration));
        [
            movement,
            self.jump.map(|f| (f, ForceMode::Impulse)),
            self.wall_jump.map(|f| (f, ForceMode::Force)),
            self.wall_run_gravity.map(|f| (f, ForceMode::Force)),
        ]
        .into_iter()
        .flatten()
    }
}

/// Horizontal thrust for the given input.
///
/// The direction follows the body's facing, is projected onto the slope plane
/// when a slope was detected, and is normalized (zero input stays zero).
pub fn movement_force(
    state: LocomotionState,
    probe: &ProbeResult,
    input: &InputSnapshot,
    orientation: Quat,
    config: &ControllerConfig,
) -> Vec3 {
    let forward = orientation * Vec3::NEG_Z;
    let right = orientation * Vec3::X;
    let mut direction = forward * input.move_axes.x + right * input.move_axes.y;

    if let Some(normal) = probe.slope_normal {
        direction = direction.reject_from_normalized(normal.normalize_or_zero());
    }

    let multiplier = if state == LocomotionState::Grounded {
        config.ground_speed_multiplier
    } else {
        config.air_speed_multiplier
    };
    let speed = if input.run_held {
        config.player_speed_run
    } else {
        config.player_speed
    };

    direction.normalize_or_zero() * speed * multiplier
}

/// Wall-run jump force off a wall with the given normal.
///
/// `force = vector * (dir.x, 1, dir.z) * multiplier` with `dir = up + normal`.
pub fn wall_jump_force(up: Vec3, wall_normal: Vec3, vector: Vec3, multiplier: f32) -> Vec3 {
    let mut direction = up + wall_normal;
    if WALL_JUMP_DIRECTION_NORMALIZED {
        direction = direction.normalize_or_zero();
    }
    vector * Vec3::new(direction.x, 1.0, direction.z) * multiplier
}

/// Compute this tick's forces.
///
/// `jump_requested` is the latched press edge. It only has an effect when the
/// body is grounded (ground jump) or wall-running (wall jump) right now;
/// otherwise it is dropped.
pub fn compute_forces(
    state: LocomotionState,
    probe: &ProbeResult,
    input: &InputSnapshot,
    jump_requested: bool,
    orientation: Quat,
    config: &ControllerConfig,
) -> LocomotionForces {
    let mut forces = LocomotionForces {
        movement: movement_force(state, probe, input, orientation, config),
        ..default()
    };

    match state.wall_side() {
        None => {
            if jump_requested && state == LocomotionState::Grounded {
                forces.jump = Some(config.jump_impulse);
            }
        }
        Some(side) => {
            let wall = probe.wall(side);
            let surface = wall.and_then(|w| w.surface);

            let gravity = surface.map_or(config.wall_run_gravity, |s| s.run_gravity);
            forces.wall_run_gravity = Some(Vec3::NEG_Y * gravity);

            if jump_requested {
                if let Some(wall) = wall {
                    let (vector, multiplier) = surface.map_or(
                        (config.wall_run_jump_vector, config.wall_run_jump_multiplier),
                        |s| (s.jump_impulse_vector, s.jump_impulse_multiplier),
                    );
                    let up = orientation * Vec3::Y;
                    forces.wall_jump = Some(wall_jump_force(up, wall.normal(), vector, multiplier));
                }
            }
        }
    }

    forces
}
