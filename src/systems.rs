//! Core controller systems.
//!
//! These systems wire the probe, state machine, body config, camera feedback
//! and force model into Bevy's schedules. Systems that touch the rigid body
//! are generic over the physics backend.

use bevy::prelude::*;

use crate::backend::CharacterPhysicsBackend;
use crate::body::body_config_for;
use crate::camera::{CameraFeedback, FirstPersonCamera};
use crate::config::ControllerConfig;
use crate::controller::CharacterController;
use crate::error::ControllerError;
use crate::forces::{compute_forces, LocomotionForces};
use crate::intent::InputSnapshot;
use crate::state::{decide_state, Airborne, Grounded, LocomotionState, WallRunning};

/// Check newly added controllers before they are driven.
///
/// A controller without a rigid body, or with an unusable configuration,
/// cannot work. The error is returned to Bevy's error handler, which panics
/// by default.
pub fn validate_controllers<B: CharacterPhysicsBackend>(
    world: &World,
    q_added: Query<(Entity, &ControllerConfig), Added<CharacterController>>,
) -> Result<(), BevyError> {
    for (entity, config) in &q_added {
        if !B::has_rigid_body(world, entity) {
            return Err(ControllerError::MissingRigidBody(entity).into());
        }
        config
            .validate()
            .map_err(|source| ControllerError::InvalidConfig { entity, source })?;
        info!("character controller {entity} ready");
    }
    Ok(())
}

/// Latch jump presses until the next fixed tick.
pub fn latch_jump_requests(mut q: Query<(&InputSnapshot, &mut CharacterController)>) {
    for (input, mut controller) in &mut q {
        if input.jump_pressed {
            controller.jump_requested = true;
        }
    }
}

/// Decide every controller's state from its latest probe.
pub fn decide_locomotion_state(mut q: Query<(Entity, &mut CharacterController)>) {
    for (entity, mut controller) in &mut q {
        let next = decide_state(&controller.probe);
        if next != controller.state {
            debug!(?entity, from = ?controller.state, to = ?next, "locomotion state changed");
            controller.state = next;
        }
    }
}

/// Sync state marker components with each controller's state.
pub fn sync_state_markers(
    mut commands: Commands,
    q_controllers: Query<(
        Entity,
        &CharacterController,
        Has<Grounded>,
        Has<Airborne>,
        Option<&WallRunning>,
    )>,
) {
    for (entity, controller, has_grounded, has_airborne, wall_running) in &q_controllers {
        let mut entity_commands = commands.entity(entity);

        match controller.state {
            LocomotionState::Grounded => {
                if !has_grounded {
                    entity_commands.insert(Grounded);
                }
                if has_airborne {
                    entity_commands.remove::<Airborne>();
                }
            }
            LocomotionState::Airborne => {
                if !has_airborne {
                    entity_commands.insert(Airborne);
                }
                if has_grounded {
                    entity_commands.remove::<Grounded>();
                }
            }
            LocomotionState::WallRunningLeft | LocomotionState::WallRunningRight => {
                if has_grounded {
                    entity_commands.remove::<Grounded>();
                }
                if has_airborne {
                    entity_commands.remove::<Airborne>();
                }
            }
        }

        let marker = controller
            .state
            .wall_side()
            .zip(controller.active_wall())
            .map(|(side, wall)| WallRunning::new(side, wall.normal()));
        match (marker, wall_running) {
            (Some(marker), Some(current)) if marker == *current => {}
            (Some(marker), _) => {
                entity_commands.insert(marker);
            }
            (None, Some(_)) => {
                entity_commands.remove::<WallRunning>();
            }
            (None, None) => {}
        }
    }
}

/// Switch drag and gravity on the rigid body for the current state.
pub fn apply_body_config<B: CharacterPhysicsBackend>(world: &mut World) {
    let bodies: Vec<_> = world
        .query::<(Entity, &CharacterController, &ControllerConfig)>()
        .iter(world)
        .map(|(entity, controller, config)| (entity, body_config_for(controller.state, config)))
        .collect();

    for (entity, body) in bodies {
        if let Some(drag) = body.drag {
            B::set_drag(world, entity, drag);
        }
        B::set_gravity_enabled(world, entity, body.gravity_enabled);
    }
}

/// Accumulate look input and smooth tilt and fov toward the state's targets.
pub fn update_camera_feedback(
    time: Res<Time>,
    mut q: Query<(
        &CharacterController,
        &ControllerConfig,
        &InputSnapshot,
        &mut CameraFeedback,
    )>,
) {
    let dt = time.delta_secs();
    for (controller, config, input, mut feedback) in &mut q {
        feedback.update(input.look_delta, controller.state, config, dt);
    }
}

/// Write camera feedback to the body and its first-person cameras.
pub fn present_camera_feedback(
    mut q_bodies: Query<(&CameraFeedback, &mut Transform), With<CharacterController>>,
    mut q_cameras: Query<
        (
            &FirstPersonCamera,
            Option<&ChildOf>,
            &mut Transform,
            Option<&mut Projection>,
        ),
        Without<CharacterController>,
    >,
) {
    for (feedback, mut transform) in &mut q_bodies {
        transform.rotation = feedback.frame().body_rotation();
    }

    for (link, child_of, mut transform, projection) in &mut q_cameras {
        let Ok((feedback, _)) = q_bodies.get(link.controller) else {
            warn_once!(
                "first-person camera points at {}, which is not a character controller",
                link.controller
            );
            continue;
        };
        let frame = feedback.frame();

        let attached = child_of.is_some_and(|c| c.parent() == link.controller);
        transform.rotation = if attached {
            frame.camera_local_rotation()
        } else {
            frame.camera_rotation()
        };

        if let Some(mut projection) = projection {
            if let Projection::Perspective(ref mut perspective) = *projection {
                perspective.fov = frame.fov_radians();
            }
        }
    }
}

/// Compute and apply this fixed tick's locomotion forces.
///
/// Consumes each controller's latched jump request.
pub fn apply_locomotion_forces<B: CharacterPhysicsBackend>(world: &mut World) {
    let forces: Vec<(Entity, LocomotionForces)> = world
        .query::<(
            Entity,
            &mut CharacterController,
            &ControllerConfig,
            &InputSnapshot,
            Option<&Transform>,
        )>()
        .iter_mut(world)
        .map(|(entity, mut controller, config, input, transform)| {
            let jump_requested = controller.take_jump_request();
            let orientation = transform.map_or(Quat::IDENTITY, |t| t.rotation);
            let forces = compute_forces(
                controller.state,
                &controller.probe,
                input,
                jump_requested,
                orientation,
                config,
            );
            (entity, forces)
        })
        .collect();

    for (entity, forces) in forces {
        if forces.jump.is_some() || forces.wall_jump.is_some() {
            debug!(?entity, jump = ?forces.jump, wall_jump = ?forces.wall_jump, "jump applied");
        }
        for (force, mode) in forces.commands() {
            B::apply_force(world, entity, force, mode);
        }
    }
}

