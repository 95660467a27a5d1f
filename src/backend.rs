//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to drive a first-person controller. The core never talks to a physics
//! engine directly: it asks the backend to apply forces and toggle body
//! settings, and the backend's sensor system feeds raycast results into
//! [`crate::probe::probe`].

use bevy::prelude::*;

/// How a force vector is integrated by the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ForceMode {
    /// Continuous force that ignores the body's mass.
    ///
    /// Produces the same acceleration regardless of mass.
    Acceleration,
    /// Continuous force, divided by the body's mass during integration.
    Force,
    /// Instantaneous one-shot change of momentum, independent of tick length.
    Impulse,
}

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the controller.
/// See `Rapier3dBackend` (feature `rapier3d`) for the bundled implementation.
///
/// Raycasting is not part of the trait. Engines such as Rapier only expose
/// their query pipeline as a system parameter, so each backend registers its
/// own system in [`crate::CharacterControllerSet::Sensors`] which performs the
/// casts and stores a [`crate::probe::ProbeResult`] on the controller.
pub trait CharacterPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Whether the entity carries a dynamic rigid body this backend can drive.
    fn has_rigid_body(world: &World, entity: Entity) -> bool;

    /// Apply a force to an entity using the given integration mode.
    fn apply_force(world: &mut World, entity: Entity, force: Vec3, mode: ForceMode);

    /// Set the linear drag coefficient of the body.
    fn set_drag(world: &mut World, entity: Entity, drag: f32);

    /// Enable or disable engine gravity for the body.
    fn set_gravity_enabled(world: &mut World, entity: Entity, enabled: bool);

    /// Get the mass of an entity.
    ///
    /// Used to turn acceleration-mode forces into plain forces.
    fn get_mass(_world: &World, _entity: Entity) -> f32 {
        1.0
    }
}

