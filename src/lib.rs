//! # `fps_wallrun_controller`
//!
//! A first-person rigidbody character controller with wall-running and a
//! physics backend abstraction.
//!
//! This crate provides a responsive, tuneable controller that:
//! - Probes the environment with raycasts for ground, slopes and walls
//! - Decides between grounded, airborne and wall-running (left/right) states
//! - Drives a dynamic rigid body with forces and impulses, never by setting velocity
//! - Switches drag and gravity per state
//! - Feeds mouse look, wall-run roll and a fov kick to a first-person camera
//! - Abstracts the physics backend (Rapier3D included)
//!
//! ## Architecture
//!
//! Every render tick the probe runs, the state machine decides the state from
//! it, the body's drag and gravity follow the state, and the camera feedback is
//! smoothed and presented. Every fixed tick the force model reads the latest
//! state and input and hands forces to the backend. Ordering is enforced with
//! [`CharacterControllerSet`].
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use fps_wallrun_controller::prelude::*;
//!
//! // Controller components for a first-person character.
//! let controller = CharacterController::new();
//! let config = ControllerConfig::player().with_wall_run_gravity(0.5);
//! let input = InputSnapshot::default();
//!
//! // These are spawned together with the backend's physics components.
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod body;
pub mod camera;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod forces;
pub mod input;
pub mod intent;
pub mod probe;
pub mod state;
pub mod surface;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{CharacterPhysicsBackend, ForceMode};
    pub use crate::camera::{CameraFeedback, FirstPersonCamera, PresentationFrame};
    pub use crate::collision::CollisionData;
    pub use crate::config::{ControllerConfig, ControllerKeys};
    pub use crate::controller::CharacterController;
    pub use crate::error::{ConfigError, ControllerError};
    pub use crate::input::{CursorLock, DesktopInputPlugin};
    pub use crate::intent::InputSnapshot;
    pub use crate::probe::{ProbeResult, WallContact, WallSide};
    pub use crate::state::{Airborne, Grounded, LocomotionState, WallRunning};
    pub use crate::surface::WallSurfaceOverride;
    pub use crate::{CharacterControllerSet, FirstPersonControllerPlugin};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::{Rapier3dBackend, Rapier3dCharacterBundle};
}

/// System sets for the controller, in execution order.
///
/// In `Update`: `Validation`, `Input`, `Sensors`, `StateDecision`,
/// `BodyConfig`, `CameraFeedback`.
///
/// In `FixedUpdate`: `Preparation`, `Forces`, `FinalApplication`.
///
/// Input adapters (keyboard, gamepad, AI) write [`intent::InputSnapshot`] in
/// `Input`. Backends run their raycasts in `Sensors` and their force isolation
/// in `Preparation` and `FinalApplication`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CharacterControllerSet {
    /// Checks newly added controllers.
    Validation,
    /// Fills input snapshots.
    Input,
    /// Probes the environment.
    Sensors,
    /// Latches jump presses and decides the locomotion state.
    StateDecision,
    /// Applies drag and gravity for the state.
    BodyConfig,
    /// Updates and presents camera feedback.
    CameraFeedback,
    /// Clears last tick's controller forces.
    Preparation,
    /// Computes and applies this tick's forces.
    Forces,
    /// Writes accumulated forces to the physics engine.
    FinalApplication,
}

/// Main plugin for the first-person controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (force application, drag, gravity, raycasting).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(FirstPersonControllerPlugin::<Rapier3dBackend>::default())
///     .add_plugins(DesktopInputPlugin)
///     .run();
/// ```
pub struct FirstPersonControllerPlugin<B: backend::CharacterPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::CharacterPhysicsBackend> Default for FirstPersonControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::CharacterPhysicsBackend> Plugin for FirstPersonControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<controller::CharacterController>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::ControllerKeys>();
        app.register_type::<intent::InputSnapshot>();
        app.register_type::<camera::CameraFeedback>();
        app.register_type::<camera::FirstPersonCamera>();
        app.register_type::<surface::WallSurfaceOverride>();
        app.register_type::<state::LocomotionState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::WallRunning>();
        app.register_type::<probe::ProbeResult>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            Update,
            (
                CharacterControllerSet::Validation,
                CharacterControllerSet::Input,
                CharacterControllerSet::Sensors,
                CharacterControllerSet::StateDecision,
                CharacterControllerSet::BodyConfig,
                CharacterControllerSet::CameraFeedback,
            )
                .chain(),
        );
        app.configure_sets(
            FixedUpdate,
            (
                CharacterControllerSet::Preparation,
                CharacterControllerSet::Forces,
                CharacterControllerSet::FinalApplication,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (
                systems::validate_controllers::<B>.in_set(CharacterControllerSet::Validation),
                (
                    systems::latch_jump_requests,
                    systems::decide_locomotion_state,
                    systems::sync_state_markers,
                )
                    .chain()
                    .in_set(CharacterControllerSet::StateDecision),
                systems::apply_body_config::<B>.in_set(CharacterControllerSet::BodyConfig),
                (
                    systems::update_camera_feedback,
                    systems::present_camera_feedback,
                )
                    .chain()
                    .in_set(CharacterControllerSet::CameraFeedback),
            ),
        );

        app.add_systems(
            FixedUpdate,
            systems::apply_locomotion_forces::<B>.in_set(CharacterControllerSet::Forces),
        );
    }
}
