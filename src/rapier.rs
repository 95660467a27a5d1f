//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::{CharacterPhysicsBackend, ForceMode};
use crate::collision::CollisionData;
use crate::config::ControllerConfig;
use crate::controller::CharacterController;
use crate::probe::probe;
use crate::surface::WallSurfaceOverride;
use crate::CharacterControllerSet;

/// Rapier3D physics backend for the character controller.
///
/// Forces go through [`ExternalForce`] and [`ExternalImpulse`], drag through
/// [`Damping`] and gravity through [`GravityScale`]. Raycasting is handled by
/// a dedicated system that receives the Rapier context as a system parameter.
pub struct Rapier3dBackend;

impl CharacterPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }

    fn has_rigid_body(world: &World, entity: Entity) -> bool {
        matches!(world.get::<RigidBody>(entity), Some(RigidBody::Dynamic))
    }

    fn apply_force(world: &mut World, entity: Entity, force: Vec3, mode: ForceMode) {
        match mode {
            // Continuous forces are accumulated on the controller and written to
            // ExternalForce by apply_controller_forces at the end of the tick.
            ForceMode::Acceleration => {
                let mass = Self::get_mass(world, entity);
                if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
                    controller.add_force(force * mass);
                }
            }
            ForceMode::Force => {
                if let Some(mut controller) = world.get_mut::<CharacterController>(entity) {
                    controller.add_force(force);
                }
            }
            ForceMode::Impulse => {
                if let Some(mut impulse) = world.get_mut::<ExternalImpulse>(entity) {
                    impulse.impulse += force;
                } else if world.get::<Velocity>(entity).is_some() {
                    // Without ExternalImpulse, apply as a velocity change.
                    let mass = Self::get_mass(world, entity);
                    if let Some(mut velocity) = world.get_mut::<Velocity>(entity) {
                        velocity.linvel += force / mass;
                    }
                }
            }
        }
    }

    fn set_drag(world: &mut World, entity: Entity, drag: f32) {
        if let Some(mut damping) = world.get_mut::<Damping>(entity) {
            damping.linear_damping = drag;
        } else {
            world.entity_mut(entity).insert(Damping {
                linear_damping: drag,
                angular_damping: 0.0,
            });
        }
    }

    fn set_gravity_enabled(world: &mut World, entity: Entity, enabled: bool) {
        let scale = if enabled { 1.0 } else { 0.0 };
        match world.get_mut::<GravityScale>(entity) {
            Some(mut gravity) => {
                if gravity.0 != scale {
                    gravity.0 = scale;
                }
            }
            None => {
                world.entity_mut(entity).insert(GravityScale(scale));
            }
        }
    }

    fn get_mass(world: &World, entity: Entity) -> f32 {
        world
            .get::<ReadMassProperties>(entity)
            .map(|props| props.get().mass)
            .filter(|mass| *mass > 0.0 && mass.is_finite())
            .unwrap_or(1.0)
    }
}

/// Plugin that sets up Rapier3D-specific systems for the character controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            rapier_environment_probe.in_set(CharacterControllerSet::Sensors),
        );

        app.add_systems(
            FixedUpdate,
            clear_controller_forces.in_set(CharacterControllerSet::Preparation),
        );

        app.add_systems(
            FixedUpdate,
            apply_controller_forces.in_set(CharacterControllerSet::FinalApplication),
        );
    }
}

/// Get the distance from collider center to bottom for a given collider.
/// For capsules, this is half the segment length plus the radius.
pub fn get_collider_half_height(collider: &Collider) -> Option<f32> {
    if let Some(capsule) = collider.as_capsule() {
        let segment = capsule.segment();
        let half_height = (segment.a().y - segment.b().y).abs() / 2.0;
        Some(half_height + capsule.radius())
    } else if let Some(ball) = collider.as_ball() {
        Some(ball.radius())
    } else if let Some(cuboid) = collider.as_cuboid() {
        Some(cuboid.half_extents().y)
    } else {
        None
    }
}

/// Perform a raycast using RapierContext.
fn rapier_raycast(
    context: &RapierContext,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    exclude_entity: Entity,
    collision_groups: Option<CollisionGroups>,
) -> Option<CollisionData> {
    let mut filter = QueryFilter::default()
        .exclude_rigid_body(exclude_entity)
        .exclude_sensors();

    if let Some(groups) = collision_groups {
        filter = filter.groups(groups);
    }

    context
        .cast_ray_and_get_normal(origin, direction, max_distance, true, filter)
        .map(|(hit_entity, hit)| {
            CollisionData::new(hit.time_of_impact, hit.normal, hit.point, Some(hit_entity))
        })
}

/// Rapier-specific environment probe.
///
/// Uses the collider's half height when it has a measurable shape, otherwise
/// the configured `body_half_height`. Wall overrides are read from the hit
/// collider entity.
fn rapier_environment_probe(
    rapier_context: ReadRapierContext,
    mut q_controllers: Query<(
        Entity,
        &GlobalTransform,
        &ControllerConfig,
        &mut CharacterController,
        Option<&CollisionGroups>,
        Option<&Collider>,
    )>,
    q_surfaces: Query<&WallSurfaceOverride>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    for (entity, transform, config, mut controller, collision_groups, collider) in
        &mut q_controllers
    {
        let half_height = collider
            .and_then(get_collider_half_height)
            .unwrap_or(config.body_half_height);
        let (_, rotation, position) = transform.to_scale_rotation_translation();
        let groups = collision_groups.copied();

        let result = probe(
            position,
            rotation,
            half_height,
            config,
            |origin, direction, max_distance| {
                rapier_raycast(&context, origin, direction, max_distance, entity, groups)
            },
            |hit| q_surfaces.get(hit).ok().copied(),
        );

        controller.body_half_height = half_height;
        controller.probe = result;
    }
}

/// Clear controller forces at the start of each fixed tick.
///
/// This system runs BEFORE all controller force systems. It:
/// 1. Subtracts the forces we applied last tick from ExternalForce
/// 2. Clears the accumulator for the new tick
///
/// External user forces on the body are preserved.
pub fn clear_controller_forces(mut q: Query<(&mut ExternalForce, &mut CharacterController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let force_to_subtract = controller.prepare_new_frame();
        ext_force.force -= force_to_subtract;
    }
}

/// Apply controller forces at the end of each fixed tick.
///
/// This system runs AFTER all controller force systems. It:
/// 1. Applies accumulated forces to ExternalForce
/// 2. Stores what we applied for next tick's subtraction
pub fn apply_controller_forces(mut q: Query<(&mut ExternalForce, &mut CharacterController)>) {
    for (mut ext_force, mut controller) in &mut q {
        let force_to_apply = controller.finalize_frame();
        ext_force.force += force_to_apply;
    }
}

/// Bundle for creating a first-person character with Rapier3D physics.
///
/// This bundle provides the Rapier3D components a controller entity needs:
/// the rigid body, velocity tracking, external forces and impulses for
/// movement, axis locking, damping and mass properties. Add a collider next
/// to it.
///
/// # Example
///
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use fps_wallrun_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         CharacterController::new(),
///         ControllerConfig::player(),
///         Rapier3dCharacterBundle::rotation_locked(),
///         Collider::capsule_y(0.5, 0.5),
///     ));
/// }
/// ```
///
/// # Rotation Modes
///
/// - [`Rapier3dCharacterBundle::rotation_locked()`]: Locks rotation so
///   collisions never tip the body over. The controller writes the body's yaw
///   itself, so this is what first-person characters want.
/// - [`Rapier3dCharacterBundle::new()`]: Leaves rotation free.
///
/// # Defaults
///
/// - `rigid_body`: [`RigidBody::Dynamic`]
/// - `damping`: linear 0.0 (the controller sets drag per state), angular 1.0
/// - `gravity_scale`: 1.0 (the controller switches it per state)
#[derive(Bundle, Default)]
pub struct Rapier3dCharacterBundle {
    /// The rigid body type. Should be [`RigidBody::Dynamic`] for controllers.
    pub rigid_body: RigidBody,
    /// Current linear and angular velocity. Updated by Rapier each physics step.
    pub velocity: Velocity,
    /// Continuous forces. Controller forces are isolated from user forces.
    pub external_force: ExternalForce,
    /// Impulses applied this step. Used for jumps.
    pub external_impulse: ExternalImpulse,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Linear drag, overwritten per locomotion state.
    pub damping: Damping,
    /// Engine gravity, switched off while wall-running.
    pub gravity_scale: GravityScale,
    /// Computed mass properties, used to scale acceleration-mode forces.
    pub mass_properties: ReadMassProperties,
}

impl Rapier3dCharacterBundle {
    /// Create a character bundle with rotation enabled.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_force: ExternalForce::default(),
            external_impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::empty(),
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 1.0,
            },
            gravity_scale: GravityScale(1.0),
            // Rapier will update this based on collider after first physics step
            mass_properties: ReadMassProperties::default(),
        }
    }

    /// Create a character bundle with rotation locked.
    ///
    /// Same as [`Rapier3dCharacterBundle::new()`] but with
    /// [`LockedAxes::ROTATION_LOCKED`].
    pub fn rotation_locked() -> Self {
        Self {
            locked_axes: LockedAxes::ROTATION_LOCKED,
            ..Self::new()
        }
    }

    /// Set the rigid body type for the character.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set the initial damping coefficients.
    ///
    /// Linear damping is overwritten by the controller once the body is
    /// grounded or airborne.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }

    /// Set which axes should be locked for the rigid body.
    ///
    /// ```ignore
    /// // Keep the body upright but pin it to a vertical plane.
    /// let bundle = Rapier3dCharacterBundle::new()
    ///     .with_locked_axes(LockedAxes::ROTATION_LOCKED | LockedAxes::TRANSLATION_LOCKED_Z);
    /// ```
    pub fn with_locked_axes(mut self, axes: LockedAxes) -> Self {
        self.locked_axes = axes;
        self
    }
}
