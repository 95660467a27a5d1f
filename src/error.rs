//! Error types.
//!
//! Steady-state ticks never fail: a missing component or an unavailable
//! physics context just makes the affected subsystem skip the tick. The only
//! errors are configuration problems detected when a controller is added,
//! which are fatal.

use bevy::prelude::*;
use thiserror::Error;

/// A `ControllerConfig` value the controller cannot work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be finite and greater than zero, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be a field of view between 0 and 180 degrees, got {value}")]
    FovOutOfRange { field: &'static str, value: f32 },
}

/// Fatal controller setup errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("character controller {0} has no rigid body the physics backend can drive")]
    MissingRigidBody(Entity),

    #[error("character controller {entity} has an invalid configuration: {source}")]
    InvalidConfig {
        entity: Entity,
        #[source]
        source: ConfigError,
    },
}
