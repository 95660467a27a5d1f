//! Environment probe.
//!
//! Raycasts below and beside the body decide ground contact, slope normal
//! and wall contact. The probe is a pure query: it takes the raycast and the
//! surface lookup as closures, so backends can run it against whatever query
//! context their physics engine exposes and tests can run it against plain
//! geometry.

use bevy::prelude::*;

use crate::collision::CollisionData;
use crate::config::ControllerConfig;
use crate::surface::WallSurfaceOverride;

/// Which side of the body a wall is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum WallSide {
    Left,
    Right,
}

/// A wall detected by one of the sideways casts.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct WallContact {
    /// The raycast hit.
    pub hit: CollisionData,
    /// Tuning attached to the hit surface, if any.
    pub surface: Option<WallSurfaceOverride>,
}

impl WallContact {
    /// Normal of the wall surface.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.hit.normal
    }
}

/// Result of one probe. Rebuilt from scratch every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct ProbeResult {
    /// Ground within the strict ground check range.
    pub grounded: bool,
    /// Ground within the longer slope check range.
    pub ground: Option<CollisionData>,
    /// Ground normal when the ground within slope range is not flat.
    pub slope_normal: Option<Vec3>,
    /// Wall hit by the left cast.
    pub wall_left: Option<WallContact>,
    /// Wall hit by the right cast.
    pub wall_right: Option<WallContact>,
}

impl ProbeResult {
    /// Normal of the ground within slope range.
    pub fn ground_normal(&self) -> Option<Vec3> {
        self.ground.map(|g| g.normal)
    }

    /// Whether the ground within slope range is a slope.
    pub fn is_slope(&self) -> bool {
        self.slope_normal.is_some()
    }

    /// The wall contact on the given side.
    pub fn wall(&self, side: WallSide) -> Option<&WallContact> {
        match side {
            WallSide::Left => self.wall_left.as_ref(),
            WallSide::Right => self.wall_right.as_ref(),
        }
    }

    /// Whether any wall was detected.
    pub fn touching_wall(&self) -> bool {
        self.wall_left.is_some() || self.wall_right.is_some()
    }
}

/// Classify a ground normal as a slope.
///
/// With `epsilon == 0.0` this is the exact comparison against world up.
pub fn is_slope_normal(normal: Vec3, epsilon: f32) -> bool {
    if epsilon > 0.0 {
        normal.angle_between(Vec3::Y) > epsilon
    } else {
        normal != Vec3::Y
    }
}

/// Probe the environment around a body.
///
/// - `raycast(origin, direction, max_distance)` returns the closest hit, if any.
/// - `surface(entity)` returns the wall tuning attached to a hit collider.
///
/// The ground is cast straight down in world space twice: a strict cast of
/// `half_height + ground_check_margin` decides `grounded`, and a longer cast
/// of `half_height + slope_check_margin` provides the ground normal. Walls are
/// cast along the body's left and right axes.
pub fn probe(
    position: Vec3,
    orientation: Quat,
    half_height: f32,
    config: &ControllerConfig,
    raycast: impl Fn(Vec3, Vec3, f32) -> Option<CollisionData>,
    surface: impl Fn(Entity) -> Option<WallSurfaceOverride>,
) -> ProbeResult {
    let grounded = raycast(
        position,
        Vec3::NEG_Y,
        config.ground_check_distance(half_height),
    )
    .is_some();

    let ground = raycast(
        position,
        Vec3::NEG_Y,
        config.slope_check_distance(half_height),
    );
    let slope_normal = ground
        .map(|g| g.normal)
        .filter(|&n| is_slope_normal(n, config.slope_normal_epsilon));

    let right = orientation * Vec3::X;
    let wall = |direction: Vec3| {
        raycast(position, direction, config.wall_check_distance).map(|hit| WallContact {
            hit,
            surface: hit.entity.and_then(&surface),
        })
    };

    ProbeResult {
        grounded,
        ground,
        slope_normal,
        wall_left: wall(-right),
        wall_right: wall(right),
    }
}
