//! Raycast hit records.
//!
//! Every physics query issued by the environment probe produces an
//! `Option<CollisionData>`: `None` when the ray hit nothing within range.

use bevy::prelude::*;

/// Information about a raycast collision.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct CollisionData {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    /// Normal of the surface at the hit point.
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Collider entity that was hit (if the backend reports one).
    pub entity: Option<Entity>,
}

impl CollisionData {
    /// Create a collision result.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_data_new() {
        let hit = CollisionData::new(5.0, Vec3::Y, Vec3::new(10.0, 0.0, 2.0), None);

        assert_eq!(hit.distance, 5.0);
        assert_eq!(hit.normal, Vec3::Y);
        assert_eq!(hit.point, Vec3::new(10.0, 0.0, 2.0));
        assert!(hit.entity.is_none());
    }

    #[test]
    fn collision_data_with_entity() {
        let entity = Entity::from_raw(42);
        let hit = CollisionData::new(3.0, Vec3::X, Vec3::ZERO, Some(entity));

        assert_eq!(hit.entity, Some(entity));
    }
}
