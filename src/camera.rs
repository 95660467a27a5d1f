//! Camera feedback: look angles, wall-run roll and field of view.
//!
//! Angles are kept in degrees, in the classic left-handed game convention:
//! positive yaw turns right, positive pitch looks down, and positive roll
//! raises the camera's right side. [`PresentationFrame::body_rotation`] and
//! [`PresentationFrame::camera_rotation`] convert to Bevy's right-handed
//! frame.

use bevy::prelude::*;

use crate::config::ControllerConfig;
use crate::state::LocomotionState;

/// Pitch limit in degrees.
pub const PITCH_LIMIT: f32 = 90.0;

/// Look angles and the smoothed camera effects of one controller.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct CameraFeedback {
    /// Accumulated yaw in degrees, unbounded.
    pub yaw: f32,
    /// Pitch in degrees, clamped to `[-90, 90]`.
    pub pitch: f32,
    /// Current roll in degrees.
    pub tilt: f32,
    /// Current vertical field of view in degrees.
    pub fov: f32,
}

impl Default for CameraFeedback {
    fn default() -> Self {
        let config = ControllerConfig::default();
        Self::at_rest(&config)
    }
}

impl CameraFeedback {
    /// Feedback already settled at the config's static tilt and fov.
    pub fn at_rest(config: &ControllerConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            tilt: config.static_tilt,
            fov: config.static_fov,
        }
    }

    /// Accumulate a look delta.
    pub fn apply_look(&mut self, look_delta: Vec2, sensitivity: f32) {
        self.yaw += look_delta.x * sensitivity;
        self.pitch = (self.pitch - look_delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Move tilt and fov toward their targets for the state.
    ///
    /// Each tick closes `rate * dt` of the remaining gap, clamped to the whole
    /// gap, so a long frame lands on the target instead of overshooting it.
    pub fn smooth_toward(&mut self, state: LocomotionState, config: &ControllerConfig, dt: f32) {
        let (tilt, fov) = feedback_targets(state, config);
        self.tilt = self.tilt.lerp(tilt, (config.tilt_change_rate * dt).clamp(0.0, 1.0));
        self.fov = self.fov.lerp(fov, (config.fov_change_rate * dt).clamp(0.0, 1.0));
    }

    /// One full camera tick.
    pub fn update(
        &mut self,
        look_delta: Vec2,
        state: LocomotionState,
        config: &ControllerConfig,
        dt: f32,
    ) {
        self.apply_look(look_delta, config.sensitivity);
        self.smooth_toward(state, config, dt);
    }

    /// Values for the presentation layer.
    pub fn frame(&self) -> PresentationFrame {
        PresentationFrame {
            body_yaw: self.yaw,
            camera_pitch: self.pitch,
            camera_yaw: self.yaw,
            camera_tilt: self.tilt,
            camera_fov: self.fov,
        }
    }
}

/// Target `(tilt, fov)` in degrees for a locomotion state.
pub fn feedback_targets(state: LocomotionState, config: &ControllerConfig) -> (f32, f32) {
    match state {
        LocomotionState::WallRunningLeft => (-config.wall_run_tilt, config.wall_run_fov),
        LocomotionState::WallRunningRight => (config.wall_run_tilt, config.wall_run_fov),
        LocomotionState::Grounded | LocomotionState::Airborne => {
            (config.static_tilt, config.static_fov)
        }
    }
}

/// What the presentation layer receives once per tick. All angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresentationFrame {
    pub body_yaw: f32,
    pub camera_pitch: f32,
    pub camera_yaw: f32,
    pub camera_tilt: f32,
    pub camera_fov: f32,
}

impl PresentationFrame {
    /// Body rotation: yaw only.
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.body_yaw.to_radians())
    }

    /// Full world rotation of the camera: yaw, then pitch, then roll.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            -self.camera_yaw.to_radians(),
            -self.camera_pitch.to_radians(),
            self.camera_tilt.to_radians(),
        )
    }

    /// Camera rotation relative to a parent already carrying the body yaw.
    pub fn camera_local_rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            0.0,
            -self.camera_pitch.to_radians(),
            self.camera_tilt.to_radians(),
        )
    }

    /// Field of view in radians, as Bevy projections expect.
    pub fn fov_radians(&self) -> f32 {
        self.camera_fov.to_radians()
    }
}

/// Links a camera entity to the controller whose feedback it presents.
///
/// When the camera is a child of the controller it receives pitch and roll
/// locally (yaw comes from the parent); otherwise it receives the full
/// rotation.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct FirstPersonCamera {
    pub controller: Entity,
}

impl FirstPersonCamera {
    pub fn new(controller: Entity) -> Self {
        Self { controller }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_accumulates_without_bound() {
        let mut feedback = CameraFeedback::default();
        for _ in 0..100 {
            feedback.apply_look(Vec2::new(10.0, 0.0), 8.0);
        }
        assert!((feedback.yaw - 8000.0).abs() < 1e-2);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut feedback = CameraFeedback::default();

        feedback.apply_look(Vec2::new(0.0, 1000.0), 8.0);
        assert_eq!(feedback.pitch, -PITCH_LIMIT);

        feedback.apply_look(Vec2::new(0.0, -1.0e9), 8.0);
        assert_eq!(feedback.pitch, PITCH_LIMIT);

        // Accumulated small steps stay clamped too.
        for step in [-3.0, 7.5, 2.0, -40.0, 12.25, 100.0, -0.5] {
            feedback.apply_look(Vec2::new(0.0, step), 8.0);
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&feedback.pitch));
        }
    }

    #[test]
    fn looking_up_lowers_pitch() {
        let mut feedback = CameraFeedback::default();
        feedback.apply_look(Vec2::new(0.0, 1.0), 8.0);
        assert_eq!(feedback.pitch, -8.0);
    }

    #[test]
    fn targets_by_state() {
        let config = ControllerConfig::default();

        assert_eq!(
            feedback_targets(LocomotionState::WallRunningLeft, &config),
            (-config.wall_run_tilt, config.wall_run_fov)
        );
        assert_eq!(
            feedback_targets(LocomotionState::WallRunningRight, &config),
            (config.wall_run_tilt, config.wall_run_fov)
        );
        assert_eq!(
            feedback_targets(LocomotionState::Grounded, &config),
            (config.static_tilt, config.static_fov)
        );
        assert_eq!(
            feedback_targets(LocomotionState::Airborne, &config),
            (config.static_tilt, config.static_fov)
        );
    }

    #[test]
    fn smoothing_converges_monotonically_without_overshoot() {
        let config = ControllerConfig::default();
        let mut feedback = CameraFeedback::at_rest(&config);
        let dt = 1.0 / 60.0;
        let (tilt_target, fov_target) = feedback_targets(LocomotionState::WallRunningLeft, &config);

        let mut tilt_gap = (feedback.tilt - tilt_target).abs();
        let mut fov_gap = (feedback.fov - fov_target).abs();
        for _ in 0..60 {
            feedback.smooth_toward(LocomotionState::WallRunningLeft, &config, dt);

            let new_tilt_gap = (feedback.tilt - tilt_target).abs();
            let new_fov_gap = (feedback.fov - fov_target).abs();
            assert!(new_tilt_gap < tilt_gap || new_tilt_gap == 0.0);
            assert!(new_fov_gap < fov_gap || new_fov_gap == 0.0);
            assert!(feedback.tilt >= tilt_target, "tilt overshot");
            assert!(feedback.fov <= fov_target, "fov overshot");
            tilt_gap = new_tilt_gap;
            fov_gap = new_fov_gap;
        }
        assert!(tilt_gap < 0.01);
        assert!(fov_gap < 0.1);
    }

    #[test]
    fn long_frames_land_on_target() {
        let config = ControllerConfig::default();
        let mut feedback = CameraFeedback::at_rest(&config);

        // Both rate * dt products are far above 1.
        for _ in 0..4 {
            feedback.smooth_toward(LocomotionState::WallRunningRight, &config, 0.5);
            assert!((feedback.tilt - config.wall_run_tilt).abs() < 1e-5, "{feedback:?}");
            assert!((feedback.fov - config.wall_run_fov).abs() < 1e-5, "{feedback:?}");
        }

        feedback.smooth_toward(LocomotionState::Grounded, &config, 2.0);
        assert!((feedback.tilt - config.static_tilt).abs() < 1e-5, "{feedback:?}");
        assert!((feedback.fov - config.static_fov).abs() < 1e-5, "{feedback:?}");
    }

    #[test]
    fn slightly_long_frame_does_not_overshoot() {
        let config = ControllerConfig::default();
        let mut feedback = CameraFeedback::at_rest(&config);

        // tilt rate 10 * 0.15 = 1.5 would overshoot unclamped.
        feedback.smooth_toward(LocomotionState::WallRunningRight, &config, 0.15);
        assert!(feedback.tilt <= config.wall_run_tilt, "{feedback:?}");
        assert!(feedback.fov <= config.wall_run_fov, "{feedback:?}");
    }

    #[test]
    fn smoothing_uses_separate_rates() {
        let config = ControllerConfig::default().with_change_rates(1.0, 30.0);
        let mut feedback = CameraFeedback::at_rest(&config);

        feedback.smooth_toward(LocomotionState::WallRunningRight, &config, 0.01);

        // tilt: 0 -> 10 at 30 * 0.01 = 0.3; fov: 70 -> 80 at 1 * 0.01 = 0.01
        assert!((feedback.tilt - 3.0).abs() < 1e-4);
        assert!((feedback.fov - 70.1).abs() < 1e-4);
    }

    #[test]
    fn frame_carries_current_values() {
        let feedback = CameraFeedback {
            yaw: 45.0,
            pitch: -10.0,
            tilt: 5.0,
            fov: 75.0,
        };
        let frame = feedback.frame();

        assert_eq!(frame.body_yaw, 45.0);
        assert_eq!(frame.camera_yaw, 45.0);
        assert_eq!(frame.camera_pitch, -10.0);
        assert_eq!(frame.camera_tilt, 5.0);
        assert_eq!(frame.camera_fov, 75.0);
    }

    #[test]
    fn positive_yaw_turns_right() {
        let frame = CameraFeedback {
            yaw: 90.0,
            ..default()
        }
        .frame();

        let forward = frame.body_rotation() * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5, "{forward:?}");
    }

    #[test]
    fn negative_pitch_looks_up() {
        let frame = CameraFeedback {
            pitch: -45.0,
            ..default()
        }
        .frame();

        let forward = frame.camera_rotation() * Vec3::NEG_Z;
        assert!(forward.y > 0.5, "{forward:?}");
    }

    #[test]
    fn local_rotation_composes_with_body_yaw() {
        let frame = CameraFeedback {
            yaw: 30.0,
            pitch: 20.0,
            tilt: -10.0,
            fov: 70.0,
        }
        .frame();

        let composed = frame.body_rotation() * frame.camera_local_rotation();
        assert!(composed.angle_between(frame.camera_rotation()) < 1e-4);
    }
}
