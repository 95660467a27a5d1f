//! Keyboard and mouse input for desktop builds.
//!
//! [`DesktopInputPlugin`] fills every controller's [`InputSnapshot`] from
//! Bevy's keyboard and accumulated mouse motion, and applies [`CursorLock`] to
//! the primary window. Games using other input sources can skip the plugin and
//! write snapshots themselves in [`CharacterControllerSet::Input`].

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::config::ControllerKeys;
use crate::controller::CharacterController;
use crate::intent::InputSnapshot;
use crate::CharacterControllerSet;

/// Scale from raw mouse motion (pixels) to look axis units.
pub const MOUSE_AXIS_SCALE: f32 = 0.1;

/// Whether the cursor is captured by the game.
///
/// Locked: grabbed and hidden, and mouse motion turns the camera.
/// Unlocked: confined to the window and visible, and mouse motion is ignored.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Resource)]
pub struct CursorLock {
    pub locked: bool,
}

impl Default for CursorLock {
    fn default() -> Self {
        Self { locked: true }
    }
}

impl CursorLock {
    pub fn toggle(&mut self) {
        self.locked = !self.locked;
    }
}

/// Keyboard and mouse input adapter.
pub struct DesktopInputPlugin;

impl Plugin for DesktopInputPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CursorLock>();
        app.init_resource::<CursorLock>();
        // Present under DefaultPlugins already; headless apps need them too.
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<AccumulatedMouseMotion>();

        app.add_systems(
            Update,
            (
                read_desktop_input,
                apply_cursor_lock.run_if(resource_changed::<CursorLock>),
            )
                .in_set(CharacterControllerSet::Input),
        );
    }
}

/// Movement axes from held keys: `x` forward, `y` strafe right.
pub fn movement_axes(keyboard: &ButtonInput<KeyCode>, keys: &ControllerKeys) -> Vec2 {
    let axis = |positive: KeyCode, negative: KeyCode| {
        let mut value = 0.0;
        if keyboard.pressed(positive) {
            value += 1.0;
        }
        if keyboard.pressed(negative) {
            value -= 1.0;
        }
        value
    };
    Vec2::new(axis(keys.forward, keys.back), axis(keys.right, keys.left))
}

/// Look axes from raw mouse motion: `x` right, `y` up.
pub fn look_axes(mouse_delta: Vec2) -> Vec2 {
    Vec2::new(mouse_delta.x, -mouse_delta.y) * MOUSE_AXIS_SCALE
}

/// Fill input snapshots from the keyboard and mouse.
pub fn read_desktop_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    cursor: Res<CursorLock>,
    mut q_controllers: Query<(&ControllerKeys, &mut InputSnapshot), With<CharacterController>>,
) {
    let look = if cursor.locked {
        look_axes(mouse_motion.delta)
    } else {
        Vec2::ZERO
    };

    for (keys, mut input) in &mut q_controllers {
        input.set_move(movement_axes(&keyboard, keys));
        input.set_look(look);
        input.set_jump_pressed(keyboard.just_pressed(keys.jump));
        input.set_run(keyboard.pressed(keys.run));
    }
}

/// Apply [`CursorLock`] to the primary window.
pub fn apply_cursor_lock(
    cursor: Res<CursorLock>,
    mut q_window: Query<&mut Window, With<PrimaryWindow>>,
) {
    let Ok(mut window) = q_window.single_mut() else {
        return;
    };

    if cursor.locked {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    } else {
        window.cursor_options.grab_mode = CursorGrabMode::Confined;
        window.cursor_options.visible = true;
    }
    debug!(locked = cursor.locked, "cursor lock applied");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_maps_to_axes() {
        let keys = ControllerKeys::default();
        let mut keyboard = ButtonInput::<KeyCode>::default();

        assert_eq!(movement_axes(&keyboard, &keys), Vec2::ZERO);

        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyA);
        assert_eq!(movement_axes(&keyboard, &keys), Vec2::new(1.0, -1.0));

        // Opposing keys cancel.
        keyboard.press(KeyCode::KeyS);
        keyboard.press(KeyCode::KeyD);
        assert_eq!(movement_axes(&keyboard, &keys), Vec2::ZERO);
    }

    #[test]
    fn rebound_keys_are_used() {
        let keys = ControllerKeys {
            forward: KeyCode::ArrowUp,
            ..default()
        };
        let mut keyboard = ButtonInput::<KeyCode>::default();

        keyboard.press(KeyCode::KeyW);
        assert_eq!(movement_axes(&keyboard, &keys), Vec2::ZERO);

        keyboard.press(KeyCode::ArrowUp);
        assert_eq!(movement_axes(&keyboard, &keys), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn mouse_motion_is_scaled_and_flipped() {
        let look = look_axes(Vec2::new(20.0, 10.0));
        assert!((look.x - 2.0).abs() < 1e-6);
        assert!((look.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cursor_lock_toggles() {
        let mut cursor = CursorLock::default();
        assert!(cursor.locked);
        cursor.toggle();
        assert!(!cursor.locked);
    }
}
