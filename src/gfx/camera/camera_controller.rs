use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{FlyCamera, Movement, SensitivityChange};

/// Pixels of trackpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

const MOVEMENTS: [Movement; 6] = [
    Movement::Forward,
    Movement::Backward,
    Movement::Left,
    Movement::Right,
    Movement::Up,
    Movement::Down,
];

/// What the application should do in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerAction {
    None,
    ToggleProjection,
    CloseRequested,
}

/// Turns window input into camera motion.
///
/// Movement keys are tracked as held state and applied once per frame in
/// [`update`](Self::update), scaled by the frame time.
pub struct CameraController {
    held: [bool; 6],
    first_mouse: bool,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            held: [false; 6],
            first_mouse: true,
        }
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) -> ControllerAction {
        match event.physical_key {
            PhysicalKey::Code(code) => self.process_key(code, event.state, event.repeat),
            PhysicalKey::Unidentified(_) => ControllerAction::None,
        }
    }

    pub fn process_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) -> ControllerAction {
        let pressed = state == ElementState::Pressed;
        let movement = match code {
            KeyCode::KeyW => Movement::Forward,
            KeyCode::KeyS => Movement::Backward,
            KeyCode::KeyA => Movement::Left,
            KeyCode::KeyD => Movement::Right,
            KeyCode::KeyQ => Movement::Up,
            KeyCode::KeyE => Movement::Down,
            // Edge-triggered: holding P must not flicker between modes
            KeyCode::KeyP if pressed && !repeat => return ControllerAction::ToggleProjection,
            KeyCode::Escape if pressed => return ControllerAction::CloseRequested,
            _ => return ControllerAction::None,
        };
        self.held[Self::slot(movement)] = pressed;
        ControllerAction::None
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        self.held[Self::slot(movement)]
    }

    /// Feeds a relative mouse motion in pixels (y grows downward). The
    /// first motion after [`activate`](Self::activate) only re-seeds the
    /// cursor and is dropped, so recapturing never jerks the view.
    pub fn process_mouse_motion(&mut self, dx: f64, dy: f64, camera: &mut FlyCamera) {
        if self.first_mouse {
            self.first_mouse = false;
            return;
        }
        camera.rotate(dx as f32, -dy as f32);
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta, camera: &mut FlyCamera) -> SensitivityChange {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => (*y / PIXELS_PER_LINE) as f32,
        };
        camera.adjust_sensitivity(lines)
    }

    /// Re-arms the cold-start guard, e.g. when the cursor is recaptured.
    pub fn activate(&mut self) {
        self.first_mouse = true;
    }

    /// Drops all held keys. Release events are lost while unfocused.
    pub fn release_all(&mut self) {
        self.held = [false; 6];
    }

    /// Applies held movement keys for a frame of `dt` seconds.
    pub fn update(&self, camera: &mut FlyCamera, dt: f32) {
        for movement in MOVEMENTS {
            if self.is_held(movement) {
                camera.translate(movement, dt);
            }
        }
    }

    fn slot(movement: Movement) -> usize {
        match movement {
            Movement::Forward => 0,
            Movement::Backward => 1,
            Movement::Left => 2,
            Movement::Right => 3,
            Movement::Up => 4,
            Movement::Down => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use cgmath::InnerSpace;

    fn camera() -> FlyCamera {
        FlyCamera::new(&CameraConfig::default())
    }

    #[test]
    fn test_first_motion_does_not_rotate() {
        let mut controller = CameraController::new();
        let mut cam = camera();
        let before = cam.front();

        controller.process_mouse_motion(640.0, -320.0, &mut cam);
        assert_eq!(cam.front(), before);

        // Cursor moved right and up
        controller.process_mouse_motion(10.0, -10.0, &mut cam);
        assert!((cam.yaw() - (-80.0)).abs() < 1e-4);
        assert!((cam.pitch() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_activate_rearms_guard() {
        let mut controller = CameraController::new();
        let mut cam = camera();
        controller.process_mouse_motion(0.0, 0.0, &mut cam);
        controller.activate();
        controller.process_mouse_motion(500.0, 500.0, &mut cam);
        assert_eq!(cam.yaw(), -90.0);
        assert_eq!(cam.pitch(), 0.0);
    }

    #[test]
    fn test_projection_toggle_is_edge_triggered() {
        let mut controller = CameraController::new();
        assert_eq!(
            controller.process_key(KeyCode::KeyP, ElementState::Pressed, false),
            ControllerAction::ToggleProjection
        );
        assert_eq!(
            controller.process_key(KeyCode::KeyP, ElementState::Pressed, true),
            ControllerAction::None
        );
        assert_eq!(
            controller.process_key(KeyCode::KeyP, ElementState::Released, false),
            ControllerAction::None
        );
        assert_eq!(
            controller.process_key(KeyCode::Escape, ElementState::Pressed, false),
            ControllerAction::CloseRequested
        );
    }

    #[test]
    fn test_held_keys_move_camera() {
        let mut controller = CameraController::new();
        let mut cam = camera();

        controller.process_key(KeyCode::KeyW, ElementState::Pressed, false);
        controller.process_key(KeyCode::KeyQ, ElementState::Pressed, false);
        controller.update(&mut cam, 1.0);
        assert!((cam.position - cgmath::Vector3::new(0.0, 1.0, 2.0)).magnitude() < 1e-5);

        controller.process_key(KeyCode::KeyW, ElementState::Released, false);
        assert!(!controller.is_held(Movement::Forward));
        assert!(controller.is_held(Movement::Up));

        controller.release_all();
        let at = cam.position;
        controller.update(&mut cam, 1.0);
        assert_eq!(cam.position, at);
    }

    #[test]
    fn test_scroll_adjusts_sensitivity() {
        let mut controller = CameraController::new();
        let mut cam = camera();
        let change = controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, -1.0), &mut cam);
        assert!(matches!(change, SensitivityChange::Changed(s) if (s - 0.9).abs() < 1e-5));

        controller.process_scroll(
            &MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)),
            &mut cam,
        );
        assert!((cam.sensitivity() - 1.1).abs() < 1e-5);
    }
}
