//! Held-key and mouse state between ticks
//!
//! Controls:
//! - W/S: Forward/backward drift (camera Z)
//! - A/D: Left/right drift (camera X)
//! - Space/Ctrl: Up/down drift (camera Y)
//! - Left mouse: Fire on press, release the hook on release
//! - Right mouse or Shift held: Reel in while attached
//! - Mouse motion: Look (while the cursor is captured)
//! - Escape: Release the cursor

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

use crate::mapper::{InputAction, InputMapper};
use crate::snapshot::{InputSnapshot, Intent};

/// Accumulates raw events until the next snapshot
pub struct InputController {
    held: Intent,
    pull_button: bool,
    pull_key: bool,

    // Edges since the last snapshot
    fire_pressed: bool,
    fire_released: bool,
    // Button whose click captured the cursor; its next release is dropped
    swallow_release: Option<MouseButton>,

    pending_yaw: f32,
    pending_pitch: f32,

    captured: bool,

    pub mouse_sensitivity: f32,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

impl InputController {
    pub fn new() -> Self {
        Self {
            held: Intent::empty(),
            pull_button: false,
            pull_key: false,

            fire_pressed: false,
            fire_released: false,
            swallow_release: None,

            pending_yaw: 0.0,
            pending_pitch: 0.0,

            captured: false,

            mouse_sensitivity: 0.002,
        }
    }

    /// Builder: set mouse sensitivity (radians per pixel)
    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Builder: start with the cursor captured
    pub fn with_captured(mut self, captured: bool) -> Self {
        self.captured = captured;
        self
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    /// Process keyboard input
    ///
    /// Returns the window action for Escape, if any. Movement keys are
    /// tracked whether or not the cursor is captured.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> Option<InputAction> {
        let pressed = state == ElementState::Pressed;

        let flag = match key {
            KeyCode::KeyW => Some(Intent::FORWARD),
            KeyCode::KeyS => Some(Intent::BACKWARD),
            KeyCode::KeyA => Some(Intent::LEFT),
            KeyCode::KeyD => Some(Intent::RIGHT),
            KeyCode::Space => Some(Intent::UP),
            KeyCode::ControlLeft | KeyCode::ControlRight => Some(Intent::DOWN),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.pull_key = pressed;
                None
            }
            _ => None,
        };
        if let Some(flag) = flag {
            self.held.set(flag, pressed);
        }

        let action = InputMapper::map_keyboard(key, state, self.captured);
        if action == Some(InputAction::ReleaseCursor) {
            self.release_capture();
        }
        action
    }

    /// Process mouse button input
    ///
    /// The first click on a free cursor captures it and is not delivered as
    /// fire or pull.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) -> Option<InputAction> {
        let pressed = state == ElementState::Pressed;

        if let Some(action) = InputMapper::map_mouse_button(button, state, self.captured) {
            log::debug!("cursor captured");
            self.captured = true;
            self.swallow_release = Some(button);
            return Some(action);
        }

        if !pressed && self.swallow_release == Some(button) {
            self.swallow_release = None;
            return None;
        }

        match button {
            MouseButton::Left if pressed && self.captured => self.fire_pressed = true,
            MouseButton::Left if self.captured => self.fire_released = true,
            MouseButton::Right => self.pull_button = pressed && self.captured,
            _ => {}
        }
        None
    }

    /// Process raw mouse movement, ignored unless captured
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.captured {
            self.pending_yaw += delta_x as f32;
            self.pending_pitch += delta_y as f32;
        }
    }

    /// Let the cursor go; pending look and the pull button are dropped
    pub fn release_capture(&mut self) {
        log::debug!("cursor released");
        self.captured = false;
        self.pull_button = false;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
    }

    /// Sample the current input and clear the per-tick edges
    pub fn snapshot(&mut self) -> InputSnapshot {
        let mut held = self.held;
        held.set(Intent::PULL, self.captured && (self.pull_button || self.pull_key));

        let snapshot = InputSnapshot {
            held,
            fire_pressed: self.fire_pressed,
            fire_released: self.fire_released,
            look_delta: (
                self.pending_yaw * self.mouse_sensitivity,
                self.pending_pitch * self.mouse_sensitivity,
            ),
        };

        self.fire_pressed = false;
        self.fire_released = false;
        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_math::Vec3;

    const EPSILON: f32 = 0.0001;

    fn captured() -> InputController {
        InputController::new().with_captured(true)
    }

    #[test]
    fn test_held_keys_in_snapshot() {
        let mut controller = InputController::new();
        controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.drift_intent(), Vec3::new(1.0, 0.0, -1.0));

        // Held keys persist across snapshots
        assert_eq!(controller.snapshot().held, Intent::FORWARD | Intent::RIGHT);

        controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
        assert_eq!(controller.snapshot().held, Intent::RIGHT);
    }

    #[test]
    fn test_first_click_captures_without_firing() {
        let mut controller = InputController::new();
        let action = controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::CaptureCursor));
        assert!(controller.is_captured());

        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        let snapshot = controller.snapshot();
        assert!(!snapshot.fire_pressed);
        assert!(!snapshot.fire_released);
    }

    #[test]
    fn test_fire_edges_consumed_by_snapshot() {
        let mut controller = captured();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        let snapshot = controller.snapshot();
        assert!(snapshot.fire_pressed);
        assert!(!snapshot.fire_released);
        assert!(!controller.snapshot().fire_pressed);

        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(controller.snapshot().fire_released);
        assert!(!controller.snapshot().fire_released);
    }

    #[test]
    fn test_pull_from_button_or_shift() {
        let mut controller = captured();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(controller.snapshot().pull());
        controller.process_mouse_button(MouseButton::Right, ElementState::Released);
        assert!(!controller.snapshot().pull());

        controller.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        assert!(controller.snapshot().pull());
        controller.process_keyboard(KeyCode::ShiftLeft, ElementState::Released);
        assert!(!controller.snapshot().pull());
    }

    #[test]
    fn test_right_release_during_capture_click_clears_pull() {
        let mut controller = InputController::new();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(controller.snapshot().pull());

        controller.process_mouse_button(MouseButton::Right, ElementState::Released);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);

        let snapshot = controller.snapshot();
        assert!(!snapshot.pull());
        // The capturing left click still never fires
        assert!(!snapshot.fire_pressed);
        assert!(!snapshot.fire_released);
    }

    #[test]
    fn test_right_click_capture_swallows_only_right_release() {
        let mut controller = InputController::new();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(!controller.snapshot().pull());

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.process_mouse_button(MouseButton::Left, ElementState::Released);
        controller.process_mouse_button(MouseButton::Right, ElementState::Released);

        let snapshot = controller.snapshot();
        assert!(snapshot.fire_pressed);
        assert!(snapshot.fire_released);
        assert!(!snapshot.pull());
    }

    #[test]
    fn test_pull_requires_capture() {
        let mut controller = InputController::new();
        controller.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        assert!(!controller.snapshot().pull());
    }

    #[test]
    fn test_mouse_look_scaled_and_consumed() {
        let mut controller = captured();
        controller.process_mouse_motion(100.0, -50.0);
        controller.process_mouse_motion(50.0, 0.0);

        let (yaw, pitch) = controller.snapshot().look_delta;
        assert!((yaw - 0.3).abs() < EPSILON);
        assert!((pitch + 0.1).abs() < EPSILON);
        assert_eq!(controller.snapshot().look_delta, (0.0, 0.0));
    }

    #[test]
    fn test_mouse_look_ignored_when_free() {
        let mut controller = InputController::new();
        controller.process_mouse_motion(100.0, 100.0);
        assert_eq!(controller.snapshot().look_delta, (0.0, 0.0));
    }

    #[test]
    fn test_escape_releases_capture() {
        let mut controller = captured();
        controller.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        controller.process_mouse_motion(10.0, 10.0);

        let action = controller.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::ReleaseCursor));
        assert!(!controller.is_captured());

        let snapshot = controller.snapshot();
        assert!(!snapshot.pull());
        assert_eq!(snapshot.look_delta, (0.0, 0.0));

        let action = controller.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert_eq!(action, Some(InputAction::Exit));
    }

    #[test]
    fn test_sensitivity_builder() {
        let mut controller = captured().with_mouse_sensitivity(0.01);
        controller.process_mouse_motion(10.0, 0.0);
        assert!((controller.snapshot().look_delta.0 - 0.1).abs() < EPSILON);
    }
}
