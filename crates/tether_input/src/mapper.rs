//! Input mapping from raw events to window-level actions
//!
//! Maps Escape and capture clicks to cursor actions. Movement keys and the
//! grapple buttons are NOT mapped here - they go to the InputController.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Actions that concern the window rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Capture the cursor (click while released)
    CaptureCursor,
    /// Release the cursor (Escape while captured)
    ReleaseCursor,
    /// Exit application (Escape while released)
    Exit,
}

/// Maps raw input events to window actions
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    pub fn map_keyboard(key: KeyCode, state: ElementState, cursor_captured: bool) -> Option<InputAction> {
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape if cursor_captured => Some(InputAction::ReleaseCursor),
            KeyCode::Escape => Some(InputAction::Exit),
            _ => None,
        }
    }

    /// Map a mouse button to an action
    ///
    /// Any press while the cursor is free captures it; that press is not
    /// delivered to the grapple.
    pub fn map_mouse_button(button: MouseButton, state: ElementState, cursor_captured: bool) -> Option<InputAction> {
        let is_click = matches!(button, MouseButton::Left | MouseButton::Right);
        if is_click && state == ElementState::Pressed && !cursor_captured {
            Some(InputAction::CaptureCursor)
        } else {
            None
        }
    }
}
