use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};

/// Pixels of scroll or drag treated as one wheel notch
pub const PIXELS_PER_LINE: f32 = 50.0;

/// Pointer input distilled from window events, positions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved { position: Vec2, delta: Vec2 },
    /// Positive scrolls away from the user
    Wheel { notches: f32 },
    Left,
}

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current cursor position, `None` while outside the window
    mouse_position: Option<Vec2>,
}

impl WinitController {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            mouse_position: None,
        }
    }

    /// Update internal state from a window event and report pointer activity.
    /// Button presses only change the held state read through `Controller`.
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    if let Some(button) = Self::keycode_to_button(keycode) {
                        self.set_pressed(button, event.state);
                    }
                }
                None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = Self::mouse_button_to_button(*button) {
                    self.set_pressed(button, *state);
                }
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                let delta = self
                    .mouse_position
                    .map(|old_pos| new_pos - old_pos)
                    .unwrap_or(Vec2::ZERO);
                self.mouse_position = Some(new_pos);
                Some(PointerEvent::Moved {
                    position: new_pos,
                    delta,
                })
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                Some(PointerEvent::Left)
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                (notches != 0.0).then_some(PointerEvent::Wheel { notches })
            }
            WindowEvent::Focused(false) => {
                // Releases are lost while unfocused
                self.pressed_keys.clear();
                None
            }
            _ => None,
        }
    }

    fn set_pressed(&mut self, button: Button, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_keys.insert(button);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&button);
            }
        }
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<Vec2> {
        self.mouse_position
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Middle => Some(Button::MouseMiddle),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Default for WinitController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}
