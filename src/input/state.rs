//! Input state

use glam::Vec2;
use rustc_hash::FxHashSet;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use super::keys::KeyQuery;

/// Mouse buttons the framework tracks: 1 left, 2 middle, 3 right
pub const MOUSE_BUTTONS: [u8; 3] = [1, 2, 3];

/// Keyboard and mouse state for the current frame
#[derive(Debug, Default)]
pub struct Input {
    /// Currently pressed keys
    pressed_keys: FxHashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: FxHashSet<KeyCode>,
    /// Keys that were just released this frame
    just_released_keys: FxHashSet<KeyCode>,
    pressed_buttons: FxHashSet<u8>,
    just_pressed_buttons: FxHashSet<u8>,
    just_released_buttons: FxHashSet<u8>,
    /// Cursor position in window pixels
    cursor: Vec2,
    cursor_in_window: bool,
    /// Wheel lines this frame, positive away from the user
    wheel: f32,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state; called at the end of every frame
    pub fn update(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
        self.just_pressed_buttons.clear();
        self.just_released_buttons.clear();
        self.wheel = 0.0;
    }

    /// Forget everything, used when the window loses focus
    pub fn reset(&mut self) {
        self.pressed_keys.clear();
        self.pressed_buttons.clear();
        self.update();
    }

    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(key_code) {
                    self.just_pressed_keys.insert(key_code);
                }
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
                self.just_released_keys.insert(key_code);
            }
        }
    }

    /// Process a mouse button event; buttons other than 1..=3 are ignored
    pub fn process_mouse_button(&mut self, button: u8, state: ElementState) {
        if !MOUSE_BUTTONS.contains(&button) {
            return;
        }
        match state {
            ElementState::Pressed => {
                if self.pressed_buttons.insert(button) {
                    self.just_pressed_buttons.insert(button);
                }
            }
            ElementState::Released => {
                self.pressed_buttons.remove(&button);
                self.just_released_buttons.insert(button);
            }
        }
    }

    pub fn process_cursor(&mut self, position: Vec2) {
        self.cursor = position;
        self.cursor_in_window = true;
    }

    pub fn process_cursor_presence(&mut self, in_window: bool) {
        self.cursor_in_window = in_window;
    }

    pub fn process_wheel(&mut self, lines: f32) {
        self.wheel += lines;
    }

    /// Check if a physical key is currently pressed
    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    #[must_use]
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Check a key by name (`"a"`, `"A"`, `"space"`, `"alt gr"`, ...)
    ///
    /// Unknown names are never pressed.
    #[must_use]
    pub fn is_key_down(&self, name: &str) -> bool {
        KeyQuery::parse(name).is_some_and(|query| query.is_pressed(self))
    }

    #[must_use]
    pub fn is_mouse_button_pressed(&self, button: u8) -> bool {
        self.pressed_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_mouse_button_just_pressed(&self, button: u8) -> bool {
        self.just_pressed_buttons.contains(&button)
    }

    #[must_use]
    pub fn is_mouse_button_just_released(&self, button: u8) -> bool {
        self.just_released_buttons.contains(&button)
    }

    /// Cursor position, or where it was before leaving the window
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    #[must_use]
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }

    /// Wheel lines this frame
    #[must_use]
    pub fn wheel(&self) -> f32 {
        self.wheel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_only_once() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert!(input.is_key_just_pressed(KeyCode::KeyA));
        input.update();
        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert!(input.is_key_pressed(KeyCode::KeyA));
        assert!(!input.is_key_just_pressed(KeyCode::KeyA));
    }

    #[test]
    fn test_release() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        input.process_keyboard(KeyCode::Space, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_just_released(KeyCode::Space));
        input.update();
        assert!(!input.is_key_just_released(KeyCode::Space));
    }

    #[test]
    fn test_mouse_buttons() {
        let mut input = Input::new();
        input.process_mouse_button(1, ElementState::Pressed);
        input.process_mouse_button(7, ElementState::Pressed);
        assert!(input.is_mouse_button_pressed(1));
        assert!(input.is_mouse_button_just_pressed(1));
        assert!(!input.is_mouse_button_pressed(7));
        input.process_mouse_button(1, ElementState::Released);
        assert!(input.is_mouse_button_just_released(1));
    }

    #[test]
    fn test_wheel_is_per_frame() {
        let mut input = Input::new();
        input.process_wheel(1.0);
        input.process_wheel(2.0);
        assert_eq!(input.wheel(), 3.0);
        input.update();
        assert_eq!(input.wheel(), 0.0);
    }

    #[test]
    fn test_cursor_presence() {
        let mut input = Input::new();
        assert!(!input.is_cursor_in_window());
        input.process_cursor(Vec2::new(3.0, 4.0));
        assert!(input.is_cursor_in_window());
        input.process_cursor_presence(false);
        assert_eq!(input.cursor(), Vec2::new(3.0, 4.0));
        assert!(!input.is_cursor_in_window());
    }

    #[test]
    fn test_key_by_name() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(input.is_key_down("w"));
        assert!(!input.is_key_down("W"));
        assert!(!input.is_key_down("no such key"));
    }
}
