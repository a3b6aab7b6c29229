//! Mouse snapshot handed to actors

use glam::Vec2;

use super::{Input, MOUSE_BUTTONS};

/// Mouse state at the start of the current act cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseInfo {
    wheel: f32,
    buttons: [bool; 3],
    position: Vec2,
    in_window: bool,
}

impl MouseInfo {
    #[must_use]
    pub fn from_input(input: &Input) -> Self {
        Self {
            wheel: input.wheel(),
            buttons: MOUSE_BUTTONS.map(|b| input.is_mouse_button_pressed(b)),
            position: input.cursor(),
            in_window: input.is_cursor_in_window(),
        }
    }

    /// Wheel lines since the last frame; positive is away from the user
    #[must_use]
    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    /// Pressed state of left, middle and right button
    #[must_use]
    pub fn buttons(&self) -> [bool; 3] {
        self.buttons
    }

    /// Whether button 1 (left), 2 (middle) or 3 (right) is held
    #[must_use]
    pub fn is_pressed(&self, button: u8) -> bool {
        match button {
            1..=3 => self.buttons[usize::from(button) - 1],
            _ => false,
        }
    }

    /// Cursor position in window pixels
    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.position.x.floor() as i32, self.position.y.floor() as i32)
    }

    #[must_use]
    pub fn is_in_window(&self) -> bool {
        self.in_window
    }

    /// World cell under the cursor for a given cell size and viewport offset
    #[must_use]
    pub fn cell(&self, cell_size: u32, view_offset: (i32, i32)) -> (i32, i32) {
        let cell = cell_size.max(1) as i32;
        let (x, y) = self.position();
        (
            (x + view_offset.0).div_euclid(cell),
            (y + view_offset.1).div_euclid(cell),
        )
    }
}
