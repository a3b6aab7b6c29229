//! Application events
//!
//! Window input is translated into [`AppEvent`]s and pushed into a
//! double-buffered [`EventQueue`]. Events pushed during one frame become
//! visible after the next [`EventQueue::swap`], so the application sees a
//! consistent batch at the start of every update.

use std::collections::VecDeque;

use winit::keyboard::KeyCode;

/// Input and window events consumed by the application
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum AppEvent {
    /// The window was asked to close
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// Mouse button pressed: 1 left, 2 middle, 3 right
    MouseDown(u8),
    /// Mouse button released
    MouseUp(u8),
    /// Cursor position in window pixels
    CursorMoved(f32, f32),
    CursorEntered,
    CursorLeft,
    /// Vertical wheel movement in lines, positive away from the user
    MouseWheel(f32),
    /// New inner window size in pixels
    WindowResized(u32, u32),
}

/// Double-buffered event queue
///
/// Events pushed during frame N are read during frame N+1.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<AppEvent>,
    /// Events from the previous frame, ready for processing
    processing: VecDeque<AppEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Queue an event; it becomes visible after the next `swap()`
    #[inline]
    pub fn push(&mut self, event: AppEvent) {
        self.pending.push_back(event);
    }

    /// Make the pending events readable and start a new pending batch
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &AppEvent> {
        self.processing.iter()
    }

    /// Take the readable events
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = AppEvent> + '_ {
        self.processing.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop both batches, used when switching worlds
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
