use std::collections::HashSet;

use glam::Vec2;

use crate::event::{InputEvent, Key, TOUCH_KEY};

/// Input state as seen by one frame step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    held: HashSet<Key>,
    drag_delta: Vec2,
    pointer_down: bool,
    pointer_position: Vec2,
}

impl InputSnapshot {
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Last pointer displacement while dragging, with "up" positive.
    /// Zero once the pointer is released.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    pub fn pointer_position(&self) -> Vec2 {
        self.pointer_position
    }

    /// `+1`, `-1` or `0` depending on which of the two opposing keys are held.
    pub fn axis(&self, positive: Key, negative: Key) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }
}

/// Accumulates device events between frames.
///
/// Platform callbacks `push` events; the frame step calls `drain` once to
/// apply them in order and read the resulting snapshot.
#[derive(Debug, Default)]
pub struct InputTracker {
    pending: Vec<InputEvent>,
    state: InputSnapshot,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for the next frame.
    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Number of events waiting for the next `drain`.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Apply every queued event and return the snapshot for this frame.
    pub fn drain(&mut self) -> &InputSnapshot {
        let events = std::mem::take(&mut self.pending);
        if !events.is_empty() {
            tracing::trace!(count = events.len(), "draining input events");
        }
        for event in &events {
            self.apply(*event);
        }
        // Hand the allocation back so steady-state frames do not reallocate.
        self.pending = events;
        self.pending.clear();
        &self.state
    }

    /// Current state without applying queued events.
    pub fn snapshot(&self) -> &InputSnapshot {
        &self.state
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.on_key_down(key),
            InputEvent::KeyUp(key) => self.on_key_up(key),
            InputEvent::PointerDown { position } => self.on_pointer_down(position),
            InputEvent::PointerMove { position } => self.on_pointer_move(position),
            InputEvent::PointerUp => self.on_pointer_up(),
            InputEvent::TouchStart { position } => {
                self.on_key_down(TOUCH_KEY);
                self.on_pointer_down(position);
            }
            InputEvent::TouchMove { position } => self.on_pointer_move(position),
            InputEvent::TouchEnd => {
                self.on_pointer_up();
                self.on_key_up(TOUCH_KEY);
            }
        }
    }

    pub fn on_key_down(&mut self, key: Key) {
        self.state.held.insert(key);
    }

    pub fn on_key_up(&mut self, key: Key) {
        self.state.held.remove(&key);
    }

    pub fn on_pointer_down(&mut self, position: Option<Vec2>) {
        self.state.pointer_down = true;
        self.state.pointer_position = position.unwrap_or(Vec2::ZERO);
    }

    /// Ignored unless the pointer is down. The newest move replaces the
    /// delta instead of adding to it.
    pub fn on_pointer_move(&mut self, position: Option<Vec2>) {
        if !self.state.pointer_down {
            return;
        }
        let current = position.unwrap_or(Vec2::ZERO);
        let previous = self.state.pointer_position;
        // Screen Y grows downwards; dragging up must read as positive.
        self.state.drag_delta = Vec2::new(current.x - previous.x, previous.y - current.y);
        self.state.pointer_position = current;
    }

    pub fn on_pointer_up(&mut self) {
        self.state.pointer_down = false;
        self.state.drag_delta = Vec2::ZERO;
    }
}
