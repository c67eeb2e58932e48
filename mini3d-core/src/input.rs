//! Input state shared between the event-driven host and the per-tick
//! camera controller.
//!
//! Event callbacks write; the controller drains the accumulated deltas
//! exactly once per tick through the destructive `consume_*` reads. This
//! drain-on-read contract assumes a single-threaded event queue.

use std::collections::HashSet;

/// Host-agnostic movement actions; the host maps raw key codes to these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    /// Speed-boost modifier.
    Fast,
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Action>,
    mouse_dx: f64,
    mouse_dy: f64,
    wheel: f64,
    look_held: bool,
    /// When set, mouse deltas accumulate only while the look trigger
    /// (typically a held right button) is active.
    pub rotate_only_while_look_held: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            wheel: 0.0,
            look_held: false,
            rotate_only_while_look_held: true,
        }
    }

    pub fn set_action(&mut self, action: Action, down: bool) {
        if down {
            self.held.insert(action);
        } else {
            self.held.remove(&action);
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    pub fn clear_actions(&mut self) {
        self.held.clear();
    }

    pub fn set_look_held(&mut self, held: bool) {
        self.look_held = held;
    }

    pub fn look_held(&self) -> bool {
        self.look_held
    }

    /// Accumulates a mouse movement, subject to the look gate.
    pub fn push_mouse_delta(&mut self, dx: f64, dy: f64) {
        if self.rotate_only_while_look_held && !self.look_held {
            return;
        }
        self.mouse_dx += dx;
        self.mouse_dy += dy;
    }

    pub fn push_wheel(&mut self, delta: f64) {
        self.wheel += delta;
    }

    /// Destructive read: returns the accumulated delta and resets it.
    pub fn consume_mouse_dx(&mut self) -> f64 {
        std::mem::take(&mut self.mouse_dx)
    }

    pub fn consume_mouse_dy(&mut self) -> f64 {
        std::mem::take(&mut self.mouse_dy)
    }

    pub fn consume_wheel(&mut self) -> f64 {
        std::mem::take(&mut self.wheel)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
