//! Keyboard state with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` is true every frame the key is
//!   down. Movement reads this.
//!
//! - **Edge-triggered (just_pressed / just_released):** true only during the
//!   frame the transition happened. Jumping reads this, so holding the jump key
//!   does not chain jumps. `end_frame()` clears the edges once a simulation
//!   step has consumed them.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    Escape,
    W,
    A,
    D,
}

/// Anything the simulation can poll for the current key state: the live
/// window backend, a replay, or a test fixture.
pub trait InputSource {
    fn is_held(&self, key: Key) -> bool;
    fn is_just_pressed(&self, key: Key) -> bool;
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    /// Drive a key to `down` without producing an edge when nothing changed.
    pub fn set_key(&mut self, key: Key, down: bool) {
        if down {
            self.key_down(key);
        } else {
            self.key_up(key);
        }
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl InputSource for InputState {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }
}
