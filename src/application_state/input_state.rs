//! # Input State
//!
//! Snapshot types produced by the input manager each frame.

use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Per-frame state of a key, derived from its previous and current raw
/// pressed flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key is not pressed.
    #[default]
    NotPressed,
    /// Key went down this frame.
    Pressed,
    /// Key has been down for more than one frame.
    Held,
    /// Key went up this frame.
    Released,
}

impl RawInputState {
    /// Whether the key is currently down, regardless of when it went down.
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Derives the transition state from last frame's and this frame's raw
    /// pressed flags.
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// One frame's processed input: key transition states plus the mouse motion
/// accumulated since the previous frame.
pub struct ProcessedInputState {
    /// State of every tracked key.
    pub keyboard_states: HashMap<KeyCode, RawInputState>,
    /// Mouse movement delta since the last frame, if the mouse moved.
    pub mouse_delta: Option<(f64, f64)>,
}

impl ProcessedInputState {
    /// The state of a key; untracked keys read as not pressed.
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// The mouse movement delta for this frame.
    pub fn get_mouse_delta(&self) -> Option<(f64, f64)> {
        self.mouse_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_follow_raw_flag_pairs() {
        assert_eq!(
            RawInputState::from_raw_states(false, true),
            RawInputState::Pressed
        );
        assert_eq!(
            RawInputState::from_raw_states(true, true),
            RawInputState::Held
        );
        assert_eq!(
            RawInputState::from_raw_states(true, false),
            RawInputState::Released
        );
        assert!(RawInputState::Pressed.is_active());
        assert!(RawInputState::Held.is_active());
        assert!(!RawInputState::Released.is_active());
    }

    #[test]
    fn untracked_keys_read_as_not_pressed() {
        let state = ProcessedInputState {
            keyboard_states: HashMap::new(),
            mouse_delta: None,
        };
        assert_eq!(
            state.get_key_state(KeyCode::KeyW),
            RawInputState::NotPressed
        );
    }
}
