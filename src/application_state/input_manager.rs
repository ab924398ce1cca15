//! # Input Manager
//!
//! Tracks raw keyboard and mouse state across frames and turns it into the
//! per-frame [`ProcessedInputState`] snapshot the engine consumes.

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{ProcessedInputState, RawInputState};

/// The keys the demo reacts to. Everything else is ignored at intake.
const KEY_CODES: [KeyCode; 6] = [
    KeyCode::KeyW,
    KeyCode::KeyS,
    KeyCode::KeyA,
    KeyCode::KeyD,
    KeyCode::Space,
    KeyCode::ShiftLeft,
];

/// Raw input accumulator.
///
/// Keeps last frame's and this frame's pressed flags per key so the snapshot
/// can distinguish presses from holds, plus the mouse delta accumulated since
/// the last snapshot.
pub struct InputManager {
    keyboard_inputs_old: HashMap<KeyCode, bool>,
    keyboard_inputs_new: HashMap<KeyCode, bool>,
    mouse_delta: Option<(f64, f64)>,
}

impl InputManager {
    /// Creates a manager with all tracked keys released.
    pub fn new() -> Self {
        let mut keyboard_inputs_old = HashMap::new();
        let mut keyboard_inputs_new = HashMap::new();
        for key_code in KEY_CODES {
            keyboard_inputs_old.insert(key_code, false);
            keyboard_inputs_new.insert(key_code, false);
        }

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_delta: None,
        }
    }

    /// Folds a window event into the raw state. Only keyboard events matter;
    /// mouse motion arrives through [`Self::intake_mouse_motion`].
    pub fn intake_input(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    state,
                    physical_key: PhysicalKey::Code(key),
                    ..
                },
            ..
        } = event
        {
            if let Some(key_state) = self.keyboard_inputs_new.get_mut(key) {
                *key_state = *state == ElementState::Pressed;
            }
        }
    }

    /// Accumulates raw mouse motion for the current frame.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta = Some(match self.mouse_delta {
            Some((x, y)) => (x + delta.0, y + delta.1),
            None => delta,
        });
    }

    /// Produces this frame's snapshot and rolls the raw state forward.
    pub fn get_and_reset_processed_input(&mut self) -> Option<ProcessedInputState> {
        let mut keyboard_states = HashMap::new();
        for (key, &new_state) in self.keyboard_inputs_new.iter() {
            let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
            keyboard_states.insert(*key, RawInputState::from_raw_states(old_state, new_state));
        }

        let processed = ProcessedInputState {
            keyboard_states,
            mouse_delta: self.mouse_delta,
        };

        self.move_old_states();
        self.mouse_delta = None;

        Some(processed)
    }

    /// Forces all keys to released, e.g. when the window loses focus, so no
    /// key reads as stuck held.
    pub fn reset_inputs(&mut self) {
        for state in self.keyboard_inputs_new.values_mut() {
            *state = false;
        }
        self.move_old_states();
        self.mouse_delta = None;
    }

    fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(manager: &mut InputManager, key: KeyCode) {
        *manager.keyboard_inputs_new.get_mut(&key).unwrap() = true;
    }

    #[test]
    fn press_becomes_held_after_one_snapshot() {
        let mut manager = InputManager::new();
        press(&mut manager, KeyCode::KeyW);

        let first = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(first.get_key_state(KeyCode::KeyW), RawInputState::Pressed);

        let second = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(second.get_key_state(KeyCode::KeyW), RawInputState::Held);
    }

    #[test]
    fn mouse_motion_accumulates_within_a_frame() {
        let mut manager = InputManager::new();
        manager.intake_mouse_motion((1.0, 2.0));
        manager.intake_mouse_motion((3.0, -1.0));

        let snapshot = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(snapshot.get_mouse_delta(), Some((4.0, 1.0)));

        // Delta does not carry over to the next frame.
        let next = manager.get_and_reset_processed_input().unwrap();
        assert_eq!(next.get_mouse_delta(), None);
    }

    #[test]
    fn reset_clears_held_keys() {
        let mut manager = InputManager::new();
        press(&mut manager, KeyCode::Space);
        manager.get_and_reset_processed_input();

        manager.reset_inputs();
        let snapshot = manager.get_and_reset_processed_input().unwrap();
        assert!(!snapshot.get_key_state(KeyCode::Space).is_active());
    }
}
