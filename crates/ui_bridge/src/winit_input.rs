use std::collections::HashSet;

use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keymap::{InputKey, KeyStateSource};

pub fn input_key_from_key_code(code: KeyCode) -> InputKey {
    match code {
        KeyCode::KeyA => InputKey::A,
        KeyCode::KeyB => InputKey::B,
        KeyCode::KeyC => InputKey::C,
        KeyCode::KeyD => InputKey::D,
        KeyCode::KeyE => InputKey::E,
        KeyCode::KeyF => InputKey::F,
        KeyCode::KeyG => InputKey::G,
        KeyCode::KeyH => InputKey::H,
        KeyCode::KeyI => InputKey::I,
        KeyCode::KeyJ => InputKey::J,
        KeyCode::KeyK => InputKey::K,
        KeyCode::KeyL => InputKey::L,
        KeyCode::KeyM => InputKey::M,
        KeyCode::KeyN => InputKey::N,
        KeyCode::KeyO => InputKey::O,
        KeyCode::KeyP => InputKey::P,
        KeyCode::KeyQ => InputKey::Q,
        KeyCode::KeyR => InputKey::R,
        KeyCode::KeyS => InputKey::S,
        KeyCode::KeyT => InputKey::T,
        KeyCode::KeyU => InputKey::U,
        KeyCode::KeyV => InputKey::V,
        KeyCode::KeyW => InputKey::W,
        KeyCode::KeyX => InputKey::X,
        KeyCode::KeyY => InputKey::Y,
        KeyCode::KeyZ => InputKey::Z,
        KeyCode::Digit0 => InputKey::Key0,
        KeyCode::Digit1 => InputKey::Key1,
        KeyCode::Digit2 => InputKey::Key2,
        KeyCode::Digit3 => InputKey::Key3,
        KeyCode::Digit4 => InputKey::Key4,
        KeyCode::Digit5 => InputKey::Key5,
        KeyCode::Digit6 => InputKey::Key6,
        KeyCode::Digit7 => InputKey::Key7,
        KeyCode::Digit8 => InputKey::Key8,
        KeyCode::Digit9 => InputKey::Key9,
        KeyCode::Numpad0 => InputKey::NumPad0,
        KeyCode::Numpad1 => InputKey::NumPad1,
        KeyCode::Numpad2 => InputKey::NumPad2,
        KeyCode::Numpad3 => InputKey::NumPad3,
        KeyCode::Numpad4 => InputKey::NumPad4,
        KeyCode::Numpad5 => InputKey::NumPad5,
        KeyCode::Numpad6 => InputKey::NumPad6,
        KeyCode::Numpad7 => InputKey::NumPad7,
        KeyCode::Numpad8 => InputKey::NumPad8,
        KeyCode::Numpad9 => InputKey::NumPad9,
        KeyCode::NumpadMultiply => InputKey::GreyStar,
        KeyCode::NumpadAdd => InputKey::GreyPlus,
        KeyCode::NumpadComma => InputKey::Separator,
        KeyCode::NumpadSubtract => InputKey::GreyMinus,
        KeyCode::NumpadDecimal => InputKey::NumPadPeriod,
        KeyCode::NumpadDivide => InputKey::GreySlash,
        KeyCode::NumpadEnter | KeyCode::Enter => InputKey::Enter,
        KeyCode::F1 => InputKey::F1,
        KeyCode::F2 => InputKey::F2,
        KeyCode::F3 => InputKey::F3,
        KeyCode::F4 => InputKey::F4,
        KeyCode::F5 => InputKey::F5,
        KeyCode::F6 => InputKey::F6,
        KeyCode::F7 => InputKey::F7,
        KeyCode::F8 => InputKey::F8,
        KeyCode::F9 => InputKey::F9,
        KeyCode::F10 => InputKey::F10,
        KeyCode::F11 => InputKey::F11,
        KeyCode::F12 => InputKey::F12,
        KeyCode::Backspace => InputKey::Backspace,
        KeyCode::Tab => InputKey::Tab,
        KeyCode::Pause => InputKey::Pause,
        KeyCode::CapsLock => InputKey::CapsLock,
        KeyCode::Escape => InputKey::Escape,
        KeyCode::Space => InputKey::Space,
        KeyCode::PageUp => InputKey::PageUp,
        KeyCode::PageDown => InputKey::PageDown,
        KeyCode::End => InputKey::End,
        KeyCode::Home => InputKey::Home,
        KeyCode::ArrowLeft => InputKey::Left,
        KeyCode::ArrowUp => InputKey::Up,
        KeyCode::ArrowRight => InputKey::Right,
        KeyCode::ArrowDown => InputKey::Down,
        KeyCode::Insert => InputKey::Insert,
        KeyCode::Delete => InputKey::Delete,
        KeyCode::PrintScreen => InputKey::PrintScrn,
        KeyCode::NumLock => InputKey::NumLock,
        KeyCode::ScrollLock => InputKey::ScrollLock,
        KeyCode::ShiftLeft => InputKey::LShift,
        KeyCode::ShiftRight => InputKey::RShift,
        KeyCode::ControlLeft => InputKey::LControl,
        KeyCode::ControlRight => InputKey::RControl,
        KeyCode::AltLeft | KeyCode::AltRight => InputKey::Alt,
        KeyCode::Semicolon => InputKey::Semicolon,
        KeyCode::Equal => InputKey::Equals,
        KeyCode::Comma => InputKey::Comma,
        KeyCode::Minus => InputKey::Minus,
        KeyCode::Period => InputKey::Period,
        KeyCode::Slash => InputKey::Slash,
        KeyCode::Backquote => InputKey::Tilde,
        KeyCode::BracketLeft => InputKey::LeftBracket,
        KeyCode::Backslash => InputKey::Backslash,
        KeyCode::BracketRight => InputKey::RightBracket,
        KeyCode::Quote => InputKey::SingleQuote,
        _ => InputKey::None,
    }
}

pub fn input_key_from_physical(key: PhysicalKey) -> InputKey {
    match key {
        PhysicalKey::Code(code) => input_key_from_key_code(code),
        PhysicalKey::Unidentified(_) => InputKey::None,
    }
}

pub fn input_key_from_mouse_button(button: MouseButton) -> InputKey {
    match button {
        MouseButton::Left => InputKey::LeftMouse,
        MouseButton::Right => InputKey::RightMouse,
        MouseButton::Middle => InputKey::MiddleMouse,
        _ => InputKey::None,
    }
}

/// Tracks which game keys are held, fed from window key/button events.
#[derive(Debug, Default, Clone)]
pub struct HeldKeys {
    down: HashSet<InputKey>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: InputKey, state: ElementState) {
        if key == InputKey::None {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.down.insert(key);
            }
            ElementState::Released => {
                self.down.remove(&key);
            }
        }
    }

    pub fn record_physical(&mut self, key: PhysicalKey, state: ElementState) -> InputKey {
        let key = input_key_from_physical(key);
        self.record(key, state);
        key
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }
}

impl KeyStateSource for HeldKeys {
    fn is_key_down(&self, key: InputKey) -> bool {
        self.down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::{key_modifier_state, map_key, KeyIdentifier, KeyModifiers};

    #[test]
    fn letters_digits_and_arrows_convert() {
        assert_eq!(input_key_from_key_code(KeyCode::KeyQ), InputKey::Q);
        assert_eq!(input_key_from_key_code(KeyCode::Digit4), InputKey::Key4);
        assert_eq!(input_key_from_key_code(KeyCode::ArrowUp), InputKey::Up);
        assert_eq!(input_key_from_key_code(KeyCode::Backquote), InputKey::Tilde);
    }

    #[test]
    fn converted_keys_reach_the_ui_key_space() {
        let key = input_key_from_key_code(KeyCode::NumpadSubtract);
        assert_eq!(map_key(key), KeyIdentifier::Subtract);
    }

    #[test]
    fn unmapped_codes_become_none() {
        assert_eq!(input_key_from_key_code(KeyCode::AudioVolumeUp), InputKey::None);
        assert_eq!(
            input_key_from_mouse_button(MouseButton::Other(7)),
            InputKey::None
        );
    }

    #[test]
    fn held_keys_feed_modifier_state() {
        let mut held = HeldKeys::new();
        held.record_physical(PhysicalKey::Code(KeyCode::ControlLeft), ElementState::Pressed);
        held.record_physical(PhysicalKey::Code(KeyCode::ShiftRight), ElementState::Pressed);
        assert_eq!(
            key_modifier_state(Some(&held)),
            KeyModifiers::CTRL | KeyModifiers::SHIFT
        );

        held.record(InputKey::LControl, ElementState::Released);
        assert_eq!(key_modifier_state(Some(&held)), KeyModifiers::SHIFT);

        held.clear();
        assert_eq!(key_modifier_state(Some(&held)), KeyModifiers::empty());
    }
}
