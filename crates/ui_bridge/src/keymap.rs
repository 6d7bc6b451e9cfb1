use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub const UNMAPPED_MOUSE_BUTTON: i32 = -1;

/// Game-side key enumeration, as the engine reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKey {
    None,
    LeftMouse,
    RightMouse,
    MiddleMouse,
    Backspace,
    Tab,
    Enter,
    Shift,
    Ctrl,
    Alt,
    Pause,
    CapsLock,
    Escape,
    Space,
    PageUp,
    PageDown,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Select,
    Print,
    PrintScrn,
    Insert,
    Delete,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    NumPad0,
    NumPad1,
    NumPad2,
    NumPad3,
    NumPad4,
    NumPad5,
    NumPad6,
    NumPad7,
    NumPad8,
    NumPad9,
    GreyStar,
    GreyPlus,
    Separator,
    GreyMinus,
    NumPadPeriod,
    GreySlash,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    NumLock,
    ScrollLock,
    LShift,
    RShift,
    LControl,
    RControl,
    Semicolon,
    Equals,
    Comma,
    Minus,
    Period,
    Slash,
    Tilde,
    LeftBracket,
    Backslash,
    RightBracket,
    SingleQuote,
    MouseWheelUp,
    MouseWheelDown,
    MouseX,
    MouseY,
    Joy1,
    Joy2,
}

/// Toolkit-side key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIdentifier {
    Unknown,
    Space,
    Num0,
    Num1,
    Num2,
    Num3,
    Num4,
    Num5,
    Num6,
    Num7,
    Num8,
    Num9,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    /// `;`
    Oem1,
    OemPlus,
    OemComma,
    OemMinus,
    OemPeriod,
    /// `/`
    Oem2,
    /// `` ` ``
    Oem3,
    /// `[`
    Oem4,
    /// `\`
    Oem5,
    /// `]`
    Oem6,
    /// `'`
    Oem7,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    Multiply,
    Add,
    Separator,
    Subtract,
    Decimal,
    Divide,
    Back,
    Tab,
    Return,
    Pause,
    Capital,
    Escape,
    Prior,
    Next,
    End,
    Home,
    Left,
    Up,
    Right,
    Down,
    Insert,
    Delete,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    NumLock,
    Scroll,
    LShift,
    RShift,
    LControl,
    RControl,
}

bitflags! {
    #[derive(Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
        const CAPSLOCK = 1 << 4;
        const NUMLOCK = 1 << 5;
        const SCROLLLOCK = 1 << 6;
    }
}

/// Anything that can answer "is this key held right now".
pub trait KeyStateSource {
    fn is_key_down(&self, key: InputKey) -> bool;
}

const MODIFIER_KEYS: [(KeyModifiers, &[InputKey]); 6] = [
    (
        KeyModifiers::CTRL,
        &[InputKey::Ctrl, InputKey::LControl, InputKey::RControl],
    ),
    (
        KeyModifiers::SHIFT,
        &[InputKey::Shift, InputKey::LShift, InputKey::RShift],
    ),
    (KeyModifiers::ALT, &[InputKey::Alt]),
    (KeyModifiers::CAPSLOCK, &[InputKey::CapsLock]),
    (KeyModifiers::NUMLOCK, &[InputKey::NumLock]),
    (KeyModifiers::SCROLLLOCK, &[InputKey::ScrollLock]),
];

pub fn key_modifier_state(keys: Option<&dyn KeyStateSource>) -> KeyModifiers {
    let Some(keys) = keys else {
        return KeyModifiers::empty();
    };

    MODIFIER_KEYS
        .iter()
        .filter(|(_, physical)| physical.iter().any(|key| keys.is_key_down(*key)))
        .fold(KeyModifiers::empty(), |state, (bit, _)| state | *bit)
}

pub fn map_mouse_button(key: InputKey) -> i32 {
    match key {
        InputKey::LeftMouse => 0,
        InputKey::RightMouse => 1,
        InputKey::MiddleMouse => 2,
        _ => UNMAPPED_MOUSE_BUTTON,
    }
}

pub fn map_key(key: InputKey) -> KeyIdentifier {
    use InputKey as Ik;
    use KeyIdentifier as Ki;

    match key {
        Ik::A => Ki::A,
        Ik::B => Ki::B,
        Ik::C => Ki::C,
        Ik::D => Ki::D,
        Ik::E => Ki::E,
        Ik::F => Ki::F,
        Ik::G => Ki::G,
        Ik::H => Ki::H,
        Ik::I => Ki::I,
        Ik::J => Ki::J,
        Ik::K => Ki::K,
        Ik::L => Ki::L,
        Ik::M => Ki::M,
        Ik::N => Ki::N,
        Ik::O => Ki::O,
        Ik::P => Ki::P,
        Ik::Q => Ki::Q,
        Ik::R => Ki::R,
        Ik::S => Ki::S,
        Ik::T => Ki::T,
        Ik::U => Ki::U,
        Ik::V => Ki::V,
        Ik::W => Ki::W,
        Ik::X => Ki::X,
        Ik::Y => Ki::Y,
        Ik::Z => Ki::Z,

        Ik::Key0 => Ki::Num0,
        Ik::Key1 => Ki::Num1,
        Ik::Key2 => Ki::Num2,
        Ik::Key3 => Ki::Num3,
        Ik::Key4 => Ki::Num4,
        Ik::Key5 => Ki::Num5,
        Ik::Key6 => Ki::Num6,
        Ik::Key7 => Ki::Num7,
        Ik::Key8 => Ki::Num8,
        Ik::Key9 => Ki::Num9,

        Ik::NumPad0 => Ki::Numpad0,
        Ik::NumPad1 => Ki::Numpad1,
        Ik::NumPad2 => Ki::Numpad2,
        Ik::NumPad3 => Ki::Numpad3,
        Ik::NumPad4 => Ki::Numpad4,
        Ik::NumPad5 => Ki::Numpad5,
        Ik::NumPad6 => Ki::Numpad6,
        Ik::NumPad7 => Ki::Numpad7,
        Ik::NumPad8 => Ki::Numpad8,
        Ik::NumPad9 => Ki::Numpad9,

        Ik::GreyStar => Ki::Multiply,
        Ik::GreyPlus => Ki::Add,
        Ik::Separator => Ki::Separator,
        Ik::GreyMinus => Ki::Subtract,
        Ik::NumPadPeriod => Ki::Decimal,
        Ik::GreySlash => Ki::Divide,

        Ik::F1 => Ki::F1,
        Ik::F2 => Ki::F2,
        Ik::F3 => Ki::F3,
        Ik::F4 => Ki::F4,
        Ik::F5 => Ki::F5,
        Ik::F6 => Ki::F6,
        Ik::F7 => Ki::F7,
        Ik::F8 => Ki::F8,
        Ik::F9 => Ki::F9,
        Ik::F10 => Ki::F10,
        Ik::F11 => Ki::F11,
        Ik::F12 => Ki::F12,

        Ik::Backspace => Ki::Back,
        Ik::Tab => Ki::Tab,
        Ik::Enter => Ki::Return,
        Ik::Pause => Ki::Pause,
        Ik::CapsLock => Ki::Capital,
        Ik::Escape => Ki::Escape,
        Ik::Space => Ki::Space,

        Ik::PageUp => Ki::Prior,
        Ik::PageDown => Ki::Next,
        Ik::End => Ki::End,
        Ik::Home => Ki::Home,
        Ik::Left => Ki::Left,
        Ik::Up => Ki::Up,
        Ik::Right => Ki::Right,
        Ik::Down => Ki::Down,

        Ik::Insert => Ki::Insert,
        Ik::Delete => Ki::Delete,

        Ik::NumLock => Ki::NumLock,
        Ik::ScrollLock => Ki::Scroll,

        Ik::LShift => Ki::LShift,
        Ik::RShift => Ki::RShift,
        Ik::LControl => Ki::LControl,
        Ik::RControl => Ki::RControl,

        Ik::Semicolon => Ki::Oem1,
        Ik::Equals => Ki::OemPlus,
        Ik::Comma => Ki::OemComma,
        Ik::Minus => Ki::OemMinus,
        Ik::Period => Ki::OemPeriod,
        Ik::Slash => Ki::Oem2,
        Ik::Tilde => Ki::Oem3,
        Ik::LeftBracket => Ki::Oem4,
        Ik::Backslash => Ki::Oem5,
        Ik::RightBracket => Ki::Oem6,
        Ik::SingleQuote => Ki::Oem7,

        _ => Ki::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct HeldSet(HashSet<InputKey>);

    impl KeyStateSource for HeldSet {
        fn is_key_down(&self, key: InputKey) -> bool {
            self.0.contains(&key)
        }
    }

    fn held(keys: &[InputKey]) -> HeldSet {
        HeldSet(keys.iter().copied().collect())
    }

    #[test]
    fn mouse_buttons_map_to_small_indices() {
        assert_eq!(map_mouse_button(InputKey::LeftMouse), 0);
        assert_eq!(map_mouse_button(InputKey::RightMouse), 1);
        assert_eq!(map_mouse_button(InputKey::MiddleMouse), 2);
        assert_eq!(map_mouse_button(InputKey::Space), UNMAPPED_MOUSE_BUTTON);
        assert_eq!(map_mouse_button(InputKey::MouseWheelUp), UNMAPPED_MOUSE_BUTTON);
    }

    #[test]
    fn representative_keys_translate() {
        assert_eq!(map_key(InputKey::A), KeyIdentifier::A);
        assert_eq!(map_key(InputKey::Key7), KeyIdentifier::Num7);
        assert_eq!(map_key(InputKey::NumPad3), KeyIdentifier::Numpad3);
        assert_eq!(map_key(InputKey::Enter), KeyIdentifier::Return);
        assert_eq!(map_key(InputKey::PageUp), KeyIdentifier::Prior);
        assert_eq!(map_key(InputKey::Tilde), KeyIdentifier::Oem3);
        assert_eq!(map_key(InputKey::GreySlash), KeyIdentifier::Divide);
    }

    #[test]
    fn keys_without_ui_meaning_are_unknown() {
        for key in [
            InputKey::None,
            InputKey::LeftMouse,
            InputKey::MouseX,
            InputKey::Joy1,
            InputKey::Shift,
            InputKey::Alt,
        ] {
            assert_eq!(map_key(key), KeyIdentifier::Unknown, "{key:?}");
        }
    }

    #[test]
    fn modifier_state_without_source_is_empty() {
        assert_eq!(key_modifier_state(None), KeyModifiers::empty());
    }

    #[test]
    fn either_physical_control_sets_ctrl() {
        for key in [InputKey::Ctrl, InputKey::LControl, InputKey::RControl] {
            let keys = held(&[key]);
            assert_eq!(key_modifier_state(Some(&keys)), KeyModifiers::CTRL);
        }
    }

    #[test]
    fn modifier_bits_combine() {
        let keys = held(&[InputKey::RShift, InputKey::Alt, InputKey::CapsLock, InputKey::A]);
        assert_eq!(
            key_modifier_state(Some(&keys)),
            KeyModifiers::SHIFT | KeyModifiers::ALT | KeyModifiers::CAPSLOCK
        );

        let locks = held(&[InputKey::NumLock, InputKey::ScrollLock]);
        assert_eq!(
            key_modifier_state(Some(&locks)),
            KeyModifiers::NUMLOCK | KeyModifiers::SCROLLLOCK
        );
    }
}
