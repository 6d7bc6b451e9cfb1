use serde::{Deserialize, Serialize};

use crate::keymap::{map_key, map_mouse_button, InputKey, KeyIdentifier, KeyModifiers};
use crate::toolkit::UiContext;

/// One raw input event headed for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    MouseMove { x: i32, y: i32 },
    MouseButtonDown { button: i32 },
    MouseButtonUp { button: i32 },
    MouseWheel { delta: f32 },
    KeyDown { key: InputKey },
    KeyUp { key: InputKey },
    Text { text: String },
    MouseLeave,
}

impl InputEvent {
    /// Button press for a game mouse key; unmapped keys yield a negative index.
    pub fn button_down(key: InputKey) -> Self {
        InputEvent::MouseButtonDown {
            button: map_mouse_button(key),
        }
    }

    pub fn button_up(key: InputKey) -> Self {
        InputEvent::MouseButtonUp {
            button: map_mouse_button(key),
        }
    }
}

/// Forwards `event` to the context and reports whether the UI consumed it.
/// Untranslatable keys and negative buttons are rejected before forwarding.
pub fn route_input(context: &mut dyn UiContext, modifiers: KeyModifiers, event: &InputEvent) -> bool {
    let propagated = match event {
        InputEvent::MouseMove { x, y } => context.process_mouse_move(*x, *y, modifiers),
        InputEvent::MouseButtonDown { button } => {
            if *button < 0 {
                return false;
            }
            context.process_mouse_button_down(*button, modifiers)
        }
        InputEvent::MouseButtonUp { button } => {
            if *button < 0 {
                return false;
            }
            context.process_mouse_button_up(*button, modifiers)
        }
        InputEvent::MouseWheel { delta } => context.process_mouse_wheel(*delta, modifiers),
        InputEvent::KeyDown { key } => match map_key(*key) {
            KeyIdentifier::Unknown => return false,
            identifier => context.process_key_down(identifier, modifiers),
        },
        InputEvent::KeyUp { key } => match map_key(*key) {
            KeyIdentifier::Unknown => return false,
            identifier => context.process_key_up(identifier, modifiers),
        },
        InputEvent::Text { text } => context.process_text_input(text),
        InputEvent::MouseLeave => context.process_mouse_leave(),
    };
    !propagated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_parse_from_tagged_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"kind":"key_down","key":"Escape"}"#).expect("parse");
        assert_eq!(event, InputEvent::KeyDown { key: InputKey::Escape });

        let event: InputEvent = serde_json::from_str(r#"{"kind":"mouse_leave"}"#).expect("parse");
        assert_eq!(event, InputEvent::MouseLeave);
    }

    #[test]
    fn button_helpers_use_the_key_map() {
        assert_eq!(
            InputEvent::button_down(InputKey::RightMouse),
            InputEvent::MouseButtonDown { button: 1 }
        );
        assert_eq!(
            InputEvent::button_up(InputKey::Joy1),
            InputEvent::MouseButtonUp { button: -1 }
        );
    }
}
