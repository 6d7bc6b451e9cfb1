use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use serde::Serialize;
use tracing::info;
use ui_bridge::{GameBridge, InputKey, KeyStateSource, MenuSettings, TravelType};

use super::session::GameScript;

/// A request the UI made of the game, as reported per frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub(crate) enum GameCall {
    ApplySettings { settings: MenuSettings },
    SetPause { paused: bool },
    SuppressInput { suppressed: bool },
    Quit,
    Travel { url: String, travel: TravelType },
    SaveSlot { slot: i32, description: String },
}

#[derive(Debug, Default)]
struct GameState {
    calls: Vec<GameCall>,
    held: Vec<InputKey>,
    settings: Option<MenuSettings>,
    paused: bool,
    quit_requested: bool,
}

/// The runner's side of the scripted game.
#[derive(Debug, Clone, Default)]
pub(crate) struct GameHandle(Rc<RefCell<GameState>>);

impl GameHandle {
    pub(crate) fn set_held_keys(&self, keys: &[InputKey]) {
        self.0.borrow_mut().held = keys.to_vec();
    }

    pub(crate) fn take_calls(&self) -> Vec<GameCall> {
        std::mem::take(&mut self.0.borrow_mut().calls)
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.0.borrow().paused
    }

    pub(crate) fn quit_requested(&self) -> bool {
        self.0.borrow().quit_requested
    }
}

/// Answers the UI from a session script and records everything it is asked
/// to do. Applied settings become the settings it reports next time.
pub(crate) struct ScriptedGame {
    script: GameScript,
    state: GameHandle,
}

impl ScriptedGame {
    pub(crate) fn new(script: GameScript) -> (Self, GameHandle) {
        let state = GameHandle::default();
        state.0.borrow_mut().settings = script.settings;
        (
            Self {
                script,
                state: state.clone(),
            },
            state,
        )
    }

    fn record(&self, call: GameCall) {
        self.state.0.borrow_mut().calls.push(call);
    }
}

impl KeyStateSource for ScriptedGame {
    fn is_key_down(&self, key: InputKey) -> bool {
        self.state.0.borrow().held.contains(&key)
    }
}

impl GameBridge for ScriptedGame {
    fn apply_settings(&mut self, settings: &MenuSettings) {
        self.state.0.borrow_mut().settings = Some(*settings);
        self.record(GameCall::ApplySettings {
            settings: *settings,
        });
    }

    fn current_settings(&self) -> Option<MenuSettings> {
        self.state.0.borrow().settings
    }

    fn set_pause(&mut self, paused: bool) {
        self.state.0.borrow_mut().paused = paused;
        self.record(GameCall::SetPause { paused });
    }

    fn set_menu_input_suppression(&mut self, suppressed: bool) {
        self.record(GameCall::SuppressInput { suppressed });
    }

    fn quit(&mut self) {
        info!("scripted_game_quit");
        self.state.0.borrow_mut().quit_requested = true;
        self.record(GameCall::Quit);
    }

    fn start_travel(&mut self, url: &str, travel: TravelType) {
        info!(url, ?travel, "scripted_game_travel");
        self.record(GameCall::Travel {
            url: url.to_string(),
            travel,
        });
    }

    fn set_save_slot(&mut self, slot: i32, description: &str) {
        self.record(GameCall::SaveSlot {
            slot,
            description: description.to_string(),
        });
    }

    fn active_map(&self) -> Option<String> {
        self.script.active_map.clone()
    }

    fn start_map(&self) -> Option<String> {
        self.script.start_map.clone()
    }

    fn map_names(&self) -> Vec<String> {
        self.script.maps.clone()
    }

    fn game_root(&self) -> Option<PathBuf> {
        self.script.game_root.clone()
    }

    fn save_extension(&self) -> String {
        self.script
            .save_extension
            .clone()
            .unwrap_or_else(|| ui_bridge::DEFAULT_SAVE_EXTENSION.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_settings_are_reported_back() {
        let (mut game, handle) = ScriptedGame::new(GameScript::default());
        assert_eq!(game.current_settings(), None);

        let settings = MenuSettings {
            fov: 110,
            ..MenuSettings::default()
        };
        game.apply_settings(&settings);
        game.set_pause(true);

        assert_eq!(game.current_settings(), Some(settings));
        assert!(handle.is_paused());
        assert_eq!(
            handle.take_calls(),
            vec![
                GameCall::ApplySettings { settings },
                GameCall::SetPause { paused: true },
            ]
        );
        assert!(handle.take_calls().is_empty());
    }

    #[test]
    fn held_keys_come_from_the_handle() {
        let (game, handle) = ScriptedGame::new(GameScript::default());
        handle.set_held_keys(&[InputKey::Alt]);
        assert!(game.is_key_down(InputKey::Alt));
        handle.set_held_keys(&[]);
        assert!(!game.is_key_down(InputKey::Alt));
    }

    #[test]
    fn save_extension_defaults_when_unscripted() {
        let (game, _) = ScriptedGame::new(GameScript {
            save_extension: Some("sav".to_string()),
            ..GameScript::default()
        });
        assert_eq!(game.save_extension(), "sav");

        let (game, _) = ScriptedGame::new(GameScript::default());
        assert_eq!(game.save_extension(), ui_bridge::DEFAULT_SAVE_EXTENSION);
    }
}
