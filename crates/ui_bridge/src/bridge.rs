use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::keymap::KeyStateSource;
use crate::menu::MenuSettings;

pub const DEFAULT_SAVE_EXTENSION: &str = "usa";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelType {
    Absolute,
    Partial,
    Relative,
}

/// Everything the UI layer needs from the running game.
pub trait GameBridge: KeyStateSource {
    fn apply_settings(&mut self, settings: &MenuSettings);
    fn current_settings(&self) -> Option<MenuSettings>;
    fn set_pause(&mut self, paused: bool);
    /// While set, gameplay input stays blocked so the menu owns the keyboard.
    fn set_menu_input_suppression(&mut self, suppressed: bool);
    fn quit(&mut self);
    fn start_travel(&mut self, url: &str, travel: TravelType);
    fn set_save_slot(&mut self, slot: i32, description: &str);

    fn active_map(&self) -> Option<String>;
    fn start_map(&self) -> Option<String>;
    fn map_names(&self) -> Vec<String>;
    fn game_root(&self) -> Option<PathBuf>;

    fn save_extension(&self) -> String {
        DEFAULT_SAVE_EXTENSION.to_string()
    }
}
