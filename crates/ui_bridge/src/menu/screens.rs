use serde::{Deserialize, Serialize};

use super::settings::menu_field;
use crate::viewmodel::MenuViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuScreen {
    Main,
    Game,
    Botmatch,
    Newgame,
    Options,
    Audiovideo,
    Save,
    Load,
    Quit,
}

#[derive(Clone, Copy)]
pub struct ScreenEntry {
    pub screen: MenuScreen,
    pub name: &'static str,
    pub binding: &'static str,
    /// Where `back` leads from this screen.
    pub parent: MenuScreen,
    pub flag: fn(&mut MenuViewModel) -> &mut bool,
}

pub const SCREENS: &[ScreenEntry] = &[
    ScreenEntry {
        screen: MenuScreen::Main,
        name: "main",
        binding: "show_main",
        parent: MenuScreen::Main,
        flag: menu_field!(show_main: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Game,
        name: "game",
        binding: "show_game",
        parent: MenuScreen::Main,
        flag: menu_field!(show_game: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Botmatch,
        name: "botmatch",
        binding: "show_botmatch",
        parent: MenuScreen::Game,
        flag: menu_field!(show_botmatch: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Newgame,
        name: "newgame",
        binding: "show_newgame",
        parent: MenuScreen::Game,
        flag: menu_field!(show_newgame: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Options,
        name: "options",
        binding: "show_options",
        parent: MenuScreen::Main,
        flag: menu_field!(show_options: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Audiovideo,
        name: "audiovideo",
        binding: "show_audiovideo",
        parent: MenuScreen::Main,
        flag: menu_field!(show_audiovideo: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Save,
        name: "save",
        binding: "show_save",
        parent: MenuScreen::Game,
        flag: menu_field!(show_save: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Load,
        name: "load",
        binding: "show_load",
        parent: MenuScreen::Game,
        flag: menu_field!(show_load: bool),
    },
    ScreenEntry {
        screen: MenuScreen::Quit,
        name: "quit",
        binding: "show_quit",
        parent: MenuScreen::Main,
        flag: menu_field!(show_quit: bool),
    },
];

impl MenuScreen {
    pub fn entry(self) -> &'static ScreenEntry {
        // Every variant has exactly one row; the fallback is never reached.
        SCREENS
            .iter()
            .find(|entry| entry.screen == self)
            .unwrap_or(&SCREENS[0])
    }

    pub fn from_name(name: &str) -> Option<MenuScreen> {
        SCREENS
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.screen)
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn parent(self) -> MenuScreen {
        self.entry().parent
    }

    pub fn is_shown(self, menu: &MenuViewModel) -> bool {
        match self {
            MenuScreen::Main => menu.show_main,
            MenuScreen::Game => menu.show_game,
            MenuScreen::Botmatch => menu.show_botmatch,
            MenuScreen::Newgame => menu.show_newgame,
            MenuScreen::Options => menu.show_options,
            MenuScreen::Audiovideo => menu.show_audiovideo,
            MenuScreen::Save => menu.show_save,
            MenuScreen::Load => menu.show_load,
            MenuScreen::Quit => menu.show_quit,
        }
    }

    /// First screen whose flag is set, falling back to `Main`.
    pub fn active(menu: &MenuViewModel) -> MenuScreen {
        SCREENS
            .iter()
            .map(|entry| entry.screen)
            .find(|screen| screen.is_shown(menu))
            .unwrap_or(MenuScreen::Main)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_rows_are_unique() {
        let screens: HashSet<MenuScreen> = SCREENS.iter().map(|entry| entry.screen).collect();
        let names: HashSet<&str> = SCREENS.iter().map(|entry| entry.name).collect();
        assert_eq!(screens.len(), SCREENS.len());
        assert_eq!(names.len(), SCREENS.len());
    }

    #[test]
    fn names_resolve_back_to_screens() {
        for entry in SCREENS {
            assert_eq!(MenuScreen::from_name(entry.name), Some(entry.screen));
            assert_eq!(entry.screen.name(), entry.name);
        }
        assert_eq!(MenuScreen::from_name("save_3"), None);
    }

    #[test]
    fn game_sub_screens_lead_back_to_game() {
        for screen in [
            MenuScreen::Botmatch,
            MenuScreen::Newgame,
            MenuScreen::Save,
            MenuScreen::Load,
        ] {
            assert_eq!(screen.parent(), MenuScreen::Game);
        }
        for screen in [MenuScreen::Game, MenuScreen::Options, MenuScreen::Quit] {
            assert_eq!(screen.parent(), MenuScreen::Main);
        }
    }

    #[test]
    fn flags_point_at_their_own_field() {
        for entry in SCREENS {
            let mut menu = MenuViewModel::default();
            for other in SCREENS {
                *(other.flag)(&mut menu) = false;
            }
            *(entry.flag)(&mut menu) = true;
            let value = serde_json::to_value(&menu).expect("serialize");
            assert_eq!(value[entry.binding], serde_json::Value::Bool(true));
            assert_eq!(MenuScreen::active(&menu), entry.screen);
            assert!(entry.screen.is_shown(&menu));
        }
    }

    #[test]
    fn no_active_flag_reads_as_main() {
        let mut menu = MenuViewModel::default();
        menu.show_main = false;
        assert_eq!(MenuScreen::active(&menu), MenuScreen::Main);
    }
}
