use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PANEL_COUNT: usize = 5;

/// One of the five named UI slots. Each has a document and a view model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    Hud,
    Messages,
    Scoreboard,
    Console,
    Menu,
}

impl Panel {
    pub const ALL: [Panel; PANEL_COUNT] = [
        Panel::Hud,
        Panel::Messages,
        Panel::Scoreboard,
        Panel::Console,
        Panel::Menu,
    ];

    pub const fn index(self) -> usize {
        match self {
            Panel::Hud => 0,
            Panel::Messages => 1,
            Panel::Scoreboard => 2,
            Panel::Console => 3,
            Panel::Menu => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Panel::Hud => "hud",
            Panel::Messages => "messages",
            Panel::Scoreboard => "scoreboard",
            Panel::Console => "console",
            Panel::Menu => "menu",
        }
    }

    pub const fn document_file(self) -> &'static str {
        match self {
            Panel::Hud => "hud.rml",
            Panel::Messages => "messages.rml",
            Panel::Scoreboard => "scoreboard.rml",
            Panel::Console => "console.rml",
            Panel::Menu => "menu.rml",
        }
    }

    /// Overlays are shown as soon as they load; the rest wait for game logic.
    pub const fn shows_on_load(self) -> bool {
        matches!(self, Panel::Hud | Panel::Messages)
    }

    /// Visible interactive panels take exclusive pointer capture.
    pub const fn is_interactive(self) -> bool {
        matches!(self, Panel::Menu | Panel::Console | Panel::Scoreboard)
    }

    pub fn from_name(name: &str) -> Option<Panel> {
        Panel::ALL.into_iter().find(|panel| panel.as_str() == name)
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel '{0}'")]
pub struct UnknownPanel(pub String);

impl FromStr for Panel {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Panel::from_name(s).ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_and_indices_are_dense() {
        for (i, panel) in Panel::ALL.into_iter().enumerate() {
            assert_eq!(panel.index(), i);
            assert_eq!(Panel::from_name(panel.as_str()), Some(panel));
        }
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert_eq!(Panel::from_name("inventory"), None);
        assert_eq!(Panel::from_name("HUD"), None);
        assert!("".parse::<Panel>().is_err());
    }

    #[test]
    fn interactive_subset_excludes_overlays() {
        let interactive: Vec<Panel> = Panel::ALL
            .into_iter()
            .filter(|panel| panel.is_interactive())
            .collect();
        assert_eq!(
            interactive,
            vec![Panel::Scoreboard, Panel::Console, Panel::Menu]
        );
        assert!(Panel::Hud.shows_on_load());
        assert!(!Panel::Menu.shows_on_load());
    }
}
