//! Session scripts: what the scripted game reports and what the player does,
//! frame by frame.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use ui_bridge::{InitError, InputEvent, InputKey, MenuSettings, ViewModelSnapshot};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Session {
    pub(crate) viewport: Option<Viewport>,
    pub(crate) game: GameScript,
    pub(crate) frames: Vec<Frame>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Viewport {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Static answers the scripted game gives to the menu.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameScript {
    pub(crate) maps: Vec<String>,
    pub(crate) active_map: Option<String>,
    pub(crate) start_map: Option<String>,
    pub(crate) settings: Option<MenuSettings>,
    /// Relative paths resolve against the session file's directory.
    pub(crate) game_root: Option<PathBuf>,
    pub(crate) save_extension: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Frame {
    /// Keys held for this frame; replaces the previous frame's set.
    pub(crate) held_keys: Vec<InputKey>,
    pub(crate) snapshots: Vec<ViewModelSnapshot>,
    pub(crate) input: Vec<InputEvent>,
    /// Menu actions clicked this frame, delivered through the toolkit.
    pub(crate) actions: Vec<String>,
    pub(crate) resize: Option<Viewport>,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("failed to read session {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse session {path} at {location}: {source}")]
    Parse {
        path: PathBuf,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Init(#[from] InitError),
}

pub(crate) fn load_session(path: &Path) -> Result<Session, SessionError> {
    let raw = fs::read_to_string(path).map_err(|source| SessionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut session = parse_session(&raw).map_err(|(location, source)| SessionError::Parse {
        path: path.to_path_buf(),
        location,
        source,
    })?;

    if let (Some(root), Some(base)) = (session.game.game_root.as_mut(), path.parent()) {
        if root.is_relative() {
            *root = base.join(&*root);
        }
    }
    Ok(session)
}

fn parse_session(raw: &str) -> Result<Session, (String, serde_json::Error)> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
        let location = error.path().to_string();
        (location, error.into_inner())
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use ui_bridge::Panel;

    use super::*;

    #[test]
    fn empty_object_is_an_empty_session() {
        let session = parse_session("{}").expect("parse");
        assert!(session.frames.is_empty());
        assert!(session.viewport.is_none());
        assert!(session.game.maps.is_empty());
    }

    #[test]
    fn frames_carry_snapshots_input_and_actions() {
        let session = parse_session(
            r#"{
                "viewport": { "width": 640, "height": 480 },
                "game": { "maps": ["DM-Deck16]["], "settings": { "fov": 100 } },
                "frames": [{
                    "held_keys": ["Shift"],
                    "snapshots": [{ "panel": "hud", "data": { "health": 100 } }],
                    "input": [{ "kind": "mouse_move", "x": 3, "y": 4 }],
                    "actions": ["open_menu"]
                }]
            }"#,
        )
        .expect("parse");

        assert_eq!(
            session.viewport,
            Some(Viewport {
                width: 640,
                height: 480
            })
        );
        assert_eq!(session.game.settings.map(|settings| settings.fov), Some(100));
        let frame = &session.frames[0];
        assert_eq!(frame.held_keys, vec![InputKey::Shift]);
        assert_eq!(frame.snapshots[0].panel(), Panel::Hud);
        assert_eq!(frame.input, vec![InputEvent::MouseMove { x: 3, y: 4 }]);
        assert_eq!(frame.actions, vec!["open_menu"]);
    }

    #[test]
    fn parse_errors_report_their_location() {
        let (location, _) =
            parse_session(r#"{ "frames": [{ "actions": ["back", 5] }] }"#).expect_err("bad action");
        assert_eq!(location, "frames[0].actions[1]");
    }

    #[test]
    fn relative_game_root_follows_the_session_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("session.json");
        fs::write(&path, r#"{ "game": { "game_root": "saves" } }"#).expect("write");

        let session = load_session(&path).expect("load");
        assert_eq!(session.game.game_root, Some(temp.path().join("saves")));

        let missing = load_session(&temp.path().join("absent.json")).expect_err("missing");
        assert!(matches!(missing, SessionError::Read { .. }));
    }
}
