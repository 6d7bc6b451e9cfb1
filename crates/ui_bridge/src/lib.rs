mod binding;
mod bridge;
mod documents;
mod files;
mod input;
mod keymap;
mod layer;
pub mod menu;
mod panel;
mod render;
mod sync;
mod system;
pub mod toolkit;
mod viewmodel;
mod winit_input;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use binding::{BindingHandle, BindingSet, ModelHandle, ModelSchema};
pub use bridge::{GameBridge, TravelType, DEFAULT_SAVE_EXTENSION};
pub use documents::{BoundDocuments, DocumentControl, DocumentRegistry};
pub use files::{is_sandboxed_path, read_all, AssetFiles, FileHandle, SeekOrigin};
pub use input::{route_input, InputEvent};
pub use keymap::{
    key_modifier_state, map_key, map_mouse_button, InputKey, KeyIdentifier, KeyModifiers,
    KeyStateSource, UNMAPPED_MOUSE_BUTTON,
};
pub use layer::{InitError, UiLayer, FONTS_DIR};
pub use menu::{MenuNavigator, MenuScreen, MenuSettings};
pub use panel::{Panel, UnknownPanel, PANEL_COUNT};
pub use render::{
    GeometryHandle, RenderBridge, RenderDevice, RenderPass, ScissorRect, TextureHandle,
    UiTexture, UiVertex,
};
pub use sync::{sync, sync_snapshot, SyncReport};
pub use system::UiSystem;
pub use viewmodel::{
    ConsoleViewModel, FieldDiff, HudViewModel, MenuViewModel, MessageEntry, MessagesViewModel,
    ModelSource, PlayerEntry, SaveSlotEntry, ScoreboardViewModel, ViewModel, ViewModelSnapshot,
    ViewModelStore, WeaponSlot, MENU_ACTION_EVENT,
};
pub use winit_input::{
    input_key_from_key_code, input_key_from_mouse_button, input_key_from_physical, HeldKeys,
};

const ROOT_ENV_VAR: &str = "UI_BRIDGE_ROOT";
const DEFAULT_UI_DIR: &str = "UI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiConfig {
    pub ui_root: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub context_name: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            ui_root: PathBuf::from(DEFAULT_UI_DIR),
            viewport_width: 1280,
            viewport_height: 720,
            context_name: "main".to_string(),
        }
    }
}

impl UiConfig {
    pub fn with_root(ui_root: impl Into<PathBuf>) -> Self {
        Self {
            ui_root: ui_root.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error(
        "{env_var} is set but does not point to a directory: {path}\n\
Unset it to fall back to <base>/{DEFAULT_UI_DIR}."
    )]
    InvalidEnvRoot {
        path: PathBuf,
        env_var: &'static str,
    },
}

/// `UI_BRIDGE_ROOT` when set, otherwise `<base>/UI`. The fallback is not
/// required to exist; a missing UI directory is handled at initialization.
pub fn resolve_ui_root(base: &Path) -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => resolve_env_root(&value),
        Err(env::VarError::NotPresent) => Ok(normalize_path(&base.join(DEFAULT_UI_DIR))),
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn resolve_env_root(value: &str) -> Result<PathBuf, StartupError> {
    let normalized = normalize_path(Path::new(value));
    if normalized.is_dir() {
        Ok(normalized)
    } else {
        Err(StartupError::InvalidEnvRoot {
            path: normalized,
            env_var: ROOT_ENV_VAR,
        })
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn env_root_must_be_a_directory() {
        let temp = TempDir::new().expect("tempdir");
        let resolved = resolve_env_root(temp.path().to_str().expect("utf8")).expect("resolve");
        assert!(resolved.is_dir());

        let missing = temp.path().join("nope");
        let err = resolve_env_root(missing.to_str().expect("utf8")).expect_err("missing dir");
        assert!(matches!(err, StartupError::InvalidEnvRoot { .. }));
    }

    #[test]
    fn default_config_matches_viewport_defaults() {
        let config = UiConfig::with_root("/tmp/ui");
        assert_eq!(config.ui_root, PathBuf::from("/tmp/ui"));
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 720));
        assert_eq!(config.context_name, "main");
    }
}
