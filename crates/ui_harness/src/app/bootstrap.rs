use std::env;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui_bridge::{resolve_ui_root, StartupError, UiConfig};

const SESSION_ENV_VAR: &str = "UI_HARNESS_SESSION";
const DEFAULT_SESSION: &str = "sessions/demo.json";
const ASSETS_DIR: &str = "assets";

pub(crate) struct AppWiring {
    pub(crate) config: UiConfig,
    pub(crate) session_path: PathBuf,
}

#[derive(Debug, Error)]
pub(crate) enum BootError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error("failed to resolve current executable: {0}")]
    CurrentExe(#[source] io::Error),
    #[error("could not find a workspace with an {ASSETS_DIR} directory above {start_dir}")]
    AssetsNotFound { start_dir: PathBuf },
}

pub(crate) fn build_app() -> Result<AppWiring, BootError> {
    init_tracing();
    info!("=== UI Harness Startup ===");

    let assets = find_assets_dir()?;
    let ui_root = resolve_ui_root(&assets)?;
    let session_path = select_session_path(
        env::args().nth(1),
        env::var(SESSION_ENV_VAR).ok(),
        &assets,
    );
    info!(
        ui_root = %ui_root.display(),
        session = %session_path.display(),
        "harness_configured"
    );

    Ok(AppWiring {
        config: UiConfig::with_root(ui_root),
        session_path,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn find_assets_dir() -> Result<PathBuf, BootError> {
    let exe = env::current_exe().map_err(BootError::CurrentExe)?;
    let start_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
    start_dir
        .ancestors()
        .find_map(workspace_assets)
        .ok_or_else(|| BootError::AssetsNotFound {
            start_dir: start_dir.clone(),
        })
}

fn workspace_assets(candidate: &Path) -> Option<PathBuf> {
    let assets = candidate.join(ASSETS_DIR);
    (candidate.join("Cargo.toml").is_file() && assets.is_dir()).then_some(assets)
}

/// CLI argument first, then the environment, then the bundled demo.
fn select_session_path(arg: Option<String>, env_value: Option<String>, assets: &Path) -> PathBuf {
    arg.into_iter()
        .chain(env_value)
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| assets.join(DEFAULT_SESSION))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn session_path_prefers_cli_then_env() {
        let assets = Path::new("/srv/assets");
        assert_eq!(
            select_session_path(Some("a.json".into()), Some("b.json".into()), assets),
            PathBuf::from("a.json")
        );
        assert_eq!(
            select_session_path(None, Some("b.json".into()), assets),
            PathBuf::from("b.json")
        );
        assert_eq!(
            select_session_path(Some("  ".into()), None, assets),
            assets.join(DEFAULT_SESSION)
        );
    }

    #[test]
    fn workspace_marker_needs_manifest_and_assets() {
        let temp = TempDir::new().expect("tempdir");
        assert_eq!(workspace_assets(temp.path()), None);

        fs::create_dir(temp.path().join(ASSETS_DIR)).expect("assets");
        assert_eq!(workspace_assets(temp.path()), None);

        fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").expect("manifest");
        assert_eq!(
            workspace_assets(temp.path()),
            Some(temp.path().join(ASSETS_DIR))
        );
    }
}
