use std::process::ExitCode;

use serde::Serialize;
use tracing::{error, info, warn};
use ui_bridge::toolkit::{DrawCall, HeadlessProbe, HeadlessToolkit};
use ui_bridge::{
    MenuScreen, RenderDevice, ScissorRect, SyncReport, UiConfig, UiLayer, UiTexture, UiVertex,
};

use super::bootstrap::AppWiring;
use super::game_stub::{GameCall, GameHandle, ScriptedGame};
use super::session::{load_session, Frame, Session, SessionError};

pub(crate) fn run(app: AppWiring) -> ExitCode {
    let AppWiring {
        mut config,
        session_path,
    } = app;

    let result = load_session(&session_path).and_then(|session| {
        if let Some(viewport) = session.viewport {
            config.viewport_width = viewport.width;
            config.viewport_height = viewport.height;
        }
        replay(&config, session, |report| match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(frame = report.frame, error = %err, "frame_report_encode_failed"),
        })
    });

    match result {
        Ok(frames) => {
            info!(frames, "session_complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "session_failed");
            ExitCode::FAILURE
        }
    }
}

/// What one replayed frame did, printed as a JSON line.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FrameReport {
    pub(crate) frame: usize,
    pub(crate) syncs: Vec<SyncReport>,
    pub(crate) consumed: Vec<bool>,
    pub(crate) menu_screen: Option<MenuScreen>,
    pub(crate) visible_documents: Vec<String>,
    pub(crate) capturing_mouse: bool,
    pub(crate) draw_calls: Vec<DrawCall>,
    pub(crate) triangles: usize,
    /// Set if the frame ended with the device still scissored.
    pub(crate) scissor_left_on: bool,
    pub(crate) game_calls: Vec<GameCall>,
    pub(crate) paused: bool,
}

/// Counts what reaches the device instead of drawing it.
#[derive(Debug, Default)]
struct CountingDevice {
    triangles: usize,
    scissor: Option<ScissorRect>,
}

impl RenderDevice for CountingDevice {
    fn draw_ui_triangles(&mut self, _texture: &UiTexture, _vertices: &[UiVertex], indices: &[u32]) {
        self.triangles += indices.len() / 3;
    }

    fn set_ui_scissor(&mut self, region: Option<ScissorRect>) {
        self.scissor = region;
    }
}

/// Replays every frame of `session`, handing each report to `emit`. Stops
/// early once the game has been asked to quit. Returns the frames replayed.
pub(crate) fn replay(
    config: &UiConfig,
    session: Session,
    mut emit: impl FnMut(&FrameReport),
) -> Result<usize, SessionError> {
    let toolkit = HeadlessToolkit::new();
    let probe = toolkit.probe();
    let (game, game_handle) = ScriptedGame::new(session.game);
    let mut layer = UiLayer::new(Box::new(toolkit)).with_game_bridge(Box::new(game));

    match layer.initialize(config) {
        Ok(()) => {}
        Err(err) if err.is_soft() => warn!(error = %err, "ui_disabled"),
        Err(err) => return Err(err.into()),
    }

    let mut replayed = 0;
    for (index, frame) in session.frames.iter().enumerate() {
        let report = run_frame(&mut layer, &probe, &game_handle, index, frame);
        emit(&report);
        replayed += 1;
        if game_handle.quit_requested() {
            info!(frame = index, "quit_requested");
            break;
        }
    }

    layer.shutdown();
    Ok(replayed)
}

fn run_frame(
    layer: &mut UiLayer,
    probe: &HeadlessProbe,
    game: &GameHandle,
    index: usize,
    frame: &Frame,
) -> FrameReport {
    game.set_held_keys(&frame.held_keys);

    let syncs = frame
        .snapshots
        .iter()
        .map(|snapshot| layer.update_view_model(snapshot))
        .filter(|report| !report.is_empty())
        .collect();
    let consumed = frame.input.iter().map(|event| layer.process(event)).collect();
    for action in &frame.actions {
        probe.push_menu_action(action);
    }
    if let Some(viewport) = frame.resize {
        layer.set_viewport_size(viewport.width, viewport.height);
    }

    layer.update();
    let mut device = CountingDevice::default();
    layer.render(&mut device);

    FrameReport {
        frame: index,
        syncs,
        consumed,
        menu_screen: layer
            .is_document_visible(ui_bridge::Panel::Menu)
            .then(|| layer.menu_screen())
            .flatten(),
        visible_documents: probe.visible_documents(),
        capturing_mouse: layer.is_capturing_mouse(),
        draw_calls: probe.take_draw_calls(),
        triangles: device.triangles,
        scissor_left_on: device.scissor.is_some(),
        game_calls: game.take_calls(),
        paused: game.is_paused(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;
    use ui_bridge::{InputEvent, InputKey, Panel, ViewModelSnapshot};

    use super::*;
    use crate::app::session::{GameScript, Viewport};

    fn ui_root() -> TempDir {
        let temp = TempDir::new().expect("tempdir");
        for panel in Panel::ALL {
            let markup = if panel.shows_on_load() {
                r#"<rml data-overlay="true"><body/></rml>"#
            } else {
                "<rml><body/></rml>"
            };
            fs::write(temp.path().join(panel.document_file()), markup).expect("write");
        }
        temp
    }

    fn replay_all(config: &UiConfig, session: Session) -> Vec<FrameReport> {
        let mut reports = Vec::new();
        replay(config, session, |report| reports.push(report.clone())).expect("replay");
        reports
    }

    #[test]
    fn menu_session_pauses_navigates_and_quits() {
        let root = ui_root();
        let session = Session {
            viewport: None,
            game: GameScript::default(),
            frames: vec![
                Frame {
                    snapshots: vec![ViewModelSnapshot::Hud(ui_bridge::HudViewModel {
                        health: 100,
                        ..Default::default()
                    })],
                    input: vec![InputEvent::KeyDown {
                        key: InputKey::Escape,
                    }],
                    ..Frame::default()
                },
                Frame {
                    actions: vec!["open_menu".to_string(), "quit".to_string()],
                    ..Frame::default()
                },
                Frame {
                    input: vec![InputEvent::KeyDown {
                        key: InputKey::Escape,
                    }],
                    actions: vec!["quit_yes".to_string()],
                    ..Frame::default()
                },
                Frame::default(),
            ],
        };

        let reports = replay_all(&UiConfig::with_root(root.path()), session);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].syncs[0].changed, vec!["health"]);
        assert_eq!(reports[0].consumed, vec![false]);
        assert_eq!(reports[0].triangles, 4);
        assert!(!reports[0].scissor_left_on);
        assert_eq!(reports[0].menu_screen, None);

        assert_eq!(reports[1].menu_screen, Some(MenuScreen::Quit));
        assert!(reports[1].paused);
        assert!(reports[1]
            .game_calls
            .contains(&GameCall::SetPause { paused: true }));

        assert_eq!(reports[2].consumed, vec![true]);
        assert_eq!(reports[2].game_calls, vec![GameCall::Quit]);
    }

    #[test]
    fn missing_ui_root_replays_without_ui() {
        let temp = TempDir::new().expect("tempdir");
        let session = Session {
            viewport: Some(Viewport {
                width: 320,
                height: 200,
            }),
            game: GameScript::default(),
            frames: vec![Frame {
                input: vec![InputEvent::MouseMove { x: 1, y: 1 }],
                ..Frame::default()
            }],
        };

        let reports = replay_all(&UiConfig::with_root(temp.path().join("UI")), session);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].consumed, vec![false]);
        assert!(reports[0].draw_calls.is_empty());
        assert!(reports[0].visible_documents.is_empty());
    }
}
