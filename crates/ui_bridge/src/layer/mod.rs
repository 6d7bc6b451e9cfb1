//! The UI layer: owns the toolkit, the view-model store and, while
//! initialized, the context with its bindings, documents and collaborators.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::binding::{BindingHandle, BindingSet};
use crate::bridge::GameBridge;
use crate::documents::{DocumentControl, DocumentRegistry};
use crate::files::AssetFiles;
use crate::input::{route_input, InputEvent};
use crate::keymap::{key_modifier_state, InputKey, KeyModifiers, KeyStateSource};
use crate::menu::{MenuNavigator, MenuScreen};
use crate::panel::Panel;
use crate::render::{RenderBridge, RenderDevice, RenderPass};
use crate::sync::{sync, sync_snapshot, SyncReport};
use crate::system::UiSystem;
use crate::toolkit::{DocumentId, Toolkit, UiContext, UiEvent};
use crate::viewmodel::{
    ConsoleViewModel, HudViewModel, MenuViewModel, MessagesViewModel, ScoreboardViewModel,
    ViewModel, ViewModelSnapshot, ViewModelStore,
};
use crate::UiConfig;

pub const FONTS_DIR: &str = "fonts";

#[derive(Debug, Error)]
pub enum InitError {
    #[error("UI root directory does not exist: {path}")]
    UiRootMissing { path: PathBuf },
    #[error("UI toolkit failed to initialise")]
    ToolkitInit,
    #[error("failed to create UI context '{name}' at {width}x{height}")]
    ContextCreation {
        name: String,
        width: u32,
        height: u32,
    },
}

impl InitError {
    /// A soft failure means the game should carry on without UI.
    pub fn is_soft(&self) -> bool {
        matches!(self, InitError::UiRootMissing { .. })
    }
}

struct Runtime {
    bindings: BindingSet,
    documents: DocumentRegistry,
    context: Box<dyn UiContext>,
    system: UiSystem,
    files: AssetFiles,
    render: RenderBridge,
}

impl Runtime {
    fn sync<V: ViewModel>(&mut self, current: &mut V, next: &V) -> SyncReport {
        let handle = self.bindings.get(V::SCHEMA.panel);
        let mut documents = self.documents.bind(self.context.as_mut());
        sync(current, next, handle, &mut documents)
    }

    fn is_visible(&self, panel: Panel) -> bool {
        self.documents.is_visible_in(panel, self.context.as_ref())
    }
}

pub struct UiLayer {
    toolkit: Box<dyn Toolkit>,
    bridge: Option<Box<dyn GameBridge>>,
    store: ViewModelStore,
    runtime: Option<Runtime>,
    pending_events: Vec<UiEvent>,
}

struct BridgeKeys<'a>(&'a dyn GameBridge);

impl KeyStateSource for BridgeKeys<'_> {
    fn is_key_down(&self, key: InputKey) -> bool {
        self.0.is_key_down(key)
    }
}

impl UiLayer {
    pub fn new(toolkit: Box<dyn Toolkit>) -> Self {
        Self {
            toolkit,
            bridge: None,
            store: ViewModelStore::default(),
            runtime: None,
            pending_events: Vec::new(),
        }
    }

    pub fn with_game_bridge(mut self, bridge: Box<dyn GameBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn set_game_bridge(&mut self, bridge: Option<Box<dyn GameBridge>>) {
        self.bridge = bridge;
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.is_some()
    }

    pub fn store(&self) -> &ViewModelStore {
        &self.store
    }

    pub fn initialize(&mut self, config: &UiConfig) -> Result<(), InitError> {
        if self.runtime.is_some() {
            return Ok(());
        }

        if !config.ui_root.is_dir() {
            warn!(path = %config.ui_root.display(), "ui_root_missing");
            return Err(InitError::UiRootMissing {
                path: config.ui_root.clone(),
            });
        }

        let system = UiSystem::new();
        let mut files = AssetFiles::new(&config.ui_root);
        let render = RenderBridge::new();

        if !self.toolkit.initialise(&system) {
            error!("ui_toolkit_init_failed");
            return Err(InitError::ToolkitInit);
        }

        let fonts = load_fonts(self.toolkit.as_mut(), &mut files, &config.ui_root);
        if fonts == 0 {
            warn!(path = %config.ui_root.join(FONTS_DIR).display(), "ui_fonts_missing");
        }

        let Some(mut context) = self.toolkit.create_context(
            &config.context_name,
            config.viewport_width,
            config.viewport_height,
        ) else {
            error!(context = %config.context_name, "ui_context_creation_failed");
            self.toolkit.shutdown();
            return Err(InitError::ContextCreation {
                name: config.context_name.clone(),
                width: config.viewport_width,
                height: config.viewport_height,
            });
        };

        // Models are bound before any document can reference them.
        let mut bindings = BindingSet::default();
        for panel in Panel::ALL {
            match context.create_data_model(&ViewModelStore::schema(panel)) {
                Some(handle) => {
                    bindings.set(panel, BindingHandle::new(handle));
                    info!(panel = %panel, "data_model_created");
                }
                None => warn!(panel = %panel, "data_model_unavailable"),
            }
        }

        let mut documents = DocumentRegistry::default();
        for panel in Panel::ALL {
            let file = panel.document_file();
            match context.load_document(file, &mut files) {
                Some(document) => {
                    documents.set(panel, Some(document));
                    if panel.shows_on_load() {
                        context.show_document(document);
                    }
                    info!(panel = %panel, file, "ui_document_loaded");
                }
                None => warn!(panel = %panel, file, "ui_document_missing"),
            }
        }
        if !documents.has_all_loaded() {
            warn!(loaded = documents.loaded_count(), "ui_documents_incomplete");
        }

        self.runtime = Some(Runtime {
            bindings,
            documents,
            context,
            system,
            files,
            render,
        });
        info!(
            root = %config.ui_root.display(),
            width = config.viewport_width,
            height = config.viewport_height,
            fonts,
            "ui_initialized"
        );
        Ok(())
    }

    /// Tears down in reverse order of construction. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };
        let Runtime {
            mut bindings,
            mut documents,
            context,
            system,
            mut files,
            mut render,
        } = runtime;

        bindings.clear_all();
        documents.clear();
        drop(context);
        self.toolkit.shutdown();
        files.close_all();
        render.release_all();
        drop((system, files, render));

        self.store.reset();
        self.pending_events.clear();
        info!("ui_shutdown");
    }

    pub fn update_view_model(&mut self, snapshot: &ViewModelSnapshot) -> SyncReport {
        let Some(runtime) = self.runtime.as_mut() else {
            return SyncReport::default();
        };
        let mut documents = runtime.documents.bind(runtime.context.as_mut());
        sync_snapshot(&mut self.store, snapshot, &runtime.bindings, &mut documents)
    }

    pub fn update_hud(&mut self, next: &HudViewModel) -> SyncReport {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.sync(&mut self.store.hud, next),
            None => SyncReport::default(),
        }
    }

    pub fn update_messages(&mut self, next: &MessagesViewModel) -> SyncReport {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.sync(&mut self.store.messages, next),
            None => SyncReport::default(),
        }
    }

    pub fn update_scoreboard(&mut self, next: &ScoreboardViewModel) -> SyncReport {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.sync(&mut self.store.scoreboard, next),
            None => SyncReport::default(),
        }
    }

    pub fn update_console(&mut self, next: &ConsoleViewModel) -> SyncReport {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.sync(&mut self.store.console, next),
            None => SyncReport::default(),
        }
    }

    pub fn update_menu(&mut self, next: &MenuViewModel) -> SyncReport {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.sync(&mut self.store.menu, next),
            None => SyncReport::default(),
        }
    }

    /// Drains toolkit events, dispatches menu actions, then lets the toolkit
    /// re-evaluate whatever was announced.
    pub fn update(&mut self) {
        let Some(runtime) = self.runtime.as_mut() else {
            return;
        };
        let mut events = std::mem::take(&mut self.pending_events);
        runtime.context.drain_events(&mut events);
        for event in events.drain(..) {
            match event {
                UiEvent::MenuAction(action) => {
                    self.handle_menu_action(&action);
                }
            }
        }
        self.pending_events = events;

        if let Some(runtime) = self.runtime.as_mut() {
            runtime.context.update(&runtime.system, &self.store);
        }
    }

    pub fn render(&mut self, device: &mut dyn RenderDevice) {
        let Some(runtime) = self.runtime.as_mut() else {
            return;
        };
        let mut pass = RenderPass {
            bridge: &mut runtime.render,
            device: &mut *device,
            files: &mut runtime.files,
        };
        runtime.context.render(&mut pass);
        runtime.render.reset_scissor(device);
    }

    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.context.set_dimensions(width, height);
        }
    }

    fn with_navigator<R>(&mut self, run: impl FnOnce(&mut MenuNavigator<'_>) -> R) -> Option<R> {
        let runtime = self.runtime.as_mut()?;
        let handle = runtime.bindings.get(Panel::Menu);
        if !handle.is_live() {
            return None;
        }
        let mut documents = runtime.documents.bind(runtime.context.as_mut());
        let bridge = match self.bridge.as_mut() {
            Some(bridge) => Some(bridge.as_mut() as &mut dyn GameBridge),
            None => None,
        };
        let mut navigator = MenuNavigator::new(&mut self.store.menu, handle, bridge, &mut documents);
        Some(run(&mut navigator))
    }

    pub fn handle_menu_action(&mut self, action: &str) -> bool {
        self.with_navigator(|navigator| navigator.handle_action(action))
            .unwrap_or(false)
    }

    pub fn open_menu(&mut self) {
        self.with_navigator(|navigator| navigator.open());
    }

    pub fn toggle_menu(&mut self) {
        self.with_navigator(|navigator| navigator.toggle());
    }

    pub fn resume(&mut self) {
        self.with_navigator(|navigator| navigator.resume());
    }

    pub fn set_menu_screen(&mut self, screen: MenuScreen) {
        self.with_navigator(|navigator| navigator.navigate(screen));
    }

    /// The active menu screen, or `None` without a live menu binding.
    pub fn menu_screen(&self) -> Option<MenuScreen> {
        let runtime = self.runtime.as_ref()?;
        runtime
            .bindings
            .get(Panel::Menu)
            .is_live()
            .then(|| MenuScreen::active(&self.store.menu))
    }

    pub fn document(&self, panel: Panel) -> Option<DocumentId> {
        self.runtime
            .as_ref()
            .and_then(|runtime| runtime.documents.get(panel))
    }

    pub fn document_by_name(&self, name: &str) -> Option<DocumentId> {
        self.runtime
            .as_ref()
            .and_then(|runtime| runtime.documents.get_by_name(name))
    }

    pub fn show_document(&mut self, panel: Panel) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.documents.bind(runtime.context.as_mut()).show(panel);
        }
    }

    pub fn hide_document(&mut self, panel: Panel) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.documents.bind(runtime.context.as_mut()).hide(panel);
        }
    }

    pub fn toggle_document(&mut self, panel: Panel) {
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.documents.bind(runtime.context.as_mut()).toggle(panel);
        }
    }

    pub fn is_document_visible(&self, panel: Panel) -> bool {
        self.runtime
            .as_ref()
            .is_some_and(|runtime| runtime.is_visible(panel))
    }

    pub fn has_all_documents_loaded(&self) -> bool {
        self.runtime
            .as_ref()
            .is_some_and(|runtime| runtime.documents.has_all_loaded())
    }

    pub fn has_active_interactive_document(&self) -> bool {
        self.runtime.as_ref().is_some_and(|runtime| {
            runtime
                .documents
                .has_active_interactive_in(runtime.context.as_ref())
        })
    }

    /// Sandboxed access to the UI asset root while initialized.
    pub fn asset_files(&mut self) -> Option<&mut AssetFiles> {
        self.runtime.as_mut().map(|runtime| &mut runtime.files)
    }

    pub fn key_modifier_state(&self) -> KeyModifiers {
        match self.bridge.as_deref() {
            Some(bridge) => key_modifier_state(Some(&BridgeKeys(bridge))),
            None => key_modifier_state(None),
        }
    }

    /// Returns `true` when the UI consumed the event.
    pub fn process(&mut self, event: &InputEvent) -> bool {
        let modifiers = self.key_modifier_state();
        let Some(runtime) = self.runtime.as_mut() else {
            return false;
        };
        route_input(runtime.context.as_mut(), modifiers, event)
    }

    pub fn process_mouse_move(&mut self, x: i32, y: i32) -> bool {
        self.process(&InputEvent::MouseMove { x, y })
    }

    pub fn process_mouse_button_down(&mut self, button: i32) -> bool {
        self.process(&InputEvent::MouseButtonDown { button })
    }

    pub fn process_mouse_button_up(&mut self, button: i32) -> bool {
        self.process(&InputEvent::MouseButtonUp { button })
    }

    pub fn process_mouse_wheel(&mut self, delta: f32) -> bool {
        self.process(&InputEvent::MouseWheel { delta })
    }

    pub fn process_key_down(&mut self, key: InputKey) -> bool {
        self.process(&InputEvent::KeyDown { key })
    }

    pub fn process_key_up(&mut self, key: InputKey) -> bool {
        self.process(&InputEvent::KeyUp { key })
    }

    pub fn process_text_input(&mut self, text: &str) -> bool {
        self.process(&InputEvent::Text {
            text: text.to_string(),
        })
    }

    pub fn process_mouse_leave(&mut self) -> bool {
        self.process(&InputEvent::MouseLeave)
    }

    pub fn is_capturing_mouse(&self) -> bool {
        self.runtime
            .as_ref()
            .is_some_and(|runtime| runtime.context.is_mouse_interacting())
    }
}

impl Drop for UiLayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Loads every `.ttf`/`.otf` under `<root>/fonts`; returns how many loaded.
fn load_fonts(toolkit: &mut dyn Toolkit, files: &mut AssetFiles, root: &Path) -> usize {
    let entries = match fs::read_dir(root.join(FONTS_DIR)) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_font_file(name))
        .collect();
    names.sort();

    let mut loaded = 0;
    for name in names {
        let path = format!("{FONTS_DIR}/{name}");
        if toolkit.load_font_face(&path, files) {
            info!(font = %path, "ui_font_loaded");
            loaded += 1;
        } else {
            warn!(font = %path, "ui_font_load_failed");
        }
    }
    loaded
}

fn is_font_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            extension.eq_ignore_ascii_case("ttf") || extension.eq_ignore_ascii_case("otf")
        })
}
