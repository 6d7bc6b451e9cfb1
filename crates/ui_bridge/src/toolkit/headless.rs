//! A windowless toolkit that keeps documents as parsed markup and records
//! everything the bridge asks of it. The harness runs against it, and so do
//! the layer tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    DocumentId, FileInterface, LogLevel, RenderInterface, SystemInterface, Toolkit, UiContext,
    UiEvent,
};
use crate::binding::{ModelHandle, ModelSchema};
use crate::files::read_all;
use crate::keymap::{KeyIdentifier, KeyModifiers};
use crate::panel::Panel;
use crate::render::{ScissorRect, TextureHandle, UiVertex};
use crate::viewmodel::ModelSource;

/// Root attribute marking a document as a non-interactive overlay.
pub const OVERLAY_ATTRIBUTE: &str = "data-overlay";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCall {
    pub document: String,
    pub vertex_count: usize,
    pub textured: bool,
}

#[derive(Debug)]
struct HeadlessDocument {
    path: String,
    overlay: bool,
    visible: bool,
    image: Option<String>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    initialised: bool,
    shutdown_calls: usize,
    fail_initialise: bool,
    fail_context: bool,
    failing_models: Vec<Panel>,
    fonts: Vec<String>,
    contexts_alive: usize,
    models_alive: usize,
    dimensions: (u32, u32),
    documents: Vec<HeadlessDocument>,
    announcements: Vec<(Panel, String)>,
    pending_dirty: Vec<(Panel, String)>,
    evaluated: HashMap<(Panel, String), Value>,
    events: VecDeque<UiEvent>,
    mouse_interacting: bool,
    draw_calls: Vec<DrawCall>,
    textures: HashMap<String, TextureHandle>,
    lifecycle: Vec<String>,
    last_update_time: f64,
}

impl HeadlessState {
    fn captures_input(&self) -> bool {
        self.documents
            .iter()
            .any(|document| document.visible && !document.overlay)
    }

    fn document_mut(&mut self, document: DocumentId) -> Option<&mut HeadlessDocument> {
        self.documents.get_mut(document.0 as usize)
    }
}

/// Shared view into the headless toolkit's state.
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe(Rc<RefCell<HeadlessState>>);

impl HeadlessProbe {
    pub fn set_fail_initialise(&self, fail: bool) {
        self.0.borrow_mut().fail_initialise = fail;
    }

    pub fn set_fail_context(&self, fail: bool) {
        self.0.borrow_mut().fail_context = fail;
    }

    pub fn fail_data_model(&self, panel: Panel) {
        self.0.borrow_mut().failing_models.push(panel);
    }

    pub fn is_initialised(&self) -> bool {
        self.0.borrow().initialised
    }

    pub fn shutdown_calls(&self) -> usize {
        self.0.borrow().shutdown_calls
    }

    pub fn contexts_alive(&self) -> usize {
        self.0.borrow().contexts_alive
    }

    pub fn models_alive(&self) -> usize {
        self.0.borrow().models_alive
    }

    pub fn fonts(&self) -> Vec<String> {
        self.0.borrow().fonts.clone()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.borrow().dimensions
    }

    pub fn document_count(&self) -> usize {
        self.0.borrow().documents.len()
    }

    pub fn is_document_visible(&self, path: &str) -> bool {
        self.0
            .borrow()
            .documents
            .iter()
            .any(|document| document.path == path && document.visible)
    }

    pub fn visible_documents(&self) -> Vec<String> {
        self.0
            .borrow()
            .documents
            .iter()
            .filter(|document| document.visible)
            .map(|document| document.path.clone())
            .collect()
    }

    pub fn announcements(&self) -> Vec<(Panel, String)> {
        self.0.borrow().announcements.clone()
    }

    pub fn take_announcements(&self) -> Vec<(Panel, String)> {
        std::mem::take(&mut self.0.borrow_mut().announcements)
    }

    pub fn announced_for(&self, panel: Panel) -> Vec<String> {
        self.0
            .borrow()
            .announcements
            .iter()
            .filter(|(announced, _)| *announced == panel)
            .map(|(_, field)| field.clone())
            .collect()
    }

    /// The value the toolkit last pulled for `field` during `update`.
    pub fn evaluated(&self, panel: Panel, field: &str) -> Option<Value> {
        self.0
            .borrow()
            .evaluated
            .get(&(panel, field.to_string()))
            .cloned()
    }

    /// Simulates a click on an element bound to `menu_action(action)`.
    pub fn push_menu_action(&self, action: &str) {
        self.0
            .borrow_mut()
            .events
            .push_back(UiEvent::MenuAction(action.to_string()));
    }

    pub fn take_draw_calls(&self) -> Vec<DrawCall> {
        std::mem::take(&mut self.0.borrow_mut().draw_calls)
    }

    pub fn lifecycle(&self) -> Vec<String> {
        self.0.borrow().lifecycle.clone()
    }

    pub fn last_update_time(&self) -> f64 {
        self.0.borrow().last_update_time
    }
}

#[derive(Debug, Default)]
pub struct HeadlessToolkit {
    state: HeadlessProbe,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self) -> HeadlessProbe {
        self.state.clone()
    }
}

impl Toolkit for HeadlessToolkit {
    fn initialise(&mut self, system: &dyn SystemInterface) -> bool {
        let mut state = self.state.0.borrow_mut();
        if state.fail_initialise {
            system.log_message(LogLevel::Error, "headless toolkit refused to initialise");
            return false;
        }
        state.initialised = true;
        state.lifecycle.push("toolkit_initialised".to_string());
        system.log_message(LogLevel::Debug, "headless toolkit initialised");
        true
    }

    fn load_font_face(&mut self, path: &str, files: &mut dyn FileInterface) -> bool {
        match read_all(files, path) {
            Some(bytes) if !bytes.is_empty() => {
                self.state.0.borrow_mut().fonts.push(path.to_string());
                true
            }
            _ => false,
        }
    }

    fn create_context(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
    ) -> Option<Box<dyn UiContext>> {
        let mut state = self.state.0.borrow_mut();
        if !state.initialised || state.fail_context {
            return None;
        }
        state.contexts_alive += 1;
        state.dimensions = (width, height);
        state.lifecycle.push(format!("context_created:{name}"));
        Some(Box::new(HeadlessContext {
            state: self.state.clone(),
        }))
    }

    fn shutdown(&mut self) {
        let mut state = self.state.0.borrow_mut();
        state.initialised = false;
        state.shutdown_calls += 1;
        state.lifecycle.push("toolkit_shutdown".to_string());
    }
}

struct HeadlessModel {
    panel: Panel,
    state: HeadlessProbe,
}

impl ModelHandle for HeadlessModel {
    fn dirty_variable(&self, name: &str) {
        let mut state = self.state.0.borrow_mut();
        state.announcements.push((self.panel, name.to_string()));
        state.pending_dirty.push((self.panel, name.to_string()));
    }
}

impl Drop for HeadlessModel {
    fn drop(&mut self) {
        let mut state = self.state.0.borrow_mut();
        state.models_alive = state.models_alive.saturating_sub(1);
        state.lifecycle.push(format!("model_released:{}", self.panel));
    }
}

struct HeadlessContext {
    state: HeadlessProbe,
}

impl HeadlessContext {
    fn consumes(&self) -> bool {
        self.state.0.borrow().captures_input()
    }
}

impl Drop for HeadlessContext {
    fn drop(&mut self) {
        let mut state = self.state.0.borrow_mut();
        state.contexts_alive = state.contexts_alive.saturating_sub(1);
        state.documents.clear();
        state.textures.clear();
        state.lifecycle.push("context_destroyed".to_string());
    }
}

fn parse_document(path: &str, bytes: &[u8]) -> Option<HeadlessDocument> {
    let text = match std::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            warn!(path, error = %error, "ui_document_not_utf8");
            return None;
        }
    };
    let markup = match roxmltree::Document::parse(text) {
        Ok(markup) => markup,
        Err(error) => {
            warn!(path, error = %error, "ui_document_parse_failed");
            return None;
        }
    };
    let root = markup.root_element();
    let image = root
        .descendants()
        .filter(|node| node.has_tag_name("img"))
        .find_map(|node| node.attribute("src"))
        .map(str::to_string);

    Some(HeadlessDocument {
        path: path.to_string(),
        overlay: root.has_attribute(OVERLAY_ATTRIBUTE),
        visible: false,
        image,
    })
}

fn full_screen_quad(width: u32, height: u32) -> (Vec<UiVertex>, Vec<u32>) {
    let (w, h) = (width as f32, height as f32);
    let corner = |x: f32, y: f32, u: f32, v: f32| UiVertex {
        position: [x, y],
        color: [255, 255, 255, 255],
        tex_coord: [u, v],
    };
    (
        vec![
            corner(0.0, 0.0, 0.0, 0.0),
            corner(w, 0.0, 1.0, 0.0),
            corner(w, h, 1.0, 1.0),
            corner(0.0, h, 0.0, 1.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

impl UiContext for HeadlessContext {
    fn create_data_model(&mut self, schema: &ModelSchema) -> Option<Box<dyn ModelHandle>> {
        let mut state = self.state.0.borrow_mut();
        if state.failing_models.contains(&schema.panel) {
            return None;
        }
        state.models_alive += 1;
        state
            .lifecycle
            .push(format!("model_created:{}", schema.name()));
        Some(Box::new(HeadlessModel {
            panel: schema.panel,
            state: self.state.clone(),
        }))
    }

    fn load_document(&mut self, path: &str, files: &mut dyn FileInterface) -> Option<DocumentId> {
        let bytes = read_all(files, path)?;
        let document = parse_document(path, &bytes)?;
        let mut state = self.state.0.borrow_mut();
        let id = DocumentId(state.documents.len() as u32);
        debug!(path, overlay = document.overlay, "headless_document_loaded");
        state.documents.push(document);
        Some(id)
    }

    fn show_document(&mut self, document: DocumentId) {
        if let Some(document) = self.state.0.borrow_mut().document_mut(document) {
            document.visible = true;
        }
    }

    fn hide_document(&mut self, document: DocumentId) {
        if let Some(document) = self.state.0.borrow_mut().document_mut(document) {
            document.visible = false;
        }
    }

    fn is_document_visible(&self, document: DocumentId) -> bool {
        self.state
            .0
            .borrow()
            .documents
            .get(document.0 as usize)
            .is_some_and(|document| document.visible)
    }

    fn update(&mut self, system: &dyn SystemInterface, models: &dyn ModelSource) {
        let mut state = self.state.0.borrow_mut();
        state.last_update_time = system.elapsed_time();
        let dirty = std::mem::take(&mut state.pending_dirty);
        for (panel, field) in dirty {
            let value = models.field_value(panel, &field).unwrap_or(Value::Null);
            state.evaluated.insert((panel, field), value);
        }
    }

    fn render(&mut self, render: &mut dyn RenderInterface) {
        let (dimensions, visible) = {
            let state = self.state.0.borrow();
            let visible: Vec<(String, Option<String>)> = state
                .documents
                .iter()
                .filter(|document| document.visible)
                .map(|document| (document.path.clone(), document.image.clone()))
                .collect();
            (state.dimensions, visible)
        };
        if visible.is_empty() {
            return;
        }

        render.set_scissor_region(ScissorRect {
            x: 0,
            y: 0,
            width: dimensions.0 as i32,
            height: dimensions.1 as i32,
        });
        render.enable_scissor_region(true);

        let (vertices, indices) = full_screen_quad(dimensions.0, dimensions.1);
        for (path, image) in visible {
            let texture = image.and_then(|source| self.texture_for(&source, render));
            let geometry = render.compile_geometry(&vertices, &indices);
            render.render_geometry(geometry, [0.0, 0.0], texture);
            render.release_geometry(geometry);
            self.state.0.borrow_mut().draw_calls.push(DrawCall {
                document: path,
                vertex_count: vertices.len(),
                textured: texture.is_some(),
            });
        }

        render.enable_scissor_region(false);
    }

    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.state.0.borrow_mut().dimensions = (width, height);
    }

    fn process_mouse_move(&mut self, _x: i32, _y: i32, _modifiers: KeyModifiers) -> bool {
        !self.consumes()
    }

    fn process_mouse_button_down(&mut self, _button: i32, _modifiers: KeyModifiers) -> bool {
        let consumed = self.consumes();
        if consumed {
            self.state.0.borrow_mut().mouse_interacting = true;
        }
        !consumed
    }

    fn process_mouse_button_up(&mut self, _button: i32, _modifiers: KeyModifiers) -> bool {
        self.state.0.borrow_mut().mouse_interacting = false;
        !self.consumes()
    }

    fn process_mouse_wheel(&mut self, _delta: f32, _modifiers: KeyModifiers) -> bool {
        !self.consumes()
    }

    fn process_key_down(&mut self, _key: KeyIdentifier, _modifiers: KeyModifiers) -> bool {
        !self.consumes()
    }

    fn process_key_up(&mut self, _key: KeyIdentifier, _modifiers: KeyModifiers) -> bool {
        !self.consumes()
    }

    fn process_text_input(&mut self, _text: &str) -> bool {
        !self.consumes()
    }

    fn process_mouse_leave(&mut self) -> bool {
        self.state.0.borrow_mut().mouse_interacting = false;
        true
    }

    fn is_mouse_interacting(&self) -> bool {
        self.state.0.borrow().mouse_interacting
    }

    fn drain_events(&mut self, out: &mut Vec<UiEvent>) {
        out.extend(self.state.0.borrow_mut().events.drain(..));
    }
}

impl HeadlessContext {
    fn texture_for(&self, source: &str, render: &mut dyn RenderInterface) -> Option<TextureHandle> {
        if let Some(handle) = self.state.0.borrow().textures.get(source) {
            return Some(*handle);
        }
        let (handle, _) = render.load_texture(source)?;
        self.state
            .0
            .borrow_mut()
            .textures
            .insert(source.to_string(), handle);
        Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::files::AssetFiles;
    use crate::system::UiSystem;
    use crate::viewmodel::ViewModelStore;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).expect("write");
    }

    #[test]
    fn overlays_do_not_capture_input() {
        let temp = TempDir::new().expect("tempdir");
        write(&temp, "hud.rml", r#"<rml data-overlay="true"><body/></rml>"#);
        write(&temp, "menu.rml", "<rml><body><button/></body></rml>");
        let mut files = AssetFiles::new(temp.path());
        let system = UiSystem::new();

        let mut toolkit = HeadlessToolkit::new();
        assert!(toolkit.initialise(&system));
        let mut context = toolkit.create_context("main", 640, 480).expect("context");
        let hud = context.load_document("hud.rml", &mut files).expect("hud");
        let menu = context.load_document("menu.rml", &mut files).expect("menu");

        context.show_document(hud);
        assert!(context.process_key_down(KeyIdentifier::A, KeyModifiers::empty()));

        context.show_document(menu);
        assert!(!context.process_mouse_button_down(0, KeyModifiers::empty()));
        assert!(context.is_mouse_interacting());
        context.process_mouse_button_up(0, KeyModifiers::empty());
        assert!(!context.is_mouse_interacting());
    }

    #[test]
    fn malformed_documents_fail_to_load() {
        let temp = TempDir::new().expect("tempdir");
        write(&temp, "broken.rml", "<rml><body></rml>");
        let mut files = AssetFiles::new(temp.path());
        let system = UiSystem::new();

        let mut toolkit = HeadlessToolkit::new();
        toolkit.initialise(&system);
        let mut context = toolkit.create_context("main", 640, 480).expect("context");
        assert!(context.load_document("broken.rml", &mut files).is_none());
        assert!(context.load_document("absent.rml", &mut files).is_none());
        assert_eq!(files.open_count(), 0);
    }

    #[test]
    fn update_pulls_only_announced_fields() {
        let mut toolkit = HeadlessToolkit::new();
        let probe = toolkit.probe();
        let system = UiSystem::new();
        toolkit.initialise(&system);
        let mut context = toolkit.create_context("main", 640, 480).expect("context");
        let schema = ViewModelStore::schema(Panel::Hud);
        let model = context.create_data_model(&schema).expect("model");

        let mut store = ViewModelStore::default();
        store.hud.health = 64;
        store.hud.armor = 10;
        model.dirty_variable("health");
        context.update(&system, &store);

        assert_eq!(probe.evaluated(Panel::Hud, "health"), Some(Value::from(64)));
        assert_eq!(probe.evaluated(Panel::Hud, "armor"), None);
        assert_eq!(probe.announced_for(Panel::Hud), vec!["health".to_string()]);

        drop(model);
        drop(context);
        assert_eq!(probe.models_alive(), 0);
        assert_eq!(probe.contexts_alive(), 0);
    }

    #[test]
    fn context_requires_initialised_toolkit() {
        let mut toolkit = HeadlessToolkit::new();
        assert!(toolkit.create_context("main", 1, 1).is_none());
        toolkit.probe().set_fail_initialise(true);
        assert!(!toolkit.initialise(&UiSystem::new()));
    }
}
