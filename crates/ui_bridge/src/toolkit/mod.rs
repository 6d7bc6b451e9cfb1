//! Contracts between the bridge and the retained-mode UI toolkit.
//!
//! The toolkit owns documents, layout and the reactive binding graph. The
//! bridge only ever reaches it through these traits, and lends it the three
//! collaborators (system, files, render) per call.

mod headless;

pub use headless::{DrawCall, HeadlessProbe, HeadlessToolkit, OVERLAY_ATTRIBUTE};

use crate::binding::{ModelHandle, ModelSchema};
use crate::files::{FileHandle, SeekOrigin};
use crate::keymap::{KeyIdentifier, KeyModifiers};
use crate::render::{GeometryHandle, ScissorRect, TextureHandle, UiVertex};
use crate::viewmodel::ModelSource;

/// Non-owning reference to a document loaded into a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u32);

/// Events raised by documents, drained once per frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    MenuAction(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

pub trait SystemInterface {
    /// Seconds since the layer was initialized.
    fn elapsed_time(&self) -> f64;

    fn log_message(&self, level: LogLevel, message: &str);
}

pub trait FileInterface {
    fn open(&mut self, path: &str) -> Option<FileHandle>;
    fn close(&mut self, handle: FileHandle);
    /// Returns the number of bytes read; zero at end of file.
    fn read(&mut self, buffer: &mut [u8], handle: FileHandle) -> usize;
    fn seek(&mut self, handle: FileHandle, offset: i64, origin: SeekOrigin) -> bool;
    fn tell(&mut self, handle: FileHandle) -> u64;
}

pub trait RenderInterface {
    fn compile_geometry(&mut self, vertices: &[UiVertex], indices: &[u32]) -> GeometryHandle;
    fn render_geometry(
        &mut self,
        geometry: GeometryHandle,
        translation: [f32; 2],
        texture: Option<TextureHandle>,
    );
    fn release_geometry(&mut self, geometry: GeometryHandle);

    /// Loads an image through the file interface; returns its handle and size.
    fn load_texture(&mut self, source: &str) -> Option<(TextureHandle, [u32; 2])>;
    /// Uploads top-left-origin RGBA bytes.
    fn generate_texture(&mut self, rgba: &[u8], dimensions: [u32; 2]) -> Option<TextureHandle>;
    fn release_texture(&mut self, texture: TextureHandle);

    fn enable_scissor_region(&mut self, enable: bool);
    fn set_scissor_region(&mut self, region: ScissorRect);
}

pub trait Toolkit {
    fn initialise(&mut self, system: &dyn SystemInterface) -> bool;
    fn load_font_face(&mut self, path: &str, files: &mut dyn FileInterface) -> bool;
    fn create_context(&mut self, name: &str, width: u32, height: u32)
        -> Option<Box<dyn UiContext>>;
    fn shutdown(&mut self);
}

/// One viewport worth of documents. Every `process_*` call returns `true`
/// when the event propagated, i.e. the UI did not consume it.
pub trait UiContext {
    fn create_data_model(&mut self, schema: &ModelSchema) -> Option<Box<dyn ModelHandle>>;

    fn load_document(&mut self, path: &str, files: &mut dyn FileInterface) -> Option<DocumentId>;
    fn show_document(&mut self, document: DocumentId);
    fn hide_document(&mut self, document: DocumentId);
    fn is_document_visible(&self, document: DocumentId) -> bool;

    fn update(&mut self, system: &dyn SystemInterface, models: &dyn ModelSource);
    fn render(&mut self, render: &mut dyn RenderInterface);
    fn set_dimensions(&mut self, width: u32, height: u32);

    fn process_mouse_move(&mut self, x: i32, y: i32, modifiers: KeyModifiers) -> bool;
    fn process_mouse_button_down(&mut self, button: i32, modifiers: KeyModifiers) -> bool;
    fn process_mouse_button_up(&mut self, button: i32, modifiers: KeyModifiers) -> bool;
    fn process_mouse_wheel(&mut self, delta: f32, modifiers: KeyModifiers) -> bool;
    fn process_key_down(&mut self, key: KeyIdentifier, modifiers: KeyModifiers) -> bool;
    fn process_key_up(&mut self, key: KeyIdentifier, modifiers: KeyModifiers) -> bool;
    fn process_text_input(&mut self, text: &str) -> bool;
    fn process_mouse_leave(&mut self) -> bool;

    /// True while a pointer interaction (press, drag) is in progress.
    fn is_mouse_interacting(&self) -> bool;

    fn drain_events(&mut self, out: &mut Vec<UiEvent>);
}
