use std::collections::HashMap;
use std::io::Cursor;

use image::ImageReader;
use tracing::warn;

use crate::files::read_all;
use crate::toolkit::{FileInterface, RenderInterface};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiVertex {
    pub position: [f32; 2],
    pub color: [u8; 4],
    pub tex_coord: [f32; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Texture as stored for the device: BGRA8, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTexture {
    pub width: u32,
    pub height: u32,
    pub bgra: Vec<u8>,
}

impl UiTexture {
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if rgba.len() != expected {
            return None;
        }
        let mut bgra = rgba.to_vec();
        for pixel in bgra.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
        Some(Self {
            width,
            height,
            bgra,
        })
    }
}

/// The GPU-facing side, lent to the layer for one render call.
pub trait RenderDevice {
    /// Vertices arrive already translated. Every draw carries a texture.
    fn draw_ui_triangles(&mut self, texture: &UiTexture, vertices: &[UiVertex], indices: &[u32]);
    fn set_ui_scissor(&mut self, region: Option<ScissorRect>);
}

#[derive(Debug, Clone)]
struct CompiledGeometry {
    vertices: Vec<UiVertex>,
    indices: Vec<u32>,
}

/// Geometry and texture storage that outlives individual render calls.
#[derive(Debug, Default)]
pub struct RenderBridge {
    geometries: HashMap<GeometryHandle, CompiledGeometry>,
    textures: HashMap<TextureHandle, UiTexture>,
    white_texture: Option<TextureHandle>,
    next_id: u64,
    scissor_enabled: bool,
    scissor_region: Option<ScissorRect>,
}

impl RenderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture(&self, handle: TextureHandle) -> Option<&UiTexture> {
        self.textures.get(&handle)
    }

    pub fn scissor_enabled(&self) -> bool {
        self.scissor_enabled
    }

    /// Disables scissoring on both sides; run at the end of every frame.
    pub fn reset_scissor(&mut self, device: &mut dyn RenderDevice) {
        self.scissor_enabled = false;
        self.scissor_region = None;
        device.set_ui_scissor(None);
    }

    pub fn release_all(&mut self) {
        self.geometries.clear();
        self.textures.clear();
        self.white_texture = None;
        self.scissor_enabled = false;
        self.scissor_region = None;
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn store_texture(&mut self, texture: UiTexture) -> TextureHandle {
        let handle = TextureHandle(self.allocate_id());
        self.textures.insert(handle, texture);
        handle
    }

    fn white_texture(&mut self) -> TextureHandle {
        if let Some(handle) = self.white_texture {
            return handle;
        }
        let handle = self.store_texture(UiTexture {
            width: 1,
            height: 1,
            bgra: vec![255; 4],
        });
        self.white_texture = Some(handle);
        handle
    }
}

/// Binds the bridge to a device and the asset files for one render call.
pub struct RenderPass<'a> {
    pub bridge: &'a mut RenderBridge,
    pub device: &'a mut dyn RenderDevice,
    pub files: &'a mut dyn FileInterface,
}

impl RenderInterface for RenderPass<'_> {
    fn compile_geometry(&mut self, vertices: &[UiVertex], indices: &[u32]) -> GeometryHandle {
        let handle = GeometryHandle(self.bridge.allocate_id());
        self.bridge.geometries.insert(
            handle,
            CompiledGeometry {
                vertices: vertices.to_vec(),
                indices: indices.to_vec(),
            },
        );
        handle
    }

    fn render_geometry(
        &mut self,
        geometry: GeometryHandle,
        translation: [f32; 2],
        texture: Option<TextureHandle>,
    ) {
        let texture = match texture {
            Some(handle) if self.bridge.textures.contains_key(&handle) => handle,
            Some(_) => {
                warn!("ui_texture_missing");
                self.bridge.white_texture()
            }
            None => self.bridge.white_texture(),
        };
        let (Some(compiled), Some(texture)) = (
            self.bridge.geometries.get(&geometry),
            self.bridge.textures.get(&texture),
        ) else {
            return;
        };
        let translated: Vec<UiVertex> = compiled
            .vertices
            .iter()
            .map(|vertex| UiVertex {
                position: [
                    vertex.position[0] + translation[0],
                    vertex.position[1] + translation[1],
                ],
                ..*vertex
            })
            .collect();
        self.device
            .draw_ui_triangles(texture, &translated, &compiled.indices);
    }

    fn release_geometry(&mut self, geometry: GeometryHandle) {
        self.bridge.geometries.remove(&geometry);
    }

    fn load_texture(&mut self, source: &str) -> Option<(TextureHandle, [u32; 2])> {
        let Some(bytes) = read_all(&mut *self.files, source) else {
            warn!(source, "ui_texture_open_failed");
            return None;
        };
        let decoded = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|error| error.to_string())
            .and_then(|reader| reader.decode().map_err(|error| error.to_string()));
        let image = match decoded {
            Ok(image) => image.to_rgba8(),
            Err(error) => {
                warn!(source, error = %error, "ui_texture_decode_failed");
                return None;
            }
        };
        let dimensions = [image.width(), image.height()];
        let texture = UiTexture::from_rgba(image.as_raw(), dimensions[0], dimensions[1])?;
        Some((self.bridge.store_texture(texture), dimensions))
    }

    fn generate_texture(&mut self, rgba: &[u8], dimensions: [u32; 2]) -> Option<TextureHandle> {
        match UiTexture::from_rgba(rgba, dimensions[0], dimensions[1]) {
            Some(texture) => Some(self.bridge.store_texture(texture)),
            None => {
                warn!(
                    len = rgba.len(),
                    width = dimensions[0],
                    height = dimensions[1],
                    "ui_texture_size_mismatch"
                );
                None
            }
        }
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.bridge.white_texture == Some(texture) {
            self.bridge.white_texture = None;
        }
        self.bridge.textures.remove(&texture);
    }

    fn enable_scissor_region(&mut self, enable: bool) {
        self.bridge.scissor_enabled = enable;
        let region = if enable {
            self.bridge.scissor_region
        } else {
            None
        };
        self.device.set_ui_scissor(region);
    }

    fn set_scissor_region(&mut self, region: ScissorRect) {
        self.bridge.scissor_region = Some(region);
        if self.bridge.scissor_enabled {
            self.device.set_ui_scissor(Some(region));
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct RecordingDevice {
        pub(crate) draws: Vec<(UiTexture, Vec<UiVertex>, Vec<u32>)>,
        pub(crate) scissor: Vec<Option<ScissorRect>>,
    }

    impl RenderDevice for RecordingDevice {
        fn draw_ui_triangles(
            &mut self,
            texture: &UiTexture,
            vertices: &[UiVertex],
            indices: &[u32],
        ) {
            self.draws
                .push((texture.clone(), vertices.to_vec(), indices.to_vec()));
        }

        fn set_ui_scissor(&mut self, region: Option<ScissorRect>) {
            self.scissor.push(region);
        }
    }
}
