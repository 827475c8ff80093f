//! Texture handling for the rendering pipeline.
//!
//! Block textures are packed into a single texture array: one layer per path
//! in the material registry, in registry order, so a material's layer indices
//! address the array directly. Decoding happens here; creating the GPU object
//! is left to the backend, which identifies the array by its [`TextureHandle`].

use std::sync::atomic::{AtomicU32, Ordering};

use image::imageops::FilterType;
use log::{info, warn};

static NEXT_TEXTURE_HANDLE: AtomicU32 = AtomicU32::new(1);

/// Edge length in pixels of every layer.
pub const LAYER_SIZE: u32 = 16;

/// Colour of layers whose image could not be loaded.
const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Process-unique identifier of a texture resource.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    fn next() -> Self {
        TextureHandle(NEXT_TEXTURE_HANDLE.fetch_add(1, Ordering::Relaxed))
    }
}

/// One decoded layer of a [`TextureArray`].
#[derive(Debug, Clone)]
pub struct TextureLayer {
    /// File the layer was loaded from
    pub path: String,
    /// `LAYER_SIZE * LAYER_SIZE` RGBA8 pixels
    pub rgba: Vec<u8>,
    /// The file was missing or unreadable and the layer is a placeholder
    pub placeholder: bool,
}

/// A decoded texture array ready for upload.
#[derive(Debug, Clone)]
pub struct TextureArray {
    handle: TextureHandle,
    layers: Vec<TextureLayer>,
}

impl TextureArray {
    /// Loads one layer per path.
    ///
    /// Images are converted to RGBA8 and scaled to [`LAYER_SIZE`] if needed.
    /// A path that cannot be opened or decoded logs a warning and yields a
    /// placeholder layer, so layer indices stay aligned with the paths.
    ///
    /// # Arguments
    /// * `paths` - Image files, one per layer
    pub fn load<S: AsRef<str>>(paths: &[S]) -> Self {
        let layers: Vec<TextureLayer> = paths.iter().map(|path| load_layer(path.as_ref())).collect();
        let missing = layers.iter().filter(|layer| layer.placeholder).count();

        info!(
            "Built texture array with {} layers ({} placeholders)",
            layers.len(),
            missing
        );

        TextureArray {
            handle: TextureHandle::next(),
            layers,
        }
    }

    /// Handle the backend uses to identify this array.
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Decoded layers in index order.
    pub fn layers(&self) -> &[TextureLayer] {
        &self.layers
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the array has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

fn load_layer(path: &str) -> TextureLayer {
    match image::open(path) {
        Ok(image) => {
            let image = if image.width() != LAYER_SIZE || image.height() != LAYER_SIZE {
                warn!(
                    "Texture {path} is {}x{}, scaling to {LAYER_SIZE}x{LAYER_SIZE}",
                    image.width(),
                    image.height()
                );
                image.resize_exact(LAYER_SIZE, LAYER_SIZE, FilterType::Nearest)
            } else {
                image
            };
            TextureLayer {
                path: path.to_string(),
                rgba: image.to_rgba8().into_raw(),
                placeholder: false,
            }
        }
        Err(error) => {
            warn!("Failed to load texture {path}: {error}");
            TextureLayer {
                path: path.to_string(),
                rgba: PLACEHOLDER_RGBA.repeat((LAYER_SIZE * LAYER_SIZE) as usize),
                placeholder: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYER_BYTES: usize = (LAYER_SIZE * LAYER_SIZE * 4) as usize;

    #[test]
    fn bundled_textures_decode() {
        let array = TextureArray::load(&["assets/textures/block/stone.png", "assets/textures/block/dirt.png"]);
        assert_eq!(array.len(), 2);
        for layer in array.layers() {
            assert!(!layer.placeholder, "{} failed to load", layer.path);
            assert_eq!(layer.rgba.len(), LAYER_BYTES);
        }
    }

    #[test]
    fn missing_files_become_placeholders() {
        let array = TextureArray::load(&["assets/textures/block/stone.png", "nope/missing.png"]);
        assert_eq!(array.len(), 2);
        assert!(!array.layers()[0].placeholder);
        let missing = &array.layers()[1];
        assert!(missing.placeholder);
        assert_eq!(missing.rgba.len(), LAYER_BYTES);
        assert_eq!(&missing.rgba[..4], &PLACEHOLDER_RGBA);
    }

    #[test]
    fn handles_are_unique() {
        let empty: [&str; 0] = [];
        let a = TextureArray::load(&empty);
        let b = TextureArray::load(&empty);
        assert!(a.is_empty());
        assert_ne!(a.handle(), b.handle());
    }
}
