//! Six-face skybox images.

use std::path::{Path, PathBuf};

use crate::texture::TextureData;

/// Face order of every cubemap in this crate, matching the array layer
/// order GPUs expect.
pub const CUBE_FACES: [&str; 6] = ["right (+X)", "left (-X)", "top (+Y)", "bottom (-Y)", "front (+Z)", "back (-Z)"];

/// Paths of the six skybox images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CubemapFaces {
    pub right: PathBuf,
    pub left: PathBuf,
    pub top: PathBuf,
    pub bottom: PathBuf,
    pub front: PathBuf,
    pub back: PathBuf,
}

impl CubemapFaces {
    /// Faces named `right.<ext>`, `left.<ext>`, ... inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, extension: &str) -> Self {
        let dir = dir.as_ref();
        let face = |name: &str| dir.join(format!("{name}.{extension}"));
        Self {
            right: face("right"),
            left: face("left"),
            top: face("top"),
            bottom: face("bottom"),
            front: face("front"),
            back: face("back"),
        }
    }

    /// Paths in [`CUBE_FACES`] order.
    pub fn ordered(&self) -> [&Path; 6] {
        [
            &self.right,
            &self.left,
            &self.top,
            &self.bottom,
            &self.front,
            &self.back,
        ]
    }
}

/// Six square faces of equal size in [`CUBE_FACES`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubemapData {
    pub size: u32,
    pub faces: [TextureData; 6],
}

impl CubemapData {
    /// All six faces packed back to back, ready for a single layered upload.
    pub fn packed(&self) -> Vec<u8> {
        self.faces.iter().flat_map(|f| f.rgba.iter().copied()).collect()
    }
}

/// Load six faces.  The edge length is taken from the first face that
/// decodes; other faces are resampled to it.  Faces that fail to load are
/// logged and filled with black (1×1 when nothing loads at all).
pub fn load_cubemap(faces: &CubemapFaces) -> CubemapData {
    let decoded: Vec<Option<TextureData>> = faces
        .ordered()
        .iter()
        .zip(CUBE_FACES)
        .map(|(path, label)| match TextureData::load(path) {
            Ok(tex) => Some(tex),
            Err(err) => {
                log::error!("cubemap face {label}: {err}");
                None
            }
        })
        .collect();

    let size = decoded
        .iter()
        .flatten()
        .next()
        .map(|t| t.width.max(1))
        .unwrap_or(1);

    let mut faces = decoded
        .into_iter()
        .map(|face| match face {
            Some(tex) => tex.resized(size, size),
            None => TextureData::black(size, size),
        });
    let faces = std::array::from_fn(|_| faces.next().unwrap_or_else(|| TextureData::black(size, size)));

    log::info!("loaded cubemap with {size}x{size} faces");
    CubemapData { size, faces }
}
