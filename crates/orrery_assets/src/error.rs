use std::path::PathBuf;

use thiserror::Error;

/// Failures while decoding an asset file.  Public loaders log these and
/// fall back to a blank resource; the `try_*` variants return them.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import glTF {}: {source}", .path.display())]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },
    #[error("failed to decode image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{} contains no triangle geometry", .path.display())]
    NoGeometry { path: PathBuf },
}
