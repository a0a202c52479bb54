//! Asset utilities for the orrery viewer.
//!
//! Everything here is CPU-side: files are decoded into plain vertex and
//! pixel arrays that the renderer uploads.  Loaders never fail outright; a
//! missing or broken file is logged and replaced with an empty or blank
//! resource so the scene keeps rendering.

pub mod cubemap;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod texture;

pub use cubemap::{load_cubemap, CubemapData, CubemapFaces, CUBE_FACES};
pub use error::AssetError;
pub use geometry::{ring_vertices, skybox_vertices, MIN_RING_SEGMENTS};
pub use mesh::{load_mesh, try_load_mesh, MeshData, MeshVertex};
pub use texture::TextureData;
