//! Triangle meshes from glTF files.
//!
//! Every triangle primitive of every mesh in the document is merged into a
//! single indexed vertex list.  Node transforms are not applied; models are
//! expected to be authored around their own origin.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use gltf::image::Format;

use crate::error::AssetError;
use crate::texture::TextureData;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
    /// Base-colour texture; `None` means "use a white texel".
    pub texture: Option<TextureData>,
}

impl MeshData {
    /// A mesh with nothing to draw.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Base-colour texture, or a 1×1 white texel.
    pub fn texture_or_white(&self) -> TextureData {
        self.texture.clone().unwrap_or_else(TextureData::white)
    }
}

/// Load a glTF (`.gltf` or `.glb`) mesh.  On failure the error is logged
/// and an empty mesh is returned.
pub fn load_mesh(path: impl AsRef<Path>) -> MeshData {
    let path = path.as_ref();
    match try_load_mesh(path) {
        Ok(mesh) => {
            log::info!(
                "loaded mesh {} ({} vertices, {} triangles, texture: {})",
                path.display(),
                mesh.vertices.len(),
                mesh.indices.len() / 3,
                mesh.texture.is_some()
            );
            mesh
        }
        Err(err) => {
            log::error!("{err}");
            MeshData::empty()
        }
    }
}

pub fn try_load_mesh(path: &Path) -> Result<MeshData, AssetError> {
    let (document, buffers, images) = gltf::import(path).map_err(|source| AssetError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut mesh = MeshData::empty();
    for primitive in document.meshes().flat_map(|m| m.primitives()) {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!("{}: skipping non-triangle primitive", path.display());
            continue;
        }
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };

        let base = mesh.vertices.len() as u32;
        let positions: Vec<[f32; 3]> = positions.collect();
        let count = positions.len();
        let mut normals = reader.read_normals().map(|n| n.collect::<Vec<_>>());
        let uvs: Vec<[f32; 2]> = match reader.read_tex_coords(0) {
            Some(uv) => uv.into_f32().collect(),
            None => vec![[0.0, 0.0]; count],
        };
        let indices = match reader.read_indices() {
            Some(idx) => whole_triangles(idx.into_u32(), count),
            None => whole_triangles(0..count as u32, count),
        };

        if normals.as_ref().map_or(true, |n| n.len() != count) {
            normals = Some(smooth_normals(&positions, &indices));
        }
        let normals = normals.unwrap_or_default();

        mesh.vertices.extend((0..count).map(|i| MeshVertex {
            position: positions[i],
            normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
        }));
        mesh.indices.extend(indices.iter().map(|i| base + i));

        if mesh.texture.is_none() {
            mesh.texture = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .and_then(|info| images.get(info.texture().source().index()))
                .and_then(|img| to_rgba(img, path));
        }
    }

    if mesh.is_empty() {
        return Err(AssetError::NoGeometry {
            path: path.to_path_buf(),
        });
    }
    Ok(mesh)
}

fn to_rgba(img: &gltf::image::Data, path: &Path) -> Option<TextureData> {
    let rgba = match img.format {
        Format::R8G8B8A8 => img.pixels.clone(),
        Format::R8G8B8 => img
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8 => img.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        other => {
            log::warn!("{}: unsupported texture format {other:?}, using white", path.display());
            return None;
        }
    };
    Some(TextureData {
        width: img.width,
        height: img.height,
        rgba,
    })
}

/// Complete triangles whose corners all name one of `count` vertices.
/// A triangle with any corner out of range is dropped whole, as is a
/// trailing partial triangle.
fn whole_triangles(indices: impl Iterator<Item = u32>, count: usize) -> Vec<u32> {
    let indices: Vec<u32> = indices.collect();
    let kept: Vec<u32> = indices
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&i| (i as usize) < count))
        .flatten()
        .copied()
        .collect();
    if kept.len() != indices.len() {
        log::warn!("dropped {} malformed index entries", indices.len() - kept.len());
    }
    kept
}

/// Area-weighted vertex normals for meshes exported without them.
fn smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![[0.0f32; 3]; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let n = cross(sub(positions[b], positions[a]), sub(positions[c], positions[a]));
        for v in [a, b, c] {
            for k in 0..3 {
                acc[v][k] += n[k];
            }
        }
    }
    acc.into_iter().map(normalize_or_up).collect()
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize_or_up(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // one triangle in the XY plane, positions + u16 indices, no normals
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{
            "byteLength": 44,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "nodes": [{ "mesh": 0 }],
        "scenes": [{ "nodes": [0] }],
        "scene": 0
    }"#;

    fn scratch_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("orrery-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_empty_mesh() {
        let mesh = load_mesh("/no/such/model.gltf");
        assert!(mesh.is_empty());
        assert!(mesh.vertices.is_empty());
        assert_eq!(mesh.texture_or_white(), TextureData::white());
    }

    #[test]
    fn malformed_file_gives_empty_mesh() {
        let path = scratch_file("garbage.gltf", "{ this is not json");
        assert!(matches!(try_load_mesh(&path), Err(AssetError::Gltf { .. })));
        assert!(load_mesh(&path).is_empty());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn loads_embedded_triangle_with_generated_normals() {
        let path = scratch_file("triangle.gltf", TRIANGLE_GLTF);
        let mesh = try_load_mesh(&path).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
        assert!(mesh.texture.is_none());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn out_of_range_corner_drops_the_whole_triangle() {
        let kept = whole_triangles([0, 1, 2, 1, 2, 7, 2, 1, 0, 0, 1].into_iter(), 3);
        assert_eq!(kept, vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(kept.len() % 3, 0);
        assert!(whole_triangles([3, 4, 5].into_iter(), 3).is_empty());
    }

    #[test]
    fn smooth_normals_fall_back_to_up_for_degenerate_triangles() {
        let n = smooth_normals(&[[0.0; 3], [0.0; 3], [0.0; 3]], &[0, 1, 2]);
        assert_eq!(n, vec![[0.0, 1.0, 0.0]; 3]);
    }
}
