pub mod mesh;
pub mod vertex;

pub use mesh::{GpuPositions, GpuMesh};
pub use vertex::{mesh_vertex_layout, position_layout, PositionVertex};
