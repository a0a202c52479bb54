//! Procedural geometry: orbit ring polylines and the skybox cube.

use std::f32::consts::TAU;

/// Fewest segments a ring is built with.
pub const MIN_RING_SEGMENTS: u32 = 3;

/// Closed unit circle in the XY plane, drawn as a line strip.
///
/// Returns `segments + 1` points; the last repeats the first so the strip
/// closes.  `segments` is raised to [`MIN_RING_SEGMENTS`].
pub fn ring_vertices(segments: u32) -> Vec<[f32; 3]> {
    let segments = segments.max(MIN_RING_SEGMENTS);
    let mut points: Vec<[f32; 3]> = (0..segments)
        .map(|i| {
            let a = TAU * i as f32 / segments as f32;
            [a.cos(), a.sin(), 0.0]
        })
        .collect();
    points.push(points[0]);
    points
}

/// 36 positions (12 triangles, six per face) of the cube `[-1, 1]³`.
pub fn skybox_vertices() -> [[f32; 3]; 36] {
    const P: f32 = 1.0;
    const N: f32 = -1.0;
    [
        // -Z
        [N, P, N], [N, N, N], [P, N, N], [P, N, N], [P, P, N], [N, P, N],
        // -X
        [N, N, P], [N, N, N], [N, P, N], [N, P, N], [N, P, P], [N, N, P],
        // +X
        [P, N, N], [P, N, P], [P, P, P], [P, P, P], [P, P, N], [P, N, N],
        // +Z
        [N, N, P], [N, P, P], [P, P, P], [P, P, P], [P, N, P], [N, N, P],
        // +Y
        [N, P, N], [P, P, N], [P, P, P], [P, P, P], [N, P, P], [N, P, N],
        // -Y
        [N, N, N], [N, N, P], [P, N, N], [P, N, N], [N, N, P], [P, N, P],
    ]
}
