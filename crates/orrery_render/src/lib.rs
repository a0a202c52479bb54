//! wgpu rendering for the orrery viewer.
//!
//! The scene loop in `orrery_core` talks to this crate only through the
//! `SceneRenderer` trait, implemented here by [`FrameTarget`].  Everything
//! else (device setup, pipelines, per-draw uniforms, mesh and cubemap
//! uploads) stays behind [`Renderer`].

pub mod camera;
pub mod context;
pub mod geometry;
pub mod pipeline;
pub mod render_target;
pub mod renderer;
pub mod resources;

pub use context::{ContextError, EngineContext};
pub use renderer::{FrameTarget, Renderer, RING_SEGMENTS};
