//! wgpu render backend.
//!
//! Draws the scene as instanced meshes (one upload per mesh, batched per
//! frame) and the physics debug wireframe as a line list whose vertex buffer
//! is rewritten wholesale every frame.
//!
//! # Invariants
//! - The renderer never mutates scene or simulation state.
//! - Mesh data is uploaded once at registration; only instance and line
//!   buffers change per frame.

mod gpu;
mod shaders;

pub use gpu::WgpuSceneRenderer;
