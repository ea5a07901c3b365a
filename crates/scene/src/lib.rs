//! Renderer boundary: proxy objects the renderer draws each frame, the
//! camera used for both projection and pick-ray construction, bounding
//! volumes for picking, mesh primitive generators, and the line-segment mesh
//! that receives the physics debug wireframe.
//!
//! # Invariants
//! - Nothing in this crate reads or mutates simulation state; proxies receive
//!   poses from the synchronization layer.
//! - Scene iteration order is proxy creation order.

pub mod bounds;
pub mod camera;
pub mod lineset;
pub mod mesh;
pub mod renderer;
pub mod scene;

pub use bounds::{ProxyBounds, Ray};
pub use camera::OrbitCamera;
pub use lineset::LineSet;
pub use mesh::MeshData;
pub use renderer::{SceneRenderer, TextFrameRenderer};
pub use scene::{MeshHandle, ProxyId, RenderProxy, Scene};

pub fn crate_info() -> &'static str {
    "kinesis-scene v0.1.0"
}
