use glam::Vec4;
use kinesis_common::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bounds::ProxyBounds;

/// Identifier for a render proxy. Allocated monotonically per scene, so key
/// order in the scene map is creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ProxyId(pub u64);

/// Reference to an uploaded mesh. Allocation is owned by whichever renderer
/// backend is in use; the scene only stores the handle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MeshHandle(pub u64);

/// One drawable object: a transform the sync layer overwrites every frame, a
/// mesh reference, bounding geometry for picking, and a base color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderProxy {
    pub transform: Transform,
    pub mesh: MeshHandle,
    pub bounds: ProxyBounds,
    pub color: Vec4,
}

impl RenderProxy {
    pub fn new(transform: Transform, mesh: MeshHandle, bounds: ProxyBounds, color: Vec4) -> Self {
        Self {
            transform,
            mesh,
            bounds,
            color,
        }
    }
}

/// Container for all render proxies.
///
/// Uses BTreeMap keyed by monotonically allocated ids, so iteration is
/// creation order and stays stable for the lifetime of the scene.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    proxies: BTreeMap<ProxyId, RenderProxy>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }

    /// Insert a proxy and return its id.
    pub fn spawn(&mut self, proxy: RenderProxy) -> ProxyId {
        let id = ProxyId(self.next_id);
        self.next_id += 1;
        self.proxies.insert(id, proxy);
        id
    }

    /// Remove a proxy. Returns its data if it existed.
    pub fn remove(&mut self, id: ProxyId) -> Option<RenderProxy> {
        self.proxies.remove(&id)
    }

    pub fn get(&self, id: ProxyId) -> Option<&RenderProxy> {
        self.proxies.get(&id)
    }

    pub fn get_mut(&mut self, id: ProxyId) -> Option<&mut RenderProxy> {
        self.proxies.get_mut(&id)
    }

    pub fn contains(&self, id: ProxyId) -> bool {
        self.proxies.contains_key(&id)
    }

    /// All proxies in creation order.
    pub fn proxies(&self) -> &BTreeMap<ProxyId, RenderProxy> {
        &self.proxies
    }
}
