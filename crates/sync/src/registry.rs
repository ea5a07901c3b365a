use std::collections::{BTreeMap, HashMap};

use kinesis_physics::BodyHandle;
use kinesis_scene::ProxyId;
use thiserror::Error;

/// Stable identifier for one proxy/body pairing. Allocated monotonically and
/// never reused, so iteration over a [`BodyRegistry`] follows registration
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub u64);

/// One proxy/body pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyBinding {
    pub id: BindingId,
    pub proxy: ProxyId,
    pub body: BodyHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("proxy {proxy:?} or body {body:?} is already bound")]
    DuplicateBinding { proxy: ProxyId, body: BodyHandle },
    #[error("binding {0:?} does not exist")]
    NotFound(BindingId),
}

/// Bidirectional proxy/body lookup table.
///
/// Both lookup directions stay consistent through every mutation; a pairing
/// is either fully present or fully absent.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bindings: BTreeMap<BindingId, BodyBinding>,
    by_proxy: HashMap<ProxyId, BindingId>,
    by_body: HashMap<BodyHandle, BindingId>,
    next_id: u64,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Pairs a proxy with a body. Fails without side effects if either side
    /// is already bound.
    pub fn register(
        &mut self,
        proxy: ProxyId,
        body: BodyHandle,
    ) -> Result<BodyBinding, RegistryError> {
        if self.by_proxy.contains_key(&proxy) || self.by_body.contains_key(&body) {
            return Err(RegistryError::DuplicateBinding { proxy, body });
        }
        let id = BindingId(self.next_id);
        self.next_id += 1;
        let binding = BodyBinding { id, proxy, body };
        self.bindings.insert(id, binding);
        self.by_proxy.insert(proxy, id);
        self.by_body.insert(body, id);
        tracing::debug!(?id, ?proxy, ?body, "registered binding");
        Ok(binding)
    }

    /// Removes a pairing, returning it so the caller can release both sides.
    pub fn unregister(&mut self, id: BindingId) -> Result<BodyBinding, RegistryError> {
        let binding = self
            .bindings
            .remove(&id)
            .ok_or(RegistryError::NotFound(id))?;
        self.by_proxy.remove(&binding.proxy);
        self.by_body.remove(&binding.body);
        tracing::debug!(?id, "unregistered binding");
        Ok(binding)
    }

    pub fn binding(&self, id: BindingId) -> Option<BodyBinding> {
        self.bindings.get(&id).copied()
    }

    pub fn binding_for_proxy(&self, proxy: ProxyId) -> Option<BodyBinding> {
        self.by_proxy.get(&proxy).and_then(|id| self.binding(*id))
    }

    pub fn binding_for_body(&self, body: BodyHandle) -> Option<BodyBinding> {
        self.by_body.get(&body).and_then(|id| self.binding(*id))
    }

    /// Bindings in registration order.
    pub fn bindings(&self) -> impl Iterator<Item = &BodyBinding> {
        self.bindings.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use kinesis_physics::{BodyDesc, PhysicsWorld};

    fn world_with_bodies(count: usize) -> (PhysicsWorld, Vec<BodyHandle>) {
        let mut world = PhysicsWorld::default();
        let handles = (0..count)
            .map(|i| world.spawn_body(&BodyDesc::dynamic_at(Vec3::new(i as f32, 0.0, 0.0))))
            .collect();
        (world, handles)
    }

    #[test]
    fn register_pairs_both_directions() {
        let (_world, handles) = world_with_bodies(1);
        let mut registry = BodyRegistry::new();
        let binding = registry.register(ProxyId(7), handles[0]).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.binding_for_proxy(ProxyId(7)), Some(binding));
        assert_eq!(registry.binding_for_body(handles[0]), Some(binding));
    }

    #[test]
    fn duplicate_proxy_is_rejected_without_side_effects() {
        let (_world, handles) = world_with_bodies(2);
        let mut registry = BodyRegistry::new();
        registry.register(ProxyId(1), handles[0]).unwrap();

        let err = registry.register(ProxyId(1), handles[1]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateBinding { .. }));
        assert_eq!(registry.len(), 1);
        assert!(registry.binding_for_body(handles[1]).is_none());
    }

    #[test]
    fn duplicate_body_is_rejected() {
        let (_world, handles) = world_with_bodies(1);
        let mut registry = BodyRegistry::new();
        registry.register(ProxyId(1), handles[0]).unwrap();

        let err = registry.register(ProxyId(2), handles[0]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateBinding { .. }));
    }

    #[test]
    fn unregister_clears_both_directions() {
        let (_world, handles) = world_with_bodies(1);
        let mut registry = BodyRegistry::new();
        let binding = registry.register(ProxyId(1), handles[0]).unwrap();

        let removed = registry.unregister(binding.id).unwrap();
        assert_eq!(removed, binding);
        assert!(registry.is_empty());
        assert!(registry.binding_for_proxy(ProxyId(1)).is_none());
        assert!(registry.binding_for_body(handles[0]).is_none());

        let err = registry.unregister(binding.id).unwrap_err();
        assert_eq!(err, RegistryError::NotFound(binding.id));
    }

    #[test]
    fn iteration_follows_registration_order_and_ids_are_not_reused() {
        let (_world, handles) = world_with_bodies(3);
        let mut registry = BodyRegistry::new();
        let a = registry.register(ProxyId(10), handles[0]).unwrap();
        let b = registry.register(ProxyId(5), handles[1]).unwrap();
        registry.unregister(a.id).unwrap();
        let c = registry.register(ProxyId(10), handles[2]).unwrap();

        assert!(a.id < b.id && b.id < c.id);
        let order: Vec<BindingId> = registry.bindings().map(|b| b.id).collect();
        assert_eq!(order, vec![b.id, c.id]);
    }
}
