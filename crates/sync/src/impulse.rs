use glam::Vec3;
use kinesis_physics::{BodyHandle, ImpulsePoint};

/// An impulse waiting for the next simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingImpulse {
    pub body: BodyHandle,
    pub impulse: Vec3,
    pub point: ImpulsePoint,
}

/// Single-slot impulse queue.
///
/// Input can arrive many times between steps; only the most recent request
/// survives until the stepper drains the slot.
#[derive(Debug, Default)]
pub struct ImpulseSlot {
    pending: Option<PendingImpulse>,
}

impl ImpulseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a request, returning any request it displaced.
    pub fn queue(&mut self, impulse: PendingImpulse) -> Option<PendingImpulse> {
        self.pending.replace(impulse)
    }

    /// Removes and returns the pending request, leaving the slot empty.
    pub fn take(&mut self) -> Option<PendingImpulse> {
        self.pending.take()
    }

    pub fn peek(&self) -> Option<&PendingImpulse> {
        self.pending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
