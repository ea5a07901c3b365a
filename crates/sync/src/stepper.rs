use kinesis_physics::{ImpulseOutcome, PhysicsWorld};
use thiserror::Error;

use crate::impulse::ImpulseSlot;

/// Frame-stepping policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    /// Largest slice of wall-clock time a single step may consume, in
    /// seconds. Deltas beyond this (stalls, suspended windows, debugger
    /// pauses) are clamped so the simulation cannot tunnel or explode.
    pub max_step: f32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self { max_step: 0.1 }
    }
}

/// What one call to [`advance`] actually did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Delta as reported by the clock.
    pub raw_dt: f32,
    /// Delta the simulation consumed after clamping.
    pub dt: f32,
    /// Result of draining the impulse slot, if a request was pending.
    pub impulse: Option<ImpulseOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum StepError {
    #[error("frame delta {raw_dt} is not a finite non-negative duration")]
    InvalidDelta { raw_dt: f32 },
}

/// Advances the simulation by one frame.
///
/// The pending impulse (if any) is drained and applied first so the step
/// integrates it. A rejected delta leaves everything untouched, including the
/// impulse slot, so the next frame can retry.
pub fn advance(
    world: &mut PhysicsWorld,
    slot: &mut ImpulseSlot,
    raw_dt: f32,
    config: &StepConfig,
) -> Result<StepOutcome, StepError> {
    if !raw_dt.is_finite() || raw_dt < 0.0 {
        return Err(StepError::InvalidDelta { raw_dt });
    }
    let dt = raw_dt.min(config.max_step);
    if dt < raw_dt {
        tracing::trace!(raw_dt, dt, "clamped frame delta");
    }

    let impulse = slot
        .take()
        .map(|p| world.apply_impulse(p.body, p.impulse, p.point, true));

    // Exactly one step per frame, even at dt 0 (rapier handles it).
    world.step(dt);
    Ok(StepOutcome {
        raw_dt,
        dt,
        impulse,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impulse::PendingImpulse;
    use glam::Vec3;
    use kinesis_physics::{BodyDesc, BodyHandle, ImpulsePoint, ShapeDesc};

    fn world_with_ball(desc: BodyDesc) -> (PhysicsWorld, BodyHandle) {
        let mut world = PhysicsWorld::default();
        let body = world.spawn_body(&desc);
        world
            .attach_collider(body, &ShapeDesc::Ball { radius: 1.0 }, 1.0, 0.0)
            .unwrap();
        (world, body)
    }

    #[test]
    fn small_delta_passes_through_unclamped() {
        let (mut world, _) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        let outcome = advance(&mut world, &mut slot, 0.016, &StepConfig::default()).unwrap();
        assert_eq!(outcome.dt, 0.016);
        assert_eq!(outcome.raw_dt, 0.016);
        assert!(outcome.impulse.is_none());
    }

    #[test]
    fn oversized_delta_is_clamped_to_max_step() {
        let (mut world, _) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        let config = StepConfig::default();
        let outcome = advance(&mut world, &mut slot, 0.5, &config).unwrap();
        assert_eq!(outcome.raw_dt, 0.5);
        assert_eq!(outcome.dt, config.max_step);
    }

    #[test]
    fn delta_equal_to_max_step_is_not_reduced() {
        let (mut world, _) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        let config = StepConfig::default();
        let outcome = advance(&mut world, &mut slot, config.max_step, &config).unwrap();
        assert_eq!(outcome.dt, config.max_step);
    }

    #[test]
    fn invalid_delta_leaves_world_and_slot_untouched() {
        let (mut world, body) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        slot.queue(PendingImpulse {
            body,
            impulse: Vec3::Y,
            point: ImpulsePoint::CenterOfMass,
        });
        let before = world.body_pose(body).unwrap();

        for bad in [f32::NAN, f32::INFINITY, -0.016] {
            let err = advance(&mut world, &mut slot, bad, &StepConfig::default()).unwrap_err();
            assert!(matches!(err, StepError::InvalidDelta { .. }));
        }
        assert_eq!(world.body_pose(body).unwrap().position, before.position);
        assert!(slot.peek().is_some());
    }

    #[test]
    fn zero_delta_steps_once_without_motion() {
        let (mut world, body) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        slot.queue(PendingImpulse {
            body,
            impulse: Vec3::Y,
            point: ImpulsePoint::CenterOfMass,
        });

        // The step still runs (and drains the slot); zero dt integrates to
        // zero displacement.
        let outcome = advance(&mut world, &mut slot, 0.0, &StepConfig::default()).unwrap();
        assert_eq!(outcome.dt, 0.0);
        assert_eq!(outcome.impulse, Some(ImpulseOutcome::Applied));
        assert!(slot.is_empty());
        assert_eq!(
            world.body_pose(body).unwrap().position,
            Vec3::new(0.0, 5.0, 0.0)
        );
    }

    #[test]
    fn pending_impulse_is_drained_and_integrated() {
        let (mut world, body) = world_with_ball(BodyDesc::dynamic_at(Vec3::new(0.0, 5.0, 0.0)));
        let mut slot = ImpulseSlot::new();
        slot.queue(PendingImpulse {
            body,
            impulse: Vec3::new(0.0, 5.0, 0.0),
            point: ImpulsePoint::CenterOfMass,
        });

        let outcome = advance(&mut world, &mut slot, 0.016, &StepConfig::default()).unwrap();
        assert_eq!(outcome.impulse, Some(ImpulseOutcome::Applied));
        assert!(slot.is_empty());
        // Upward impulse beats one frame of gravity.
        assert!(world.body_pose(body).unwrap().position.y > 5.0);
    }

    #[test]
    fn impulse_on_fixed_body_reports_ignored() {
        let (mut world, body) = world_with_ball(BodyDesc::fixed_at(Vec3::ZERO));
        let mut slot = ImpulseSlot::new();
        slot.queue(PendingImpulse {
            body,
            impulse: Vec3::Y,
            point: ImpulsePoint::CenterOfMass,
        });

        let outcome = advance(&mut world, &mut slot, 0.016, &StepConfig::default()).unwrap();
        assert_eq!(outcome.impulse, Some(ImpulseOutcome::Ignored));
        assert_eq!(world.body_pose(body).unwrap().position, Vec3::ZERO);
    }
}
