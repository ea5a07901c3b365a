use std::time::Instant;

/// Wall-clock frame timer.
///
/// [`tick`] reports the raw elapsed seconds since the previous tick, without
/// clamping; the stepper decides how much of it the simulation may consume.
///
/// [`tick`]: SimulationClock::tick
#[derive(Debug, Clone)]
pub struct SimulationClock {
    last: Instant,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Seconds since the previous tick (or since construction for the first
    /// tick).
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }

    /// Forgets accumulated time so the next tick starts from now. Used when
    /// resuming after a pause to avoid feeding the pause into the simulation.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn tick_reports_elapsed_time() {
        let mut clock = SimulationClock::new();
        thread::sleep(Duration::from_millis(20));
        let dt = clock.tick();
        assert!(dt >= 0.015, "dt was {dt}");
    }

    #[test]
    fn tick_is_never_negative() {
        let mut clock = SimulationClock::new();
        for _ in 0..10 {
            assert!(clock.tick() >= 0.0);
        }
    }

    #[test]
    fn reset_swallows_elapsed_time() {
        let mut clock = SimulationClock::new();
        thread::sleep(Duration::from_millis(20));
        clock.reset();
        let dt = clock.tick();
        assert!(dt < 0.015, "dt was {dt}");
    }
}
