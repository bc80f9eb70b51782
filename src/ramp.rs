use std::time::{SystemTime, UNIX_EPOCH};

// Guards division by a zero or negative duration.
const MIN_DURATION: f64 = 0.01;

/// Wall-clock seconds, used only when the host does not supply `now`.
pub fn wall_clock_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

/// Phase-local timer. An explicit state instead of a sentinel value: a phase
/// that has not observed a tick yet starts counting at its first one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseTimer {
    NotStarted,
    Running { since: f64 },
}

impl PhaseTimer {
    pub fn start(now: f64) -> Self {
        PhaseTimer::Running { since: now }
    }

    /// Seconds elapsed since the phase started; starts the timer at `now`
    /// if it was never started.
    pub fn elapsed(&mut self, now: f64) -> f64 {
        match *self {
            PhaseTimer::Running { since } => now - since,
            PhaseTimer::NotStarted => {
                *self = PhaseTimer::Running { since: now };
                0.0
            }
        }
    }
}

/// One linear ramp sample. `Complete` carries the exact target so the caller
/// can snap and transition in the same tick, never the interpolated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampPoint {
    Running(u16),
    Complete(u16),
}

/// Time-bounded linear interpolation between two in-range pulse widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampPhase {
    pub start: u16,
    pub target: u16,
    pub duration: f64,
}

impl RampPhase {
    pub fn new(start: u16, target: u16, duration: f64) -> Self {
        RampPhase { start, target, duration }
    }

    pub fn at(&self, elapsed: f64) -> RampPoint {
        let t = elapsed / self.duration.max(MIN_DURATION);
        if t >= 1.0 {
            RampPoint::Complete(self.target)
        } else {
            let start = self.start as f64;
            let target = self.target as f64;
            RampPoint::Running((start + t * (target - start)) as u16)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_starts_at_start_value() {
        let ramp = RampPhase::new(1800, 1000, 3.0);
        assert_eq!(ramp.at(0.0), RampPoint::Running(1800));
    }

    #[test]
    fn ramp_midpoint_is_linear() {
        let ramp = RampPhase::new(1800, 1000, 3.0);
        assert_eq!(ramp.at(1.5), RampPoint::Running(1400));
    }

    #[test]
    fn ramp_completes_with_exact_target() {
        let ramp = RampPhase::new(1800, 1000, 3.0);
        assert_eq!(ramp.at(3.0), RampPoint::Complete(1000));
        assert_eq!(ramp.at(10.0), RampPoint::Complete(1000));
    }

    #[test]
    fn ramp_rises_as_well_as_falls() {
        let ramp = RampPhase::new(1300, 1500, 0.5);
        assert_eq!(ramp.at(0.25), RampPoint::Running(1400));
        assert_eq!(ramp.at(0.5), RampPoint::Complete(1500));
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let ramp = RampPhase::new(1500, 1000, 0.0);
        assert_eq!(ramp.at(0.02), RampPoint::Complete(1000));
    }

    #[test]
    fn phase_timer_counts_from_start() {
        let mut timer = PhaseTimer::start(10.0);
        assert_eq!(timer.elapsed(11.5), 1.5);
    }

    #[test]
    fn phase_timer_starts_on_first_observation() {
        let mut timer = PhaseTimer::NotStarted;
        assert_eq!(timer.elapsed(42.0), 0.0);
        assert_eq!(timer.elapsed(43.0), 1.0);
    }
}
