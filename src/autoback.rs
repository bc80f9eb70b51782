use log::info;
use serde::{Serialize, Deserialize};

use crate::channels::{Channels, PITCH};
use crate::ramp::{PhaseTimer, RampPhase, RampPoint, wall_clock_secs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclicPhase {
    Idle,
    Back,
    Hold,
    Return,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclicConfig {
    pub pitch_idx: usize,
    /// Microseconds of deflection below center.
    pub back_amplitude: u16,
    pub ramp_time: f64,
    pub hold_time: f64,
}

impl Default for CyclicConfig {
    fn default() -> Self {
        CyclicConfig {
            pitch_idx: PITCH,
            back_amplitude: 200,
            ramp_time: 0.5,
            hold_time: 1.5,
        }
    }
}

/// Cyclic backward maneuver on one channel: ramp out from center, hold,
/// ramp back, then immediately begin the next cycle. Runs until aborted.
pub struct CyclicManeuverSequencer {
    cfg: CyclicConfig,
    active: bool,
    phase: CyclicPhase,
    phase_timer: PhaseTimer,
    target_back: u16,
}

impl CyclicManeuverSequencer {
    pub fn new(cfg: CyclicConfig) -> Self {
        CyclicManeuverSequencer {
            cfg,
            active: false,
            phase: CyclicPhase::Idle,
            phase_timer: PhaseTimer::NotStarted,
            target_back: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            CyclicPhase::Idle => "idle",
            CyclicPhase::Back => "back",
            CyclicPhase::Hold => "hold",
            CyclicPhase::Return => "return",
        }
    }

    pub fn start(&mut self, ch: &mut Channels) {
        self.start_at(ch, wall_clock_secs());
    }

    /// Begin cycling. Starting while already active means "stop": the same
    /// command toggles the maneuver off instead of restarting it.
    pub fn start_at(&mut self, ch: &mut Channels, now: f64) {
        if self.active {
            self.abort();
            return;
        }

        let limits = ch.limits();
        self.target_back = limits.clamp(limits.mid_us as i32 - self.cfg.back_amplitude as i32)
            .min(limits.mid_us);
        self.active = true;
        self.phase = CyclicPhase::Back;
        self.phase_timer = PhaseTimer::start(now);

        info!(
            "[autoback] cycle start: target={} ramp={:.1}s hold={:.1}s",
            self.target_back, self.cfg.ramp_time, self.cfg.hold_time
        );
    }

    pub fn abort(&mut self) {
        if self.active {
            info!("[autoback] cycle stop");
        }
        self.active = false;
        self.phase = CyclicPhase::Idle;
        self.phase_timer = PhaseTimer::NotStarted;
    }

    pub fn update(&mut self, ch: &mut Channels) {
        self.update_at(ch, wall_clock_secs());
    }

    pub fn update_at(&mut self, ch: &mut Channels, now: f64) {
        if !self.active {
            return;
        }

        let idx = self.cfg.pitch_idx;
        let mid_us = ch.limits().mid_us;

        match self.phase {
            CyclicPhase::Back => {
                let elapsed = self.phase_timer.elapsed(now);
                let ramp = RampPhase::new(mid_us, self.target_back, self.cfg.ramp_time);
                match ramp.at(elapsed) {
                    RampPoint::Complete(v) => {
                        ch.set(idx, v);
                        self.phase = CyclicPhase::Hold;
                        self.phase_timer = PhaseTimer::start(now);
                    }
                    RampPoint::Running(v) => ch.set(idx, v),
                }
            }
            CyclicPhase::Hold => {
                ch.set(idx, self.target_back);
                if self.phase_timer.elapsed(now) >= self.cfg.hold_time {
                    self.phase = CyclicPhase::Return;
                    self.phase_timer = PhaseTimer::start(now);
                }
            }
            CyclicPhase::Return => {
                let elapsed = self.phase_timer.elapsed(now);
                let ramp = RampPhase::new(self.target_back, mid_us, self.cfg.ramp_time);
                match ramp.at(elapsed) {
                    RampPoint::Complete(v) => {
                        ch.set(idx, v);
                        self.phase = CyclicPhase::Back;
                        self.phase_timer = PhaseTimer::start(now);
                        info!("[autoback] cycle loop");
                    }
                    RampPoint::Running(v) => ch.set(idx, v),
                }
            }
            CyclicPhase::Idle => {}
        }
    }
}
