use log::info;
use serde::{Serialize, Deserialize};

use crate::channels::{ARM, Channels, PITCH, ROLL, THROTTLE, YAW};
use crate::ramp::{PhaseTimer, RampPhase, RampPoint, wall_clock_secs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandingMode {
    Fast,
    Slow,
}

impl LandingMode {
    /// Unknown mode names silently fall back to fast.
    pub fn from_name(name: &str) -> Self {
        match name {
            "slow" => LandingMode::Slow,
            _ => LandingMode::Fast,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LandingMode::Fast => "fast",
            LandingMode::Slow => "slow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LandingPhase {
    Idle,
    Descend,
    Settle,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub throttle_idx: usize,
    pub arm_idx: usize,
    pub descend_time_fast: f64,
    pub descend_time_slow: f64,
    pub settle_time: f64,
    /// Per-tick step for the optional attitude centering.
    pub attitude_delta: u16,
    /// Throttle value to land on; defaults to the low end of the range.
    pub land_throttle_us: Option<u16>,
    pub disarm_on_land: bool,
    /// Pull roll/pitch/yaw toward center while the landing runs. The older
    /// controller always did this, the newer one never does; configurable.
    pub center_attitude: bool,
}

impl Default for LandingConfig {
    fn default() -> Self {
        LandingConfig {
            throttle_idx: THROTTLE,
            arm_idx: ARM,
            descend_time_fast: 3.0,
            descend_time_slow: 7.0,
            settle_time: 1.0,
            attitude_delta: 20,
            land_throttle_us: None,
            disarm_on_land: false,
            center_attitude: false,
        }
    }
}

/// Autonomous landing: ramp the throttle down to the landing value, hold for
/// a settle period, then optionally disarm. Drives only the throttle channel
/// (plus CH8 on disarm), everything else stays with the pilot.
pub struct LandingSequencer {
    cfg: LandingConfig,
    active: bool,
    finished: bool,
    phase: LandingPhase,
    mode: Option<LandingMode>,
    ramp: Option<RampPhase>,
    phase_timer: PhaseTimer,
}

impl LandingSequencer {
    pub fn new(cfg: LandingConfig) -> Self {
        LandingSequencer {
            cfg,
            active: false,
            finished: false,
            phase: LandingPhase::Idle,
            mode: None,
            ramp: None,
            phase_timer: PhaseTimer::NotStarted,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn current_mode(&self) -> Option<LandingMode> {
        self.mode
    }

    pub fn phase_name(&self) -> &'static str {
        match self.phase {
            LandingPhase::Idle => "idle",
            LandingPhase::Descend => "descend",
            LandingPhase::Settle => "settle",
            LandingPhase::Done => "done",
        }
    }

    pub fn start(&mut self, ch: &mut Channels, mode: LandingMode) {
        self.start_at(ch, wall_clock_secs(), mode);
    }

    /// Begin a landing run. No-op while one is already active. If the
    /// throttle is already below center there is nothing to descend from:
    /// optionally disarm and report finished in the same call.
    pub fn start_at(&mut self, ch: &mut Channels, now: f64, mode: LandingMode) {
        if self.active {
            return;
        }

        let limits = ch.limits();
        let start_throttle = ch.get(self.cfg.throttle_idx);

        if start_throttle < limits.mid_us {
            if self.cfg.disarm_on_land {
                ch.set(self.cfg.arm_idx, limits.min_us);
                info!(
                    "[autoland] immediate disarm: throttle {} below {}",
                    start_throttle, limits.mid_us
                );
            } else {
                info!(
                    "[autoland] throttle {} below {}, nothing to descend",
                    start_throttle, limits.mid_us
                );
            }
            self.active = false;
            self.phase = LandingPhase::Done;
            self.finished = true;
            self.mode = None;
            self.ramp = None;
            self.phase_timer = PhaseTimer::NotStarted;
            return;
        }

        let descend_time = match mode {
            LandingMode::Fast => self.cfg.descend_time_fast,
            LandingMode::Slow => self.cfg.descend_time_slow,
        };
        let target = self.land_target(limits.min_us);

        self.active = true;
        self.finished = false;
        self.phase = LandingPhase::Descend;
        self.mode = Some(mode);
        self.ramp = Some(RampPhase::new(start_throttle, target, descend_time));
        self.phase_timer = PhaseTimer::start(now);

        if self.cfg.center_attitude {
            self.center_attitude(ch);
        }

        info!(
            "[autoland] start mode={} descend_time={:.1}s target={} disarm_on_land={} start_throttle={}",
            mode.name(),
            descend_time,
            target,
            self.cfg.disarm_on_land,
            start_throttle
        );
    }

    /// Force the landing off. Channels keep their last written value.
    pub fn abort(&mut self) {
        if self.active {
            info!("[autoland] abort");
        }
        self.active = false;
        self.finished = false;
        self.phase = LandingPhase::Idle;
        self.mode = None;
        self.ramp = None;
        self.phase_timer = PhaseTimer::NotStarted;
    }

    pub fn update(&mut self, ch: &mut Channels) {
        self.update_at(ch, wall_clock_secs());
    }

    pub fn update_at(&mut self, ch: &mut Channels, now: f64) {
        if !self.active {
            return;
        }

        if self.cfg.center_attitude {
            self.center_attitude(ch);
        }

        match self.phase {
            LandingPhase::Descend => {
                let elapsed = self.phase_timer.elapsed(now);
                if let Some(ramp) = self.ramp {
                    match ramp.at(elapsed) {
                        RampPoint::Complete(v) => {
                            ch.set(self.cfg.throttle_idx, v);
                            self.phase = LandingPhase::Settle;
                            self.phase_timer = PhaseTimer::start(now);
                        }
                        RampPoint::Running(v) => {
                            ch.set(self.cfg.throttle_idx, v);
                        }
                    }
                }
            }
            LandingPhase::Settle => {
                let limits = ch.limits();
                ch.set(self.cfg.throttle_idx, self.land_target(limits.min_us));
                if self.phase_timer.elapsed(now) >= self.cfg.settle_time {
                    if self.cfg.disarm_on_land {
                        ch.set(self.cfg.arm_idx, limits.min_us);
                        info!("[autoland] done, disarming");
                    } else {
                        info!("[autoland] done, throttle held");
                    }
                    self.phase = LandingPhase::Done;
                    self.active = false;
                    self.finished = true;
                    self.mode = None;
                    self.ramp = None;
                }
            }
            LandingPhase::Idle | LandingPhase::Done => {}
        }
    }

    fn land_target(&self, min_us: u16) -> u16 {
        self.cfg.land_throttle_us.unwrap_or(min_us)
    }

    fn center_attitude(&self, ch: &mut Channels) {
        for idx in [ROLL, PITCH, YAW] {
            ch.center(idx, self.cfg.attitude_delta);
        }
    }
}
