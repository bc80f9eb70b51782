use log::{info, warn};

use crate::autoback::CyclicManeuverSequencer;
use crate::autoland::LandingSequencer;
use crate::channels::{ARM, AUX_FIRST, CHANNEL_COUNT, Channels, PITCH, ROLL, THROTTLE, YAW};
use crate::config::Config;
use crate::input::InputEvent;
use crate::state::LinkState;

/// The frame-loop side of the link: owns the channel array and both
/// sequencers, applies operator events, and enforces the per-frame rules
/// (stick centering, sequencer exclusivity, arm gate). The binary drives
/// this once per frame with its monotonic clock.
pub struct LinkHost {
    cfg: Config,
    ch: Channels,
    autoland: LandingSequencer,
    autoback: CyclicManeuverSequencer,
    touched: [bool; CHANNEL_COUNT],
    running: bool,
}

impl LinkHost {
    pub fn new(cfg: Config) -> Self {
        let ch = Channels::new(cfg.control.limits);
        let autoland = LandingSequencer::new(cfg.autoland);
        let autoback = CyclicManeuverSequencer::new(cfg.autoback);
        LinkHost {
            cfg,
            ch,
            autoland,
            autoback,
            touched: [false; CHANNEL_COUNT],
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn channels(&self) -> &Channels {
        &self.ch
    }

    pub fn handle_event(&mut self, event: InputEvent, now: f64) {
        match event {
            InputEvent::Axis { idx, dir, fast } => {
                // Sticks are locked while disarmed
                if !self.ch.armed() {
                    return;
                }
                let step = if fast { self.cfg.control.fast_step } else { self.cfg.control.step };
                self.ch.adjust(idx, dir as i32 * step as i32);
                self.touched[idx] = true;

                // Touching a sequencer-driven axis turns that mode off
                if self.autoland.is_active() && idx == self.cfg.autoland.throttle_idx {
                    info!("[host] manual throttle input, autoland off");
                    self.autoland.abort();
                }
                if self.autoback.is_active() && idx == self.cfg.autoback.pitch_idx {
                    info!("[host] manual pitch input, autoback off");
                    self.autoback.abort();
                }
            }
            InputEvent::AuxToggle(idx) => match self.ch.toggle_aux(idx) {
                Some(value) => info!("[host] AUX{} -> {}", idx + 1, value),
                None => warn!("[host] AUX{} toggle ignored while disarmed", idx + 1),
            },
            InputEvent::ArmToggle => {
                let value = self.ch.toggle_two_pos(ARM);
                info!(
                    "[host] ARM -> {} ({})",
                    value,
                    if self.ch.armed() { "armed" } else { "disarmed" }
                );
            }
            InputEvent::KillThrottle => {
                self.ch.set(THROTTLE, self.ch.limits().min_us);
                self.touched[THROTTLE] = true;
                if self.autoland.is_active() {
                    self.autoland.abort();
                }
                info!("[host] throttle killed");
            }
            InputEvent::ResetAux => {
                for idx in AUX_FIRST..CHANNEL_COUNT {
                    self.ch.set(idx, self.ch.limits().min_us);
                }
                info!("[host] AUX reset");
            }
            InputEvent::Land(mode) => {
                // one active sequencer at a time
                if self.autoback.is_active() {
                    self.autoback.abort();
                }
                self.autoland.start_at(&mut self.ch, now, mode);
            }
            InputEvent::Back => {
                if self.autoland.is_active() {
                    self.autoland.abort();
                }
                // a second start toggles the cycle off
                self.autoback.start_at(&mut self.ch, now);
            }
            InputEvent::Abort => {
                self.autoland.abort();
                self.autoback.abort();
            }
            InputEvent::Quit => {
                // leave the link in a safe state
                self.autoland.abort();
                self.autoback.abort();
                self.ch.disarm();
                self.running = false;
            }
        }
    }

    /// End-of-frame pass: untouched sticks return to center (throttle never
    /// auto-centers, and a cycling sequencer owns its axis), sequencers run,
    /// and the safety gate goes last, after every driver.
    pub fn finish_frame(&mut self, now: f64) {
        for idx in [ROLL, PITCH, YAW] {
            if self.touched[idx] {
                continue;
            }
            if self.autoback.is_active() && idx == self.cfg.autoback.pitch_idx {
                continue;
            }
            self.ch.center(idx, self.cfg.host.return_speed);
        }

        self.autoland.update_at(&mut self.ch, now);
        self.autoback.update_at(&mut self.ch, now);

        self.ch.apply_arm_gate();
        self.touched = [false; CHANNEL_COUNT];
    }

    pub fn snapshot(&self, frame: u64) -> LinkState {
        LinkState::capture(&self.ch, &self.autoland, &self.autoback, frame)
    }
}
