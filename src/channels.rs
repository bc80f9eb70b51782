use serde::{Serialize, Deserialize};

pub const CHANNEL_COUNT: usize = 8;

// Fixed index convention, CH1..CH8
pub const ROLL: usize = 0;
pub const PITCH: usize = 1;
pub const THROTTLE: usize = 2;
pub const YAW: usize = 3;
pub const AUX_FIRST: usize = 4;
pub const ARM: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelLimits {
    pub min_us: u16,      // Minimum pulse width
    pub mid_us: u16,      // Center / neutral pulse width
    pub max_us: u16,      // Maximum pulse width
}

impl Default for ChannelLimits {
    fn default() -> Self {
        ChannelLimits {
            min_us: 1000,
            mid_us: 1500,
            max_us: 2000,
        }
    }
}

impl ChannelLimits {
    pub fn clamp(&self, value: i32) -> u16 {
        value.clamp(self.min_us as i32, self.max_us as i32) as u16
    }
}

/// Step `value` toward `target` by at most `max_step`, snapping exactly onto
/// `target` once within one step. Converges in a finite number of ticks.
pub fn approach(value: u16, target: u16, max_step: u16) -> u16 {
    let (v, t, d) = (value as i32, target as i32, max_step as i32);
    if v < t - d {
        (v + d) as u16
    } else if v > t + d {
        (v - d) as u16
    } else {
        target
    }
}

/// The 8-slot pulse-width array plus its limits. Every write clamps, so all
/// values stay inside `[min_us, max_us]` no matter who drives the channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channels {
    values: [u16; CHANNEL_COUNT],
    limits: ChannelLimits,
}

impl Channels {
    /// Startup state: attitude axes at center, throttle and AUX at minimum.
    pub fn new(limits: ChannelLimits) -> Self {
        let mut values = [limits.mid_us; CHANNEL_COUNT];
        values[THROTTLE] = limits.min_us;
        for v in values.iter_mut().skip(AUX_FIRST) {
            *v = limits.min_us;
        }
        Channels { values, limits }
    }

    pub fn limits(&self) -> ChannelLimits {
        self.limits
    }

    pub fn values(&self) -> [u16; CHANNEL_COUNT] {
        self.values
    }

    pub fn get(&self, idx: usize) -> u16 {
        self.values[idx]
    }

    pub fn set(&mut self, idx: usize, value: u16) {
        self.values[idx] = self.limits.clamp(value as i32);
    }

    pub fn adjust(&mut self, idx: usize, delta: i32) {
        self.values[idx] = self.limits.clamp(self.values[idx] as i32 + delta);
    }

    /// Derived arm signal: CH8 above center means armed.
    pub fn armed(&self) -> bool {
        self.values[ARM] > self.limits.mid_us
    }

    pub fn disarm(&mut self) {
        self.values[ARM] = self.limits.min_us;
    }

    /// 2-position switch: MIN <-> MAX.
    pub fn toggle_two_pos(&mut self, idx: usize) -> u16 {
        let new = if self.values[idx] <= self.limits.min_us + 10 {
            self.limits.max_us
        } else {
            self.limits.min_us
        };
        self.values[idx] = new;
        new
    }

    /// AUX toggles are momentary-input switches and are rejected while
    /// disarmed. Returns the new value when the toggle was applied.
    pub fn toggle_aux(&mut self, idx: usize) -> Option<u16> {
        if !self.armed() {
            return None;
        }
        Some(self.toggle_two_pos(idx))
    }

    pub fn center(&mut self, idx: usize, max_step: u16) {
        self.values[idx] = approach(self.values[idx], self.limits.mid_us, max_step);
    }

    /// Safety gate, enforced once per frame after every driver ran: while
    /// disarmed, throttle and AUX5..AUX7 are forced to minimum regardless of
    /// what manual input or a sequencer computed.
    pub fn apply_arm_gate(&mut self) {
        if !self.armed() {
            self.values[THROTTLE] = self.limits.min_us;
            for idx in AUX_FIRST..ARM {
                self.values[idx] = self.limits.min_us;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_steps_toward_target() {
        assert_eq!(approach(1000, 1500, 25), 1025);
        assert_eq!(approach(2000, 1500, 25), 1975);
    }

    #[test]
    fn approach_snaps_within_one_step() {
        assert_eq!(approach(1490, 1500, 25), 1500);
        assert_eq!(approach(1510, 1500, 25), 1500);
        assert_eq!(approach(1500, 1500, 25), 1500);
    }

    #[test]
    fn approach_converges_without_overshoot() {
        let mut v = 1000;
        let mut ticks = 0;
        while v != 1500 {
            let next = approach(v, 1500, 30);
            assert!(next > v && next <= 1500);
            v = next;
            ticks += 1;
            assert!(ticks < 100);
        }
    }

    #[test]
    fn startup_values() {
        let ch = Channels::new(ChannelLimits::default());
        assert_eq!(ch.get(ROLL), 1500);
        assert_eq!(ch.get(PITCH), 1500);
        assert_eq!(ch.get(THROTTLE), 1000);
        assert_eq!(ch.get(YAW), 1500);
        for idx in AUX_FIRST..CHANNEL_COUNT {
            assert_eq!(ch.get(idx), 1000);
        }
        assert!(!ch.armed());
    }

    #[test]
    fn writes_are_clamped() {
        let mut ch = Channels::new(ChannelLimits::default());
        ch.set(ROLL, 2500);
        assert_eq!(ch.get(ROLL), 2000);
        ch.adjust(ROLL, -5000);
        assert_eq!(ch.get(ROLL), 1000);
    }

    #[test]
    fn arm_signal_is_derived_from_ch8() {
        let mut ch = Channels::new(ChannelLimits::default());
        ch.set(ARM, 2000);
        assert!(ch.armed());
        ch.set(ARM, 1500);
        assert!(!ch.armed());
        ch.set(ARM, 2000);
        ch.disarm();
        assert_eq!(ch.get(ARM), 1000);
        assert!(!ch.armed());
    }

    #[test]
    fn arm_gate_forces_throttle_and_aux_low_while_disarmed() {
        let mut ch = Channels::new(ChannelLimits::default());
        ch.set(THROTTLE, 1800);
        ch.set(AUX_FIRST, 2000);
        ch.apply_arm_gate();
        assert_eq!(ch.get(THROTTLE), 1000);
        assert_eq!(ch.get(AUX_FIRST), 1000);
    }

    #[test]
    fn arm_gate_leaves_armed_channels_alone() {
        let mut ch = Channels::new(ChannelLimits::default());
        ch.set(ARM, 2000);
        ch.set(THROTTLE, 1800);
        ch.apply_arm_gate();
        assert_eq!(ch.get(THROTTLE), 1800);
    }

    #[test]
    fn aux_toggle_rejected_while_disarmed() {
        let mut ch = Channels::new(ChannelLimits::default());
        assert_eq!(ch.toggle_aux(AUX_FIRST), None);
        assert_eq!(ch.get(AUX_FIRST), 1000);
        ch.set(ARM, 2000);
        assert_eq!(ch.toggle_aux(AUX_FIRST), Some(2000));
        assert_eq!(ch.get(AUX_FIRST), 2000);
        assert_eq!(ch.toggle_aux(AUX_FIRST), Some(1000));
        assert_eq!(ch.get(AUX_FIRST), 1000);
    }
}
