use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use std::fs;
use std::path::Path;

use crate::autoback::CyclicConfig;
use crate::autoland::LandingConfig;
use crate::channels::ChannelLimits;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    #[serde(flatten)]
    pub limits: ChannelLimits,
    /// Manual stick step per command, in microseconds.
    pub step: u16,
    pub fast_step: u16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            limits: ChannelLimits::default(),
            step: 2,
            fast_step: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Stick return-to-center speed, microseconds per tick.
    pub return_speed: u16,
    pub send_hz: u32,
    pub listen_addr: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            return_speed: 25,
            send_hz: 50,
            listen_addr: String::from("0.0.0.0:10013"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub control: ControlConfig,
    pub host: HostConfig,
    pub autoland: LandingConfig,
    pub autoback: CyclicConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_yields_documented_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.control.limits.min_us, 1000);
        assert_eq!(cfg.control.limits.mid_us, 1500);
        assert_eq!(cfg.control.limits.max_us, 2000);
        assert_eq!(cfg.control.step, 2);
        assert_eq!(cfg.control.fast_step, 5);
        assert_eq!(cfg.host.return_speed, 25);
        assert_eq!(cfg.host.send_hz, 50);
        assert_eq!(cfg.autoland.throttle_idx, 2);
        assert_eq!(cfg.autoland.arm_idx, 7);
        assert_eq!(cfg.autoland.descend_time_fast, 3.0);
        assert_eq!(cfg.autoland.descend_time_slow, 7.0);
        assert_eq!(cfg.autoland.settle_time, 1.0);
        assert_eq!(cfg.autoland.land_throttle_us, None);
        assert!(!cfg.autoland.disarm_on_land);
        assert!(!cfg.autoland.center_attitude);
        assert_eq!(cfg.autoback.pitch_idx, 1);
        assert_eq!(cfg.autoback.back_amplitude, 200);
        assert_eq!(cfg.autoback.ramp_time, 0.5);
        assert_eq!(cfg.autoback.hold_time, 1.5);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let text = r#"{
            "control": {"min_us": 900, "step": 4},
            "autoland": {"disarm_on_land": true, "descend_time_slow": 9.0}
        }"#;
        let cfg: Config = serde_json::from_str(text).unwrap();
        assert_eq!(cfg.control.limits.min_us, 900);
        assert_eq!(cfg.control.limits.mid_us, 1500);
        assert_eq!(cfg.control.step, 4);
        assert_eq!(cfg.control.fast_step, 5);
        assert!(cfg.autoland.disarm_on_land);
        assert_eq!(cfg.autoland.descend_time_slow, 9.0);
        assert_eq!(cfg.autoland.descend_time_fast, 3.0);
        assert_eq!(cfg.autoback.back_amplitude, 200);
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = Config::default();
        let text = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&text).unwrap();
        assert_eq!(cfg, back);
    }
}
