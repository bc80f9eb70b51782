use serde::Serialize;

use crate::autoback::CyclicManeuverSequencer;
use crate::autoland::LandingSequencer;
use crate::channels::{CHANNEL_COUNT, Channels};

#[derive(Clone, Serialize)]
pub struct LinkState {
    pub channels: [u16; CHANNEL_COUNT],
    pub armed: bool,
    pub autoland_active: bool,
    pub autoland_finished: bool,
    pub autoland_phase: String,
    pub autoland_mode: Option<String>,
    pub autoback_active: bool,
    pub autoback_phase: String,
    pub frame: u64,
}

impl LinkState {
    pub fn capture(
        ch: &Channels,
        autoland: &LandingSequencer,
        autoback: &CyclicManeuverSequencer,
        frame: u64,
    ) -> Self {
        LinkState {
            channels: ch.values(),
            armed: ch.armed(),
            autoland_active: autoland.is_active(),
            autoland_finished: autoland.is_finished(),
            autoland_phase: autoland.phase_name().to_string(),
            autoland_mode: autoland.current_mode().map(|m| m.name().to_string()),
            autoback_active: autoback.is_active(),
            autoback_phase: autoback.phase_name().to_string(),
            frame,
        }
    }
}
