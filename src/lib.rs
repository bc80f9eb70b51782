pub mod autoback;
pub mod autoland;
pub mod channels;
pub mod config;
pub mod host;
pub mod input;
pub mod ramp;
pub mod state;
pub mod websocket;

pub use autoback::{CyclicConfig, CyclicManeuverSequencer};
pub use autoland::{LandingConfig, LandingMode, LandingSequencer};
pub use channels::{ChannelLimits, Channels, approach};
pub use config::Config;
pub use host::LinkHost;
pub use ramp::{PhaseTimer, RampPhase, RampPoint};
pub use state::LinkState;
