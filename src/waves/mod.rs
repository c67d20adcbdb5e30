//! Concentric wave animation around the router.
//!
//! - `config`: run parameters, TOML loading and validation
//! - `targets`: resting radius/opacity per wave index
//! - `sequencer`: staggered introduction, playback, stop and reset

pub mod config;
pub mod sequencer;
pub mod targets;

pub use config::{PlaybackMode, WaveConfig};
pub use sequencer::{WaveFrame, WaveSequencer};
pub use targets::max_radius_for_viewport;
