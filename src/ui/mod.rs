// UI module for the Circle Waves network map
//
// This module organizes the UI into separate components:
// - `top_panel`: Run status and controls (reset, stop, playback, speed, config)
// - `right_panel`: Wave inspector table
// - `map`: Central map display with waves and category markers
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod map;
pub mod right_panel;
pub mod top_panel;

use crate::animation::Easing;
use crate::render::SceneFrame;
use crate::waves::{PlaybackMode, WaveConfig};

pub use app_state::AppState;

/// Messages from the animation task to the UI.
#[derive(Debug)]
pub enum UIRefreshState {
    Alert(String),
    FrameUpdated(SceneFrame),
    /// Configuration in effect for the current run.
    ConfigApplied(WaveConfig),
    SpeedChanged(u32), // new speed percent
}

/// Commands from the UI to the animation task.
#[derive(Debug, Clone, PartialEq)]
pub enum UICommand {
    /// Size of the map area in points.
    ViewportChanged { width: f32, height: f32 },
    ResetWaves,
    StopWaves,
    SetPlaybackMode(PlaybackMode),
    SetEasing(Easing),
    SetSpeedPercent(u32),
    LoadConfig(String),
}
