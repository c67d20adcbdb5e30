//! # Application State Management
//!
//! This module implements the central `AppState` struct which holds all UI state
//! and coordinates the rendering of all UI components. It implements the `eframe::App`
//! trait to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Holds the latest `SceneFrame` published by the animation task
//! - Processes incoming messages from the animation task via `ui_refresh_rx`
//! - Sends user commands to the animation task via `ui_command_tx`
//! - Coordinates rendering of all UI panels (top, right, map)
//! - Persists user settings (last config directory, speed, panel width) across sessions
//!
//! The UI never animates anything itself: it draws whatever frame arrived last
//! and repaints on a fixed cadence so new frames become visible without input.

use eframe::egui;
use serde::{Deserialize, Serialize};

use super::{UICommand, UIRefreshState};
use crate::animation::clock::{MAX_SPEED_PERCENT, MIN_SPEED_PERCENT};
use crate::render::SceneFrame;
use crate::waves::WaveConfig;

/// Repaint cadence while the window is open.
const REPAINT_INTERVAL: std::time::Duration = std::time::Duration::from_millis(20);

pub struct AppState {
    /// Optional alert message to display in a modal dialog.
    pub alert: Option<String>,
    pub ui_refresh_rx: crate::UIRefreshQueueReceiver,
    pub ui_command_tx: crate::UICommandQueueSender,

    /// Last frame received from the animation task.
    pub frame: SceneFrame,
    /// Configuration of the current run, once the animation task reported it.
    pub config: Option<WaveConfig>,
    pub speed_percent: u32,
    /// Map size last reported to the animation task.
    pub reported_viewport: Option<egui::Vec2>,

    // Display options
    /// Draw faint guide circles at each wave's target radius.
    pub show_targets: bool,
    pub right_panel_width: f32,

    // Persistence
    pub last_open_dir_config: Option<String>,
    pub last_config_path: Option<String>,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    last_open_dir_config: Option<String>,
    speed_percent: Option<u32>,
    show_targets: Option<bool>,
    right_panel_width: Option<f32>,
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    ///
    /// A persisted speed other than 100% is pushed to the animation task right away.
    pub fn new(rx: crate::UIRefreshQueueReceiver, tx: crate::UICommandQueueSender, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();

        let speed_percent = persisted.speed_percent.unwrap_or(100).clamp(MIN_SPEED_PERCENT, MAX_SPEED_PERCENT);

        let state = Self {
            alert: None,
            ui_refresh_rx: rx,
            ui_command_tx: tx,
            frame: SceneFrame::default(),
            config: None,
            speed_percent,
            reported_viewport: None,
            show_targets: persisted.show_targets.unwrap_or(false),
            right_panel_width: persisted.right_panel_width.unwrap_or(360.0),
            last_open_dir_config: persisted.last_open_dir_config,
            last_config_path: None,
        };
        if state.speed_percent != 100 {
            state.send(UICommand::SetSpeedPercent(state.speed_percent));
        }
        state
    }

    /// Send a command, logging instead of blocking when the queue is full.
    pub fn send(&self, command: UICommand) {
        if self.ui_command_tx.try_send(command).is_err() {
            log::warn!("UI command queue full, command dropped");
        }
    }

    /// Open a native file picker for a wave configuration file and ask the
    /// animation task to load it.
    pub fn open_config_file_picker(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Wave config", &["toml"]);
        if let Some(dir) = &self.last_open_dir_config {
            dialog = dialog.set_directory(dir);
        }
        let Some(file) = dialog.pick_file() else {
            return;
        };
        if let Some(parent) = file.parent() {
            self.last_open_dir_config = Some(parent.to_string_lossy().to_string());
        }
        let path = file.to_string_lossy().to_string();
        log::info!("Loading wave configuration from {}", path);
        self.last_config_path = Some(path.clone());
        self.send(UICommand::LoadConfig(path));
    }

    fn process_message(&mut self, message: UIRefreshState) {
        match message {
            UIRefreshState::Alert(alert_msg) => {
                self.alert = Some(alert_msg);
            }
            UIRefreshState::FrameUpdated(frame) => {
                self.frame = frame;
            }
            UIRefreshState::ConfigApplied(config) => {
                self.config = Some(config);
            }
            UIRefreshState::SpeedChanged(speed) => {
                self.speed_percent = speed;
            }
        }
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            last_open_dir_config: self.last_open_dir_config.clone(),
            speed_percent: Some(self.speed_percent),
            show_targets: Some(self.show_targets),
            right_panel_width: Some(self.right_panel_width),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint periodically so new frames are visible without input
        ctx.request_repaint_after(REPAINT_INTERVAL);

        while let Ok(msg) = self.ui_refresh_rx.try_receive() {
            self.process_message(msg);
        }

        if let Some(alert) = self.alert.clone() {
            egui::Window::new("Alert")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.label(alert);
                        ui.add_space(20.0);

                        if ui.button("OK").clicked() {
                            self.alert = None;
                        }
                        ui.add_space(10.0);
                    });
                });
        }

        // Panels layout: top (fixed), right (fixed), map fills the remaining using CentralPanel
        super::top_panel::render(ctx, self);
        super::right_panel::render(ctx, self);
        super::map::render(ctx, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStorage(HashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    fn storage_with_speed(speed_percent: u32) -> MemoryStorage {
        let mut storage = MemoryStorage::default();
        let settings = PersistedSettings {
            speed_percent: Some(speed_percent),
            ..Default::default()
        };
        eframe::set_value(&mut storage, "app_settings", &settings);
        storage
    }

    fn queues() -> (&'static crate::UIRefreshQueue, &'static crate::UICommandQueue) {
        (
            Box::leak(Box::new(crate::UIRefreshQueue::new())),
            Box::leak(Box::new(crate::UICommandQueue::new())),
        )
    }

    #[test]
    fn persisted_speed_is_sent_at_startup() {
        let (refresh, commands) = queues();
        let storage: &dyn eframe::Storage = &storage_with_speed(50);
        let state = AppState::new(refresh.receiver(), commands.sender(), Some(storage));
        assert_eq!(state.speed_percent, 50);
        assert!(matches!(commands.try_receive(), Ok(UICommand::SetSpeedPercent(50))));
        assert!(commands.try_receive().is_err());
    }

    #[test]
    fn default_speed_sends_nothing() {
        let (refresh, commands) = queues();
        let state = AppState::new(refresh.receiver(), commands.sender(), None);
        assert_eq!(state.speed_percent, 100);
        assert!(commands.try_receive().is_err());
    }

    #[test]
    fn startup_speed_on_a_full_command_queue_is_dropped() {
        let (refresh, commands) = queues();
        for _ in 0..crate::UI_COMMAND_QUEUE_SIZE {
            assert!(commands.try_send(UICommand::ResetWaves).is_ok());
        }
        let storage: &dyn eframe::Storage = &storage_with_speed(5000);
        let state = AppState::new(refresh.receiver(), commands.sender(), Some(storage));
        // clamped, kept locally even though the command could not be queued
        assert_eq!(state.speed_percent, MAX_SPEED_PERCENT);
        assert_eq!(commands.len(), crate::UI_COMMAND_QUEUE_SIZE);
        while let Ok(command) = commands.try_receive() {
            assert!(matches!(command, UICommand::ResetWaves));
        }
    }
}
