//! # Top Panel - Run Status and Controls
//!
//! Three columns:
//! - Column 1: Run status (run number, active waves, elapsed time, state)
//! - Column 2: Animation controls (reset, stop, playback mode, easing, speed)
//! - Column 3: Configuration (load file, current parameters, display options)

use crate::animation::Easing;
use crate::animation::clock::{MAX_SPEED_PERCENT, MIN_SPEED_PERCENT};
use crate::ui::{AppState, UICommand};
use crate::waves::PlaybackMode;
use eframe::egui;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_controls").exact_height(150.0).show(ctx, |ui| {
        ui.columns(3, |cols| {
            cols[0].vertical(|ui| {
                render_status(ui, state);
            });
            cols[1].vertical(|ui| {
                render_controls(ui, state);
            });
            cols[2].vertical(|ui| {
                render_config(ui, state);
            });
        });
    });
}

fn run_state_label(state: &AppState) -> &'static str {
    let frame = &state.frame;
    if frame.run == 0 {
        "Waiting for map"
    } else if frame.stopped {
        "Stopped"
    } else {
        match state.config.as_ref() {
            Some(config) if frame.active_wave_count() < config.wave_count as usize => "Introducing",
            _ => match frame.playback {
                PlaybackMode::OneShot => "Settling",
                PlaybackMode::InfiniteRepeat => "Repeating",
            },
        }
    }
}

fn render_status(ui: &mut egui::Ui, state: &AppState) {
    ui.heading("Waves");
    ui.separator();
    let wave_count = state.config.as_ref().map(|c| c.wave_count).unwrap_or(0);

    ui.horizontal(|ui| {
        ui.label("Run:");
        ui.label(egui::RichText::new(format!("{:<6}", state.frame.run)).monospace().strong());
        ui.label("State:");
        ui.label(egui::RichText::new(run_state_label(state)).strong());
    });
    ui.horizontal(|ui| {
        ui.label("Active waves:");
        ui.label(egui::RichText::new(format!("{}/{}", state.frame.active_wave_count(), wave_count)).monospace().strong());
    });
    ui.horizontal(|ui| {
        ui.label("Elapsed:");
        let secs = state.frame.run_elapsed_ms as f64 / 1000.0;
        ui.label(egui::RichText::new(format!("{:.1}s", secs)).monospace().strong());
    });
    ui.horizontal(|ui| {
        ui.label("Max radius:");
        ui.label(egui::RichText::new(format!("{:.0} pt", state.frame.max_radius)).monospace().strong());
    });
}

fn render_controls(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("Reset waves").clicked() {
            state.send(UICommand::ResetWaves);
        }
        let can_stop = state.frame.run > 0 && !state.frame.stopped;
        if ui.add_enabled(can_stop, egui::Button::new("Stop")).clicked() {
            state.send(UICommand::StopWaves);
        }
    });

    let current_playback = state.config.as_ref().map(|c| c.playback).unwrap_or_default();
    let mut playback = current_playback;
    ui.horizontal(|ui| {
        ui.label("Playback:");
        egui::ComboBox::from_id_salt("playback_selector")
            .selected_text(playback.label())
            .show_ui(ui, |ui| {
                for mode in [PlaybackMode::OneShot, PlaybackMode::InfiniteRepeat] {
                    ui.selectable_value(&mut playback, mode, mode.label());
                }
            });
    });
    if playback != current_playback {
        state.send(UICommand::SetPlaybackMode(playback));
    }

    let current_easing = state.config.as_ref().map(|c| c.easing).unwrap_or_default();
    let mut easing = current_easing;
    ui.horizontal(|ui| {
        ui.label("Easing:");
        egui::ComboBox::from_id_salt("easing_selector")
            .selected_text(easing.label())
            .show_ui(ui, |ui| {
                for curve in Easing::ALL {
                    ui.selectable_value(&mut easing, curve, curve.label());
                }
            });
    });
    if easing != current_easing {
        state.send(UICommand::SetEasing(easing));
    }

    ui.horizontal(|ui| {
        ui.label("Speed:");
        let mut speed = state.speed_percent as f64;
        if ui
            .add(egui::Slider::new(&mut speed, MIN_SPEED_PERCENT as f64..=MAX_SPEED_PERCENT as f64).suffix("%"))
            .changed()
        {
            state.speed_percent = speed.round() as u32;
            state.send(UICommand::SetSpeedPercent(state.speed_percent));
        }
        if ui.button("Reset").clicked() {
            state.speed_percent = 100;
            state.send(UICommand::SetSpeedPercent(100));
        }
    });
}

fn render_config(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Configuration");
    ui.separator();

    ui.horizontal(|ui| {
        if ui.button("Load config…").clicked() {
            state.open_config_file_picker();
        }
        let source = state
            .last_config_path
            .as_deref()
            .and_then(|p| std::path::Path::new(p).file_name())
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "startup".to_string());
        ui.label(egui::RichText::new(source).weak());
    });

    if let Some(config) = &state.config {
        ui.horizontal(|ui| {
            ui.label("Delay:");
            ui.label(egui::RichText::new(format!("{} ms", config.start_delay_ms)).strong());
            ui.label("Duration:");
            ui.label(egui::RichText::new(format!("{} ms", config.duration_ms)).strong());
        });
        ui.horizontal(|ui| {
            ui.label("Opacity:");
            ui.label(egui::RichText::new(format!("{:.2}–{:.2}", config.min_opacity, config.max_opacity)).strong());
            ui.label("Scale:");
            ui.label(egui::RichText::new(format!("{:.1}", config.scale_factor)).strong());
            if config.disable_animation {
                ui.label(egui::RichText::new("static").italics());
            }
        });
    }

    ui.checkbox(&mut state.show_targets, "Show target radii");
}
