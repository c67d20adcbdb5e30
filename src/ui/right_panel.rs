//! # Right Panel - Wave Inspector
//!
//! Lists every active wave of the current run with its animated radius and
//! opacity next to the targets it is heading for, followed by the category
//! markers and their current offsets from the router.
//!
//! The wave table uses `egui_extras::TableBuilder`; rows are ordered by wave
//! index, which is also the introduction order.

use crate::render::wave_color;
use crate::ui::AppState;
use eframe::egui;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    let response = egui::SidePanel::right("inspector_right")
        .resizable(true)
        .default_width(state.right_panel_width)
        .width_range(240.0..=700.0)
        .show(ctx, |ui| {
            ui.heading("Inspector");
            ui.separator();

            if state.frame.waves.is_empty() {
                ui.label(egui::RichText::new("No active waves").weak());
            } else {
                let table_h = (ui.available_height() * 0.55).max(120.0);
                render_wave_table(ui, state, table_h);
            }

            ui.add_space(10.0);
            ui.separator();
            ui.label(egui::RichText::new("Categories").strong());
            render_marker_list(ui, state);
        });
    state.right_panel_width = response.response.rect.width();
}

fn render_wave_table(ui: &mut egui::Ui, state: &AppState, table_h: f32) {
    use egui_extras::{Column, TableBuilder};

    let row_height = ui.text_style_height(&egui::TextStyle::Body) * 1.3;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(true)
        .max_scroll_height(table_h)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::initial(30.0).at_least(24.0)) // Index
        .column(Column::initial(60.0).at_least(40.0)) // Introduced
        .column(Column::initial(70.0).at_least(50.0)) // Radius
        .column(Column::initial(70.0).at_least(50.0)) // Target radius
        .column(Column::initial(60.0).at_least(50.0)) // Opacity
        .column(Column::remainder()) // Target opacity
        .header(row_height, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong("Start");
            });
            header.col(|ui| {
                ui.strong("Radius");
            });
            header.col(|ui| {
                ui.strong("Target");
            });
            header.col(|ui| {
                ui.strong("Opacity");
            });
            header.col(|ui| {
                ui.strong("Target");
            });
        })
        .body(|body| {
            let waves = &state.frame.waves;
            body.rows(row_height, waves.len(), |mut row| {
                let wave = &waves[row.index()];
                row.col(|ui| {
                    ui.label(egui::RichText::new(wave.index.to_string()).color(wave_color(wave)).strong());
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.1} s", wave.introduced_ms as f64 / 1000.0));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.1}", wave.radius));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.1}", wave.target_radius));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.2}", wave.opacity));
                });
                row.col(|ui| {
                    ui.monospace(format!("{:.2}", wave.target_opacity));
                });
            });
        });
}

fn render_marker_list(ui: &mut egui::Ui, state: &AppState) {
    if state.frame.markers.is_empty() {
        ui.label(egui::RichText::new("Waiting for map size").weak());
        return;
    }
    egui::Grid::new("marker_grid").num_columns(2).striped(true).show(ui, |ui| {
        for marker in &state.frame.markers {
            ui.label(egui::RichText::new(marker.label).color(marker.color).strong());
            ui.monospace(format!("({:>6.1}, {:>6.1})", marker.offset.x, marker.offset.y));
            ui.end_row();
        }
    });
}
