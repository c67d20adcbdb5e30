//! # Central Map Visualization
//!
//! Draws the network map: concentric waves centred on the router and the
//! category markers placed around it.
//!
//! The map area is the whole central panel. Its size is reported to the
//! animation task whenever it changes, which both starts the first run and
//! drives relayout. Drawing goes through `render_scene` with an egui painter
//! as the surface, so waves end up under the markers.

use crate::categories::MarkerFrame;
use crate::render::{RenderSurface, render_scene, wave_color};
use crate::ui::{AppState, UICommand};
use crate::waves::WaveFrame;
use eframe::egui;
use egui::{Color32, Pos2};

/// Size changes below this are not reported.
const VIEWPORT_EPSILON: f32 = 0.5;

pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        report_viewport(state, rect.size());

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, ui.visuals().extreme_bg_color);

        let center = rect.center();
        if state.show_targets {
            draw_target_guides(&painter, center, &state.frame.waves);
        }

        let mut surface = PainterSurface { painter: &painter };
        render_scene(&mut surface, center, &state.frame);
    });
}

fn report_viewport(state: &mut AppState, size: egui::Vec2) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let changed = match state.reported_viewport {
        Some(previous) => (previous - size).abs().max_elem() > VIEWPORT_EPSILON,
        None => true,
    };
    if changed {
        state.reported_viewport = Some(size);
        state.send(UICommand::ViewportChanged {
            width: size.x,
            height: size.y,
        });
    }
}

fn draw_target_guides(painter: &egui::Painter, center: Pos2, waves: &[WaveFrame]) {
    let stroke = egui::Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 30));
    for wave in waves {
        painter.circle_stroke(center, wave.target_radius, stroke);
    }
}

struct PainterSurface<'a> {
    painter: &'a egui::Painter,
}

impl RenderSurface for PainterSurface<'_> {
    fn draw_wave(&mut self, center: Pos2, wave: &WaveFrame) {
        if wave.radius <= 0.0 {
            return;
        }
        self.painter.circle_stroke(center, wave.radius, egui::Stroke::new(wave.stroke_width, wave_color(wave)));
    }

    fn draw_marker(&mut self, anchor: Pos2, marker: &MarkerFrame) {
        let pos = anchor + marker.offset;
        self.painter.circle_filled(pos, marker.diameter / 2.0, marker.color);
        self.painter.text(
            pos,
            egui::Align2::CENTER_CENTER,
            marker.label,
            egui::FontId::proportional(marker.font_size),
            label_color(marker.color),
        );
    }
}

/// Black or white, whichever reads better on `fill`.
fn label_color(fill: Color32) -> Color32 {
    let luminance = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
    if luminance > 140.0 { Color32::BLACK } else { Color32::WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::DeviceCategory;

    #[test]
    fn label_contrasts_with_marker_fill() {
        assert_eq!(label_color(DeviceCategory::Mobiles.color()), Color32::BLACK);
        assert_eq!(label_color(DeviceCategory::Consoles.color()), Color32::BLACK);
        assert_eq!(label_color(DeviceCategory::Computers.color()), Color32::WHITE);
        assert_eq!(label_color(DeviceCategory::Others.color()), Color32::WHITE);
    }
}
