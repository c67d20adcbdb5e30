//! Render boundary between the animation driver and the host surface.
//!
//! The driver publishes immutable `SceneFrame` snapshots; the host implements
//! `RenderSurface` and hands it to `render_scene`, which draws every wave
//! (ascending index, so inner rings are painted first) and then every marker
//! on top.

use egui::{Color32, Pos2};

use crate::categories::MarkerFrame;
use crate::waves::{PlaybackMode, WaveFrame};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneFrame {
    pub run: u32,
    pub waves: Vec<WaveFrame>,
    pub markers: Vec<MarkerFrame>,
    pub stopped: bool,
    pub playback: PlaybackMode,
    pub max_radius: f32,
    pub run_elapsed_ms: u64,
}

impl SceneFrame {
    pub fn active_wave_count(&self) -> usize {
        self.waves.len()
    }
}

/// Drawing callbacks provided by the host surface.
pub trait RenderSurface {
    /// Draw one ring centred on `center`.
    fn draw_wave(&mut self, center: Pos2, wave: &WaveFrame);
    /// Draw one marker; its position is `anchor + marker.offset`.
    fn draw_marker(&mut self, anchor: Pos2, marker: &MarkerFrame);
}

pub fn render_scene<S: RenderSurface + ?Sized>(surface: &mut S, center: Pos2, frame: &SceneFrame) {
    for wave in &frame.waves {
        surface.draw_wave(center, wave);
    }
    for marker in &frame.markers {
        surface.draw_marker(center, marker);
    }
}

/// Ring color with the wave's animated opacity applied to the base alpha.
pub fn wave_color(wave: &WaveFrame) -> Color32 {
    let [r, g, b, a] = wave.color.to_srgba_unmultiplied();
    let alpha = (a as f32 * wave.opacity.clamp(0.0, 1.0)).round() as u8;
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{CategoryLayout, DeviceCategory};
    use crate::waves::{WaveConfig, WaveSequencer};
    use egui::pos2;
    use embassy_time::Instant;

    #[derive(Default)]
    struct RecordingSurface {
        calls: Vec<String>,
    }

    impl RenderSurface for RecordingSurface {
        fn draw_wave(&mut self, center: Pos2, wave: &WaveFrame) {
            self.calls.push(format!("wave {} at ({}, {})", wave.index, center.x, center.y));
        }

        fn draw_marker(&mut self, anchor: Pos2, marker: &MarkerFrame) {
            let at = anchor + marker.offset;
            self.calls.push(format!("marker {} at ({}, {})", marker.label, at.x, at.y));
        }
    }

    #[test]
    fn waves_are_drawn_before_markers_in_order() {
        let now = Instant::from_millis(0);
        let mut sequencer = WaveSequencer::new(
            WaveConfig {
                wave_count: 2,
                disable_animation: true,
                ..WaveConfig::default()
            },
            100.0,
        );
        sequencer.start(now);
        sequencer.tick(now);
        let layout = CategoryLayout::reveal(800.0, now);

        let frame = SceneFrame {
            waves: sequencer.frames(),
            markers: layout.frames(),
            ..SceneFrame::default()
        };
        let mut surface = RecordingSurface::default();
        render_scene(&mut surface, pos2(50.0, 60.0), &frame);

        assert_eq!(surface.calls.len(), 2 + DeviceCategory::ALL.len());
        assert_eq!(surface.calls[0], "wave 0 at (50, 60)");
        assert_eq!(surface.calls[1], "wave 1 at (50, 60)");
        assert_eq!(surface.calls[2], "marker Router at (50, 60)");
        assert!(surface.calls[3].starts_with("marker Computers"));
    }

    #[test]
    fn wave_color_applies_opacity() {
        let wave = WaveFrame {
            index: 0,
            introduced_ms: 0,
            radius: 10.0,
            opacity: 0.5,
            target_radius: 10.0,
            target_opacity: 0.5,
            stroke_width: 1.0,
            color: Color32::from_rgb(10, 20, 30),
        };
        assert_eq!(wave_color(&wave).a(), 128);
        let faded = WaveFrame { opacity: 0.0, ..wave };
        assert_eq!(wave_color(&faded).a(), 0);
    }
}
