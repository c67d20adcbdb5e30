//! # Category Layout
//!
//! Places the fixed set of device-category markers around the router and
//! plays a one-shot reveal: every marker starts on the router (offset 0,0)
//! and moves to its target over one second, x and y animating independently
//! with the standard fast-out-slow-in curve.
//!
//! Offsets are in points relative to the router centre. Vertical offsets of
//! the upper and lower rows scale with half the viewport height; the rest are
//! fixed distances.

use egui::{Color32, Vec2, vec2};
use embassy_time::{Duration, Instant};

use crate::animation::{Easing, Repeat, Tween};

pub const REVEAL_DURATION: Duration = Duration::from_millis(1000);
pub const REVEAL_EASING: Easing = Easing::FastOutSlowIn;
/// Diameter of every marker circle.
pub const MARKER_DIAMETER: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCategory {
    Router,
    Computers,
    Mobiles,
    Amplifiers,
    Tablets,
    Tvs,
    Consoles,
    Others,
}

impl DeviceCategory {
    pub const ALL: [DeviceCategory; 8] = [
        DeviceCategory::Router,
        DeviceCategory::Computers,
        DeviceCategory::Mobiles,
        DeviceCategory::Amplifiers,
        DeviceCategory::Tablets,
        DeviceCategory::Tvs,
        DeviceCategory::Consoles,
        DeviceCategory::Others,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeviceCategory::Router => "Router",
            DeviceCategory::Computers => "Computers",
            DeviceCategory::Mobiles => "Mobiles",
            DeviceCategory::Amplifiers => "Amplifiers",
            DeviceCategory::Tablets => "Tablets",
            DeviceCategory::Tvs => "TVs",
            DeviceCategory::Consoles => "Consoles",
            DeviceCategory::Others => "Others",
        }
    }

    pub fn color(self) -> Color32 {
        match self {
            DeviceCategory::Router => Color32::from_rgb(0x88, 0x88, 0x88),
            DeviceCategory::Computers => Color32::from_rgb(0x00, 0x00, 0xFF),
            DeviceCategory::Mobiles => Color32::from_rgb(0x00, 0xFF, 0x00),
            DeviceCategory::Amplifiers => Color32::from_rgb(0xFF, 0x00, 0x00),
            DeviceCategory::Tablets => Color32::from_rgb(0x00, 0xFF, 0xFF),
            DeviceCategory::Tvs => Color32::from_rgb(0xFF, 0x00, 0xFF),
            DeviceCategory::Consoles => Color32::from_rgb(0xCC, 0xCC, 0xCC),
            DeviceCategory::Others => Color32::from_rgb(0x44, 0x44, 0x44),
        }
    }

    pub fn font_size(self) -> f32 {
        match self {
            DeviceCategory::Router => 14.0,
            _ => 12.0,
        }
    }

    /// Resting offset from the router centre for a viewport `height` points tall.
    pub fn target_offset(self, height: f32) -> Vec2 {
        let router_center_y = height / 2.0;
        let lower_row_y = router_center_y / 2.5;
        match self {
            DeviceCategory::Router => Vec2::ZERO,
            DeviceCategory::Computers => vec2(-70.0, -(router_center_y / 2.0)),
            DeviceCategory::Mobiles => vec2(70.0, -(router_center_y / 2.2)),
            DeviceCategory::Amplifiers => vec2(-120.0, 15.0),
            DeviceCategory::Tablets => vec2(120.0, -15.0),
            DeviceCategory::Tvs => vec2(0.0, lower_row_y),
            DeviceCategory::Consoles => vec2(-100.0, lower_row_y - 20.0),
            DeviceCategory::Others => vec2(100.0, lower_row_y - 20.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryMarker {
    pub category: DeviceCategory,
    pub current_offset: Vec2,
    x: Tween,
    y: Tween,
}

impl CategoryMarker {
    fn is_finished(&self, now: Instant) -> bool {
        self.x.is_finished(now) && self.y.is_finished(now)
    }
}

/// Render snapshot of one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerFrame {
    pub category: DeviceCategory,
    pub label: &'static str,
    pub color: Color32,
    pub offset: Vec2,
    pub diameter: f32,
    pub font_size: f32,
}

pub struct CategoryLayout {
    markers: Vec<CategoryMarker>,
    height: f32,
}

impl CategoryLayout {
    /// Lay out every category for a viewport `height` points tall and start
    /// the reveal at `now`.
    pub fn reveal(height: f32, now: Instant) -> Self {
        let markers = DeviceCategory::ALL
            .iter()
            .map(|&category| {
                let target = category.target_offset(height);
                CategoryMarker {
                    category,
                    current_offset: Vec2::ZERO,
                    x: Tween::new(0.0, target.x, now, REVEAL_DURATION, REVEAL_EASING, Repeat::Once),
                    y: Tween::new(0.0, target.y, now, REVEAL_DURATION, REVEAL_EASING, Repeat::Once),
                }
            })
            .collect();
        log::debug!("Category reveal started for viewport height {:.1}", height);
        Self { markers, height }
    }

    #[cfg(test)]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[cfg(test)]
    pub fn markers(&self) -> &[CategoryMarker] {
        &self.markers
    }

    /// Move every marker towards the targets of a new viewport height,
    /// starting from wherever it is now. The reveal is not replayed.
    pub fn relayout(&mut self, height: f32, now: Instant) {
        if (height - self.height).abs() < f32::EPSILON {
            return;
        }
        self.height = height;
        for marker in &mut self.markers {
            let target = marker.category.target_offset(height);
            let duration = if marker.is_finished(now) { Duration::from_ticks(0) } else { REVEAL_DURATION };
            marker.x.retarget(now, target.x, duration);
            marker.y.retarget(now, target.y, duration);
        }
        self.tick(now);
    }

    pub fn tick(&mut self, now: Instant) {
        for marker in &mut self.markers {
            marker.current_offset = vec2(marker.x.value_at(now), marker.y.value_at(now));
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.markers.iter().any(|m| !m.is_finished(now))
    }

    pub fn frames(&self) -> Vec<MarkerFrame> {
        self.markers
            .iter()
            .map(|m| MarkerFrame {
                category: m.category,
                label: m.category.label(),
                color: m.category.color(),
                offset: m.current_offset,
                diameter: MARKER_DIAMETER,
                font_size: m.category.font_size(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    #[test]
    fn documented_offsets_for_800_point_viewport() {
        let height = 800.0;
        let expected = [
            (DeviceCategory::Router, vec2(0.0, 0.0)),
            (DeviceCategory::Computers, vec2(-70.0, -200.0)),
            (DeviceCategory::Mobiles, vec2(70.0, -400.0 / 2.2)),
            (DeviceCategory::Amplifiers, vec2(-120.0, 15.0)),
            (DeviceCategory::Tablets, vec2(120.0, -15.0)),
            (DeviceCategory::Tvs, vec2(0.0, 160.0)),
            (DeviceCategory::Consoles, vec2(-100.0, 140.0)),
            (DeviceCategory::Others, vec2(100.0, 140.0)),
        ];
        for (category, offset) in expected {
            let actual = category.target_offset(height);
            assert!((actual - offset).length() < 1e-3, "{category:?}: {actual:?} != {offset:?}");
        }
    }

    #[test]
    fn every_marker_starts_on_the_router_and_ends_on_its_target() {
        let mut layout = CategoryLayout::reveal(900.0, ms(0));
        assert_eq!(layout.markers().len(), 8);
        layout.tick(ms(0));
        assert!(layout.frames().iter().all(|f| f.offset == Vec2::ZERO));

        layout.tick(ms(500));
        let mid = layout.frames();
        let computers = mid.iter().find(|f| f.category == DeviceCategory::Computers).unwrap();
        assert!(computers.offset.x < 0.0 && computers.offset.x > -70.0);
        assert!(layout.is_animating(ms(500)));

        layout.tick(ms(1000));
        assert!(!layout.is_animating(ms(1000)));
        for (frame, category) in layout.frames().iter().zip(DeviceCategory::ALL) {
            assert_eq!(frame.category, category);
            assert_eq!(frame.offset, category.target_offset(900.0));
            assert_eq!(frame.diameter, MARKER_DIAMETER);
        }
    }

    #[test]
    fn relayout_after_reveal_snaps_to_new_targets() {
        let mut layout = CategoryLayout::reveal(800.0, ms(0));
        layout.tick(ms(2000));
        layout.relayout(1000.0, ms(2000));
        let tvs = layout.frames().into_iter().find(|f| f.category == DeviceCategory::Tvs).unwrap();
        assert_eq!(tvs.offset, vec2(0.0, 200.0));
        assert!(!layout.is_animating(ms(2000)));
        assert_eq!(layout.height(), 1000.0);
    }

    #[test]
    fn relayout_during_reveal_continues_from_current_position() {
        let mut layout = CategoryLayout::reveal(800.0, ms(0));
        layout.tick(ms(500));
        let before = layout.frames()[1].offset;
        layout.relayout(400.0, ms(500));
        assert_eq!(layout.frames()[1].offset, before);
        assert!(layout.is_animating(ms(1000)));
        layout.tick(ms(1500));
        assert_eq!(layout.frames()[1].offset, DeviceCategory::Computers.target_offset(400.0));
    }

    #[test]
    fn router_label_is_larger() {
        assert_eq!(DeviceCategory::Router.font_size(), 14.0);
        assert_eq!(DeviceCategory::Tvs.label(), "TVs");
        assert_eq!(DeviceCategory::Tvs.font_size(), 12.0);
    }
}
