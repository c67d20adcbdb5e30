//! Configuration of one wave animation run.

use anyhow::{Context, ensure};
use egui::Color32;
use embassy_time::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::animation::Easing;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "circle_waves.toml";

pub const MAX_WAVE_COUNT: u32 = 256;
/// Upper bound for every timing value, and for the whole introduction sequence.
pub const MAX_TIMING_MS: u64 = 24 * 60 * 60 * 1000;

/// How each wave plays once it has been introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Ease once from the centre to the wave's own target, then hold.
    #[default]
    OneShot,
    /// Expand linearly to the max radius while fading out, then start over.
    InfiniteRepeat,
}

impl PlaybackMode {
    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::OneShot => "One-shot",
            PlaybackMode::InfiniteRepeat => "Infinite repeat",
        }
    }
}

/// Parameters of a wave run. Held fixed for the duration of the run; a new
/// configuration only takes effect when the sequencer starts over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct WaveConfig {
    pub wave_count: u32,
    /// Stroke width of each ring in points.
    pub line_width: f32,
    /// Delay between introducing consecutive waves.
    pub start_delay_ms: u64,
    /// Length of one interpolation (or one loop, when repeating).
    pub duration_ms: u32,
    /// Max radius as a multiple of half the shorter viewport side.
    pub scale_factor: f32,
    /// Unmultiplied RGBA.
    pub color: [u8; 4],
    /// Opacity of the outermost wave.
    pub min_opacity: f32,
    /// Opacity of the innermost wave.
    pub max_opacity: f32,
    /// Innermost ring radius as a fraction of the max radius.
    pub min_radius_fraction: f32,
    /// Show every wave at its final state at once, without animating.
    pub disable_animation: bool,
    pub playback: PlaybackMode,
    /// Curve for one-shot playback. Repeating playback is always linear.
    pub easing: Easing,
    /// Freeze all waves this long after the last one was introduced.
    pub auto_stop_after_ms: Option<u64>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            wave_count: 4,
            line_width: 1.0,
            start_delay_ms: 700,
            duration_ms: 3500,
            scale_factor: 2.0,
            color: [0x0B, 0x9C, 0xEA, 0xFF],
            min_opacity: 0.45,
            max_opacity: 0.85,
            min_radius_fraction: 1.0 / 3.0,
            disable_animation: false,
            playback: PlaybackMode::OneShot,
            easing: Easing::EaseInOut,
            auto_stop_after_ms: None,
        }
    }
}

impl WaveConfig {
    /// Load and validate a configuration from a TOML file.
    ///
    /// Missing keys take their default values; unknown keys are rejected.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        log::info!("Loaded wave configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: WaveConfig = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the sequencer cannot animate meaningfully.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.wave_count >= 1, "wave_count must be at least 1");
        ensure!(
            self.wave_count <= MAX_WAVE_COUNT,
            "wave_count {} exceeds the maximum of {}",
            self.wave_count,
            MAX_WAVE_COUNT
        );
        ensure!(
            (0.0..=1.0).contains(&self.min_opacity),
            "min_opacity {} must be within 0.0..=1.0",
            self.min_opacity
        );
        ensure!(
            (0.0..=1.0).contains(&self.max_opacity),
            "max_opacity {} must be within 0.0..=1.0",
            self.max_opacity
        );
        ensure!(
            self.min_opacity <= self.max_opacity,
            "min_opacity {} must not exceed max_opacity {}",
            self.min_opacity,
            self.max_opacity
        );
        ensure!(self.scale_factor > 0.0, "scale_factor must be positive");
        ensure!(
            self.min_radius_fraction > 0.0 && self.min_radius_fraction <= 1.0,
            "min_radius_fraction {} must be within (0.0, 1.0]",
            self.min_radius_fraction
        );
        ensure!(self.line_width >= 0.0, "line_width must not be negative");
        ensure!(
            self.duration_ms > 0 || self.disable_animation,
            "duration_ms must be positive unless animation is disabled"
        );
        ensure!(
            self.start_delay_ms <= MAX_TIMING_MS,
            "start_delay_ms {} exceeds the maximum of {} ms",
            self.start_delay_ms,
            MAX_TIMING_MS
        );
        ensure!(
            self.duration_ms as u64 <= MAX_TIMING_MS,
            "duration_ms {} exceeds the maximum of {} ms",
            self.duration_ms,
            MAX_TIMING_MS
        );
        if let Some(after) = self.auto_stop_after_ms {
            ensure!(
                after <= MAX_TIMING_MS,
                "auto_stop_after_ms {} exceeds the maximum of {} ms",
                after,
                MAX_TIMING_MS
            );
        }
        // wave_count and start_delay_ms are bounded above, so this cannot overflow
        let sequence_ms = self.start_delay_ms * (self.wave_count as u64 - 1);
        ensure!(
            sequence_ms <= MAX_TIMING_MS,
            "introducing {} waves {} ms apart takes longer than {} ms",
            self.wave_count,
            self.start_delay_ms,
            MAX_TIMING_MS
        );
        Ok(())
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms as u64)
    }

    pub fn auto_stop_after(&self) -> Option<Duration> {
        self.auto_stop_after_ms.map(Duration::from_millis)
    }

    pub fn color32(&self) -> Color32 {
        let [r, g, b, a] = self.color;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WaveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.wave_count, 4);
        assert_eq!(config.start_delay(), Duration::from_millis(700));
        assert_eq!(config.duration(), Duration::from_millis(3500));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = WaveConfig::from_toml(
            r#"
            wave_count = 6
            playback = "infinite_repeat"
            easing = "fast_out_slow_in"
            color = [255, 0, 0, 128]
            auto_stop_after_ms = 1750
            "#,
        )
        .unwrap();
        assert_eq!(config.wave_count, 6);
        assert_eq!(config.playback, PlaybackMode::InfiniteRepeat);
        assert_eq!(config.easing, Easing::FastOutSlowIn);
        assert_eq!(config.color, [255, 0, 0, 128]);
        assert_eq!(config.auto_stop_after(), Some(Duration::from_millis(1750)));
        assert_eq!(config.start_delay_ms, 700);
        assert_eq!(config.min_opacity, 0.45);
    }

    #[test]
    fn rejects_zero_waves() {
        let err = WaveConfig::from_toml("wave_count = 0").unwrap_err();
        assert!(format!("{err:#}").contains("wave_count"));
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        assert!(WaveConfig::from_toml("min_opacity = 1.5").is_err());
        assert!(WaveConfig::from_toml("min_opacity = 0.9\nmax_opacity = 0.5").is_err());
    }

    #[test]
    fn rejects_unknown_keys_and_bad_types() {
        assert!(WaveConfig::from_toml("waves = 3").is_err());
        assert!(WaveConfig::from_toml("wave_count = \"four\"").is_err());
    }

    #[test]
    fn zero_duration_only_allowed_without_animation() {
        assert!(WaveConfig::from_toml("duration_ms = 0").is_err());
        assert!(WaveConfig::from_toml("duration_ms = 0\ndisable_animation = true").is_ok());
    }

    #[test]
    fn rejects_timings_that_would_overflow_the_clock() {
        let err = WaveConfig::from_toml("auto_stop_after_ms = 9223372036854775807").unwrap_err();
        assert!(format!("{err:#}").contains("auto_stop_after_ms"));
        let err = WaveConfig::from_toml("start_delay_ms = 9000000000000000\nauto_stop_after_ms = 1").unwrap_err();
        assert!(format!("{err:#}").contains("start_delay_ms"));
        assert!(WaveConfig::from_toml("duration_ms = 4000000000").is_err());
    }

    #[test]
    fn rejects_introduction_sequence_longer_than_a_day() {
        // each delay is fine on its own, the sequence is not
        let err = WaveConfig::from_toml("wave_count = 200\nstart_delay_ms = 3600000").unwrap_err();
        assert!(format!("{err:#}").contains("200 waves"));
        assert!(WaveConfig::from_toml("wave_count = 24\nstart_delay_ms = 3600000").is_ok());
        assert!(WaveConfig::from_toml("wave_count = 100000").is_err());
    }

    #[test]
    fn bundled_config_file_parses() {
        let config = WaveConfig::from_toml(include_str!("../../circle_waves.toml")).unwrap();
        assert_eq!(config.wave_count, 4);
        assert_eq!(config.color32(), WaveConfig::default().color32());
        assert_eq!(config.auto_stop_after(), None);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = WaveConfig::load(Path::new("/nonexistent/circle_waves.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read config file"));
    }
}
