//! # Wave Sequencer
//!
//! Owns the configuration of one run and the ordered set of active waves.
//! Time is passed in explicitly: the driver calls `tick(now)` once per frame
//! and renders `frames()` afterwards.
//!
//! ## Introduction
//!
//! Wave `k` is scheduled at `run_start + k * start_delay` (or all at
//! `run_start` when animation is disabled). `tick` introduces every wave
//! whose slot has passed, strictly in index order, and starts its tweens at
//! the *scheduled* instant so late ticks never shift the sequence.
//!
//! ## Playback
//!
//! - `OneShot`: radius `0 → target`, opacity `1 → target`, eased, then held.
//! - `InfiniteRepeat`: radius `0 → max`, opacity `1 → 0`, linear, looping.
//!
//! ## Stop and reset
//!
//! `stop` freezes every wave at its current value and cancels pending
//! introductions. `reset` empties the active set and schedules a fresh run.

use egui::Color32;
use embassy_time::{Duration, Instant};

use super::config::{PlaybackMode, WaveConfig};
use super::targets::{target_opacity, target_radius};
use crate::animation::{Easing, Repeat, Tween};

/// One ring in the active set.
#[derive(Debug, Clone)]
pub struct Wave {
    pub index: u32,
    pub introduced_at: Instant,
    pub target_radius: f32,
    pub target_opacity: f32,
    pub radius: f32,
    pub opacity: f32,
    radius_tween: Tween,
    opacity_tween: Tween,
}

impl Wave {
    fn sample(&mut self, now: Instant) {
        self.radius = self.radius_tween.value_at(now);
        self.opacity = self.opacity_tween.value_at(now).clamp(0.0, 1.0);
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.radius_tween.is_finished(now) && self.opacity_tween.is_finished(now)
    }

    fn stop(&mut self, now: Instant) {
        self.radius_tween.stop(now);
        self.opacity_tween.stop(now);
        self.sample(now);
    }
}

/// Render snapshot of one wave.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFrame {
    pub index: u32,
    /// Scheduled introduction, relative to the start of the run.
    pub introduced_ms: u64,
    pub radius: f32,
    pub opacity: f32,
    pub target_radius: f32,
    pub target_opacity: f32,
    pub stroke_width: f32,
    /// Base color; `opacity` is applied on top of its alpha when drawing.
    pub color: Color32,
}

pub struct WaveSequencer {
    config: WaveConfig,
    /// Max radius for the next run.
    max_radius: f32,
    /// Max radius captured when the current run started.
    run_max_radius: f32,
    run_started: Option<Instant>,
    run: u32,
    waves: Vec<Wave>,
    stopped_at: Option<Instant>,
}

impl WaveSequencer {
    pub fn new(config: WaveConfig, max_radius: f32) -> Self {
        Self {
            config,
            max_radius,
            run_max_radius: max_radius,
            run_started: None,
            run: 0,
            waves: Vec::new(),
            stopped_at: None,
        }
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn max_radius(&self) -> f32 {
        self.run_max_radius
    }

    #[cfg(test)]
    pub fn waves(&self) -> &[Wave] {
        &self.waves
    }

    pub fn active_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.waves.iter().map(|w| w.index)
    }

    pub fn is_started(&self) -> bool {
        self.run_started.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Max radius used from the next run on.
    pub fn set_max_radius(&mut self, max_radius: f32) {
        self.max_radius = max_radius;
    }

    /// Swap in a new configuration and start a new run with it.
    pub fn replace_config(&mut self, config: WaveConfig, now: Instant) {
        self.config = config;
        self.start(now);
    }

    /// Begin a run at `now` with an empty active set. The first wave
    /// appears on the next `tick`.
    pub fn start(&mut self, now: Instant) {
        self.waves.clear();
        self.run = self.run.wrapping_add(1);
        self.run_started = Some(now);
        self.run_max_radius = self.max_radius;
        self.stopped_at = None;
        log::info!(
            "Wave run {} started: {} waves, {:?} playback, max radius {:.1}",
            self.run,
            self.config.wave_count,
            self.config.playback,
            self.run_max_radius
        );
    }

    /// Drop every wave and replay the introduction sequence from scratch.
    pub fn reset(&mut self, now: Instant) {
        log::debug!("Resetting wave run {} with {} active waves", self.run, self.waves.len());
        self.start(now);
    }

    /// Freeze all waves where they are and cancel pending introductions.
    pub fn stop(&mut self, now: Instant) {
        if self.run_started.is_none() || self.stopped_at.is_some() {
            return;
        }
        for wave in &mut self.waves {
            wave.stop(now);
        }
        self.stopped_at = Some(now);
        log::debug!("Wave run {} stopped with {} active waves", self.run, self.waves.len());
    }

    fn introduction_at(&self, index: u32) -> Option<Instant> {
        let started = self.run_started?;
        if self.config.disable_animation {
            return Some(started);
        }
        Some(started + self.config.start_delay() * index)
    }

    /// Scheduled instant of the next wave, if any remain in this run.
    pub fn next_introduction_at(&self) -> Option<Instant> {
        if self.stopped_at.is_some() {
            return None;
        }
        let next_index = self.waves.len() as u32;
        if next_index >= self.config.wave_count {
            return None;
        }
        self.introduction_at(next_index)
    }

    /// Instant of the configured auto-stop, once it is known and still pending.
    fn auto_stop_at(&self) -> Option<Instant> {
        if self.stopped_at.is_some() {
            return None;
        }
        let after = self.config.auto_stop_after()?;
        let last = self.introduction_at(self.config.wave_count.saturating_sub(1))?;
        Some(last + after)
    }

    /// The earliest instant at which the sequencer changes state other than
    /// by continuous interpolation.
    pub fn next_event_at(&self) -> Option<Instant> {
        match (self.next_introduction_at(), self.auto_stop_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        if self.run_started.is_none() || self.stopped_at.is_some() {
            return false;
        }
        self.next_event_at().is_some() || self.waves.iter().any(|w| !w.is_finished(now))
    }

    /// Introduce due waves, apply a due auto-stop, then sample every wave at `now`.
    pub fn tick(&mut self, now: Instant) {
        if self.run_started.is_none() || self.stopped_at.is_some() {
            return;
        }

        while let Some(at) = self.next_introduction_at() {
            if at > now {
                break;
            }
            self.introduce(at);
        }

        if let Some(stop_at) = self.auto_stop_at() {
            if self.next_introduction_at().is_none() && stop_at <= now {
                self.stop(stop_at);
                return;
            }
        }

        for wave in &mut self.waves {
            wave.sample(now);
        }
    }

    fn introduce(&mut self, at: Instant) {
        let index = self.waves.len() as u32;
        let count = self.config.wave_count;
        let target_radius = target_radius(index, count, self.run_max_radius, self.config.min_radius_fraction);
        let target_opacity = target_opacity(index, count, self.config.min_opacity, self.config.max_opacity);
        let duration = self.config.duration();

        let (radius_tween, opacity_tween) = if self.config.disable_animation {
            (Tween::settled(target_radius), Tween::settled(target_opacity))
        } else {
            match self.config.playback {
                PlaybackMode::OneShot => (
                    Tween::new(0.0, target_radius, at, duration, self.config.easing, Repeat::Once),
                    Tween::new(1.0, target_opacity, at, duration, self.config.easing, Repeat::Once),
                ),
                PlaybackMode::InfiniteRepeat => (
                    Tween::new(0.0, self.run_max_radius, at, duration, Easing::Linear, Repeat::Restart),
                    Tween::new(1.0, 0.0, at, duration, Easing::Linear, Repeat::Restart),
                ),
            }
        };

        let mut wave = Wave {
            index,
            introduced_at: at,
            target_radius,
            target_opacity,
            radius: 0.0,
            opacity: 1.0,
            radius_tween,
            opacity_tween,
        };
        wave.sample(at);
        log::debug!(
            "Run {}: introduced wave {} at {} ms (target radius {:.1}, opacity {:.2})",
            self.run,
            index,
            at.as_millis(),
            target_radius,
            target_opacity
        );
        self.waves.push(wave);
    }

    pub fn frames(&self) -> Vec<WaveFrame> {
        let color = self.config.color32();
        self.waves
            .iter()
            .map(|w| WaveFrame {
                index: w.index,
                introduced_ms: self
                    .run_started
                    .map(|started| w.introduced_at.saturating_duration_since(started).as_millis())
                    .unwrap_or(0),
                radius: w.radius,
                opacity: w.opacity,
                target_radius: w.target_radius,
                target_opacity: w.target_opacity,
                stroke_width: self.config.line_width,
                color,
            })
            .collect()
    }

    /// Time since the current run started, for display.
    pub fn run_elapsed(&self, now: Instant) -> Duration {
        match self.run_started {
            Some(started) => match self.stopped_at {
                Some(stopped) => stopped.saturating_duration_since(started),
                None => now.saturating_duration_since(started),
            },
            None => Duration::from_ticks(0),
        }
    }
}
