//! Single-value interpolation over animation time.
//!
//! A `Tween` is the explicit counterpart of an animatable value: it knows where
//! it started, where it is heading, when it started and how long it takes.
//! Sampling is pure (`value_at`), so the same tween can be evaluated for any
//! instant. Both playback policies of the wave sequencer go through it:
//! `Repeat::Once` settles on the target, `Repeat::Restart` wraps around.

use embassy_time::{Duration, Instant};

use super::easing::Easing;

/// What happens when a tween reaches the end of its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    /// Hold the target value forever.
    Once,
    /// Jump back to the start value and run again.
    Restart,
}

#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Instant,
    duration: Duration,
    easing: Easing,
    repeat: Repeat,
    /// Value captured by `stop`; sampling returns it unchanged afterwards.
    frozen: Option<f32>,
}

impl Tween {
    pub fn new(from: f32, to: f32, start: Instant, duration: Duration, easing: Easing, repeat: Repeat) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing,
            repeat,
            frozen: None,
        }
    }

    /// A tween that already rests at `value`.
    pub fn settled(value: f32) -> Self {
        Self::new(value, value, Instant::from_ticks(0), Duration::from_ticks(0), Easing::Linear, Repeat::Once)
    }

    /// Linear progress in `[0,1]` at `now`, before easing.
    pub fn progress_at(&self, now: Instant) -> f32 {
        let total = self.duration.as_ticks();
        if total == 0 {
            return 1.0;
        }
        if now <= self.start {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_ticks();
        match self.repeat {
            Repeat::Once => {
                if elapsed >= total {
                    1.0
                } else {
                    elapsed as f32 / total as f32
                }
            }
            Repeat::Restart => (elapsed % total) as f32 / total as f32,
        }
    }

    pub fn value_at(&self, now: Instant) -> f32 {
        if let Some(value) = self.frozen {
            return value;
        }
        let eased = self.easing.apply(self.progress_at(now));
        // exact at both ends
        self.from * (1.0 - eased) + self.to * eased
    }

    /// True once a one-shot tween has settled. Repeating tweens only finish by `stop`.
    pub fn is_finished(&self, now: Instant) -> bool {
        if self.is_stopped() {
            return true;
        }
        match self.repeat {
            Repeat::Once => now >= self.start + self.duration,
            Repeat::Restart => false,
        }
    }

    /// Freeze at the value sampled at `now`.
    pub fn stop(&mut self, now: Instant) {
        if !self.is_stopped() {
            self.frozen = Some(self.value_at(now));
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.frozen.is_some()
    }

    /// Start a new one-shot run from the current value towards `to`.
    pub fn retarget(&mut self, now: Instant, to: f32, duration: Duration) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
        self.repeat = Repeat::Once;
        self.frozen = None;
    }
}
