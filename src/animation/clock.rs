use embassy_time::Instant;

// Fixed-point Q32.32 for speed scaling. 1.0 == 1<<32
const ONE_Q32: u64 = 1u64 << 32;

pub const MIN_SPEED_PERCENT: u32 = 10;
pub const MAX_SPEED_PERCENT: u32 = 400;

/// Maps real executor time to animation time, scaled by a speed percentage.
///
/// The mapping is `anim = origin_anim + (real - origin_real) * scale`. Speed
/// changes rebase `origin_real` so the animation time of "now" is preserved
/// and queued deadlines never land in the past.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    origin_real: u64, // real ticks
    origin_anim: u64, // animation ticks
    scale_q32: u64,
    speed_percent: u32, // exact percent requested by caller (avoids FP truncation off-by-one)
}

impl AnimationClock {
    /// A real-time clock whose animation time starts equal to `real_now`.
    pub fn new(real_now: Instant) -> Self {
        Self {
            origin_real: real_now.as_ticks(),
            origin_anim: real_now.as_ticks(),
            scale_q32: ONE_Q32,
            speed_percent: 100,
        }
    }

    pub fn speed_percent(&self) -> u32 {
        self.speed_percent
    }

    pub fn now(&self, real: Instant) -> Instant {
        let real_dt = real.as_ticks().saturating_sub(self.origin_real);
        let scaled = ((real_dt as u128) * (self.scale_q32 as u128) / (ONE_Q32 as u128)) as u64;
        Instant::from_ticks(self.origin_anim.saturating_add(scaled))
    }

    /// Real instant at which animation time reaches `target`.
    pub fn real_deadline(&self, target: Instant) -> Instant {
        if target == Instant::MAX {
            return Instant::MAX;
        }
        // Targets before the origin are already due.
        let anim_dt = match target.as_ticks().checked_sub(self.origin_anim) {
            Some(dt) => dt,
            None => return Instant::from_ticks(self.origin_real),
        };
        let real_dt = (anim_dt as u128) * (ONE_Q32 as u128) / (self.scale_q32 as u128);
        let real_dt = real_dt.min(u64::MAX as u128) as u64;
        Instant::from_ticks(self.origin_real.saturating_add(real_dt))
    }

    pub fn set_speed_percent(&mut self, real_now: Instant, percent: u32) {
        let percent = percent.clamp(MIN_SPEED_PERCENT, MAX_SPEED_PERCENT);
        if percent == self.speed_percent {
            return;
        }
        // Re-anchor both origins at "now" under the old mapping, then switch scale.
        let anim_now = self.now(real_now);
        self.origin_real = real_now.as_ticks();
        self.origin_anim = anim_now.as_ticks();
        self.scale_q32 = ((percent as u128) * (ONE_Q32 as u128) / 100u128) as u64;
        self.speed_percent = percent;
        log::debug!("Animation speed set to {}%", percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Instant {
        Instant::from_millis(value)
    }

    #[test]
    fn real_time_by_default() {
        let clock = AnimationClock::new(ms(5_000));
        assert_eq!(clock.now(ms(5_000)), ms(5_000));
        assert_eq!(clock.now(ms(6_250)), ms(6_250));
        assert_eq!(clock.real_deadline(ms(7_000)), ms(7_000));
        assert_eq!(clock.speed_percent(), 100);
    }

    #[test]
    fn continuity_on_speed_change_preserves_mapping() {
        let mut clock = AnimationClock::new(ms(0));
        let anchor = ms(1_000);
        let before = clock.now(anchor);
        clock.set_speed_percent(anchor, 400);
        let after = clock.now(anchor);
        assert_eq!(before, after);
        // 100 ms of real time is now 400 ms of animation time
        assert_eq!(clock.now(ms(1_100)), ms(1_400));
    }

    #[test]
    fn deadlines_scale_inverse_with_speed() {
        let mut clock = AnimationClock::new(ms(0));
        clock.set_speed_percent(ms(0), 200);
        // 200 ms of animation time passes in 100 ms of real time
        assert_eq!(clock.real_deadline(ms(200)), ms(100));
        clock.set_speed_percent(ms(100), 50);
        assert_eq!(clock.now(ms(100)), ms(200));
        assert_eq!(clock.real_deadline(ms(300)), ms(300));
    }

    #[test]
    fn past_targets_are_due_immediately() {
        let clock = AnimationClock::new(ms(2_000));
        assert_eq!(clock.real_deadline(ms(1_000)), ms(2_000));
        assert_eq!(clock.real_deadline(Instant::MAX), Instant::MAX);
    }

    #[test]
    fn speed_is_clamped() {
        let mut clock = AnimationClock::new(ms(0));
        clock.set_speed_percent(ms(0), 5_000);
        assert_eq!(clock.speed_percent(), MAX_SPEED_PERCENT);
        clock.set_speed_percent(ms(0), 0);
        assert_eq!(clock.speed_percent(), MIN_SPEED_PERCENT);
    }
}
