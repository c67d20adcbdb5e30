//! Per-wave resting targets.
//!
//! Wave `index` out of `count` is placed at the normalized fraction
//! `index / max(count - 1, 1)`: index 0 is the innermost, most opaque ring,
//! the last index the outermost, faintest one.

/// Normalized position of a wave, in `[0,1]`. A single wave sits at 0.
pub fn index_fraction(index: u32, count: u32) -> f32 {
    let denominator = count.saturating_sub(1).max(1);
    (index.min(denominator) as f32) / denominator as f32
}

/// Largest ring radius for a viewport: half the shorter side times `scale_factor`.
pub fn max_radius_for_viewport(width: f32, height: f32, scale_factor: f32) -> f32 {
    (width.min(height).max(0.0) / 2.0) * scale_factor
}

/// Resting radius of wave `index`.
///
/// Rings are spread linearly from `max_radius * min_radius_fraction` to
/// `max_radius`. A lone wave goes all the way out.
pub fn target_radius(index: u32, count: u32, max_radius: f32, min_radius_fraction: f32) -> f32 {
    if count <= 1 {
        return max_radius;
    }
    let min_radius = max_radius * min_radius_fraction;
    lerp(min_radius, max_radius, index_fraction(index, count))
}

/// Resting opacity of wave `index`, from `max_opacity` (innermost) down to
/// `min_opacity` (outermost).
pub fn target_opacity(index: u32, count: u32, min_opacity: f32, max_opacity: f32) -> f32 {
    lerp(max_opacity, min_opacity, index_fraction(index, count))
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_is_monotonic_with_exact_endpoints() {
        for count in 2..=12 {
            let max = 300.0;
            let radii: Vec<f32> = (0..count).map(|i| target_radius(i, count, max, 1.0 / 3.0)).collect();
            assert!((radii[0] - 100.0).abs() < 1e-3, "count {count}: first = {}", radii[0]);
            assert_eq!(*radii.last().unwrap(), max);
            for pair in radii.windows(2) {
                assert!(pair[1] >= pair[0], "count {count}: {radii:?}");
            }
        }
    }

    #[test]
    fn single_wave_uses_max_radius_without_dividing_by_zero() {
        assert_eq!(index_fraction(0, 1), 0.0);
        assert_eq!(target_radius(0, 1, 250.0, 0.25), 250.0);
        let opacity = target_opacity(0, 1, 0.45, 0.85);
        assert!(opacity.is_finite());
        assert!((opacity - 0.85).abs() < 1e-6);
    }

    #[test]
    fn opacity_decreases_outwards_within_bounds() {
        for count in 1..=10 {
            let opacities: Vec<f32> = (0..count).map(|i| target_opacity(i, count, 0.45, 0.85)).collect();
            for value in &opacities {
                assert!((0.45 - 1e-6..=0.85 + 1e-6).contains(value), "count {count}: {opacities:?}");
            }
            for pair in opacities.windows(2) {
                assert!(pair[1] <= pair[0], "count {count}: {opacities:?}");
            }
            if count > 1 {
                assert!((opacities[count as usize - 1] - 0.45).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn max_radius_uses_shorter_side() {
        assert_eq!(max_radius_for_viewport(800.0, 600.0, 2.0), 600.0);
        assert_eq!(max_radius_for_viewport(400.0, 1000.0, 1.0), 200.0);
        assert_eq!(max_radius_for_viewport(-5.0, 100.0, 1.0), 0.0);
    }
}
