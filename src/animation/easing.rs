//! Easing curves for timed position changes.

/// Cubic ease-out: fast start, gentle stop.
///
/// `1 - (1 - t)³` for `t` in `[0, 1]`; input is clamped.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// A fixed-duration move using [`ease_out_cubic`].
///
/// # Example
///
/// ```rust
/// use pis_board::animation::EaseOutCubic;
///
/// let ease = EaseOutCubic::new(800);
/// let (start, done) = ease.interpolate(400.0, 0.0, 0);
/// assert_eq!((start, done), (400.0, false));
///
/// let (end, done) = ease.interpolate(400.0, 0.0, 800);
/// assert_eq!((end, done), (0.0, true));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EaseOutCubic {
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl EaseOutCubic {
    /// Move lasting `duration_ms`.
    pub const fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    /// Linear progress in `[0, 1]` after `elapsed_ms`.
    pub fn progress(&self, elapsed_ms: u64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }

    /// Value between `from` and `to` after `elapsed_ms`.
    ///
    /// Returns `(value, is_complete)`.
    pub fn interpolate(&self, from: f32, to: f32, elapsed_ms: u64) -> (f32, bool) {
        let progress = self.progress(elapsed_ms);
        if progress >= 1.0 {
            return (to, true);
        }
        let eased = ease_out_cubic(progress);
        (from + (to - from) * eased, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_endpoints_and_shape() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        // ahead of linear throughout
        for i in 1..10 {
            let t = i as f32 / 10.0;
            assert!(ease_out_cubic(t) > t);
        }
    }

    #[test]
    fn clamps_input() {
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
    }

    #[test]
    fn interpolate_midway() {
        let ease = EaseOutCubic::new(800);
        let (value, done) = ease.interpolate(400.0, 0.0, 400);
        assert!(!done);
        assert!((value - 50.0).abs() < 1e-3);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        assert_eq!(EaseOutCubic::new(0).interpolate(10.0, 0.0, 0), (0.0, true));
    }
}
