//! Timed attribute transitions.
//!
//! A [`Tween`] interpolates one numeric attribute between two values over a
//! duration. Time is supplied by the caller as the elapsed [`Duration`] since
//! some fixed origin, so transitions are deterministic and need no clock.
//! Starting a new transition on an attribute that is still moving begins from
//! its current interpolated value.

use std::time::Duration;

/// Easing curve applied to normalized time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Eased progress for `t` in `[0, 1]` (clamped).
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

/// One animated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// A value at rest.
    #[must_use]
    pub fn still(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            start: Duration::ZERO,
            duration: Duration::ZERO,
            easing: Easing::default(),
        }
    }

    /// Interpolated value at time `now`.
    #[must_use]
    pub fn value_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() || now >= self.end() {
            return self.to;
        }
        if now <= self.start {
            return self.from;
        }
        let t = (now - self.start).as_secs_f32() / self.duration.as_secs_f32();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// Start moving toward `to` at `now`, from wherever the value currently is.
    pub fn retarget(&mut self, to: f32, now: Duration, duration: Duration) {
        self.from = self.value_at(now);
        self.to = to;
        self.start = now;
        self.duration = duration;
    }

    /// Final value of the current transition.
    #[must_use]
    pub const fn target(&self) -> f32 {
        self.to
    }

    /// Whether the transition has finished at `now`.
    #[must_use]
    pub fn is_settled(&self, now: Duration) -> bool {
        now >= self.end()
    }

    fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_cubic_in_out_shape() {
        let e = Easing::CubicInOut;
        assert_relative_eq!(e.apply(0.0), 0.0);
        assert_relative_eq!(e.apply(0.5), 0.5);
        assert_relative_eq!(e.apply(1.0), 1.0);
        assert_relative_eq!(e.apply(0.25), 0.0625);
        assert_relative_eq!(e.apply(0.75), 0.9375);
        assert_relative_eq!(e.apply(2.0), 1.0);
    }

    #[test]
    fn test_still_is_settled() {
        let t = Tween::still(4.0);
        assert_relative_eq!(t.value_at(ms(0)), 4.0);
        assert!(t.is_settled(ms(0)));
    }

    #[test]
    fn test_tween_progress() {
        let mut t = Tween::still(1.0);
        t.retarget(0.1, ms(1000), ms(100));
        assert_relative_eq!(t.value_at(ms(1000)), 1.0);
        assert_relative_eq!(t.value_at(ms(1050)), 0.55, epsilon = 1e-5);
        assert_relative_eq!(t.value_at(ms(1100)), 0.1);
        assert!(!t.is_settled(ms(1050)));
        assert!(t.is_settled(ms(1100)));
        assert_relative_eq!(t.target(), 0.1);
    }

    #[test]
    fn test_retarget_starts_from_current_value() {
        let mut t = Tween::still(3.0);
        t.retarget(5.0, ms(0), ms(100));
        t.retarget(4.0, ms(50), ms(500));
        // Halfway through the first tween the value was 4.0.
        assert_relative_eq!(t.value_at(ms(50)), 4.0, epsilon = 1e-5);
        assert_relative_eq!(t.value_at(ms(550)), 4.0);
    }

    #[test]
    fn test_far_future_start_does_not_overflow() {
        let mut tween = Tween::still(1.0);
        tween.retarget(0.0, Duration::MAX, ms(500));
        assert_relative_eq!(tween.value_at(Duration::MAX), 0.0);
        assert!(tween.is_settled(Duration::MAX));
        assert_relative_eq!(tween.value_at(ms(10)), 1.0);
    }

    #[test]
    fn test_linear_easing() {
        assert_relative_eq!(Easing::Linear.apply(0.3), 0.3);
    }
}
