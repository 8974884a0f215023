//! Container expansion preview animation.
//!
//! The host render loop polls [`ContainerAnimation::current_bounds`] each
//! frame with the current time; nothing here schedules work.

use kurbo::Rect;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Cubic ease-out on `t` in [0, 1].
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Eased interpolation between two boxes.
pub fn interpolate_bounds(start: Rect, end: Rect, progress: f64) -> Rect {
    let t = ease_out_cubic(progress.clamp(0.0, 1.0));
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    let x = lerp(start.x0, end.x0);
    let y = lerp(start.y0, end.y0);
    let w = lerp(start.width(), end.width());
    let h = lerp(start.height(), end.height());
    Rect::new(x, y, x + w, y + h)
}

/// A running grow/shrink preview between two container boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerAnimation {
    pub start_bounds: Rect,
    pub end_bounds: Rect,
    pub start_time: Instant,
    pub duration: Duration,
}

impl ContainerAnimation {
    /// Start an animation now.
    pub fn new(start_bounds: Rect, end_bounds: Rect, duration: Duration) -> Self {
        Self::starting_at(start_bounds, end_bounds, Instant::now(), duration)
    }

    pub fn starting_at(start_bounds: Rect, end_bounds: Rect, start_time: Instant, duration: Duration) -> Self {
        Self {
            start_bounds,
            end_bounds,
            start_time,
            duration,
        }
    }

    /// Linear progress in [0, 1]. Zero-length animations are complete.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Box to draw at `now`.
    pub fn current_bounds(&self, now: Instant) -> Rect {
        interpolate_bounds(self.start_bounds, self.end_bounds, self.progress(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_out_cubic() {
        assert!(ease_out_cubic(0.0).abs() < f64::EPSILON);
        assert!((ease_out_cubic(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < f64::EPSILON);
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(-20.0, -20.0, 140.0, 140.0);
        assert_eq!(interpolate_bounds(a, b, 0.0), a);
        assert_eq!(interpolate_bounds(a, b, 1.0), b);
        assert_eq!(interpolate_bounds(a, b, 7.0), b);
    }

    #[test]
    fn test_animation_progress() {
        let start = Instant::now();
        let anim = ContainerAnimation::starting_at(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 0.0, 20.0, 20.0),
            start,
            Duration::from_millis(300),
        );
        assert!(anim.progress(start).abs() < f64::EPSILON);
        assert!(!anim.is_complete(start));
        let half = anim.progress(start + Duration::from_millis(150));
        assert!((half - 0.5).abs() < 1e-9);
        let later = start + Duration::from_millis(400);
        assert!(anim.is_complete(later));
        assert_eq!(anim.current_bounds(later), Rect::new(0.0, 0.0, 20.0, 20.0));
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let anim = ContainerAnimation::new(Rect::ZERO, Rect::ZERO, Duration::ZERO);
        assert!(anim.is_complete(Instant::now()));
    }
}
