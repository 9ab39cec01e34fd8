use bevy::math::curve::{Curve, EaseFunction, EasingCurve};
use bevy::prelude::*;

/// Eased interpolation between two points over a fixed duration.
#[derive(Debug, Clone)]
pub struct Tween {
    curve: EasingCurve<Vec3>,
    duration: f32,
}

impl Tween {
    /// Quadratic ease-out, fast at the start and settling into the end point.
    pub fn new(start: Vec3, end: Vec3, duration: f32) -> Self {
        Self {
            curve: EasingCurve::new(start, end, EaseFunction::QuadraticOut),
            duration,
        }
    }

    /// Value after `elapsed` seconds. Clamped to the end point once finished.
    pub fn sample(&self, elapsed: f32) -> Vec3 {
        self.curve.sample_clamped(self.progress(elapsed))
    }

    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        self.progress(elapsed) >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_and_ends_on_its_endpoints() {
        let tween = Tween::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert_eq!(tween.sample(0.0), Vec3::ZERO);
        assert_eq!(tween.sample(1.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(tween.sample(5.0), Vec3::new(2.0, 0.0, 0.0));
        assert!(tween.is_finished(1.0));
        assert!(!tween.is_finished(0.5));
    }

    #[test]
    fn eases_out() {
        let tween = Tween::new(Vec3::ZERO, Vec3::X, 1.0);
        // 1 - (1 - t)^2 at t = 0.5.
        assert!((tween.sample(0.5).x - 0.75).abs() < 1e-5);
        assert!(tween.sample(0.25).x > 0.25);
    }

    #[test]
    fn zero_duration_jumps_to_the_end() {
        let tween = Tween::new(Vec3::ZERO, Vec3::Y, 0.0);
        assert_eq!(tween.sample(0.0), Vec3::Y);
        assert!(tween.is_finished(0.0));
    }
}
