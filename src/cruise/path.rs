//! Procedural road path
//!
//! A pure function from forward distance to the lateral offset of the road
//! center line. It deforms the road strip geometry at construction time;
//! the vehicle itself is steering-only and is not auto-centered onto it.

use crate::consts::{PATH_AMPLITUDE, PATH_FREQUENCY};

/// Lateral road-center offset at forward distance `z`
#[inline]
pub fn road_path(z: f32) -> f32 {
    (z * PATH_FREQUENCY).sin() * PATH_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_is_a_bounded_sine() {
        assert_eq!(road_path(0.0), 0.0);
        // Peak of the sine: z * 0.05 = pi/2
        let peak_z = std::f32::consts::FRAC_PI_2 / 0.05;
        assert!((road_path(peak_z) - 7.0).abs() < 1e-3);
        for i in 0..500 {
            assert!(road_path(i as f32).abs() <= 7.0 + 1e-4);
        }
    }

    #[test]
    fn test_path_is_pure() {
        assert_eq!(road_path(123.4), road_path(123.4));
    }
}
