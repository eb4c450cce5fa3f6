//! Small numeric helpers shared by the wave solver and the buoyancy model.

use bevy::math::Vec2;
use std::f32::consts::{PI, TAU};

/// Wraps an angle in radians into `[-PI, PI]`.
pub fn normalized_angle(mut angle: f32) -> f32 {
    while angle < -PI {
        angle += TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    angle
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Area of the triangle `abc` via the 2D cross-product magnitude.
pub fn triangle_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    0.5 * (b - a).perp_dot(c - a).abs()
}

/// Centroid of the triangle `abc`.
#[inline]
pub fn triangle_centroid(a: Vec2, b: Vec2, c: Vec2) -> Vec2 {
    (a + b + c) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_angle_wraps_into_half_turn() {
        assert!((normalized_angle(0.0)).abs() < f32::EPSILON);
        assert!((normalized_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalized_angle(-3.0 * PI) + PI).abs() < 1e-5);
        assert!((normalized_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((normalized_angle(-TAU - 0.5) + 0.5).abs() < 1e-5);
    }

    #[test]
    fn lerp_clamps_factor() {
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
        assert_eq!(lerp(1.0, 3.0, -1.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 2.0), 3.0);
    }

    #[test]
    fn triangle_area_matches_half_base_times_height() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(4.0, 0.0);
        let c = Vec2::new(0.0, 3.0);
        assert!((triangle_area(a, b, c) - 6.0).abs() < f32::EPSILON);
        // degenerate: collinear points span no area
        assert_eq!(triangle_area(a, b, Vec2::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn triangle_centroid_averages_vertices() {
        let centroid = triangle_centroid(
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(0.0, 3.0),
        );
        assert!((centroid - Vec2::new(1.0, 1.0)).length() < 1e-6);
    }
}
