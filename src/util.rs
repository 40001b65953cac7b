use cgmath::*;
use std::f32::consts::PI;

pub fn rel_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < f32::EPSILON
}

/// Clamps v into [min, max]. Unlike f32::clamp this doesn't panic when min > max; min wins.
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    let v = if v > max { max } else { v };
    if v < min {
        min
    } else {
        v
    }
}

/// Sign of v as -1, 0 or +1. Unlike f32::signum, zero maps to zero.
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Wraps an angle in radians into (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let two_pi = 2.0 * PI;
    let mut angle = angle - two_pi * (angle / two_pi).round();
    if angle <= -PI {
        angle += two_pi;
    } else if angle > PI {
        angle -= two_pi;
    }
    angle
}

/// Rotates v by angle radians. With +y pointing down this turns clockwise on screen.
pub fn rotate(v: Vector2<f32>, angle: f32) -> Vector2<f32> {
    Matrix2::from_angle(Rad(angle)) * v
}

/// Normalizes v, returning zero for a zero-length vector instead of NaN.
pub fn normalize_or_zero(v: Vector2<f32>) -> Vector2<f32> {
    if v.magnitude2() > 0.0 {
        v.normalize()
    } else {
        Vector2::zero()
    }
}

#[cfg(test)]
mod util_tests {
    use super::*;

    #[test]
    fn wrap_angle_works() {
        assert!(rel_eq(wrap_angle(0.0), 0.0));
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-PI / 2.0 - 2.0 * PI) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_angle(5.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        // -PI folds over to +PI
        assert!((wrap_angle(-PI) - PI).abs() < 1e-5);
    }

    #[test]
    fn rotate_quarter_turn() {
        let r = rotate(vec2(1.0, 0.0), PI / 2.0);
        assert!(r.x.abs() < 1e-5);
        assert!((r.y - 1.0).abs() < 1e-5);

        let r = rotate(vec2(0.0, 1.0), PI / 2.0);
        assert!((r.x + 1.0).abs() < 1e-5);
        assert!(r.y.abs() < 1e-5);
    }

    #[test]
    fn clamp_prefers_min_when_range_is_inverted() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(3.0, 10.0, 0.0), 10.0);
        assert_eq!(clamp(30.0, 10.0, 0.0), 10.0);
    }

    #[test]
    fn sign_of_zero_is_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.5), 1.0);
    }
}
