use glam::Vec2;

/// Decimal places kept on separation vectors before they are applied.
pub const SEPARATION_PRECISION: i32 = 4;

/// Rotate `v` counterclockwise by `angle` radians about the origin.
pub fn rotate_rad(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Round both components to `places` decimal places.
pub fn round_to(v: Vec2, places: i32) -> Vec2 {
    let factor = 10f32.powi(places);
    (v * factor).round() / factor
}

/// Component-wise clamp. Unlike `Vec2::clamp` this never asserts on the bounds,
/// so a misconfigured body clamps to `upper` instead of aborting.
pub fn clamp_components(v: Vec2, lower: Vec2, upper: Vec2) -> Vec2 {
    Vec2::new(v.x.max(lower.x).min(upper.x), v.y.max(lower.y).min(upper.y))
}

/// -1, 0 or 1. Zero (including -0.0) maps to 0.
pub fn sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// World-space placement of a body at the instant of a query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub position: Vec2,
    /// Radians, counterclockwise.
    pub rotation: f32,
}

impl Pose {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Map a body-local point into world space.
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        rotate_rad(local, self.rotation) + self.position
    }
}

/// Axis-aligned box. Only used for drawing and debug output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    pub fn from_center_half_extents(center: Vec2, half: Vec2) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn quarter_turn_maps_x_onto_y() {
        let r = rotate_rad(Vec2::X, FRAC_PI_2);
        assert_abs_diff_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rounding_drops_float_noise() {
        let v = round_to(Vec2::new(0.300_000_7, -1.234_56), SEPARATION_PRECISION);
        assert_abs_diff_eq!(v.x, 0.3, epsilon = 1e-6);
        assert_abs_diff_eq!(v.y, -1.2346, epsilon = 1e-6);
    }

    #[test]
    fn rounding_is_odd_symmetric() {
        let v = Vec2::new(0.123_45, -7.000_05);
        assert_eq!(round_to(-v, 4), -round_to(v, 4));
    }

    #[test]
    fn clamp_applies_per_axis() {
        let v = clamp_components(
            Vec2::new(12.0, -40.0),
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, 10.0),
        );
        assert_eq!(v, Vec2::new(10.0, -10.0));
    }

    #[test]
    fn aabb_wraps_points() {
        let bb = Aabb::from_points([Vec2::new(1.0, -2.0), Vec2::new(-3.0, 4.0), Vec2::ZERO]);
        let bb = bb.unwrap();
        assert_eq!(bb.min, Vec2::new(-3.0, -2.0));
        assert_eq!(bb.max, Vec2::new(1.0, 4.0));
        assert_eq!(bb.size(), Vec2::new(4.0, 6.0));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn pose_rotates_then_translates() {
        let pose = Pose::new(Vec2::new(5.0, 5.0), FRAC_PI_2);
        let p = pose.transform_point(Vec2::new(1.0, 0.0));
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 6.0, epsilon = 1e-6);
    }
}
