//! Segment descriptors emitted by the turtle.

use bevy_math::primitives::ConicalFrustum;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A straight piece of geometry emitted by the turtle for every draw symbol.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Where the turtle stood when it drew this segment.
    pub start: Vec3,

    /// Unit direction the turtle was facing.
    pub direction: Vec3,

    /// Always positive.
    pub length: f32,

    /// Base radius of the branch. Always positive.
    pub thickness: f32,
}

impl Segment {
    pub fn end(&self) -> Vec3 {
        self.start + self.direction * self.length
    }

    pub fn midpoint(&self) -> Vec3 {
        self.start + self.direction * (self.length / 2.0)
    }

    /// Rotation carrying the +Y axis onto this segment's direction.
    pub fn orientation(&self) -> Quat {
        Quat::from_rotation_arc(Vec3::Y, self.direction.normalize_or(Vec3::Y))
    }

    /// Tapered solid for this segment: full thickness at the base, half at the tip.
    pub fn frustum(&self) -> ConicalFrustum {
        ConicalFrustum {
            radius_top: self.thickness / 2.0,
            radius_bottom: self.thickness,
            height: self.length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn placement_of_a_tilted_segment() {
        let segment = Segment {
            start: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
            length: 2.0,
            thickness: 0.1,
        };
        assert!(segment.end().abs_diff_eq(Vec3::new(2.0, 1.0, 0.0), 1e-6));
        assert!(segment.midpoint().abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
        assert!((segment.orientation() * Vec3::Y).abs_diff_eq(Vec3::X, 1e-6));

        let frustum = segment.frustum();
        assert_relative_eq!(frustum.radius_bottom, 0.1);
        assert_relative_eq!(frustum.radius_top, 0.05);
        assert_relative_eq!(frustum.height, 2.0);
    }
}
