//! Turtle state and operations for branch interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which orientation model the turtle steers with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMode {
    /// A single angle in the XY plane, starting at 0 (facing +X).
    Planar,
    /// A unit direction vector, starting at +Y.
    #[default]
    Spatial,
}

/// The turtle's current orientation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Heading {
    /// Angle in radians, measured counter-clockwise from +X.
    Planar(f32),
    /// Unit direction vector.
    Spatial(Vec3),
}

impl Heading {
    /// The starting orientation for `mode`.
    pub fn initial(mode: HeadingMode) -> Self {
        match mode {
            HeadingMode::Planar => Heading::Planar(0.0),
            HeadingMode::Spatial => Heading::Spatial(Vec3::Y),
        }
    }

    /// Unit vector the turtle walks along.
    pub fn direction(&self) -> Vec3 {
        match *self {
            Heading::Planar(angle) => {
                let (sin, cos) = angle.sin_cos();
                Vec3::new(cos, sin, 0.0)
            }
            Heading::Spatial(dir) => dir,
        }
    }

    /// Turns by `angle` radians about +Z. Positive is counter-clockwise.
    pub fn yaw(&mut self, angle: f32) {
        match self {
            Heading::Planar(current) => *current += angle,
            Heading::Spatial(dir) => *dir = Quat::from_axis_angle(Vec3::Z, angle) * *dir,
        }
    }

    /// Tilts by `angle` radians about +X. Has no effect on a planar heading.
    pub fn pitch(&mut self, angle: f32) {
        if let Heading::Spatial(dir) = self {
            *dir = Quat::from_axis_angle(Vec3::X, angle) * *dir;
        }
    }
}

/// The state of the drawing turtle.
///
/// Snapshots of this struct are what `[` saves and `]` restores.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    /// Current world-space position of the cursor.
    pub position: Vec3,

    /// Current orientation.
    pub heading: Heading,
}

impl TurtleState {
    /// A turtle at the origin with the initial heading for `mode`.
    pub fn new(mode: HeadingMode) -> Self {
        Self {
            position: Vec3::ZERO,
            heading: Heading::initial(mode),
        }
    }

    /// Moves the cursor `distance` along its heading and returns the old position.
    pub fn advance(&mut self, distance: f32) -> Vec3 {
        let start = self.position;
        self.position += self.heading.direction() * distance;
        start
    }
}

impl Default for TurtleState {
    fn default() -> Self {
        Self::new(HeadingMode::default())
    }
}

/// Operations that can be performed by the turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurtleOp {
    /// Move forward emitting a segment (`F`).
    Draw,
    /// Move forward without emitting anything (`f`).
    Move,
    /// Rotate about Z by `angle * sign` (`+` is `-1`, `-` is `+1`).
    Yaw(f32),
    /// Rotate about X by `angle * sign` (`^` is `+1`, `&` is `-1`).
    Pitch(f32),
    /// Save the cursor onto the stack (`[`).
    Push,
    /// Restore the most recently pushed cursor (`]`).
    Pop,
    /// No-op: symbol has no registered meaning.
    Ignore,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn spatial_yaw_is_counter_clockwise_about_z() {
        let mut heading = Heading::initial(HeadingMode::Spatial);
        heading.yaw(FRAC_PI_2);
        assert!(heading.direction().abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn spatial_pitch_tilts_about_x() {
        let mut heading = Heading::initial(HeadingMode::Spatial);
        heading.pitch(FRAC_PI_2);
        assert!(heading.direction().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn planar_heading_ignores_pitch() {
        let mut heading = Heading::initial(HeadingMode::Planar);
        heading.pitch(1.0);
        heading.yaw(0.25);
        assert_eq!(heading, Heading::Planar(0.25));
    }

    #[test]
    fn advance_returns_start_and_moves() {
        let mut turtle = TurtleState::new(HeadingMode::Planar);
        let start = turtle.advance(2.0);
        assert_eq!(start, Vec3::ZERO);
        assert_relative_eq!(turtle.position.x, 2.0);
        assert_relative_eq!(turtle.position.y, 0.0);
    }
}
