//! Retained branches that keep growing after they are drawn.
//!
//! A [`Canopy`] remembers every branch any interpretation has produced. Each
//! fresh interpretation only contributes the branches it has not seen before;
//! existing ones are scaled in place by [`Canopy::grow_all`] and their visuals
//! rebuilt by [`Canopy::refresh`].

use crate::config::positive;
use crate::error::ConfigError;
use crate::scene::{Handle, Placement, Primitive, SceneAdapter};
use crate::segment::Segment;
use glam::Vec3;
use std::collections::HashMap;

/// Grid used to decide whether two segments are the same branch.
const KEY_RESOLUTION: f32 = 1e4;

/// Stable identity of a retained branch, in discovery order.
pub type BranchId = usize;

/// Quantized start position and direction of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BranchKey([i64; 6]);

impl BranchKey {
    pub fn of(segment: &Segment) -> Self {
        let q = |v: f32| (v * KEY_RESOLUTION).round() as i64;
        let Vec3 { x, y, z } = segment.start;
        let d = segment.direction;
        Self([q(x), q(y), q(z), q(d.x), q(d.y), q(d.z)])
    }
}

/// Scale applied to a branch per growth step. Always positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthFactor(f32);

impl GrowthFactor {
    /// Leaves branches unchanged.
    pub const IDENTITY: Self = Self(1.0);

    pub fn new(factor: f32) -> Result<Self, ConfigError> {
        positive("growth_factor", factor)?;
        Ok(Self(factor))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for GrowthFactor {
    type Error = ConfigError;

    fn try_from(factor: f32) -> Result<Self, Self::Error> {
        Self::new(factor)
    }
}

/// A segment with identity that persists across generations.
#[derive(Clone, Debug)]
pub struct Branch {
    pub id: BranchId,
    segment: Segment,
    handle: Option<Handle>,
    stale: bool,
}

impl Branch {
    pub fn new(id: BranchId, segment: Segment) -> Self {
        Self {
            id,
            segment,
            handle: None,
            stale: true,
        }
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn length(&self) -> f32 {
        self.segment.length
    }

    pub fn thickness(&self) -> f32 {
        self.segment.thickness
    }

    /// `true` when the branch has never been drawn or changed since it was.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn is_materialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Scales length and thickness by `factor`. Calls compound.
    pub fn grow(&mut self, factor: GrowthFactor) {
        self.segment.length *= factor.0;
        self.segment.thickness *= factor.0;
        self.stale = true;
    }

    /// The primitive describing this branch at its current size.
    pub fn primitive(&self) -> Primitive {
        Primitive::Branch {
            frustum: self.segment.frustum(),
            placement: Placement {
                translation: self.segment.midpoint(),
                rotation: self.segment.orientation(),
            },
        }
    }

    /// Replaces any existing visual with one matching the current size.
    pub fn rematerialize(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(old) = self.handle.take() {
            scene.dispose(old);
        }
        self.handle = Some(scene.materialize(&self.primitive()));
        self.stale = false;
    }

    /// Removes the visual, if any.
    pub fn dispose(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(old) = self.handle.take() {
            scene.dispose(old);
        }
        self.stale = true;
    }
}

/// The retained branch set of a growing tree.
#[derive(Debug, Default)]
pub struct Canopy {
    branches: Vec<Branch>,
    index: HashMap<BranchKey, BranchId>,
}

impl Canopy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    /// Retains every segment not already known and returns how many were new.
    ///
    /// Known branches are left exactly as they are.
    pub fn absorb(&mut self, segments: &[Segment]) -> usize {
        let before = self.branches.len();
        for segment in segments {
            let next_id = self.branches.len();
            let id = *self.index.entry(BranchKey::of(segment)).or_insert(next_id);
            if id == next_id {
                self.branches.push(Branch::new(id, *segment));
            }
        }
        self.branches.len() - before
    }

    /// Grows every retained branch once.
    pub fn grow_all(&mut self, factor: GrowthFactor) {
        for branch in &mut self.branches {
            branch.grow(factor);
        }
    }

    /// Rebuilds the visual of every stale branch. Returns the number rebuilt.
    pub fn refresh(&mut self, scene: &mut dyn SceneAdapter) -> usize {
        let mut rebuilt = 0;
        for branch in self.branches.iter_mut().filter(|b| b.is_stale()) {
            branch.rematerialize(scene);
            rebuilt += 1;
        }
        rebuilt
    }

    /// Disposes every visual; the branches themselves are kept.
    pub fn clear(&mut self, scene: &mut dyn SceneAdapter) {
        for branch in &mut self.branches {
            branch.dispose(scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::RecordingScene;
    use approx::assert_relative_eq;

    fn by(factor: f32) -> GrowthFactor {
        GrowthFactor::new(factor).unwrap()
    }

    fn segment(start: Vec3, direction: Vec3) -> Segment {
        Segment {
            start,
            direction,
            length: 0.5,
            thickness: 0.02,
        }
    }

    #[test]
    fn growth_compounds() {
        let mut branch = Branch::new(0, segment(Vec3::ZERO, Vec3::Y));
        branch.grow(by(1.5));
        branch.grow(by(1.5));
        assert_relative_eq!(branch.length(), 1.125, epsilon = 1e-6);
        assert_relative_eq!(branch.thickness(), 0.045, epsilon = 1e-6);
    }

    #[test]
    fn growth_follows_power_law() {
        let mut branch = Branch::new(0, segment(Vec3::ZERO, Vec3::Y));
        for _ in 0..7 {
            branch.grow(by(1.2));
        }
        assert_relative_eq!(branch.length(), 0.5 * 1.2f32.powi(7), max_relative = 1e-5);
        assert_relative_eq!(branch.thickness(), 0.02 * 1.2f32.powi(7), max_relative = 1e-5);
    }

    #[test]
    fn absorb_skips_known_branches() {
        let mut canopy = Canopy::new();
        let trunk = segment(Vec3::ZERO, Vec3::Y);
        let twig = segment(Vec3::Y, Vec3::X);
        assert_eq!(canopy.absorb(&[trunk]), 1);
        canopy.grow_all(by(2.0));

        assert_eq!(canopy.absorb(&[trunk, twig, twig]), 1);
        assert_eq!(canopy.len(), 2);
        // The retained trunk keeps its growth.
        assert_relative_eq!(canopy.branches()[0].length(), 1.0);
        assert_eq!(canopy.branches()[1].id, 1);
    }

    #[test]
    fn nearly_equal_segments_share_a_key() {
        let a = segment(Vec3::new(0.0, 0.5, 0.0), Vec3::Y);
        let b = segment(Vec3::new(1e-7, 0.5, 0.0), Vec3::new(-1e-8, 1.0, 0.0));
        assert_eq!(BranchKey::of(&a), BranchKey::of(&b));
    }

    #[test]
    fn refresh_disposes_before_rebuilding() {
        let mut scene = RecordingScene::new();
        let mut canopy = Canopy::new();
        canopy.absorb(&[segment(Vec3::ZERO, Vec3::Y), segment(Vec3::Y, Vec3::Z)]);

        assert_eq!(canopy.refresh(&mut scene), 2);
        assert_eq!(canopy.refresh(&mut scene), 0);

        canopy.grow_all(by(1.5));
        assert_eq!(canopy.refresh(&mut scene), 2);
        assert_eq!(scene.live_count(), 2);
        assert_eq!(scene.materialized, 4);
        assert_eq!(scene.disposed, 2);
        assert_eq!(scene.stray, 0);

        canopy.clear(&mut scene);
        assert_eq!(scene.live_count(), 0);
        assert!(canopy.branches().iter().all(|b| !b.is_materialized()));
    }

    #[test]
    fn non_positive_factors_are_refused() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(GrowthFactor::new(bad).is_err(), "{bad} accepted");
        }
        assert!(matches!(
            GrowthFactor::try_from(-0.5),
            Err(ConfigError::NonPositive {
                field: "growth_factor",
                ..
            })
        ));
    }

    #[test]
    fn identity_factor_leaves_branches_untouched() {
        let mut canopy = Canopy::new();
        canopy.absorb(&[segment(Vec3::ZERO, Vec3::Y)]);
        canopy.grow_all(GrowthFactor::IDENTITY);
        assert_relative_eq!(canopy.branches()[0].length(), 0.5);
        assert_relative_eq!(canopy.branches()[0].thickness(), 0.02);
    }
}
