//! Frame-driven animation contract.
//!
//! Nothing in this crate schedules itself. The host calls [`Animate::tick`]
//! once per display refresh and renders whatever the scene holds afterwards.

use crate::scene::SceneAdapter;

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// One more generation was produced and the scene updated.
    Advanced {
        generation: u32,
        /// Segments drawn by interpreting the new generation.
        segments: usize,
        /// Retained branches first seen this tick. Always 0 for transient geometry.
        discovered: usize,
    },
    /// The iteration cap is reached; the scene is left untouched.
    Settled,
    /// A previous tick failed; the scene keeps the last valid state.
    Halted,
    /// A continuous animation moved its primitives.
    Moved,
}

/// Something the host drives one frame at a time.
pub trait Animate {
    fn tick(&mut self, scene: &mut dyn SceneAdapter) -> TickOutcome;
}
