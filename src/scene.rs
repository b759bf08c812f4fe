//! Scene boundary.
//!
//! Engines never touch a display graph. They describe what should exist as
//! [`Primitive`]s and hand them to a [`SceneAdapter`], keeping the returned
//! [`Handle`]s so they can dispose of them later. A renderer backend implements
//! the trait; [`NullScene`] and [`RecordingScene`] serve headless hosts and tests.

use bevy_math::primitives::{ConicalFrustum, Sphere};
use glam::{Quat, Vec3};
use std::collections::BTreeMap;

/// Opaque token for a primitive owned by a [`SceneAdapter`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u64);

/// World transform of a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Placement {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };
}

/// Renderable descriptions the engines emit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// A tapered branch. The frustum's axis is local +Y, centred on the placement.
    Branch {
        frustum: ConicalFrustum,
        placement: Placement,
    },
    /// A thin line between two points.
    Line { start: Vec3, end: Vec3 },
    /// A sphere centred on the placement.
    Sphere { sphere: Sphere, placement: Placement },
}

/// A minimal retained-mode scene API.
pub trait SceneAdapter {
    /// Creates a primitive in the scene and returns its handle.
    fn materialize(&mut self, primitive: &Primitive) -> Handle;

    /// Removes a primitive and frees its resources. The handle is dead afterwards.
    fn dispose(&mut self, handle: Handle);

    /// Moves an existing primitive without rebuilding it.
    fn place(&mut self, handle: Handle, placement: Placement);
}

/// A scene that draws nothing; handles are still unique.
#[derive(Debug, Default)]
pub struct NullScene {
    next: u64,
}

impl SceneAdapter for NullScene {
    fn materialize(&mut self, _primitive: &Primitive) -> Handle {
        self.next += 1;
        Handle(self.next)
    }

    fn dispose(&mut self, _handle: Handle) {}

    fn place(&mut self, _handle: Handle, _placement: Placement) {}
}

/// An in-memory scene that remembers every live primitive.
///
/// Counts materialize/dispose calls and flags disposal of unknown handles, so
/// tests can check that engines never leak or double-free.
#[derive(Debug, Default)]
pub struct RecordingScene {
    next: u64,
    live: BTreeMap<Handle, Primitive>,
    pub materialized: usize,
    pub disposed: usize,
    /// Disposals or placements of handles that were not live.
    pub stray: usize,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of primitives currently in the scene.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, handle: Handle) -> Option<&Primitive> {
        self.live.get(&handle)
    }

    /// Live primitives in creation order.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.live.values()
    }
}

impl SceneAdapter for RecordingScene {
    fn materialize(&mut self, primitive: &Primitive) -> Handle {
        self.next += 1;
        let handle = Handle(self.next);
        self.live.insert(handle, *primitive);
        self.materialized += 1;
        handle
    }

    fn dispose(&mut self, handle: Handle) {
        if self.live.remove(&handle).is_some() {
            self.disposed += 1;
        } else {
            self.stray += 1;
        }
    }

    fn place(&mut self, handle: Handle, placement: Placement) {
        match self.live.get_mut(&handle) {
            Some(Primitive::Branch { placement: p, .. } | Primitive::Sphere { placement: p, .. }) => {
                *p = placement;
            }
            Some(Primitive::Line { start, end }) => {
                *start = placement.translation + placement.rotation * *start;
                *end = placement.translation + placement.rotation * *end;
            }
            None => self.stray += 1,
        }
    }
}
