//! A sphere turning slowly about the vertical axis.

use crate::animate::{Animate, TickOutcome};
use crate::error::ConfigError;
use crate::scene::{Handle, Placement, Primitive, SceneAdapter};
use bevy_math::primitives::Sphere;
use glam::{Quat, Vec3};

/// Radians turned per tick by [`Spinner::default`].
pub const DEFAULT_SPIN_STEP: f32 = 0.01;

/// Rotating sphere viewer.
///
/// The sphere is materialized on the first tick and only moved afterwards.
#[derive(Debug)]
pub struct Spinner {
    sphere: Sphere,
    step: f32,
    yaw: f32,
    handle: Option<Handle>,
}

impl Spinner {
    pub fn new(radius: f32, step: f32) -> Result<Self, ConfigError> {
        if !radius.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "radius",
                value: radius,
            });
        }
        if radius <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "radius",
                value: radius,
            });
        }
        if !step.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "step",
                value: step,
            });
        }
        Ok(Self {
            sphere: Sphere::new(radius),
            step,
            yaw: 0.0,
            handle: None,
        })
    }

    /// Current rotation about +Y, in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn placement(&self) -> Placement {
        Placement {
            translation: Vec3::ZERO,
            rotation: Quat::from_rotation_y(self.yaw),
        }
    }

    /// Removes the sphere from the scene.
    pub fn teardown(&mut self, scene: &mut dyn SceneAdapter) {
        if let Some(handle) = self.handle.take() {
            scene.dispose(handle);
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            sphere: Sphere::new(3.0),
            step: DEFAULT_SPIN_STEP,
            yaw: 0.0,
            handle: None,
        }
    }
}

impl Animate for Spinner {
    fn tick(&mut self, scene: &mut dyn SceneAdapter) -> TickOutcome {
        self.yaw += self.step;
        let placement = self.placement();
        match self.handle {
            Some(handle) => scene.place(handle, placement),
            None => {
                self.handle = Some(scene.materialize(&Primitive::Sphere {
                    sphere: self.sphere,
                    placement,
                }));
            }
        }
        TickOutcome::Moved
    }
}
