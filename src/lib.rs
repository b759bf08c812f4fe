//! # lsystem-grove
//!
//! Engine-agnostic L-System growth demos using glam.
//!
//! A [`Grammar`] derives a [`symbios`] L-System one generation at a time, a
//! [`TurtleInterpreter`] replays each generation as turtle commands producing
//! [`Segment`]s, and the animation engines ([`GrowingTree`], [`Plant`],
//! [`Spinner`]) hand the resulting geometry to a host renderer through the
//! [`SceneAdapter`] trait. The host owns the frame loop and calls
//! [`Animate::tick`] once per refresh.

pub mod animate;
pub mod config;
pub mod error;
pub mod grammar;
pub mod growth;
pub mod interpreter;
pub mod plant;
pub mod scene;
pub mod segment;
pub mod spinner;
pub mod tree;
pub mod turtle;

pub use animate::*;
pub use config::*;
pub use error::*;
pub use grammar::*;
pub use growth::*;
pub use interpreter::*;
pub use plant::*;
pub use scene::*;
pub use segment::*;
pub use spinner::*;
pub use tree::*;
pub use turtle::*;
