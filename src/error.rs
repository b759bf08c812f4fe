//! Error types for grove engines.

use symbios::system::SystemError;
use thiserror::Error;

/// Result type alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Any error raised by this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Interpret(#[from] InterpretError),

    /// The grammar could not derive the next generation.
    #[error("derivation failed: {0}")]
    Derive(#[from] SystemError),
}

/// Rejected engine configuration. Raised at construction, never mid-run.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A geometric parameter was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    /// A parameter was NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    /// The stack bound must allow at least one saved state.
    #[error("max_stack_depth must be at least 1")]
    ZeroStackDepth,

    /// An axiom or rule source was rejected by the L-System parser.
    #[error("invalid grammar: {0}")]
    Grammar(SystemError),

    /// JSON could not be parsed into a configuration.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Faults detected while replaying a sentence through the turtle.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretError {
    /// A `]` had no matching `[`.
    #[error("unbalanced branch: pop with empty stack at symbol {index}")]
    UnbalancedBranch { index: usize },

    /// Nesting exceeded the configured stack bound.
    #[error("branch nesting exceeds {depth} at symbol {index}")]
    StackOverflow { index: usize, depth: usize },

    /// A draw module carried a zero, negative or non-finite length.
    #[error("degenerate segment length at symbol {index}")]
    DegenerateSegment { index: usize },
}
