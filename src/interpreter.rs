//! Interpreter that replays a derived [`SymbiosState`] as turtle commands and
//! collects the [`Segment`]s it draws.
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::interpret`].

use crate::config::positive;
use crate::error::{ConfigError, InterpretError};
use crate::segment::Segment;
use crate::turtle::{HeadingMode, TurtleOp, TurtleState};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use symbios::{SymbiosState, SymbolTable};
use tracing::warn;

/// What to do with a `]` that has nothing to restore.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderflowPolicy {
    /// Abort interpretation with [`InterpretError::UnbalancedBranch`].
    #[default]
    Reject,
    /// Log and skip the symbol, leaving the cursor untouched.
    Ignore,
}

/// Configuration for turtle interpretation.
#[derive(Clone, Debug)]
pub struct TurtleConfig {
    /// Distance covered by `F` and `f` when the module carries no parameter.
    pub step_length: f32,
    /// Thickness stamped on every emitted segment.
    pub thickness: f32,
    /// Rotation angle (in radians) for Yaw/Pitch without a parameter.
    pub angle: f32,
    /// Orientation model of the turtle.
    pub heading: HeadingMode,
    /// Handling of unmatched `]`.
    pub underflow: UnderflowPolicy,
    /// Maximum stack depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            thickness: 0.02,
            angle: PI / 6.0,
            heading: HeadingMode::Spatial,
            underflow: UnderflowPolicy::Reject,
            max_stack_depth: 1024,
        }
    }
}

impl TurtleConfig {
    /// Rejects non-positive lengths, a non-finite angle and a zero stack bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("segment_length", self.step_length)?;
        positive("segment_thickness", self.thickness)?;
        if !self.angle.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "angle",
                value: self.angle,
            });
        }
        if self.max_stack_depth == 0 {
            return Err(ConfigError::ZeroStackDepth);
        }
        Ok(())
    }
}

/// Interprets L-System output into segment lists.
///
/// Holds no state between calls: every [`interpret`](Self::interpret) starts
/// from a fresh cursor and an empty stack.
pub struct TurtleInterpreter {
    op_map: Vec<TurtleOp>,
    config: TurtleConfig,
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`interpret`](Self::interpret).
    pub fn new(config: TurtleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            op_map: Vec::new(),
            config,
        })
    }

    /// Creates an interpreter with the standard symbols of `interner` registered.
    pub fn standard(config: TurtleConfig, interner: &SymbolTable) -> Result<Self, ConfigError> {
        let mut interpreter = Self::new(config)?;
        interpreter.populate_standard_symbols(interner);
        Ok(interpreter)
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by symbol ID as returned by [`symbios::SymbolTable`].
    /// Any ID that falls outside the slice is treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID.
    ///
    /// Gaps below `sym_id` are filled with [`TurtleOp::Ignore`].
    pub fn set_op(&mut self, sym_id: u16, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// The operation registered for `sym_id`, [`TurtleOp::Ignore`] if none.
    pub fn op(&self, sym_id: u16) -> TurtleOp {
        self.op_map
            .get(sym_id as usize)
            .copied()
            .unwrap_or(TurtleOp::Ignore)
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Registers the conventional symbol-to-operation mappings.
    ///
    /// Symbols that are not present in `interner` are skipped, so call this
    /// after every rule and the axiom have been parsed.
    pub fn populate_standard_symbols(&mut self, interner: &SymbolTable) {
        let mappings = [
            ("F", TurtleOp::Draw),
            ("f", TurtleOp::Move),
            ("+", TurtleOp::Yaw(-1.0)),
            ("-", TurtleOp::Yaw(1.0)),
            ("^", TurtleOp::Pitch(1.0)),
            ("&", TurtleOp::Pitch(-1.0)),
            ("[", TurtleOp::Push),
            ("]", TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            if let Some(id) = interner.resolve_id(sym) {
                self.set_op(id, op);
            }
        }
    }

    /// Replays `state` and returns every segment drawn, in module order.
    ///
    /// The turtle starts at the world origin with the initial heading of the
    /// configured [`HeadingMode`]. Modules with no registered mapping are ignored.
    ///
    /// # Parameters
    ///
    /// `F(l)` and `f(l)` travel `l` instead of the configured step; a zero,
    /// negative or non-finite `l` fails with [`InterpretError::DegenerateSegment`].
    /// Turns and pitches take an optional angle in degrees.
    ///
    /// # Push / Pop
    ///
    /// `[` saves position and heading; `]` restores the most recent save.
    /// Nesting deeper than `max_stack_depth` fails with
    /// [`InterpretError::StackOverflow`]. A `]` with nothing saved fails with
    /// [`InterpretError::UnbalancedBranch`] unless the underflow policy is
    /// [`UnderflowPolicy::Ignore`].
    pub fn interpret(&self, state: &SymbiosState) -> Result<Vec<Segment>, InterpretError> {
        let mut segments = Vec::new();
        let mut turtle = TurtleState::new(self.config.heading);
        let mut stack: Vec<TurtleState> = Vec::new();

        for index in 0..state.len() {
            let view = match state.get_view(index) {
                Some(v) => v,
                None => break,
            };
            let first = view.params.first().map(|&x| x as f32);
            let length = || match first {
                None => Ok(self.config.step_length),
                Some(l) if l.is_finite() && l > 0.0 => Ok(l),
                Some(_) => Err(InterpretError::DegenerateSegment { index }),
            };
            let angle = first.map_or(self.config.angle, f32::to_radians);

            match self.op(view.sym) {
                TurtleOp::Draw => {
                    let length = length()?;
                    let direction = turtle.heading.direction();
                    let start = turtle.advance(length);
                    segments.push(Segment {
                        start,
                        direction,
                        length,
                        thickness: self.config.thickness,
                    });
                }
                TurtleOp::Move => {
                    turtle.advance(length()?);
                }
                TurtleOp::Yaw(s) => turtle.heading.yaw(angle * s),
                TurtleOp::Pitch(s) => turtle.heading.pitch(angle * s),
                TurtleOp::Push => {
                    if stack.len() >= self.config.max_stack_depth {
                        return Err(InterpretError::StackOverflow {
                            index,
                            depth: self.config.max_stack_depth,
                        });
                    }
                    stack.push(turtle);
                }
                TurtleOp::Pop => match stack.pop() {
                    Some(saved) => turtle = saved,
                    None => match self.config.underflow {
                        UnderflowPolicy::Reject => {
                            return Err(InterpretError::UnbalancedBranch { index });
                        }
                        UnderflowPolicy::Ignore => {
                            warn!(index, "ignoring unbalanced branch close");
                        }
                    },
                },
                TurtleOp::Ignore => {}
            }
        }

        Ok(segments)
    }
}
