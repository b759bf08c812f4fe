//! The flat plant: transient line geometry rebuilt from scratch every tick.

use crate::animate::{Animate, TickOutcome};
use crate::config::LSystemConfig;
use crate::error::{ConfigError, Error};
use crate::grammar::Grammar;
use crate::interpreter::TurtleInterpreter;
use crate::scene::{Handle, Primitive, SceneAdapter};
use crate::segment::Segment;
use tracing::{debug, error, info};

/// A plant engine that keeps no identity between generations.
///
/// Each tick clears every line it drew before and draws the new generation in
/// segment order, so visual order always matches symbol order.
pub struct Plant {
    grammar: Grammar,
    interpreter: TurtleInterpreter,
    segments: Vec<Segment>,
    handles: Vec<Handle>,
    max_steps: u32,
    fault: Option<Error>,
}

impl Plant {
    pub fn new(config: LSystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grammar = config.grammar()?;
        Ok(Self {
            interpreter: TurtleInterpreter::standard(config.turtle(), grammar.symbols())?,
            grammar,
            segments: Vec::new(),
            handles: Vec::new(),
            max_steps: config.max_iterations,
            fault: None,
        })
    }

    pub fn sentence(&self) -> String {
        self.grammar.sentence()
    }

    /// Segments of the current generation, in drawing order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn step(&self) -> u32 {
        self.grammar.generation()
    }

    pub fn is_settled(&self) -> bool {
        self.step() >= self.max_steps
    }

    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    /// Advances one generation and redraws, unless settled or halted.
    pub fn grow_tree(&mut self, scene: &mut dyn SceneAdapter) -> TickOutcome {
        if self.fault.is_some() {
            return TickOutcome::Halted;
        }
        if self.is_settled() {
            return TickOutcome::Settled;
        }

        let interpreter = &self.interpreter;
        let segments = match self
            .grammar
            .advance_with(|state| interpreter.interpret(state))
        {
            Ok(segments) => segments,
            Err(err) => {
                error!(generation = self.step() + 1, %err, "plant halted");
                self.fault = Some(err);
                return TickOutcome::Halted;
            }
        };

        self.clear(scene);
        self.handles = segments
            .iter()
            .map(|s| {
                scene.materialize(&Primitive::Line {
                    start: s.start,
                    end: s.end(),
                })
            })
            .collect();
        self.segments = segments;

        debug!(
            generation = self.step(),
            symbols = self.grammar.state().len(),
            lines = self.segments.len(),
            "plant redrawn"
        );
        if self.is_settled() {
            info!(lines = self.segments.len(), "plant fully grown");
        }

        TickOutcome::Advanced {
            generation: self.step(),
            segments: self.segments.len(),
            discovered: 0,
        }
    }

    /// Removes every line this plant drew.
    pub fn clear(&mut self, scene: &mut dyn SceneAdapter) {
        for handle in self.handles.drain(..) {
            scene.dispose(handle);
        }
    }
}

impl Animate for Plant {
    fn tick(&mut self, scene: &mut dyn SceneAdapter) -> TickOutcome {
        self.grow_tree(scene)
    }
}
