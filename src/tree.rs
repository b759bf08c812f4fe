//! The 3D tree whose branches keep thickening as new ones sprout.

use crate::animate::{Animate, TickOutcome};
use crate::config::LSystemConfig;
use crate::error::{ConfigError, Error};
use crate::grammar::Grammar;
use crate::growth::{Canopy, GrowthFactor};
use crate::interpreter::TurtleInterpreter;
use crate::scene::SceneAdapter;
use tracing::{debug, error, info, warn};

/// A growing tree engine.
///
/// Every tick runs, in this order:
/// 1. rewrite the sentence one generation,
/// 2. interpret it and retain any branch not seen before,
/// 3. grow every retained branch once (including the new ones),
/// 4. rebuild the visual of every branch that changed.
///
/// Swapping 2 and 3 would leave new branches one growth step behind.
pub struct GrowingTree {
    grammar: Grammar,
    interpreter: TurtleInterpreter,
    canopy: Canopy,
    growth_factor: GrowthFactor,
    max_iterations: u32,
    fault: Option<Error>,
}

impl GrowingTree {
    /// Builds a tree from a validated configuration.
    pub fn new(config: LSystemConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.growth_factor <= 1.0 {
            warn!(
                growth_factor = config.growth_factor,
                "growth factor does not enlarge branches"
            );
        }
        let grammar = config.grammar()?;
        Ok(Self {
            interpreter: TurtleInterpreter::standard(config.turtle(), grammar.symbols())?,
            grammar,
            canopy: Canopy::new(),
            growth_factor: GrowthFactor::new(config.growth_factor)?,
            max_iterations: config.max_iterations,
            fault: None,
        })
    }

    /// The current sentence, modules separated by spaces.
    pub fn sentence(&self) -> String {
        self.grammar.sentence()
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn canopy(&self) -> &Canopy {
        &self.canopy
    }

    /// Generations produced so far.
    pub fn iteration(&self) -> u32 {
        self.grammar.generation()
    }

    pub fn is_settled(&self) -> bool {
        self.iteration() >= self.max_iterations
    }

    /// The error that halted this tree, if any.
    pub fn fault(&self) -> Option<&Error> {
        self.fault.as_ref()
    }

    /// Advances one generation unless settled or halted.
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
                error!(generation = self.iteration() + 1, %err, "tree halted");
                self.fault = Some(err);
                return TickOutcome::Halted;
            }
        };

        let discovered = self.canopy.absorb(&segments);
        self.canopy.grow_all(self.growth_factor);
        self.canopy.refresh(scene);

        debug!(
            generation = self.iteration(),
            symbols = self.grammar.state().len(),
            segments = segments.len(),
            discovered,
            branches = self.canopy.len(),
            "tree advanced"
        );
        if self.is_settled() {
            info!(branches = self.canopy.len(), "tree fully grown");
        }

        TickOutcome::Advanced {
            generation: self.iteration(),
            segments: segments.len(),
            discovered,
        }
    }

    /// Removes every branch visual from the scene.
    pub fn teardown(&mut self, scene: &mut dyn SceneAdapter) {
        self.canopy.clear(scene);
    }
}

impl Animate for GrowingTree {
    fn tick(&mut self, scene: &mut dyn SceneAdapter) -> TickOutcome {
        self.grow_tree(scene)
    }
}
