//! One-generation-at-a-time derivation on top of [`symbios`].
//!
//! A [`Grammar`] owns a [`symbios::System`] built from an axiom and a list of
//! ABOP rule sources. Modules without a matching rule are copied through
//! unchanged by the derivation engine, which is how the turtle control symbols
//! (`+ - [ ] ^ &`) survive every generation.
//!
//! Identifiers are lexed greedily, so successive draw symbols must be
//! separated by whitespace: `F -> F F`, not `F -> FF`.

use crate::error::{ConfigError, Error, InterpretError};
use symbios::{SymbiosState, SymbolTable, System};

/// A deterministic L-System that advances on request.
#[derive(Clone)]
pub struct Grammar {
    system: System,
    generation: u32,
}

impl Grammar {
    /// Parses `rules` and `axiom` into a ready-to-derive system.
    pub fn new<I, S>(axiom: &str, rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut system = System::new();
        for rule in rules {
            system.add_rule(rule.as_ref()).map_err(ConfigError::Grammar)?;
        }
        system.set_axiom(axiom).map_err(ConfigError::Grammar)?;
        Ok(Self {
            system,
            generation: 0,
        })
    }

    /// A grammar with no rules, useful for replaying a fixed sentence.
    pub fn from_axiom(axiom: &str) -> Result<Self, ConfigError> {
        Self::new(axiom, std::iter::empty::<&str>())
    }

    /// Generations derived so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The current sentence.
    pub fn state(&self) -> &SymbiosState {
        &self.system.state
    }

    /// Interned names of every symbol the axiom and rules mention.
    pub fn symbols(&self) -> &SymbolTable {
        &self.system.interner
    }

    /// The current sentence as space-separated modules, e.g. `F [ + F ]`.
    pub fn sentence(&self) -> String {
        self.system.state.display(&self.system.interner).to_string()
    }

    /// Rewrites the current sentence into the next generation.
    pub fn advance(&mut self) -> Result<(), Error> {
        self.system.derive(1)?;
        self.generation += 1;
        Ok(())
    }

    /// Derives `k` generations in a row.
    pub fn advance_by(&mut self, k: u32) -> Result<(), Error> {
        for _ in 0..k {
            self.advance()?;
        }
        Ok(())
    }

    /// Derives one generation and hands it to `accept`.
    ///
    /// If either the derivation or `accept` fails, the previous generation is
    /// restored, so a failed tick leaves the grammar where it was.
    pub fn advance_with<T>(
        &mut self,
        accept: impl FnOnce(&SymbiosState) -> Result<T, InterpretError>,
    ) -> Result<T, Error> {
        let previous = self.system.state.clone();
        let generation = self.generation;
        let result = self
            .advance()
            .and_then(|()| accept(&self.system.state).map_err(Error::from));
        if result.is_err() {
            self.system.state = previous;
            self.generation = generation;
        }
        result
    }
}
