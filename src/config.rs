//! Engine configuration.
//!
//! Configurations are plain data: build one in code, start from a preset, or
//! load one from JSON (file IO is left to the host). Validation happens once,
//! when an engine is constructed.

use crate::error::ConfigError;
use crate::grammar::Grammar;
use crate::interpreter::{TurtleConfig, UnderflowPolicy};
use crate::turtle::HeadingMode;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Everything needed to build a [`GrowingTree`](crate::GrowingTree) or a
/// [`Plant`](crate::Plant).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LSystemConfig {
    /// Initial sentence, modules separated by whitespace.
    pub axiom: String,

    /// Rule sources applied once per tick, e.g. `"F -> F F"`.
    #[serde(default)]
    pub rules: Vec<String>,

    /// Length of every freshly drawn segment.
    pub segment_length: f32,

    /// Base radius of every freshly drawn segment.
    #[serde(default = "default_thickness")]
    pub segment_thickness: f32,

    /// Turn angle in radians for `+ - ^ &`.
    pub angle: f32,

    /// Scale applied to every retained branch on each tick.
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f32,

    /// Number of generations before the engine settles.
    pub max_iterations: u32,

    #[serde(default)]
    pub heading: HeadingMode,

    #[serde(default)]
    pub underflow: UnderflowPolicy,

    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,
}

fn default_thickness() -> f32 {
    0.02
}

fn default_growth_factor() -> f32 {
    1.0
}

fn default_max_stack_depth() -> usize {
    1024
}

impl LSystemConfig {
    /// The 3D growing tree: every branch sprouts four children around it.
    pub fn tree() -> Self {
        Self {
            axiom: "F".into(),
            rules: vec!["F -> F [ + F ] [ - F ] [ ^ F ] [ & F ]".into()],
            segment_length: 0.5,
            segment_thickness: 0.02,
            angle: PI / 6.0,
            growth_factor: 1.5,
            max_iterations: 5,
            heading: HeadingMode::Spatial,
            underflow: UnderflowPolicy::Reject,
            max_stack_depth: default_max_stack_depth(),
        }
    }

    /// The flat plant: a stem that forks left and right and keeps lengthening.
    ///
    /// Keeps the historical lenient handling of stray `]`.
    pub fn plant() -> Self {
        Self {
            axiom: "S".into(),
            rules: vec!["S -> F [ + F ] [ - F ]".into(), "F -> F F".into()],
            segment_length: 2.0,
            segment_thickness: default_thickness(),
            angle: 25.0f32.to_radians(),
            growth_factor: default_growth_factor(),
            max_iterations: 5,
            heading: HeadingMode::Planar,
            underflow: UnderflowPolicy::Ignore,
            max_stack_depth: default_max_stack_depth(),
        }
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects degenerate geometry parameters and unparseable rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.turtle().validate()?;
        positive("growth_factor", self.growth_factor)?;
        self.grammar().map(drop)
    }

    /// Compiles the axiom and rules into a fresh [`Grammar`].
    pub fn grammar(&self) -> Result<Grammar, ConfigError> {
        Grammar::new(&self.axiom, &self.rules)
    }

    /// Interpreter settings derived from this configuration.
    pub fn turtle(&self) -> TurtleConfig {
        TurtleConfig {
            step_length: self.segment_length,
            thickness: self.segment_thickness,
            angle: self.angle,
            heading: self.heading,
            underflow: self.underflow,
            max_stack_depth: self.max_stack_depth,
        }
    }
}

pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        Err(ConfigError::NonFinite { field, value })
    } else if value <= 0.0 {
        Err(ConfigError::NonPositive { field, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        LSystemConfig::tree().validate().unwrap();
        LSystemConfig::plant().validate().unwrap();
    }

    #[test]
    fn rejects_zero_length() {
        let config = LSystemConfig {
            segment_length: 0.0,
            ..LSystemConfig::tree()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "segment_length",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_thickness_and_growth() {
        let thin = LSystemConfig {
            segment_thickness: -0.1,
            ..LSystemConfig::tree()
        };
        assert!(matches!(
            thin.validate(),
            Err(ConfigError::NonPositive {
                field: "segment_thickness",
                ..
            })
        ));

        let shrinking = LSystemConfig {
            growth_factor: 0.0,
            ..LSystemConfig::tree()
        };
        assert!(matches!(
            shrinking.validate(),
            Err(ConfigError::NonPositive {
                field: "growth_factor",
                ..
            })
        ));
    }

    #[test]
    fn rejects_nan_angle() {
        let config = LSystemConfig {
            angle: f32::NAN,
            ..LSystemConfig::plant()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFinite { field: "angle", .. })
        ));
    }

    #[test]
    fn loads_json_with_defaults() {
        let json = r#"{
            "axiom": "F",
            "rules": ["F -> F [ + F ] [ - F ]"],
            "segment_length": 1.0,
            "angle": 0.5,
            "max_iterations": 3
        }"#;
        let config = LSystemConfig::from_json_str(json).unwrap();
        assert_eq!(config.axiom, "F");
        assert_eq!(config.rules, ["F -> F [ + F ] [ - F ]"]);
        assert_eq!(config.heading, HeadingMode::Spatial);
        assert_eq!(config.underflow, UnderflowPolicy::Reject);
        assert_eq!(config.max_stack_depth, 1024);
    }

    #[test]
    fn json_validation_runs() {
        let json = r#"{
            "axiom": "F",
            "segment_length": -1.0,
            "angle": 0.5,
            "max_iterations": 3
        }"#;
        assert!(matches!(
            LSystemConfig::from_json_str(json),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            LSystemConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_malformed_rules() {
        let config = LSystemConfig {
            rules: vec!["A(age) -> A(age + 1)".into()],
            ..LSystemConfig::tree()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Grammar(_))));
    }

    #[test]
    fn tree_grammar_compiles() {
        let mut grammar = LSystemConfig::tree().grammar().unwrap();
        grammar.advance().unwrap();
        assert_eq!(grammar.sentence(), "F [ + F ] [ - F ] [ ^ F ] [ & F ]");
    }

    #[test]
    fn presets_round_trip_through_json() {
        for preset in [LSystemConfig::tree(), LSystemConfig::plant()] {
            let json = serde_json::to_string(&preset).unwrap();
            let loaded = LSystemConfig::from_json_str(&json).unwrap();
            assert_eq!(loaded, preset);
        }
    }
}
