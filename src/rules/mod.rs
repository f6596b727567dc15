//! Declarative validation rules and their compiler.
//!
//! A [`RuleConfig`] is what a user authors against a single field: a kind
//! (text, number or date), a combiner and an ordered list of typed rules.
//! [`compile`] turns it into the portable [`Logic`](crate::logic::Logic)
//! form, ready for repeated evaluation. Compilation is pure and idempotent;
//! it is rerun whenever the configuration changes.

mod date;
mod number;
mod text;

pub use date::DateRule;
pub use number::NumberRule;
pub use text::TextRule;

use crate::logic::Logic;
use serde::{Deserialize, Serialize};

/// How the rules of a configuration combine: all must hold, or any may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combiner {
    #[default]
    All,
    Any,
}

impl Combiner {
    /// Wraps a list of compiled per-rule trees in the combining node.
    pub(crate) fn wrap(self, compiled: Vec<Logic>) -> Logic {
        match self {
            Combiner::All => Logic::All(compiled),
            Combiner::Any => Logic::Any(compiled),
        }
    }
}

/// A user-authored rule configuration, tagged by the field kind it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuleConfig {
    Text {
        combiner: Combiner,
        rules: Vec<TextRule>,
    },
    Number {
        combiner: Combiner,
        rules: Vec<NumberRule>,
    },
    Date {
        combiner: Combiner,
        rules: Vec<DateRule>,
    },
}

/// Compiles a rule configuration into a portable logic tree.
///
/// Returns `None` for an empty rule list, which means "always valid".
pub fn compile(config: &RuleConfig) -> Option<Logic> {
    match config {
        RuleConfig::Text { combiner, rules } => {
            compile_rules(*combiner, rules, text::compile_rule)
        }
        RuleConfig::Number { combiner, rules } => {
            compile_rules(*combiner, rules, number::compile_rule)
        }
        RuleConfig::Date { combiner, rules } => {
            compile_rules(*combiner, rules, date::compile_rule)
        }
    }
}

fn compile_rules<R>(combiner: Combiner, rules: &[R], compile_one: fn(&R) -> Logic) -> Option<Logic> {
    if rules.is_empty() {
        return None;
    }
    Some(combiner.wrap(rules.iter().map(compile_one).collect()))
}
