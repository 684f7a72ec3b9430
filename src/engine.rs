//! The built-in grammar engine.
//!
//! [`Grammar`] is the crate's own [`MatchEngine`]: a rule engine that finds the
//! four facts in a single utterance. Scanning one text is a pipeline:
//!
//! ```text
//! rules (all)  ──┐
//!               │  CompiledRules::new           (compiled_rules.rs)
//!               └───────────────┬──────────────
//!                               │ select(facts): rules of the requested kinds
//! text ── TriggerInfo::scan ────┼─ phrase gating
//!         (trigger.rs)          │
//!                               v
//!                     Parser::saturate (parser.rs)
//!                       - seed matches (regex-first)
//!                       - iterate to fixpoint
//!                       - dedup via NodeKey (dedup.rs)
//!                               │
//!                               v
//!                     resolve_node (resolve.rs)
//!                       - fact nodes -> FactMatch
//!                       - drop matches inside a longer one of the same kind
//!                               │
//!                               v
//!                        Vec<FactMatch>
//! ```
//!
//! Rules are compiled once per `Grammar`; each call only picks the subset for
//! the active fact kinds, so narrowing the active set makes later calls cheaper.
//!
//! ## Responsibilities by module
//!
//! - `compiled_rules.rs`: `CompiledRules` and the per-fact rule index.
//! - `trigger.rs`: key phrase scan of the raw text for rule gating.
//! - `parser.rs`: matching + saturation over a `Stash`, then resolution.
//! - `dedup.rs`: stable dedup keys to keep saturation finite.
//! - `resolve.rs`: fact nodes to [`FactMatch`]es.
//! - `metrics.rs`: per-pass timings and node traces for `explain`.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=callscan=trace` to see rule activation, seeds and
//! productions.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/dedup.rs"]
mod dedup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/resolve.rs"]
mod resolve;
#[path = "engine/trigger.rs"]
mod trigger;

use compiled_rules::CompiledRules;
use parser::Parser;

use crate::fact::{FactMatch, FactSet};
use crate::matcher::MatchEngine;
use crate::{Result, Rule};
use once_cell::sync::Lazy;

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(crate::rules::get);

/// The built-in rule set, compiled once and shared by all workers.
#[derive(Debug)]
pub struct Grammar {
    compiled: CompiledRules<'static>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar { compiled: CompiledRules::new(&DEFAULT_RULES) }
    }

    pub fn rule_count(&self) -> usize {
        self.compiled.rules.len()
    }

    pub(crate) fn parser<'a>(&'a self, text: &'a str, facts: FactSet) -> Parser<'a> {
        Parser::new_compiled(text, &self.compiled, facts)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchEngine for Grammar {
    fn find_all(&self, facts: FactSet, text: &str) -> Result<Vec<FactMatch>> {
        self.parser(text, facts).run()
    }
}
