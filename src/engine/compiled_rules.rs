//! Rule compilation and indexing.
//!
//! This module holds the *static* side of the engine: the structures derived
//! from the full rule list once per [`Grammar`](super::Grammar), so that each
//! scan of a text only has to pick rules, never rebuild them.
//!
//! Scanning is split into two phases:
//!
//! 1. **Compile/index rules** (this module): build `CompiledRules` and index
//!    every rule by the fact kinds it serves.
//! 2. **Run** (see `parser.rs`): select the rules of the active fact kinds,
//!    gate them by trigger phrases (`trigger.rs`), then saturate and resolve.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules` and `CompiledRules::metas`.
//!   Those vectors must stay aligned.
//! - `RuleIndex::by_fact` is indexed by `FactKind::index()`.
//! - A rule that serves several kinds is listed under each of them; selection
//!   deduplicates.

use crate::fact::{FactKind, FactSet};
use crate::{Dimension, Rule};
use std::collections::BTreeSet;

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

pub const FACT_COUNT: usize = FactKind::ALL.len();

bitflags::bitflags! {
    /// Tracks which dimensions are present in the stash.
    ///
    /// This is used by the parser to skip rules that depend on dimensions that
    /// cannot possibly match yet.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DimensionSet: u8 {
        const REGEX    = 1 << 0;
        const WORD     = 1 << 1;
        const NAME     = 1 << 2;
        const PERSON   = 1 << 3;
        const POSITION = 1 << 4;
        const FACT     = 1 << 5;
    }
}

impl DimensionSet {
    pub fn of(dim: Dimension) -> Self {
        match dim {
            Dimension::RegexMatch => DimensionSet::REGEX,
            Dimension::Word => DimensionSet::WORD,
            Dimension::Name => DimensionSet::NAME,
            Dimension::Person => DimensionSet::PERSON,
            Dimension::Position => DimensionSet::POSITION,
            Dimension::Fact => DimensionSet::FACT,
        }
    }
}

/// Metadata attached to a rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleMeta {
    pub required_phrases: &'static [&'static str],
    pub optional_phrases: &'static [&'static str],
    pub facts: FactSet,
    pub _priority: u16,
}

#[derive(Default, Debug)]
pub struct RuleIndex {
    pub always_on: Vec<RuleId>,
    pub by_fact: [Vec<RuleId>; FACT_COUNT],
}

/// Pre-compiled rule set with metadata and indexes.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub rules: Vec<&'a Rule>,
    pub metas: Vec<RuleMeta>,
    pub index: RuleIndex,
}

impl<'a> CompiledRules<'a> {
    /// Create a compiled rule set from a slice of rules.
    ///
    /// This does not rewrite patterns or build automata; regexes are already
    /// compiled statics.
    pub fn new(rules: &'a [Rule]) -> Self {
        let rule_refs: Vec<&Rule> = rules.iter().collect();

        let metas: Vec<RuleMeta> = rule_refs
            .iter()
            .map(|r| RuleMeta {
                required_phrases: r.required_phrases,
                optional_phrases: r.optional_phrases,
                facts: r.facts,
                _priority: r.priority,
            })
            .collect();

        let mut index = RuleIndex::default();
        for (id, meta) in metas.iter().enumerate() {
            if meta.facts.is_empty() {
                index.always_on.push(id);
                continue;
            }
            for kind in meta.facts.kinds() {
                index.by_fact[kind.index()].push(id);
            }
        }

        CompiledRules { rules: rule_refs, metas, index }
    }

    /// Rules serving any kind in `facts`, plus the always-on rules, in rule
    /// order. An empty `facts` selects nothing.
    pub fn select(&self, facts: FactSet) -> BTreeSet<RuleId> {
        if facts.is_empty() {
            return BTreeSet::new();
        }
        let mut ids: BTreeSet<RuleId> = self.index.always_on.iter().copied().collect();
        for kind in facts.kinds() {
            ids.extend(&self.index.by_fact[kind.index()]);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_is_indexed() {
        let rules = crate::rules::get();
        let compiled = CompiledRules::new(&rules);
        assert_eq!(compiled.select(FactSet::all()).len(), rules.len());
    }

    #[test]
    fn tail_selection_excludes_head_only_rules() {
        let rules = crate::rules::get();
        let compiled = CompiledRules::new(&rules);
        let tail = compiled.select(FactSet::TAIL);
        assert!(!tail.is_empty());
        for id in tail {
            let meta = compiled.metas[id];
            assert!(meta.facts.is_empty() || meta.facts.has(FactKind::Bye), "{}", compiled.rules[id].name);
        }
    }
}
