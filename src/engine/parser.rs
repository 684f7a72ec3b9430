//! Matching and saturation parser.
//!
//! This module is the operational core of the engine:
//!
//! - Select the rules serving the requested fact kinds, then drop the ones
//!   whose key phrases are absent from the text (see `compiled_rules.rs` and
//!   `trigger.rs`).
//! - Repeatedly apply those rules to build up a `Stash` of `Node`s.
//! - Deduplicate produced nodes to keep saturation finite and deterministic
//!   (see `dedup.rs`).
//! - Resolve fact nodes into `FactMatch`es (see `resolve.rs`) and drop spans
//!   covered by a larger match of the same kind.
//!
//! ## Key concepts
//!
//! - **Rule** (`crate::Rule`): a sequence of `Pattern`s with a production.
//! - **Node** (`crate::Node`): a matched token with a span (`Range`) and a
//!   `Token` value.
//! - **Stash** (`crate::Stash`): the growing set of discovered nodes.
//! - **Saturation**: repeatedly apply rules until an iteration produces no new
//!   nodes (a fixpoint).
//!
//! ## Pass structure
//!
//! ```text
//! (0) select + trigger scan -> active rules
//! (1) initial regex pass    -> seed from raw input
//! (2) iterative passes      -> mix regex + predicate rules as stash grows
//! (3) resolve + filter      -> FactMatch output
//! ```
//!
//! ## Debugging
//!
//! Rule activation and production are logged at `trace` level under the
//! `callscan::engine` target, e.g. `RUST_LOG=callscan::engine=trace`.

use super::compiled_rules::{CompiledRules, DimensionSet, RuleId};
use super::dedup::NodeKey;
use super::metrics::{PassMetrics, RunMetrics, RunResult, SaturationMetrics};
use super::resolve::resolve_node;
use super::trigger::TriggerInfo;
use crate::fact::{FactMatch, FactSet};
use crate::{Dimension, Node, Pattern, Range, Result, Rule, Stash, Token, TokenKind};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Instant;
use tracing::trace;

/// A rule matched up to `next_idx`. `route` holds the matched `Node`s so far.
///
/// ```text
/// pattern: [Regex("компания"), Regex("\s+"), Predicate(is_content_word)]
///          route covers the regex hit, next_idx = 1
///
/// route: [ Node(range:0..16, dim:RegexMatch) ]
/// position points to the end of the last consumed node (here: 16)
/// ```
struct PartialMatch<'a> {
    rule: &'a Rule,
    next_idx: usize,
    position: usize,
    route: Vec<Node>,
}

/// Parser orchestrates applying `Rule`s against one text.
///
/// ```text
/// new_compiled() -> saturate() -> resolve_filtered()
///                     │             └─ discard subsumed matches
///                     └─ repeatedly grow stash using rules
/// ```
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    /// Fact kinds the caller asked for.
    facts: FactSet,
    stash: Stash,
    /// Keys of every node already in the stash.
    seen: HashSet<NodeKey>,
    compiled: &'a CompiledRules<'a>,
    /// Active rules that start with a `Regex` pattern.
    regex_rules: Vec<&'a Rule>,
    /// Active rules that start with a `Predicate` pattern.
    predicate_rules: Vec<&'a Rule>,
    /// Keep the nodes produced by each pass in the metrics.
    keep_nodes: bool,
}

impl<'a> Parser<'a> {
    /// Create a parser for `input` looking for the kinds in `facts`.
    pub fn new_compiled(input: &'a str, compiled: &'a CompiledRules<'a>, facts: FactSet) -> Self {
        let mut active: BTreeSet<RuleId> = compiled.select(facts);
        let selected = active.len();

        let trigger_info = if active.is_empty() { None } else { Some(TriggerInfo::scan(input)) };
        if let Some(info) = &trigger_info {
            trace!(target: "callscan::engine", phrases = ?info.phrases, ?facts, "trigger scan");
            active.retain(|&id| {
                let meta = &compiled.metas[id];
                // all required phrases, and at least one optional phrase if any are listed
                meta.required_phrases.iter().all(|p| info.has(p))
                    && (meta.optional_phrases.is_empty() || meta.optional_phrases.iter().any(|p| info.has(p)))
            });
        }

        trace!(
            target: "callscan::engine",
            active = active.len(),
            selected,
            total = compiled.rules.len(),
            "active rules"
        );

        let regex_rules: Vec<&Rule> = active
            .iter()
            .map(|&id| compiled.rules[id])
            .filter(|r| matches!(r.pattern.first(), Some(Pattern::Regex(_))))
            .collect();

        let predicate_rules: Vec<&Rule> = active
            .iter()
            .map(|&id| compiled.rules[id])
            .filter(|r| matches!(r.pattern.first(), Some(Pattern::Predicate(_))))
            .collect();

        Parser {
            input,
            facts,
            stash: Stash::empty(),
            seen: HashSet::new(),
            compiled,
            regex_rules,
            predicate_rules,
            keep_nodes: false,
        }
    }

    /// Record the nodes produced by each saturation pass in the metrics.
    pub fn keep_nodes(mut self) -> Self {
        self.keep_nodes = true;
        self
    }

    pub(crate) fn active_rule_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.regex_rules.iter().chain(self.predicate_rules.iter()).map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Capture groups keep the input's case; company names are reported as
    /// written.
    fn regex_node(caps: &regex::Captures<'_>) -> Option<Node> {
        let m = caps.get(0)?;
        let groups: Vec<String> = (0..caps.len()).filter_map(|i| caps.get(i).map(|g| g.as_str().to_string())).collect();
        Some(Node {
            range: Range { start: m.start(), end: m.end() },
            token: Token { dim: Dimension::RegexMatch, kind: TokenKind::RegexMatch(groups) },
            rule_name: "<regex>",
            evidence: Vec::new(),
        })
    }

    /// Find nodes that match `pat` and start exactly at `position`.
    ///
    /// ```text
    /// input: "компания Ромашка"
    /// position: 8 (the space)
    /// Pattern::Regex("\\s+") -> Node at 8..9
    /// Pattern::Predicate(is_word) -> Nodes pulled from stash at same offset
    /// ```
    fn lookup_item(&self, pat: &Pattern, position: usize) -> Vec<Node> {
        match pat {
            Pattern::Regex(re) => {
                if position > self.input.len() || !self.input.is_char_boundary(position) {
                    return Vec::new();
                }
                // Leftmost search from `position`: a hit starting there, if
                // any, is the one returned.
                re.captures_at(self.input, position)
                    .filter(|caps| caps.get(0).is_some_and(|m| m.start() == position))
                    .and_then(|caps| Self::regex_node(&caps))
                    .into_iter()
                    .collect()
            }
            Pattern::Predicate(pred) => self.stash.starting_at(position).filter(|n| pred(&n.token)).cloned().collect(),
        }
    }

    /// Find nodes that match `pat` anywhere in the input.
    fn lookup_item_anywhere(&self, pat: &Pattern) -> Vec<Node> {
        match pat {
            Pattern::Regex(re) => re.captures_iter(self.input).filter_map(|caps| Self::regex_node(&caps)).collect(),
            Pattern::Predicate(pred) => self.stash.nodes().iter().filter(|n| pred(&n.token)).cloned().collect(),
        }
    }

    /// Match a rule's first pattern anywhere and return a `PartialMatch` for
    /// each hit.
    fn seed_first_pattern_anywhere(&self, rule: &'a Rule) -> Vec<PartialMatch<'a>> {
        let Some(first) = rule.pattern.first() else {
            return Vec::new();
        };
        self.lookup_item_anywhere(first)
            .into_iter()
            .map(|node| PartialMatch { rule, next_idx: 1, position: node.range.end, route: vec![node] })
            .collect()
    }

    /// Depth-first expansion of `PartialMatch`es until the rule is complete.
    ///
    /// ```text
    /// [m0] --Regex--> [m1] --Predicate--> [m2]
    ///   │                           │
    ///   └─ (backtracks)             └─ success -> collected
    /// ```
    fn match_all(&self, input_matches: Vec<PartialMatch<'a>>) -> Vec<PartialMatch<'a>> {
        let mut results = Vec::new();
        let mut stack: Vec<PartialMatch<'a>> = input_matches;

        while let Some(m) = stack.pop() {
            if m.next_idx >= m.rule.pattern.len() {
                results.push(m);
                continue;
            }

            let pat = &m.rule.pattern[m.next_idx];
            let nodes = self.lookup_item(pat, m.position);

            // reversed so the stack explores them in order
            for node in nodes.into_iter().rev() {
                let mut route = m.route.clone();
                let position = node.range.end;
                route.push(node);
                stack.push(PartialMatch { rule: m.rule, next_idx: m.next_idx + 1, position, route });
            }
        }

        results
    }

    /// Turn a completed `PartialMatch` into a `Node` through the rule's
    /// production.
    fn produce_node(&self, m: &PartialMatch) -> Option<Node> {
        if m.next_idx < m.rule.pattern.len() {
            return None;
        }
        let tokens: Vec<Token> = m.route.iter().map(|n| n.token.clone()).collect();
        let (first, last) = (m.route.first()?, m.route.last()?);

        let Some(token) = (m.rule.production)(&tokens) else {
            trace!(target: "callscan::engine", rule = m.rule.name, start = first.range.start, "production rejected");
            return None;
        };

        trace!(
            target: "callscan::engine",
            rule = m.rule.name,
            start = first.range.start,
            end = last.range.end,
            text = self.input.get(first.range.start..last.range.end).unwrap_or_default(),
            ?token,
            "production"
        );

        let mut evidence = Vec::new();
        for node in &m.route {
            evidence.push(node.rule_name);
            evidence.extend_from_slice(&node.evidence);
        }
        Some(Node { range: Range { start: first.range.start, end: last.range.end }, token, rule_name: m.rule.name, evidence })
    }

    /// Apply `rule_set` once and return the produced nodes with the number of
    /// rules that had at least one first-pattern hit.
    fn apply_rules_once(&self, rule_set: &[&'a Rule]) -> (Vec<Node>, usize) {
        let mut discovered = Vec::new();
        let mut rules_seeded = 0;

        for rule in rule_set {
            let starts = self.seed_first_pattern_anywhere(rule);
            if starts.is_empty() {
                continue;
            }
            rules_seeded += 1;
            for m in self.match_all(starts) {
                if let Some(node) = self.produce_node(&m) {
                    discovered.push(node);
                }
            }
        }
        (discovered, rules_seeded)
    }

    /// Add the nodes not seen before. Returns the new nodes as a stash.
    fn absorb(&mut self, discovered: Vec<Node>) -> Stash {
        let mut newly_added = Stash::empty();
        for node in discovered {
            if self.seen.insert(NodeKey::from_node(&node)) {
                newly_added.insert(node);
            }
        }
        newly_added
    }

    fn pass_metrics(&self, started: Instant, considered: usize, seeded: usize, added: &Stash) -> PassMetrics {
        PassMetrics {
            duration: started.elapsed(),
            produced: added.nodes().len(),
            nodes: if self.keep_nodes { added.nodes().to_vec() } else { Vec::new() },
            _rules_considered: considered,
            _rules_seeded: seeded,
        }
    }

    fn dimensions_in_stash(&self) -> DimensionSet {
        self.stash.nodes().iter().fold(DimensionSet::empty(), |dims, node| dims | DimensionSet::of(node.token.dim))
    }

    /// Rules with no deps always run; otherwise every dep must be in the stash.
    fn deps_satisfied(rule: &Rule, dims_in_stash: DimensionSet) -> bool {
        rule.deps.iter().all(|&dep| dims_in_stash.contains(DimensionSet::of(dep)))
    }

    /// Saturate the stash by repeatedly applying rules until a fixpoint.
    ///
    /// ```text
    /// regex_rules pass
    ///      │
    ///      ▼
    ///  stash grows ──┐
    ///                │ predicate + regex passes
    ///                └── repeat until fixed point
    /// ```
    fn saturate(&mut self) -> SaturationMetrics {
        let mut metrics = SaturationMetrics::default();
        let saturation_start = Instant::now();

        let regex_start = Instant::now();
        let regex_rules = self.regex_rules.clone();
        let (discovered, seeded) = self.apply_rules_once(&regex_rules);
        let newly_added = self.absorb(discovered);
        metrics.initial_regex = self.pass_metrics(regex_start, regex_rules.len(), seeded, &newly_added);
        if newly_added.null() {
            metrics.total = saturation_start.elapsed();
            return metrics;
        }
        self.stash.extend(newly_added);

        let all_rules: Vec<&'a Rule> = self.predicate_rules.iter().chain(self.regex_rules.iter()).copied().collect();

        loop {
            let iteration_start = Instant::now();
            let dims = self.dimensions_in_stash();
            let rules: Vec<&'a Rule> = all_rules.iter().filter(|r| Self::deps_satisfied(r, dims)).copied().collect();

            let (discovered, seeded) = self.apply_rules_once(&rules);
            let newly_added = self.absorb(discovered);
            let pass = self.pass_metrics(iteration_start, rules.len(), seeded, &newly_added);
            metrics.iterations.push(pass);
            if newly_added.null() {
                break;
            }
            self.stash.extend(newly_added);
        }

        metrics.total = saturation_start.elapsed();
        metrics
    }

    /// Resolve fact nodes of the requested kinds, then drop spans fully
    /// contained within a larger match of the same kind.
    ///
    /// On equal spans the higher-priority rule is kept first; later equal
    /// spans are not subsumed and stay in the output.
    fn resolve_filtered(&self) -> Result<Vec<FactMatch>> {
        let mut resolved: Vec<(FactMatch, &'static str)> = Vec::new();
        for node in self.stash.nodes() {
            if let Some(m) = resolve_node(self.input, node)? {
                if self.facts.has(m.kind()) {
                    resolved.push((m, node.rule_name));
                }
            }
        }

        let rule_priority: HashMap<&str, u16> = self.compiled.rules.iter().map(|r| (r.name, r.priority)).collect();
        let priority = |name: &str| rule_priority.get(name).copied().unwrap_or(0);

        resolved.sort_by(|(a, ra), (b, rb)| {
            a.kind()
                .cmp(&b.kind())
                .then(a.start.cmp(&b.start))
                .then(b.end.cmp(&a.end))
                .then(priority(*rb).cmp(&priority(*ra)))
        });

        let mut filtered: Vec<FactMatch> = Vec::new();
        let mut last_kind = None;
        let mut last_range: Option<(usize, usize)> = None;

        for (m, _) in resolved {
            if last_kind != Some(m.kind()) {
                last_kind = Some(m.kind());
                last_range = None;
            }

            let subsumed = last_range.is_some_and(|(start, end)| {
                start <= m.start && end >= m.end && (start != m.start || end != m.end)
            });
            if subsumed {
                continue;
            }
            // equal spans from different derivations collapse into one
            if last_range == Some((m.start, m.end)) && filtered.last().is_some_and(|prev| prev.fact == m.fact) {
                continue;
            }
            last_range = Some((m.start, m.end));
            filtered.push(m);
        }

        filtered.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)).then(a.kind().cmp(&b.kind())));
        Ok(filtered)
    }

    /// Saturate and resolve, returning timing details.
    pub fn run_with_metrics(mut self) -> Result<RunResult> {
        let total_start = Instant::now();
        let saturation = self.saturate();
        let resolve_start = Instant::now();
        let matches = self.resolve_filtered()?;
        let resolve = resolve_start.elapsed();
        let total = total_start.elapsed();

        Ok(RunResult { matches, metrics: RunMetrics { total, saturation, resolve } })
    }

    /// Saturate and resolve. Use [`run_with_metrics`](Self::run_with_metrics)
    /// to inspect stage durations.
    pub fn run(self) -> Result<Vec<FactMatch>> {
        Ok(self.run_with_metrics()?.matches)
    }
}
