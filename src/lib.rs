extern crate self as callscan;

use regex::Regex;

#[macro_use]
mod macros;
mod api;
mod coordinator;
mod dialog;
mod engine;
mod error;
mod fact;
mod matcher;
mod merge;
mod output;
mod partition;
mod plan;
mod result;
mod rules;
mod scanner;
mod table;
#[cfg(test)]
mod test_support;

pub use api::{ExplainDetails, NodeSummary, Options, SaturationPass, ScanOutput, explain, scan, scan_with};
pub use coordinator::{Coordinator, ScanRun, default_workers};
pub use dialog::{Dialog, DialogId, Role, Utterance, group_dialogs};
pub use engine::Grammar;
pub use error::{Error, Result};
pub use fact::{Fact, FactKind, FactMatch, FactSet};
pub use matcher::MatchEngine;
pub use merge::{ExtendedTable, extend_table};
pub use output::{write_extended_csv, write_outputs, write_results_json};
pub use partition::partition;
pub use plan::{DEFAULT_FIRST_ROWS, DEFAULT_LAST_ROWS, RulePlan, Window, WindowSide};
pub use result::{CompanyMention, Detection, DialogRecord, DialogResult, Introduction};
pub use scanner::{DialogScanner, ScanStats};
pub use table::{ColumnNames, Table};

// --- Grammar internals ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Dimension {
    RegexMatch,
    Word,
    /// First names and surnames.
    Name,
    Person,
    Position,
    Fact,
}

#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub dim: Dimension,
    pub kind: TokenKind,
}

/// A word of the input: `text` as written, `folded` lowercased with `ё` as `е`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WordData {
    pub text: String,
    pub folded: String,
}

/// A known first name, reduced to its nominative form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NameData {
    pub first: String,
    pub feminine: bool,
}

/// A word that looks like a surname, as written (folded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SurnameData {
    pub folded: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PersonData {
    pub first: String,
    pub second: Option<String>,
}

/// A job title, optionally followed by up to three words naming the place of
/// work ("специалист отдела закупок").
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PositionData {
    pub place_words: u8,
}

#[derive(Debug, Clone)]
pub(crate) enum TokenKind {
    RegexMatch(Vec<String>),
    Word(WordData),
    Surname(SurnameData),
    Name(NameData),
    Person(PersonData),
    Position(PositionData),
    Fact(Fact),
}

// Trait to convert rule production results into tokens
pub(crate) trait IntoToken {
    fn into_token(self) -> Option<Token>;
}

impl IntoToken for WordData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Word, kind: TokenKind::Word(self) })
    }
}

impl IntoToken for NameData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Name, kind: TokenKind::Name(self) })
    }
}

impl IntoToken for SurnameData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Name, kind: TokenKind::Surname(self) })
    }
}

impl IntoToken for PersonData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Person, kind: TokenKind::Person(self) })
    }
}

impl IntoToken for PositionData {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Position, kind: TokenKind::Position(self) })
    }
}

impl IntoToken for Fact {
    fn into_token(self) -> Option<Token> {
        Some(Token { dim: Dimension::Fact, kind: TokenKind::Fact(self) })
    }
}

// Pattern items used by rules: either a Regex to match text, or a Predicate
// that matches an existing token in the stash.
#[derive(Debug)]
pub(crate) enum Pattern {
    /// Match a regular expression against the scanned text. The `Regex` is
    /// stored as a static reference (created via the `regex!` helper macro in
    /// `src/macros.rs`).
    Regex(&'static Regex),

    /// Match an already-discovered `Token` using a predicate function. This
    /// allows rules to combine previously found tokens (from the `Stash`).
    Predicate(fn(&Token) -> bool),
}

pub(crate) type Production = Box<dyn Fn(&[Token]) -> Option<Token> + Send + Sync>;

/// A grammar rule: a name, a positional `pattern` (vector of `Pattern` items)
/// and a `production` function that receives the matched tokens and
/// optionally returns a new `Token`.
///
/// The remaining fields control when the rule is active.
pub(crate) struct Rule {
    pub name: &'static str,
    pub pattern: Vec<Pattern>,
    pub production: Production,
    /// Required phrases - ALL must appear in input for this rule to activate (AND logic).
    pub required_phrases: &'static [&'static str],
    /// Optional phrases - ANY one must appear in input for this rule to activate (OR logic).
    pub optional_phrases: &'static [&'static str],
    /// Fact kinds this rule serves. The rule runs only when one of them is
    /// requested; an empty set means always on.
    pub facts: FactSet,
    /// Required dimensions in stash before this rule activates.
    pub deps: &'static [Dimension],
    /// Priority for deterministic tie-breaking (higher = preferred).
    pub priority: u16,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("production", &"<function>")
            .field("facts", &self.facts)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// Basic parse tree node produced by rules. `Node` pairs a `Token` with the
/// consumed `Range` of the scanned text.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub range: Range,
    pub token: Token,
    /// Name of the rule that produced this node.
    pub rule_name: &'static str,
    /// Names of rules that directly contributed to producing this node.
    pub evidence: Vec<&'static str>,
}

// --- Stash: lightweight container for discovered nodes ----------------------

#[derive(Debug, Clone)]
pub(crate) struct Stash {
    nodes: Vec<Node>,
}

impl Stash {
    /// Create an empty `Stash`.
    pub fn empty() -> Self {
        Stash { nodes: Vec::new() }
    }

    /// Return true if the stash is empty.
    pub fn null(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Nodes starting exactly at `position`.
    pub fn starting_at(&self, position: usize) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.range.start == position)
    }

    /// Append every node of `other`. Callers only add nodes whose dedup key
    /// is new, so no duplicate check happens here.
    pub fn extend(&mut self, other: Stash) {
        self.nodes.extend(other.nodes);
        self.nodes.sort_by_key(|n| (n.range.start, n.range.end));
    }

    /// Insert a node into the stash (appends to internal vector).
    pub fn insert(&mut self, node: Node) {
        self.nodes.push(node);
    }
}
