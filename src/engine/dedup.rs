//! Deduplication keys for saturation.
//!
//! Saturation repeatedly applies rules and adds newly produced `Node`s to the
//! stash. Without a stable dedup key, rules that re-derive the same node (for
//! example merging farewell phrases in a different grouping) would loop
//! forever.
//!
//! The key combines span, dimension, producing rule and a kind-specific
//! payload. Including the rule name keeps distinct derivations of the same
//! span apart, which the resolver needs for priorities.

use crate::fact::Fact;
use crate::{Dimension, Node, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) dim: Dimension,
    pub(crate) rule_name: &'static str,
    pub(crate) kind_key: NodeKindKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NodeKindKey {
    RegexMatch(String), // group 0 identifies a regex hit
    Word(String),
    Surname(String),
    Name(String),
    Person(String, Option<String>),
    Position(u8),
    Fact(Fact),
}

impl NodeKey {
    pub(crate) fn from_node(node: &Node) -> Self {
        let kind_key = match &node.token.kind {
            TokenKind::RegexMatch(groups) => {
                NodeKindKey::RegexMatch(groups.first().map(|s| s.as_str()).unwrap_or("").to_string())
            }
            TokenKind::Word(w) => NodeKindKey::Word(w.folded.clone()),
            TokenKind::Surname(s) => NodeKindKey::Surname(s.folded.clone()),
            TokenKind::Name(n) => NodeKindKey::Name(n.first.clone()),
            TokenKind::Person(p) => NodeKindKey::Person(p.first.clone(), p.second.clone()),
            TokenKind::Position(p) => NodeKindKey::Position(p.place_words),
            TokenKind::Fact(f) => NodeKindKey::Fact(f.clone()),
        };

        NodeKey {
            start: node.range.start,
            end: node.range.end,
            dim: node.token.dim,
            rule_name: node.rule_name,
            kind_key,
        }
    }
}
