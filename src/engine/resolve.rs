//! Node resolution.
//!
//! Saturation leaves the stash full of intermediate nodes: words, names,
//! positions, and fact nodes built on top of them. Only fact nodes are output.
//! Resolution turns one into a [`FactMatch`]: the span, its text with
//! whitespace collapsed, and the fact payload.
//!
//! ```text
//! Node(dim = Fact) ──┬─ TokenKind::Fact(fact) -> FactMatch
//!                    └─ anything else         -> Error::UnknownFactType
//! Node(other dim)    ──> skipped
//! ```
//!
//! A fact-dimension node without a fact payload can only come from a rule that
//! builds its token by hand with the wrong kind. That is a defect in the rule
//! set, so it fails the scan instead of being skipped.

use crate::fact::FactMatch;
use crate::{Dimension, Error, Node, Result, TokenKind};

pub(crate) fn resolve_node(input: &str, node: &Node) -> Result<Option<FactMatch>> {
    if node.token.dim != Dimension::Fact {
        return Ok(None);
    }

    let fact = match &node.token.kind {
        TokenKind::Fact(fact) => fact.clone(),
        other => return Err(Error::UnknownFactType { rule: node.rule_name, payload: format!("{other:?}") }),
    };

    let start = node.range.start;
    let end = node.range.end.min(input.len());
    let text = collapse_whitespace(input.get(start..end).unwrap_or_default());

    tracing::trace!(rule = node.rule_name, start, end, %text, ?fact, "resolved");

    Ok(Some(FactMatch { start, end, text, fact }))
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fact::Fact;
    use crate::{Range, Token, WordData};

    fn node(dim: Dimension, kind: TokenKind) -> Node {
        Node { range: Range { start: 0, end: 12 }, token: Token { dim, kind }, rule_name: "test", evidence: Vec::new() }
    }

    #[test]
    fn fact_nodes_resolve_to_matches() {
        let n = node(Dimension::Fact, TokenKind::Fact(Fact::Greeting { words: "привет".into() }));
        let m = resolve_node("привет  всем", &n).unwrap().unwrap();
        assert_eq!(m.text, "привет");
        assert_eq!((m.start, m.end), (0, 12));
    }

    #[test]
    fn other_dimensions_are_skipped() {
        let word = WordData { text: "привет".into(), folded: "привет".into() };
        assert!(resolve_node("привет", &node(Dimension::Word, TokenKind::Word(word))).unwrap().is_none());
    }

    #[test]
    fn fact_dimension_without_fact_payload_is_fatal() {
        let word = WordData { text: "привет".into(), folded: "привет".into() };
        let err = resolve_node("привет", &node(Dimension::Fact, TokenKind::Word(word))).unwrap_err();
        assert!(matches!(err, Error::UnknownFactType { rule: "test", .. }));
    }
}
