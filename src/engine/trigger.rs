//! Trigger scanning (input pre-classification).
//!
//! This module inspects the raw text and collects the key phrases present in
//! it, so the parser can drop rules that cannot match before saturation.
//!
//! - A single-word phrase is a *stem*: it is present when some word of the
//!   text starts with it ("компани" is present in "компанией").
//! - A multi-word phrase is present when the folded text contains it.
//!
//! This is a heuristic scan. False positives are fine because the parser still
//! has to match full rule patterns; a false negative would lose a match, so
//! phrases are kept short.

use crate::rules::lexicon::fold;
use std::collections::HashSet;

/// Phrases the rules may gate on. Every `required_phrases` /
/// `optional_phrases` entry of a rule must be listed here.
pub(crate) const KEY_PHRASES: &[&str] = &[
    // company
    "компани",
    // farewells with a date or meeting
    "до",
    // introduction lead-ins
    "я",
    "мо",
    "меня",
    "разрешите",
    "вас",
    "это",
];

/// Text characteristics detected from the raw text.
#[derive(Debug, Clone)]
pub struct TriggerInfo {
    pub phrases: HashSet<&'static str>,
}

impl TriggerInfo {
    /// Scan `text` for key phrases.
    pub fn scan(text: &str) -> Self {
        let folded = fold(text);
        let words: Vec<&str> =
            folded.split(|c: char| !c.is_alphanumeric() && c != '-').filter(|w| !w.is_empty()).collect();

        let mut phrases = HashSet::new();
        for phrase in KEY_PHRASES {
            let present = if phrase.contains(' ') {
                folded.contains(phrase)
            } else {
                words.iter().any(|w| w.starts_with(phrase))
            };
            if present {
                phrases.insert(*phrase);
            }
        }

        TriggerInfo { phrases }
    }

    pub fn has(&self, phrase: &str) -> bool {
        self.phrases.contains(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_match_word_prefixes() {
        let info = TriggerInfo::scan("Из компании «Ромашка», до встречи!");
        assert!(info.has("компани"));
        assert!(info.has("до"));
        assert!(!info.has("меня"));
    }

    #[test]
    fn stems_do_not_match_inside_words() {
        let info = TriggerInfo::scan("подождите");
        assert!(!info.has("до"));
    }

    #[test]
    fn every_rule_phrase_is_scanned() {
        for rule in crate::rules::get() {
            for phrase in rule.required_phrases.iter().chain(rule.optional_phrases) {
                assert!(KEY_PHRASES.contains(phrase), "rule '{}' gates on unscanned phrase '{phrase}'", rule.name);
            }
        }
    }
}
