//! Company names: "компания" in any case, then one or two words.
//!
//! The name is reported as written. Quotes around it are not part of the
//! name: `компания «Ромашка»` yields `Ромашка`.

use crate::fact::{Fact, FactSet};
use crate::rules::helpers::{fact, word};
use crate::rules::predicates::{is_company_tail_word, is_company_word, is_single_word_company};
use crate::{Dimension, Rule, Token};

fn company_name(token: &Token) -> Option<&str> {
    match fact(token)? {
        Fact::Company { name } => Some(name),
        _ => None,
    }
}

pub fn rule_company() -> Rule {
    rule! {
        name: "компания <word>",
        pattern: [
            re!(r"(?i)\bкомпани(?:я|и|ю|ей|ям|ях|ями)\b"),
            re!(r#"\s+["«“„']?"#),
            pred!(is_company_word)
        ],
        required_phrases: ["компани"],
        facts: FactSet::COMPANY,
        deps: [Dimension::Word],
        prod: |tokens: &[Token]| -> Option<Fact> {
            Some(Fact::Company { name: word(tokens.get(2)?)?.text.clone() })
        }
    }
}

/// "компания Зеленый Сад".
pub fn rule_company_two_words() -> Rule {
    rule! {
        name: "<company> <word>",
        pattern: [pred!(is_single_word_company), re!(r"\s+"), pred!(is_company_tail_word)],
        required_phrases: ["компани"],
        facts: FactSet::COMPANY,
        deps: [Dimension::Fact, Dimension::Word],
        prod: |tokens: &[Token]| -> Option<Fact> {
            let first = company_name(tokens.first()?)?;
            let second = &word(tokens.get(2)?)?.text;
            Some(Fact::Company { name: format!("{first} {second}") })
        }
    }
}

/// "компания Мать и Дитя".
pub fn rule_company_conjunction() -> Rule {
    rule! {
        name: "<company> и <word>",
        pattern: [pred!(is_single_word_company), re!(r"\s+и\s+"), pred!(is_company_word)],
        required_phrases: ["компани"],
        facts: FactSet::COMPANY,
        deps: [Dimension::Fact, Dimension::Word],
        priority: 1,
        prod: |tokens: &[Token]| -> Option<Fact> {
            let first = company_name(tokens.first()?)?;
            let second = &word(tokens.get(2)?)?.text;
            Some(Fact::Company { name: format!("{first} и {second}") })
        }
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_company(), rule_company_two_words(), rule_company_conjunction()]
}
