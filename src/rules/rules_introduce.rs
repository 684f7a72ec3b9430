//! Manager introductions: a lead-in phrase, an optional job title, then the
//! person.
//!
//! ```text
//! меня зовут | Иван Петров
//! я          | менеджер отдела продаж | Анна
//! это        | Петров Иван            | (зовут)
//! ```

use crate::fact::{Fact, FactSet};
use crate::rules::helpers::{fact, introduce_from, person};
use crate::rules::predicates::{is_introduce, is_person, is_position};
use crate::{Dimension, Rule, Token};

pub fn rule_introduce() -> Rule {
    rule! {
        name: "<lead> <person>",
        pattern: [
            re!(r"(?i)\b(?:я|мо[её]\s+имя|меня\s+зовут|разрешите\s+представиться|вас\s+беспокоит|это)[\s,]+"),
            pred!(is_person)
        ],
        optional_phrases: ["я", "мо", "меня", "разрешите", "вас", "это"],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Person],
        prod: |tokens: &[Token]| -> Option<Fact> {
            Some(introduce_from(person(tokens.get(1)?)?))
        }
    }
}

/// "я менеджер компании Ромашка Иван Петров".
pub fn rule_introduce_position() -> Rule {
    rule! {
        name: "<lead> <position> <person>",
        pattern: [
            re!(r"(?i)\b(?:я|мо[её]\s+имя|меня\s+зовут|разрешите\s+представиться|вас\s+беспокоит|это)[\s,]+"),
            pred!(is_position),
            re!(r"[\s,]+"),
            pred!(is_person)
        ],
        optional_phrases: ["я", "мо", "меня", "разрешите", "вас", "это"],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Position, Dimension::Person],
        priority: 1,
        prod: |tokens: &[Token]| -> Option<Fact> {
            Some(introduce_from(person(tokens.get(3)?)?))
        }
    }
}

/// "я Иван зовут": a trailing "зовут"/"звать" extends the match.
pub fn rule_introduce_trailing_verb() -> Rule {
    rule! {
        name: "<introduce> зовут",
        pattern: [pred!(is_introduce), re!(r"(?i)\s+(?:зовут|звать)\b")],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Fact],
        prod: |tokens: &[Token]| -> Option<Fact> {
            fact(tokens.first()?).cloned()
        }
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_introduce(), rule_introduce_position(), rule_introduce_trailing_verb()]
}
