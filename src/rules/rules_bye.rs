//! Farewells. Adjacent farewell phrases separated only by whitespace merge
//! into one ("всего доброго до свидания").

use crate::fact::{Fact, FactSet};
use crate::rules::helpers::{fact, group, match_words};
use crate::rules::predicates::is_bye;
use crate::{Dimension, Rule, Token};
use chrono::Weekday;

fn weekday_from_stem(stem: &str) -> Option<Weekday> {
    match stem {
        "понедельник" => Some(Weekday::Mon),
        "вторник" => Some(Weekday::Tue),
        "сред" => Some(Weekday::Wed),
        "четверг" => Some(Weekday::Thu),
        "пятниц" => Some(Weekday::Fri),
        "суббот" => Some(Weekday::Sat),
        "воскресен" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn rule_bye_short() -> Rule {
    rule! {
        name: "bye (short)",
        pattern: [
            re!(r"(?i)\b(?:счастливо|удачи|всего\s+(?:хорошего|доброго)|хорошего\s+(?:дня|вечера)|удачного\s+дня)\b")
        ],
        facts: FactSet::BYE,
        prod: |tokens: &[Token]| -> Option<Fact> {
            Some(Fact::Bye { words: match_words(tokens.first()?)?, weekday: None })
        }
    }
}

/// "до свидания", "до встречи", "до понедельника".
pub fn rule_bye_until() -> Rule {
    rule! {
        name: "до <date>",
        pattern: [
            re!(r"(?i)\bдо\s+(понедельник|вторник|сред|четверг|пятниц|суббот|воскресен|скорого|свидан|встреч)\p{L}*")
        ],
        required_phrases: ["до"],
        facts: FactSet::BYE,
        prod: |tokens: &[Token]| -> Option<Fact> {
            let token = tokens.first()?;
            let weekday = group(token, 1).and_then(|stem| weekday_from_stem(&stem));
            Some(Fact::Bye { words: match_words(token)?, weekday })
        }
    }
}

pub fn rule_bye_sequence() -> Rule {
    rule! {
        name: "<bye> <bye>",
        pattern: [pred!(is_bye), re!(r"\s+"), pred!(is_bye)],
        facts: FactSet::BYE,
        deps: [Dimension::Fact],
        prod: |tokens: &[Token]| -> Option<Fact> {
            let (Fact::Bye { words: a, weekday: wa }, Fact::Bye { words: b, weekday: wb }) =
                (fact(tokens.first()?)?, fact(tokens.get(2)?)?)
            else {
                return None;
            };
            Some(Fact::Bye { words: format!("{a} {b}"), weekday: wa.or(*wb) })
        }
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_bye_short(), rule_bye_until(), rule_bye_sequence()]
}
