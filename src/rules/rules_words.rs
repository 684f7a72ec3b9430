//! Support rules: words, names, people and job titles.
//!
//! These never produce facts themselves. They build the `Word`, `Name`,
//! `Person` and `Position` nodes the introduction and company rules combine.

use crate::fact::FactSet;
use crate::rules::helpers::{name, position, surname, word};
use crate::rules::lexicon::{first_name, fold, is_family, is_name_form, surname_gender};
use crate::rules::predicates::{
    is_extensible_position, is_first_name, is_place_word, is_surname, is_word,
};
use crate::{Dimension, NameData, PersonData, PositionData, Rule, SurnameData, Token, TokenKind, WordData};

/// A run of letters, hyphenated parts included ("Санкт-Петербург").
pub fn rule_word() -> Rule {
    rule! {
        name: "word",
        pattern: [re!(r"\p{L}+(?:-\p{L}+)*")],
        facts: FactSet::INTRODUCE | FactSet::COMPANY,
        prod: |tokens: &[Token]| -> Option<WordData> {
            let text = match &tokens.first()?.kind {
                TokenKind::RegexMatch(groups) => groups.first()?.clone(),
                _ => return None,
            };
            let folded = fold(&text);
            Some(WordData { text, folded })
        }
    }
}

/// A known first name in any singular case, reduced to the nominative.
pub fn rule_first_name() -> Rule {
    rule! {
        name: "first name",
        pattern: [pred!(is_word)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Word],
        prod: |tokens: &[Token]| -> Option<NameData> {
            let (first, feminine) = first_name(&word(tokens.first()?)?.folded)?;
            Some(NameData { first: first.to_string(), feminine })
        }
    }
}

pub fn rule_surname() -> Rule {
    rule! {
        name: "surname",
        pattern: [pred!(is_word)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Word],
        prod: |tokens: &[Token]| -> Option<SurnameData> {
            let w = word(tokens.first()?)?;
            if !is_family(&w.folded) || is_name_form(&w.folded) {
                return None;
            }
            Some(SurnameData { folded: w.folded.clone() })
        }
    }
}

pub fn rule_person_name() -> Rule {
    rule! {
        name: "<name>",
        pattern: [pred!(is_first_name)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Name],
        prod: |tokens: &[Token]| -> Option<PersonData> {
            let n = name(tokens.first()?)?;
            Some(PersonData { first: n.first.clone(), second: None })
        }
    }
}

/// "Иван Петров", "Анна Петрова". The surname must agree with the name in
/// gender.
pub fn rule_person_name_surname() -> Rule {
    rule! {
        name: "<name> <surname>",
        pattern: [pred!(is_first_name), re!(r"\s+"), pred!(is_surname)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Name],
        priority: 1,
        prod: |tokens: &[Token]| -> Option<PersonData> {
            let n = name(tokens.first()?)?;
            let s = surname(tokens.get(2)?)?;
            if surname_gender(&s.folded)? != n.feminine {
                return None;
            }
            Some(PersonData { first: n.first.clone(), second: Some(s.folded.clone()) })
        }
    }
}

/// "Петров Иван".
pub fn rule_person_surname_name() -> Rule {
    rule! {
        name: "<surname> <name>",
        pattern: [pred!(is_surname), re!(r"\s+"), pred!(is_first_name)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Name],
        priority: 1,
        prod: |tokens: &[Token]| -> Option<PersonData> {
            let s = surname(tokens.first()?)?;
            let n = name(tokens.get(2)?)?;
            if surname_gender(&s.folded)? != n.feminine {
                return None;
            }
            Some(PersonData { first: n.first.clone(), second: Some(s.folded.clone()) })
        }
    }
}

pub fn rule_position() -> Rule {
    rule! {
        name: "position",
        pattern: [re!(r"(?i)\b(?:главн\p{L}*\s+)?(?:сотрудник|специалист|менеджер|руководител|представител)\p{L}*")],
        facts: FactSet::INTRODUCE,
        prod: |_tokens: &[Token]| -> Option<PositionData> {
            Some(PositionData { place_words: 0 })
        }
    }
}

/// "специалист отдела закупок": up to three place-of-work words after the
/// title.
pub fn rule_position_place() -> Rule {
    rule! {
        name: "<position> <place word>",
        pattern: [pred!(is_extensible_position), re!(r"\s+"), pred!(is_place_word)],
        facts: FactSet::INTRODUCE,
        deps: [Dimension::Position, Dimension::Word],
        prod: |tokens: &[Token]| -> Option<PositionData> {
            let p = position(tokens.first()?)?;
            Some(PositionData { place_words: p.place_words + 1 })
        }
    }
}

pub fn get() -> Vec<Rule> {
    vec![
        rule_word(),
        rule_first_name(),
        rule_surname(),
        rule_person_name(),
        rule_person_name_surname(),
        rule_person_surname_name(),
        rule_position(),
        rule_position_place(),
    ]
}
