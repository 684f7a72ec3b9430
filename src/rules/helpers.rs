use crate::fact::Fact;
use crate::rules::lexicon::fold;
use crate::{NameData, PersonData, PositionData, SurnameData, Token, TokenKind, WordData};

/// Return the whole regex match from `token`, folded and with whitespace runs
/// collapsed.
pub fn match_words(token: &Token) -> Option<String> {
    match &token.kind {
        TokenKind::RegexMatch(groups) => {
            groups.first().map(|m| fold(m).split_whitespace().collect::<Vec<_>>().join(" "))
        }
        _ => None,
    }
}

/// Return capture group `idx` of a regex token, folded.
pub fn group(token: &Token, idx: usize) -> Option<String> {
    match &token.kind {
        TokenKind::RegexMatch(groups) => groups.get(idx).map(|g| fold(g)),
        _ => None,
    }
}

pub fn word(token: &Token) -> Option<&WordData> {
    match &token.kind {
        TokenKind::Word(w) => Some(w),
        _ => None,
    }
}

pub fn name(token: &Token) -> Option<&NameData> {
    match &token.kind {
        TokenKind::Name(n) => Some(n),
        _ => None,
    }
}

pub fn surname(token: &Token) -> Option<&SurnameData> {
    match &token.kind {
        TokenKind::Surname(s) => Some(s),
        _ => None,
    }
}

pub fn person(token: &Token) -> Option<&PersonData> {
    match &token.kind {
        TokenKind::Person(p) => Some(p),
        _ => None,
    }
}

pub fn position(token: &Token) -> Option<&PositionData> {
    match &token.kind {
        TokenKind::Position(p) => Some(p),
        _ => None,
    }
}

pub fn fact(token: &Token) -> Option<&Fact> {
    match &token.kind {
        TokenKind::Fact(f) => Some(f),
        _ => None,
    }
}

/// The introduction carried by a person token.
pub fn introduce_from(person: &PersonData) -> Fact {
    Fact::Introduce { first: person.first.clone(), second: person.second.clone() }
}
