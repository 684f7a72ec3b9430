use crate::fact::Fact;
use crate::rules::lexicon::{is_family, is_function_word, is_name_form, is_place_preposition, looks_like_verb};
use crate::{Token, TokenKind};

pub fn is_word(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Word(_))
}

pub fn is_first_name(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Name(_))
}

pub fn is_surname(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Surname(_))
}

pub fn is_person(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Person(_))
}

pub fn is_position(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Position(_))
}

/// A position that can still take another place-of-work word.
pub fn is_extensible_position(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Position(p) if p.place_words < 3)
}

/// A word that can be part of a place of work: not a name, not a surname,
/// not a function word (place prepositions excepted).
pub fn is_place_word(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Word(w)
        if is_place_preposition(&w.folded)
            || !(is_function_word(&w.folded) || is_name_form(&w.folded) || is_family(&w.folded)))
}

/// A word that can start a company name.
pub fn is_company_word(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Word(w) if !is_function_word(&w.folded))
}

/// A word that can continue a one-word company name: no verbs, no names.
pub fn is_company_tail_word(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Word(w)
        if !(is_function_word(&w.folded) || looks_like_verb(&w.folded) || is_name_form(&w.folded) || is_family(&w.folded)))
}

/// A company fact whose name is a single word.
pub fn is_single_word_company(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Fact(Fact::Company { name }) if !name.contains(' '))
}

pub fn is_introduce(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Fact(Fact::Introduce { .. }))
}

pub fn is_bye(t: &Token) -> bool {
    matches!(&t.kind, TokenKind::Fact(Fact::Bye { .. }))
}
