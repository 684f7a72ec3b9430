//! The built-in Russian rule dictionary.
//!
//! Rules are grouped by the fact they produce; `rules_words` holds the support
//! rules (words, names, people, job titles) the others build on.

pub(crate) mod helpers;
pub(crate) mod lexicon;
pub(crate) mod predicates;
mod rules_bye;
mod rules_company;
mod rules_greeting;
mod rules_introduce;
mod rules_words;


use crate::Rule;

/// Every rule of the dictionary.
pub(crate) fn get() -> Vec<Rule> {
    let mut rules = rules_words::get();
    rules.extend(rules_greeting::get());
    rules.extend(rules_introduce::get());
    rules.extend(rules_company::get());
    rules.extend(rules_bye::get());
    rules
}
