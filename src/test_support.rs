//! A keyword-driven engine for exercising the scanner and coordinator without
//! the grammar.

use crate::fact::{Fact, FactMatch, FactSet};
use crate::matcher::MatchEngine;
use crate::{Error, Result};
use std::sync::Mutex;

/// Recognises a few fixed keywords regardless of the requested set and
/// records every call. The text `!unknown` fails with `UnknownFactType`.
#[derive(Debug, Default)]
pub(crate) struct ScriptedEngine {
    calls: Mutex<Vec<(FactSet, String)>>,
}

impl ScriptedEngine {
    pub(crate) fn calls(&self) -> Vec<(FactSet, String)> {
        self.calls.lock().unwrap().clone()
    }
}

const KEYWORDS: &[&str] = &["здравствуйте", "зовут", "компания", "до свидания"];

impl MatchEngine for ScriptedEngine {
    fn find_all(&self, facts: FactSet, text: &str) -> Result<Vec<FactMatch>> {
        self.calls.lock().unwrap().push((facts, text.to_string()));
        if text == "!unknown" {
            return Err(Error::UnknownFactType { rule: "scripted", payload: text.to_string() });
        }

        let mut found = Vec::new();
        for keyword in KEYWORDS {
            let Some(start) = text.find(keyword) else {
                continue;
            };
            let fact = match *keyword {
                "здравствуйте" => Fact::Greeting { words: keyword.to_string() },
                "зовут" => Fact::Introduce { first: "иван".to_string(), second: None },
                "компания" => Fact::Company { name: "ромашка".to_string() },
                _ => Fact::Bye { words: keyword.to_string(), weekday: None },
            };
            found.push(FactMatch { start, end: start + keyword.len(), text: keyword.to_string(), fact });
        }
        found.sort_by_key(|m| m.start);
        Ok(found)
    }
}
