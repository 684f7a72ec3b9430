use crate::fact::{Fact, FactSet};
use crate::rules::helpers::match_words;
use crate::{Rule, Token};

/// "здравствуйте", "добрый день", "приветствую вас", "вам звонит".
pub fn rule_greeting() -> Rule {
    rule! {
        name: "greeting",
        pattern: [
            re!(r"(?i)\b(?:здравствуй(?:те)?|добр(?:ый|ого)\s+д(?:ень|ня)|добр(?:ое|ого)\s+утр(?:о|а)|добр(?:ый|ого)\s+вечер(?:а)?|приветствую(?:\s+вас)?|привет|вам\s+звонит)\b")
        ],
        facts: FactSet::GREETING,
        prod: |tokens: &[Token]| -> Option<Fact> {
            Some(Fact::Greeting { words: match_words(tokens.first()?)? })
        }
    }
}

pub fn get() -> Vec<Rule> {
    vec![rule_greeting()]
}
