//! Per-dialog results and their serialized record form.

use crate::dialog::DialogId;
use crate::fact::{Fact, FactKind, FactMatch};
use serde::Serialize;

/// A recorded greeting or farewell: the row and the matched words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub row: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Introduction {
    pub row: usize,
    pub text: String,
    pub first: String,
    pub second: Option<String>,
}

impl Introduction {
    /// First name and surname, each capitalised, concatenated: `ИванПетров`.
    pub fn manager_name(&self) -> String {
        let mut name = capitalize(&self.first);
        if let Some(second) = &self.second {
            name.push_str(&capitalize(second));
        }
        name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyMention {
    pub row: usize,
    pub name: String,
}

/// Events found in one dialog. At most one of each kind: the first match in
/// scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogResult {
    pub dialog_id: DialogId,
    pub greeting: Option<Detection>,
    pub introduce: Option<Introduction>,
    pub company: Option<CompanyMention>,
    pub bye: Option<Detection>,
    pub greet_and_bye: bool,
}

impl DialogResult {
    pub fn new(dialog_id: DialogId) -> Self {
        DialogResult { dialog_id, greeting: None, introduce: None, company: None, bye: None, greet_and_bye: false }
    }

    pub fn has(&self, kind: FactKind) -> bool {
        self.row_of(kind).is_some()
    }

    pub fn row_of(&self, kind: FactKind) -> Option<usize> {
        match kind {
            FactKind::Greeting => self.greeting.as_ref().map(|d| d.row),
            FactKind::Introduce => self.introduce.as_ref().map(|i| i.row),
            FactKind::Company => self.company.as_ref().map(|c| c.row),
            FactKind::Bye => self.bye.as_ref().map(|d| d.row),
        }
    }

    /// Value this dialog contributes to the extended table column of `kind`.
    pub fn column_value(&self, kind: FactKind) -> Option<(usize, String)> {
        match kind {
            FactKind::Greeting => self.greeting.as_ref().map(|d| (d.row, d.text.clone())),
            FactKind::Introduce => self.introduce.as_ref().map(|i| (i.row, i.manager_name())),
            FactKind::Company => self.company.as_ref().map(|c| (c.row, c.name.clone())),
            FactKind::Bye => self.bye.as_ref().map(|d| (d.row, d.text.clone())),
        }
    }

    /// Record `m` found at `row` unless its kind is already recorded.
    /// Returns whether it was recorded.
    pub(crate) fn record(&mut self, row: usize, m: FactMatch) -> bool {
        if self.has(m.kind()) {
            return false;
        }
        match m.fact {
            Fact::Greeting { .. } => self.greeting = Some(Detection { row, text: m.text }),
            Fact::Introduce { first, second } => {
                self.introduce = Some(Introduction { row, text: m.text, first, second });
            }
            Fact::Company { name } => self.company = Some(CompanyMention { row, name }),
            Fact::Bye { .. } => self.bye = Some(Detection { row, text: m.text }),
        }
        true
    }

    pub(crate) fn finalize(mut self) -> Self {
        self.greet_and_bye = self.greeting.is_some() && self.bye.is_some();
        self
    }

    pub fn to_record(&self) -> DialogRecord {
        DialogRecord {
            dlg_id: self.dialog_id.clone(),
            greet_and_bye: self.greet_and_bye,
            greeting_row: self.greeting.as_ref().map(|d| d.row),
            greeting_text: self.greeting.as_ref().map(|d| d.text.clone()),
            introduce_row: self.introduce.as_ref().map(|i| i.row),
            introduce_text: self.introduce.as_ref().map(|i| i.text.clone()),
            manager_name: self.introduce.as_ref().map(Introduction::manager_name),
            company_row: self.company.as_ref().map(|c| c.row),
            company_name: self.company.as_ref().map(|c| c.name.clone()),
            bye_row: self.bye.as_ref().map(|d| d.row),
            bye_text: self.bye.as_ref().map(|d| d.text.clone()),
        }
    }
}

/// Flat, serializable view of a [`DialogResult`]. Events that were not found
/// are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogRecord {
    pub dlg_id: DialogId,
    pub greet_and_bye: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greeting_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduce_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduce_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bye_row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bye_text: Option<String>,
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(fact: Fact, text: &str) -> FactMatch {
        FactMatch { start: 0, end: text.len(), text: text.to_string(), fact }
    }

    #[test]
    fn first_record_of_a_kind_wins() {
        let mut result = DialogResult::new(DialogId::from(1u64));
        assert!(result.record(3, found(Fact::Greeting { words: "привет".into() }, "привет")));
        assert!(!result.record(5, found(Fact::Greeting { words: "здравствуйте".into() }, "здравствуйте")));
        assert_eq!(result.greeting, Some(Detection { row: 3, text: "привет".into() }));
    }

    #[test]
    fn greet_and_bye_needs_both_rows_including_row_zero() {
        let mut result = DialogResult::new(DialogId::from(1u64));
        result.record(0, found(Fact::Greeting { words: "привет".into() }, "привет"));
        assert!(!result.clone().finalize().greet_and_bye);

        result.record(0, found(Fact::Bye { words: "удачи".into(), weekday: None }, "удачи"));
        assert!(result.finalize().greet_and_bye);
    }

    #[test]
    fn manager_name_joins_capitalised_parts() {
        let intro = Introduction {
            row: 1,
            text: "меня зовут Иван Петров".into(),
            first: "иван".into(),
            second: Some("петров".into()),
        };
        assert_eq!(intro.manager_name(), "ИванПетров");
        assert_eq!(Introduction { second: None, ..intro }.manager_name(), "Иван");
    }

    #[test]
    fn record_omits_missing_events() {
        let mut result = DialogResult::new(DialogId::from(2u64));
        result.record(4, found(Fact::Company { name: "Ромашка".into() }, "компания Ромашка"));
        let json = serde_json::to_value(result.finalize().to_record()).unwrap();
        assert_eq!(json, serde_json::json!({
            "dlg_id": 2,
            "greet_and_bye": false,
            "company_row": 4,
            "company_name": "Ромашка",
        }));
    }
}
