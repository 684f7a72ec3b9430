//! Utterances and dialogs.

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Speaker role of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Manager,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Client => "client",
        }
    }

    pub fn swapped(self) -> Role {
        match self {
            Role::Manager => Role::Client,
            Role::Client => Role::Manager,
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manager" => Ok(Role::Manager),
            "client" => Ok(Role::Client),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dialog identifier.
///
/// Ids that parse as integers order numerically and before any non-numeric
/// id; the rest order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DialogId(String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        DialogId(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i128> {
        self.0.parse().ok()
    }
}

impl Ord for DialogId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for DialogId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DialogId {
    fn from(s: &str) -> Self {
        DialogId::new(s)
    }
}

impl From<u64> for DialogId {
    fn from(n: u64) -> Self {
        DialogId(n.to_string())
    }
}

/// Integer ids serialize as numbers so the results keep the source's id type.
impl Serialize for DialogId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

/// One row of the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Zero-based ordinal of the row in the input table.
    pub row: usize,
    pub dialog_id: DialogId,
    pub role: Role,
    pub text: String,
}

impl Utterance {
    pub fn new(row: usize, dialog_id: impl Into<DialogId>, role: Role, text: impl Into<String>) -> Self {
        Utterance { row, dialog_id: dialog_id.into(), role, text: text.into() }
    }
}

/// All utterances sharing one dialog id, in row order.
#[derive(Debug, Clone)]
pub struct Dialog<'a> {
    pub id: DialogId,
    pub utterances: Vec<&'a Utterance>,
}

impl<'a> Dialog<'a> {
    /// Manager utterances in row order; the only ones that are scanned.
    pub fn manager_turns(&self) -> Vec<&'a Utterance> {
        self.utterances.iter().copied().filter(|u| u.role == Role::Manager).collect()
    }
}

/// Group utterances into dialogs, listed by first appearance of their id.
///
/// Utterances within a dialog are sorted by row.
pub fn group_dialogs(utterances: &[Utterance]) -> Vec<Dialog<'_>> {
    let mut dialogs: Vec<Dialog<'_>> = Vec::new();
    let mut position: std::collections::HashMap<&DialogId, usize> = std::collections::HashMap::new();

    for utterance in utterances {
        match position.get(&utterance.dialog_id) {
            Some(&idx) => dialogs[idx].utterances.push(utterance),
            None => {
                position.insert(&utterance.dialog_id, dialogs.len());
                dialogs.push(Dialog { id: utterance.dialog_id.clone(), utterances: vec![utterance] });
            }
        }
    }

    for dialog in &mut dialogs {
        dialog.utterances.sort_by_key(|u| u.row);
    }
    dialogs
}

pub(crate) fn parse_role(row: usize, value: &str) -> Result<Role> {
    value.parse().map_err(|_| Error::UnknownRole { row, role: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_ids_order_numerically_first() {
        let mut ids: Vec<DialogId> = ["10", "b", "2", "a", "1"].into_iter().map(DialogId::from).collect();
        ids.sort();
        let ids: Vec<&str> = ids.iter().map(DialogId::as_str).collect();
        assert_eq!(ids, vec!["1", "2", "10", "a", "b"]);
    }

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(" Manager ".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("client".parse::<Role>(), Ok(Role::Client));
        assert!("operator".parse::<Role>().is_err());
        assert!(matches!(parse_role(7, "bot"), Err(Error::UnknownRole { row: 7, .. })));
    }

    #[test]
    fn grouping_keeps_first_appearance_order() {
        let rows = vec![
            Utterance::new(0, 5u64, Role::Client, "алло"),
            Utterance::new(1, 3u64, Role::Manager, "здравствуйте"),
            Utterance::new(2, 5u64, Role::Manager, "добрый день"),
        ];
        let dialogs = group_dialogs(&rows);
        assert_eq!(dialogs.len(), 2);
        assert_eq!(dialogs[0].id, DialogId::from(5u64));
        assert_eq!(dialogs[0].utterances.len(), 2);
        assert_eq!(dialogs[0].manager_turns().len(), 1);
        assert_eq!(dialogs[1].id, DialogId::from(3u64));
    }

    #[test]
    fn integer_ids_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&DialogId::from(4u64)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&DialogId::from("x-1")).unwrap(), "\"x-1\"");
    }
}
