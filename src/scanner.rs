//! Scanning one dialog.
//!
//! The scanner walks the head window, then the tail window (see `plan.rs`),
//! asking the [`MatchEngine`] for the facts that are still missing. The set of
//! missing facts (the *active set*) starts as the window's candidates and
//! shrinks as facts are recorded:
//!
//! ```text
//! head  active = GREETING|INTRODUCE|COMPANY
//!   m0 "Здравствуйте, меня зовут Иван"  -> greeting, introduce   active = COMPANY
//!   m1 "чем могу помочь"                 -> -                     active = COMPANY
//!   m2 "компания Ромашка"                -> company               active = {}  stop
//! tail  active = BYE
//!   m7 "всего доброго"                   -> bye                   active = {}  stop
//! ```
//!
//! The active set is a local value of each window pass, so one scanner can be
//! reused for any number of dialogs.

use crate::dialog::{Dialog, Utterance};
use crate::fact::FactSet;
use crate::matcher::MatchEngine;
use crate::plan::{RulePlan, Window};
use crate::result::DialogResult;
use crate::Result;
use std::borrow::Cow;
use std::ops::AddAssign;

/// Work counters of a scanner.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub dialogs: usize,
    /// Manager turns handed to the engine.
    pub turns_scanned: usize,
    pub engine_calls: usize,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.dialogs += other.dialogs;
        self.turns_scanned += other.turns_scanned;
        self.engine_calls += other.engine_calls;
    }
}

#[derive(Debug)]
pub struct DialogScanner<E> {
    engine: E,
    plan: RulePlan,
    stats: ScanStats,
}

impl<E: MatchEngine> DialogScanner<E> {
    pub fn new(engine: E, plan: RulePlan) -> Self {
        DialogScanner { engine, plan, stats: ScanStats::default() }
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Scan the manager turns of `dialog` and return its finalized result.
    pub fn scan(&mut self, dialog: &Dialog<'_>) -> Result<DialogResult> {
        let turns = dialog.manager_turns();
        let mut result = DialogResult::new(dialog.id.clone());

        for window in self.plan.windows(&turns) {
            let missing = self.scan_window(&window, &mut result)?;
            tracing::trace!(
                dialog = %dialog.id,
                side = ?window.side,
                turns = window.turns.len(),
                missing = ?missing,
                "window scanned"
            );
        }

        self.stats.dialogs += 1;
        Ok(result.finalize())
    }

    /// Scan one window, recording the first match of each active kind.
    /// Returns the kinds that were not found.
    fn scan_window(&mut self, window: &Window<'_, '_>, result: &mut DialogResult) -> Result<FactSet> {
        let mut active = window.facts;

        for turn in window.turns {
            if active.is_empty() {
                break;
            }
            active = self.scan_turn(turn, active, result)?;
        }

        Ok(active)
    }

    fn scan_turn(&mut self, turn: &Utterance, mut active: FactSet, result: &mut DialogResult) -> Result<FactSet> {
        let text = lowercase_first(&turn.text);
        self.stats.turns_scanned += 1;
        self.stats.engine_calls += 1;

        for m in self.engine.find_all(active, &text)? {
            let kind = m.kind();
            if !active.has(kind) {
                continue;
            }
            tracing::trace!(row = turn.row, kind = kind.name(), text = %m.text, "fact recorded");
            result.record(turn.row, m);
            active.remove(kind.flag());
        }

        Ok(active)
    }
}

/// Lowercase the first character only: sentence-initial capitals should not
/// stop a match, while the rest of the text keeps its case.
pub(crate) fn lowercase_first(text: &str) -> Cow<'_, str> {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => Cow::Owned(first.to_lowercase().chain(chars).collect()),
        _ => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{Role, Utterance, group_dialogs};
    use crate::fact::FactKind;
    use crate::test_support::ScriptedEngine;
    use crate::Error;

    fn dialog_rows(turns: &[(Role, &str)]) -> Vec<Utterance> {
        turns.iter().enumerate().map(|(row, (role, text))| Utterance::new(row, 1u64, *role, *text)).collect()
    }

    fn scan(rows: &[Utterance], plan: RulePlan) -> (DialogResult, ScanStats, ScriptedEngine) {
        let engine = ScriptedEngine::default();
        let dialogs = group_dialogs(rows);
        let mut scanner = DialogScanner::new(&engine, plan);
        let result = scanner.scan(&dialogs[0]).unwrap();
        let stats = scanner.stats();
        (result, stats, engine)
    }

    #[test]
    fn lowercases_only_the_first_character() {
        assert_eq!(lowercase_first("Здравствуйте, Иван"), "здравствуйте, Иван");
        assert_eq!(lowercase_first("уже"), "уже");
        assert_eq!(lowercase_first(""), "");
    }

    #[test]
    fn records_first_greeting_in_scan_order() {
        let rows = dialog_rows(&[
            (Role::Client, "Алло"),
            (Role::Manager, "Да, слушаю"),
            (Role::Manager, "Здравствуйте"),
            (Role::Manager, "здравствуйте ещё раз"),
        ]);
        let (result, _, _) = scan(&rows, RulePlan::default());
        assert_eq!(result.row_of(FactKind::Greeting), Some(2));
    }

    #[test]
    fn two_kinds_in_one_turn_share_the_row() {
        let rows = dialog_rows(&[(Role::Manager, "Здравствуйте, компания Ромашка"), (Role::Manager, "ок")]);
        let (result, _, _) = scan(&rows, RulePlan::default());
        assert_eq!(result.row_of(FactKind::Greeting), Some(0));
        assert_eq!(result.row_of(FactKind::Company), Some(0));
    }

    #[test]
    fn head_stops_once_all_head_facts_are_found() {
        let rows = dialog_rows(&[
            (Role::Manager, "Здравствуйте, меня зовут Иван"),
            (Role::Manager, "компания Ромашка"),
            (Role::Manager, "чем могу помочь"),
            (Role::Manager, "слушаю вас"),
            (Role::Manager, "до свидания"),
        ]);
        let (result, stats, engine) = scan(&rows, RulePlan::new(4, 1));

        // two head calls, then one tail call
        let calls = engine.calls();
        assert_eq!(stats.engine_calls, 3);
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], (FactSet::HEAD, "здравствуйте, меня зовут Иван".to_string()));
        assert_eq!(calls[1].0, FactSet::COMPANY);
        assert_eq!(calls[2], (FactSet::TAIL, "до свидания".to_string()));
        assert!(result.greet_and_bye);
    }

    #[test]
    fn active_set_narrows_between_turns() {
        let rows = dialog_rows(&[
            (Role::Manager, "Здравствуйте"),
            (Role::Manager, "меня зовут Иван"),
            (Role::Manager, "чем помочь"),
        ]);
        let (_, _, engine) = scan(&rows, RulePlan::new(4, 0));
        let sets: Vec<FactSet> = engine.calls().into_iter().map(|(set, _)| set).collect();
        assert_eq!(
            sets,
            vec![FactSet::HEAD, FactSet::INTRODUCE | FactSet::COMPANY, FactSet::COMPANY]
        );
    }

    #[test]
    fn short_dialog_is_scanned_in_both_windows() {
        let rows = dialog_rows(&[(Role::Manager, "Здравствуйте"), (Role::Manager, "до свидания")]);
        let (result, stats, _) = scan(&rows, RulePlan::default());
        assert_eq!(stats.engine_calls, 4);
        assert_eq!(result.row_of(FactKind::Greeting), Some(0));
        assert_eq!(result.row_of(FactKind::Bye), Some(1));
        assert!(result.greet_and_bye);
    }

    #[test]
    fn farewell_without_greeting() {
        let rows = dialog_rows(&[(Role::Manager, "слушаю"), (Role::Manager, "до свидания")]);
        let (result, _, _) = scan(&rows, RulePlan::default());
        assert!(result.greeting.is_none());
        assert_eq!(result.row_of(FactKind::Bye), Some(1));
        assert!(!result.greet_and_bye);
    }

    #[test]
    fn farewell_in_head_window_is_ignored() {
        let rows = dialog_rows(&[(Role::Manager, "до свидания"), (Role::Manager, "a"), (Role::Manager, "b")]);
        let (result, _, _) = scan(&rows, RulePlan::new(1, 1));
        assert!(result.bye.is_none());
    }

    #[test]
    fn dialog_without_manager_turns_is_empty() {
        let rows = dialog_rows(&[(Role::Client, "Здравствуйте"), (Role::Client, "до свидания")]);
        let (result, stats, _) = scan(&rows, RulePlan::default());
        assert_eq!(stats.engine_calls, 0);
        assert_eq!(result, DialogResult::new(1u64.into()));
    }

    #[test]
    fn engine_errors_abort_the_scan() {
        let rows = dialog_rows(&[(Role::Manager, "!unknown")]);
        let engine = ScriptedEngine::default();
        let dialogs = group_dialogs(&rows);
        let err = DialogScanner::new(&engine, RulePlan::default()).scan(&dialogs[0]).unwrap_err();
        assert!(matches!(err, Error::UnknownFactType { .. }));
    }
}
