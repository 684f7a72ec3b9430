//! Which part of a dialog is searched for which facts.
//!
//! ```text
//! manager turns:  m0 m1 m2 m3 m4 ... m(k-1)
//!                 └─ head ─┘         └ tail ┘
//!                 GREETING|INTRODUCE  BYE
//!                 |COMPANY
//! ```
//!
//! Each window is bounded on its own; in a short dialog the two overlap and
//! the same turn is searched twice, once per window.

use crate::dialog::Utterance;
use crate::fact::FactSet;

pub const DEFAULT_FIRST_ROWS: usize = 4;
pub const DEFAULT_LAST_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSide {
    Head,
    Tail,
}

/// A bounded run of manager turns and the facts to look for in it.
#[derive(Debug, Clone, Copy)]
pub struct Window<'d, 'u> {
    pub side: WindowSide,
    pub facts: FactSet,
    pub turns: &'d [&'u Utterance],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulePlan {
    pub n_first_rows: usize,
    pub n_last_rows: usize,
}

impl Default for RulePlan {
    fn default() -> Self {
        RulePlan { n_first_rows: DEFAULT_FIRST_ROWS, n_last_rows: DEFAULT_LAST_ROWS }
    }
}

impl RulePlan {
    pub fn new(n_first_rows: usize, n_last_rows: usize) -> Self {
        RulePlan { n_first_rows, n_last_rows }
    }

    /// Head then tail window over a dialog's manager turns.
    pub fn windows<'d, 'u>(&self, turns: &'d [&'u Utterance]) -> [Window<'d, 'u>; 2] {
        let head_end = self.n_first_rows.min(turns.len());
        let tail_start = turns.len().saturating_sub(self.n_last_rows);
        [
            Window { side: WindowSide::Head, facts: FactSet::HEAD, turns: &turns[..head_end] },
            Window { side: WindowSide::Tail, facts: FactSet::TAIL, turns: &turns[tail_start..] },
        ]
    }
}
