//! Typed facts extracted from manager utterances.

use chrono::Weekday;
use serde::Serialize;

/// The four event kinds a dialog is scanned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactKind {
    Greeting,
    Introduce,
    Company,
    Bye,
}

impl FactKind {
    pub const ALL: [FactKind; 4] = [FactKind::Greeting, FactKind::Introduce, FactKind::Company, FactKind::Bye];

    pub fn name(self) -> &'static str {
        match self {
            FactKind::Greeting => "greeting",
            FactKind::Introduce => "introduce",
            FactKind::Company => "company",
            FactKind::Bye => "bye",
        }
    }

    /// Name of the column this kind fills in the extended table.
    pub fn column(self) -> &'static str {
        match self {
            FactKind::Greeting => "greeting",
            FactKind::Introduce => "manager",
            FactKind::Company => "company",
            FactKind::Bye => "bye",
        }
    }

    pub fn flag(self) -> FactSet {
        match self {
            FactKind::Greeting => FactSet::GREETING,
            FactKind::Introduce => FactSet::INTRODUCE,
            FactKind::Company => FactSet::COMPANY,
            FactKind::Bye => FactSet::BYE,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// A set of fact kinds: the active candidate set of a scan window, or the
    /// kinds a rule contributes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FactSet: u8 {
        const GREETING  = 1 << 0;
        const INTRODUCE = 1 << 1;
        const COMPANY   = 1 << 2;
        const BYE       = 1 << 3;

        /// Kinds searched jointly in the head window.
        const HEAD = Self::GREETING.bits() | Self::INTRODUCE.bits() | Self::COMPANY.bits();
        /// Kinds searched in the tail window.
        const TAIL = Self::BYE.bits();
    }
}

impl FactSet {
    pub fn has(self, kind: FactKind) -> bool {
        self.contains(kind.flag())
    }

    /// Kinds in this set, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = FactKind> {
        FactKind::ALL.into_iter().filter(move |k| self.has(*k))
    }
}

impl From<FactKind> for FactSet {
    fn from(kind: FactKind) -> Self {
        kind.flag()
    }
}

/// Payload of a matched fact.
///
/// Names are stored folded (lowercase, `ё` as `е`) and in the nominative case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fact {
    Greeting { words: String },
    Introduce { first: String, second: Option<String> },
    Company { name: String },
    /// `weekday` is set when the farewell names a day ("до понедельника").
    Bye { words: String, weekday: Option<Weekday> },
}

impl Fact {
    pub fn kind(&self) -> FactKind {
        match self {
            Fact::Greeting { .. } => FactKind::Greeting,
            Fact::Introduce { .. } => FactKind::Introduce,
            Fact::Company { .. } => FactKind::Company,
            Fact::Bye { .. } => FactKind::Bye,
        }
    }
}

/// One match returned by a [`MatchEngine`](crate::MatchEngine).
///
/// `start`/`end` are byte offsets into the scanned text; `text` is that span
/// with whitespace runs collapsed to single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub fact: Fact,
}

impl FactMatch {
    pub fn kind(&self) -> FactKind {
        self.fact.kind()
    }
}
