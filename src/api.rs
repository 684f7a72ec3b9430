use crate::coordinator::{Coordinator, ScanRun};
use crate::engine::Grammar;
use crate::fact::{FactMatch, FactSet};
use crate::matcher::MatchEngine;
use crate::merge::{ExtendedTable, extend_table};
use crate::plan::{DEFAULT_FIRST_ROWS, DEFAULT_LAST_ROWS, RulePlan};
use crate::table::Table;
use crate::{Result, TokenKind};
use std::time::Duration;

/// Options that affect a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Manager utterances searched from the start of each dialog.
    pub n_first_rows: usize,
    /// Manager utterances searched from the end of each dialog.
    pub n_last_rows: usize,
    /// Worker count; `None` uses the host's available parallelism.
    pub workers: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Options { n_first_rows: DEFAULT_FIRST_ROWS, n_last_rows: DEFAULT_LAST_ROWS, workers: None }
    }
}

impl Options {
    pub fn plan(&self) -> RulePlan {
        RulePlan::new(self.n_first_rows, self.n_last_rows)
    }
}

/// Result from [`scan`] and [`scan_with`]: the per-dialog results and the
/// input table extended with the event columns.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub run: ScanRun,
    pub extended: ExtendedTable,
}

/// A compact per-pass saturation trace.
#[derive(Debug, Clone)]
pub struct SaturationPass {
    pub pass: usize,
    pub duration: Duration,
    pub produced: usize,
    pub samples: Vec<NodeSummary>,
}

/// A compact node summary used in verbose traces.
#[derive(Debug, Clone)]
pub struct NodeSummary {
    pub start: usize,
    pub end: usize,
    pub rule: String,
    pub preview: String,
}

/// Details returned by [`explain`].
///
/// This is intentionally compact: it's meant for rule debugging without
/// dumping the entire internal state.
#[derive(Debug, Clone)]
pub struct ExplainDetails {
    pub text: String,
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent in saturation (rule application) + per-pass trace.
    pub saturation_total: Duration,
    pub saturation: Vec<SaturationPass>,
    /// Time spent resolving and filtering candidates.
    pub resolve: Duration,
    /// Names of rules that were active for this input.
    pub active_rules: Vec<String>,
    pub matches: Vec<FactMatch>,
}

/// Scan every dialog of `table` with the built-in [`Grammar`] and merge the
/// results into the table.
///
/// # Example
/// ```
/// use callscan::{Options, Role, Table, Utterance, scan};
///
/// let table = Table::from_utterances(vec![
///     Utterance::new(0, 1u64, Role::Manager, "Здравствуйте, меня зовут Иван"),
///     Utterance::new(1, 1u64, Role::Client, "Добрый день"),
///     Utterance::new(2, 1u64, Role::Manager, "До свидания"),
/// ])
/// .unwrap();
///
/// let out = scan(&table, &Options { workers: Some(1), ..Options::default() }).unwrap();
/// assert!(out.run.results[0].greet_and_bye);
/// assert_eq!(out.extended.event(0, callscan::FactKind::Introduce), Some("Иван"));
/// ```
pub fn scan(table: &Table, options: &Options) -> Result<ScanOutput> {
    scan_with(Grammar::new(), table, options)
}

/// Like [`scan`], with a caller-supplied [`MatchEngine`].
pub fn scan_with<E: MatchEngine + Sync>(engine: E, table: &Table, options: &Options) -> Result<ScanOutput> {
    let coordinator = Coordinator::new(engine, options.plan(), options.workers)?;
    let run = coordinator.run(table)?;
    let extended = extend_table(table, &run.results)?;
    Ok(ScanOutput { run, extended })
}

/// Run the built-in grammar on one text and return its saturation trace.
///
/// The default [`scan`] path does not allocate these traces.
pub fn explain(text: &str, facts: FactSet) -> Result<ExplainDetails> {
    let grammar = Grammar::new();
    let parser = grammar.parser(text, facts).keep_nodes();
    let active_rules = parser.active_rule_names().into_iter().map(str::to_string).collect();

    let run = parser.run_with_metrics()?;

    let mut saturation: Vec<SaturationPass> = Vec::new();

    let initial = &run.metrics.saturation.initial_regex;
    saturation.push(SaturationPass {
        pass: 0,
        duration: initial.duration,
        produced: initial.produced,
        samples: initial.nodes.iter().take(8).map(node_to_summary).collect(),
    });

    for (idx, pass) in run.metrics.saturation.iterations.iter().enumerate() {
        saturation.push(SaturationPass {
            pass: idx + 1,
            duration: pass.duration,
            produced: pass.produced,
            samples: pass.nodes.iter().take(8).map(node_to_summary).collect(),
        });
    }

    Ok(ExplainDetails {
        text: text.to_string(),
        total: run.metrics.total,
        saturation_total: run.metrics.saturation.total,
        saturation,
        resolve: run.metrics.resolve,
        active_rules,
        matches: run.matches,
    })
}

fn node_to_summary(node: &crate::Node) -> NodeSummary {
    NodeSummary {
        start: node.range.start,
        end: node.range.end,
        rule: node.rule_name.to_string(),
        preview: format_token_preview(&node.token.kind),
    }
}

fn format_token_preview(kind: &TokenKind) -> String {
    let s = match kind {
        TokenKind::RegexMatch(groups) => groups.first().cloned().unwrap_or_default(),
        TokenKind::Word(w) => w.text.clone(),
        TokenKind::Name(n) => format!("name {}", n.first),
        TokenKind::Surname(s) => format!("surname {}", s.folded),
        TokenKind::Person(p) => match &p.second {
            Some(second) => format!("person {} {}", p.first, second),
            None => format!("person {}", p.first),
        },
        TokenKind::Position(p) => format!("position +{}", p.place_words),
        TokenKind::Fact(fact) => format!("{fact:?}"),
    };
    s.chars().take(80).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{Role, Utterance};
    use crate::fact::FactKind;
    use crate::test_support::ScriptedEngine;

    #[test]
    fn scan_with_merges_results_into_the_table() {
        let table = Table::from_utterances(vec![
            Utterance::new(0, 1u64, Role::Manager, "Здравствуйте"),
            Utterance::new(1, 1u64, Role::Client, "да"),
            Utterance::new(2, 1u64, Role::Manager, "до свидания"),
        ])
        .unwrap();

        let out = scan_with(ScriptedEngine::default(), &table, &Options { workers: Some(2), ..Options::default() })
            .unwrap();

        assert_eq!(out.run.results.len(), 1);
        assert_eq!(out.extended.event(0, FactKind::Greeting), Some("здравствуйте"));
        assert_eq!(out.extended.event(2, FactKind::Bye), Some("до свидания"));
        assert_eq!(out.extended.event(1, FactKind::Bye), None);
    }

    #[test]
    fn explain_includes_metrics_and_rules() {
        let res = explain("меня зовут Иван Петров", FactSet::all()).unwrap();

        assert!(res.saturation_total <= res.total);
        assert!(res.active_rules.iter().any(|r| r == "<lead> <person>"));
        assert!(res.saturation.len() > 1);
        assert!(res.saturation.iter().any(|p| p.samples.iter().any(|s| s.rule == "first name")));
        assert_eq!(res.matches.len(), 1);
        assert_eq!(res.matches[0].kind(), FactKind::Introduce);
    }

    #[test]
    fn explain_with_no_kinds_activates_nothing() {
        let res = explain("здравствуйте", FactSet::empty()).unwrap();
        assert!(res.active_rules.is_empty());
        assert!(res.matches.is_empty());
    }
}
