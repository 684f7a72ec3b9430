//! Fan-out of dialog groups to a worker pool.
//!
//! ```text
//! table.dialogs() ── partition(workers) ──┬─ group 0 ─ DialogScanner ─┐
//!                                         ├─ group 1 ─ DialogScanner ─┤ channel
//!                                         └─ group n ─ DialogScanner ─┘   │
//!                                                                         v
//!                                             flat results, sorted by dialog id
//! ```
//!
//! Each pool task owns its scanner and reads only its own dialogs; the engine
//! is shared by reference. Batches arrive in completion order, so the gathered
//! list is sorted before it is returned. Any failed group fails the run.

use crate::dialog::Dialog;
use crate::matcher::MatchEngine;
use crate::partition::partition;
use crate::plan::RulePlan;
use crate::result::DialogResult;
use crate::scanner::{DialogScanner, ScanStats};
use crate::table::Table;
use crate::{Error, Result};
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Results of a full scan, sorted by dialog id.
#[derive(Debug, Clone)]
pub struct ScanRun {
    pub results: Vec<DialogResult>,
    pub stats: ScanStats,
    pub workers: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Coordinator<E> {
    engine: E,
    plan: RulePlan,
    workers: usize,
}

/// Worker count to use when none is given: the host's available parallelism.
pub fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

impl<E: MatchEngine + Sync> Coordinator<E> {
    pub fn new(engine: E, plan: RulePlan, workers: Option<usize>) -> Result<Self> {
        let workers = workers.unwrap_or_else(default_workers);
        if workers == 0 {
            return Err(Error::NoWorkers);
        }
        Ok(Coordinator { engine, plan, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn run(&self, table: &Table) -> Result<ScanRun> {
        let start = Instant::now();
        let dialogs = table.dialogs();
        let groups = partition(&dialogs, self.workers);
        tracing::debug!(dialogs = dialogs.len(), groups = groups.len(), workers = self.workers, "scan started");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("callscan-worker-{i}"))
            .build()?;

        let (tx, rx) = mpsc::channel();
        pool.scope(|scope| {
            for (idx, group) in groups.iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    // The receiver outlives the scope, so sending cannot fail.
                    let _ = tx.send(self.scan_group(idx, group));
                });
            }
        });
        drop(tx);

        let mut results = Vec::with_capacity(dialogs.len());
        let mut stats = ScanStats::default();
        for batch in rx {
            let (batch, batch_stats) = batch?;
            results.extend(batch);
            stats += batch_stats;
        }
        results.sort_by(|a, b| a.dialog_id.cmp(&b.dialog_id));

        let elapsed = start.elapsed();
        tracing::debug!(
            dialogs = stats.dialogs,
            turns = stats.turns_scanned,
            engine_calls = stats.engine_calls,
            ?elapsed,
            "scan finished"
        );

        Ok(ScanRun { results, stats, workers: self.workers, elapsed })
    }

    fn scan_group(&self, idx: usize, group: &[Dialog<'_>]) -> Result<(Vec<DialogResult>, ScanStats)> {
        let mut scanner = DialogScanner::new(&self.engine, self.plan);
        let mut results = Vec::with_capacity(group.len());
        for dialog in group {
            results.push(scanner.scan(dialog)?);
        }
        tracing::debug!(group = idx, dialogs = group.len(), "group finished");
        Ok((results, scanner.stats()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::{DialogId, Role, Utterance};
    use crate::fact::FactKind;
    use crate::test_support::ScriptedEngine;

    fn table(dialogs: usize) -> Table {
        let mut rows = Vec::new();
        // descending ids, so the output order differs from the input order
        for d in (0..dialogs as u64).rev() {
            rows.push(Utterance::new(0, d, Role::Client, "алло"));
            rows.push(Utterance::new(0, d, Role::Manager, "Здравствуйте"));
            if d % 2 == 0 {
                rows.push(Utterance::new(0, d, Role::Manager, "до свидания"));
            }
        }
        Table::from_utterances(rows).unwrap()
    }

    #[test]
    fn results_are_sorted_by_dialog_id() {
        let engine = ScriptedEngine::default();
        let run = Coordinator::new(&engine, RulePlan::default(), Some(3)).unwrap().run(&table(7)).unwrap();
        let ids: Vec<DialogId> = run.results.iter().map(|r| r.dialog_id.clone()).collect();
        let expected: Vec<DialogId> = (0..7u64).map(DialogId::from).collect();
        assert_eq!(ids, expected);
        assert_eq!(run.stats.dialogs, 7);
    }

    #[test]
    fn every_dialog_is_scanned_once_for_any_worker_count() {
        let engine = ScriptedEngine::default();
        let table = table(9);
        let baseline = Coordinator::new(&engine, RulePlan::default(), Some(1)).unwrap().run(&table).unwrap();

        for workers in 1..=12 {
            let run = Coordinator::new(&engine, RulePlan::default(), Some(workers)).unwrap().run(&table).unwrap();
            assert_eq!(run.results, baseline.results, "workers={workers}");
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let engine = ScriptedEngine::default();
        let table = table(5);
        let coordinator = Coordinator::new(&engine, RulePlan::default(), Some(4)).unwrap();
        let first = coordinator.run(&table).unwrap();
        let second = coordinator.run(&table).unwrap();
        assert_eq!(first.results, second.results);
        assert!(first.results.iter().all(|r| r.greet_and_bye == (r.has(FactKind::Greeting) && r.has(FactKind::Bye))));
    }

    #[test]
    fn one_failing_dialog_fails_the_run() {
        let engine = ScriptedEngine::default();
        let table = Table::from_utterances(vec![
            Utterance::new(0, 1u64, Role::Manager, "Здравствуйте"),
            Utterance::new(1, 2u64, Role::Manager, "!unknown"),
            Utterance::new(2, 3u64, Role::Manager, "до свидания"),
        ])
        .unwrap();
        let err = Coordinator::new(&engine, RulePlan::default(), Some(2)).unwrap().run(&table).unwrap_err();
        assert!(matches!(err, Error::UnknownFactType { .. }));
    }

    #[test]
    fn zero_workers_is_rejected() {
        let engine = ScriptedEngine::default();
        assert!(matches!(Coordinator::new(&engine, RulePlan::default(), Some(0)), Err(Error::NoWorkers)));
        assert!(Coordinator::new(&engine, RulePlan::default(), None).unwrap().workers() >= 1);
    }
}
