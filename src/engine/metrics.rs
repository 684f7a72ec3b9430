//! Engine run metrics.
//!
//! - `Parser::run` for normal operation (used by the scanner).
//! - `Parser::run_with_metrics` for `explain` and debugging: timings per pass
//!   and, when tracing is enabled on the parser, the nodes each pass produced.
//!
//! Fields prefixed with `_` are collected but not surfaced in reports yet.

use crate::Node;
use crate::fact::FactMatch;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Parser::run_with_metrics`](super::Parser::run_with_metrics).
    pub total: Duration,
    pub saturation: SaturationMetrics,
    /// Time spent resolving nodes into matches after saturation.
    pub resolve: Duration,
}

/// Timings for the saturation phase.
#[derive(Debug, Default, Clone)]
pub struct SaturationMetrics {
    /// Total elapsed time for saturation (initial regex pass + iterations).
    pub total: Duration,
    /// Metrics for the initial regex-only pass.
    pub initial_regex: PassMetrics,
    /// Metrics for each subsequent saturation iteration.
    pub iterations: Vec<PassMetrics>,
}

/// Timing (and node discovery counts) for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    pub duration: Duration,
    /// Number of new nodes added to the stash during the pass.
    pub produced: usize,
    /// New nodes produced in this pass (only kept when tracing).
    pub nodes: Vec<Node>,
    /// Number of rules considered (attempted) during this pass.
    pub _rules_considered: usize,
    /// Number of rules that had at least one first-pattern match.
    pub _rules_seeded: usize,
}

/// Parser output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub matches: Vec<FactMatch>,
    pub metrics: RunMetrics,
}
