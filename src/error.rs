//! Error types for loading, scanning and merging.

use crate::dialog::DialogId;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A rule produced a node in the fact dimension whose payload is not one of
    /// the four known facts. The rule set and the classification disagree.
    #[error("rule '{rule}' produced an unknown fact payload: {payload}")]
    UnknownFactType { rule: &'static str, payload: String },

    #[error("row {row} has two '{column}' values (dialogs {first} and {second})")]
    MergeKeyCollision { column: &'static str, row: usize, first: DialogId, second: DialogId },

    #[error("row {row} is outside the table ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("input table is missing required column '{0}'")]
    MissingColumn(String),

    #[error("input table has no rows")]
    EmptyTable,

    #[error("row {row}: unknown role '{role}' (expected 'manager' or 'client')")]
    UnknownRole { row: usize, role: String },

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
