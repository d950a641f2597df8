//! Query record - the immutable input to analysis

use serde::{Deserialize, Serialize};
use sqlsage_core::QueryDialect;
use std::time::Duration;

/// Execution statistics observed on a prior run of the query.
///
/// Supplied by the caller when available; the analyzer folds them into its
/// suggestions (a slow prior run raises a critical performance suggestion).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorExecution {
    /// Wall-clock duration of the prior run
    pub duration: Duration,
    /// Number of rows the prior run returned, if known
    pub row_count: Option<u64>,
}

impl PriorExecution {
    /// Creates prior-execution stats from a duration
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            row_count: None,
        }
    }

    /// Sets the observed row count
    pub fn with_row_count(mut self, rows: u64) -> Self {
        self.row_count = Some(rows);
        self
    }
}

/// A SQL statement submitted for analysis.
///
/// The record is pure input: analysis never mutates it and derives the
/// advisory result from it alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Raw SQL text
    pub sql: String,
    /// Dialect the statement is written in, if known
    pub dialect: Option<QueryDialect>,
    /// Statistics from a prior execution, if available
    pub prior_execution: Option<PriorExecution>,
}

impl QueryRecord {
    /// Creates a record from raw SQL text
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            dialect: None,
            prior_execution: None,
        }
    }

    /// Tags the record with a dialect
    pub fn with_dialect(mut self, dialect: QueryDialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Attaches prior execution statistics
    pub fn with_prior_execution(mut self, prior: PriorExecution) -> Self {
        self.prior_execution = Some(prior);
        self
    }

    /// Returns the dialect, defaulting to generic SQL
    pub fn dialect_or_default(&self) -> QueryDialect {
        self.dialect.unwrap_or_default()
    }
}
