//! Query benchmarking
//!
//! Runs a statement repeatedly against a borrowed connection and reports
//! wall-clock statistics. The connection is pinged before the first run so
//! an unavailable database fails fast with zero executions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlsage_core::{Connection, Result, SqlsageError};
use std::time::{Duration, Instant};

/// Minimal round-trip statement used for the pre-flight ping
const PING_QUERY: &str = "SELECT 1";

/// Wall-clock statistics from repeated executions of one statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// When the benchmark started
    pub started_at: DateTime<Utc>,
    /// Number of executions performed
    pub iterations: u32,
    /// Per-run wall-clock durations, in execution order
    pub durations: Vec<Duration>,
    /// Rows returned by the first run, if any run happened
    pub row_count: Option<u64>,
}

impl BenchmarkResult {
    /// Mean duration across runs, `None` for a vacuous result
    pub fn mean(&self) -> Option<Duration> {
        if self.durations.is_empty() {
            return None;
        }
        let total: Duration = self.durations.iter().sum();
        Some(total / self.durations.len() as u32)
    }

    /// Fastest run, `None` for a vacuous result
    pub fn min(&self) -> Option<Duration> {
        self.durations.iter().min().copied()
    }

    /// Slowest run, `None` for a vacuous result
    pub fn max(&self) -> Option<Duration> {
        self.durations.iter().max().copied()
    }

    /// Sample standard deviation of the run durations.
    ///
    /// `None` for a vacuous result; zero when only one run happened.
    pub fn std_dev(&self) -> Option<Duration> {
        if self.durations.is_empty() {
            return None;
        }
        if self.durations.len() == 1 {
            return Some(Duration::ZERO);
        }

        let n = self.durations.len() as f64;
        let mean = self
            .durations
            .iter()
            .map(|d| d.as_secs_f64())
            .sum::<f64>()
            / n;
        let variance = self
            .durations
            .iter()
            .map(|d| {
                let diff = d.as_secs_f64() - mean;
                diff * diff
            })
            .sum::<f64>()
            / (n - 1.0);

        Some(Duration::from_secs_f64(variance.sqrt()))
    }

    /// Returns true when no executions were performed
    pub fn is_vacuous(&self) -> bool {
        self.durations.is_empty()
    }
}

/// Benchmarks a statement over a borrowed connection.
///
/// Executions are sequential. `iterations == 0` yields a vacuous result.
/// A dead connection is reported as a dependency error before any run; a
/// failure mid-run aborts the benchmark without partial statistics.
pub async fn benchmark(
    conn: &dyn Connection,
    sql: &str,
    iterations: u32,
) -> Result<BenchmarkResult> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SqlsageError::InvalidQuery(
            "query text is empty".to_string(),
        ));
    }

    let started_at = Utc::now();
    if iterations == 0 {
        return Ok(BenchmarkResult {
            started_at,
            iterations: 0,
            durations: Vec::new(),
            row_count: None,
        });
    }

    if conn.is_closed() {
        return Err(SqlsageError::Connection(
            "connection is closed".to_string(),
        ));
    }
    conn.query(PING_QUERY, &[]).await.map_err(|e| {
        SqlsageError::Connection(format!("database unavailable: {}", e))
    })?;

    tracing::debug!(
        driver = conn.driver_name(),
        iterations,
        "starting benchmark"
    );

    let mut durations = Vec::with_capacity(iterations as usize);
    let mut row_count = None;

    for run in 0..iterations {
        let start = Instant::now();
        let result = conn.query(sql, &[]).await?;
        let elapsed = start.elapsed();

        if row_count.is_none() {
            row_count = Some(result.row_count() as u64);
        }
        tracing::trace!(run, elapsed_ms = elapsed.as_millis() as u64, "benchmark run");
        durations.push(elapsed);
    }

    Ok(BenchmarkResult {
        started_at,
        iterations,
        durations,
        row_count,
    })
}
