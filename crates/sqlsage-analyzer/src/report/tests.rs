//! Tests for report rendering

use super::*;
use crate::{PriorExecution, QueryAdvisor, QueryRecord};
use std::time::Duration;

fn analyze(sql: &str) -> AdvisoryResult {
    QueryAdvisor::new()
        .analyze(&QueryRecord::new(sql))
        .expect("analysis should succeed")
}

#[test]
fn test_report_contains_assessment() {
    let report = render_report(&analyze("SELECT * FROM orders"));
    assert!(report.contains("# Query Analysis Report"));
    assert!(report.contains("Complexity: Simple"));
    assert!(report.contains("Performance score:"));
    assert!(report.contains("Estimated cost:"));
}

#[test]
fn test_report_lists_suggestions_by_impact() {
    let report = render_report(&analyze("SELECT * FROM orders"));
    assert!(report.contains("## Suggestions"));
    // unbounded result (high) must come before SELECT * (medium)
    let high = report.find("Filtering").unwrap();
    let medium = report.find("Column selection").unwrap();
    assert!(high < medium);
}

#[test]
fn test_clean_query_report() {
    let report = render_report(&analyze("SELECT id FROM orders WHERE id = 1 LIMIT 10"));
    assert!(report.contains("No optimization issues found."));
}

#[test]
fn test_execution_metrics_section() {
    let record = QueryRecord::new("SELECT id FROM orders WHERE id = 1 LIMIT 10")
        .with_prior_execution(
            PriorExecution::new(Duration::from_millis(123)).with_row_count(150),
        );
    let analysis = QueryAdvisor::new().analyze(&record).unwrap();
    let report = render_report(&analysis);

    assert!(report.contains("## Execution Metrics"));
    assert!(report.contains("0.123 seconds"));
    assert!(report.contains("Rows returned: 150"));
}

#[test]
fn test_unclassified_report() {
    let report = render_report(&analyze("SELEKT broken FORM"));
    assert!(report.contains("Complexity: unclassified"));
    assert!(report.contains("could not be parsed"));
}
