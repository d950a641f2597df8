//! Tests for the cost model

use super::*;
use crate::QueryStructure;
use pretty_assertions::assert_eq;
use sqlsage_core::QueryDialect;

fn estimate(sql: &str) -> f64 {
    let structure = QueryStructure::extract(sql, QueryDialect::Generic).expect("should parse");
    CostModel::new().estimate(&structure)
}

#[test]
fn test_single_table_baseline() {
    // base 1.0 + one table scan 0.5
    assert_eq!(estimate("SELECT id FROM orders"), 1.5);
}

#[test]
fn test_join_fanout_is_exponential() {
    // two tables (1.0) + 2^1 * 0.3
    let one_join = estimate("SELECT a.id FROM a JOIN b ON a.id = b.id");
    // three tables (1.5) + 2^2 * 0.3
    let two_joins =
        estimate("SELECT a.id FROM a JOIN b ON a.id = b.id JOIN c ON b.id = c.id");
    assert_eq!(one_join, 2.6);
    assert_eq!(two_joins, 3.7);
    assert!(two_joins - one_join > 1.0);
}

#[test]
fn test_sorting_and_grouping_add_cost() {
    let plain = estimate("SELECT id FROM orders");
    let sorted = estimate("SELECT id FROM orders ORDER BY id");
    let grouped = estimate("SELECT status, COUNT(*) FROM orders GROUP BY status");
    assert_eq!(sorted, plain + 1.0);
    assert_eq!(grouped, plain + 1.5);
}

#[test]
fn test_subquery_cost() {
    let cost = estimate("SELECT id FROM orders WHERE id IN (SELECT order_id FROM refunds)");
    // base 1.0 + 2 tables 1.0 + subquery 2.0
    assert_eq!(cost, 4.0);
}

#[test]
fn test_custom_model() {
    let structure =
        QueryStructure::extract("SELECT id FROM orders", QueryDialect::Generic).unwrap();
    let model = CostModel {
        base_cost: 0.0,
        table_scan_cost: 10.0,
        ..CostModel::default()
    };
    assert_eq!(model.estimate(&structure), 10.0);
}
