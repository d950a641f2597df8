//! Estimated-cost model
//!
//! A deliberately simple analytical model: it does not consult statistics,
//! it prices the structural features that dominate execution cost (scans,
//! join fan-out, subqueries, sorts). Useful for ranking queries against
//! each other, not for predicting wall-clock time.

use crate::QueryStructure;
use serde::{Deserialize, Serialize};

/// Named constants of the cost model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost floor for any statement
    pub base_cost: f64,
    /// Cost per referenced base table (scan cost)
    pub table_scan_cost: f64,
    /// Multiplier applied to 2^join_count (join fan-out grows exponentially)
    pub join_fanout_cost: f64,
    /// Cost per subquery
    pub subquery_cost: f64,
    /// Cost when a GROUP BY is present
    pub group_by_cost: f64,
    /// Cost when an ORDER BY is present
    pub order_by_cost: f64,
    /// Cost per window function
    pub window_cost: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base_cost: 1.0,
            table_scan_cost: 0.5,
            join_fanout_cost: 0.3,
            subquery_cost: 2.0,
            group_by_cost: 1.5,
            order_by_cost: 1.0,
            window_cost: 2.0,
        }
    }
}

impl CostModel {
    /// Creates a model with default constants
    pub fn new() -> Self {
        Self::default()
    }

    /// Estimates the cost of a statement from its structure.
    ///
    /// The result is rounded to two decimals for stable display.
    pub fn estimate(&self, structure: &QueryStructure) -> f64 {
        let mut cost = self.base_cost;

        cost += structure.table_count as f64 * self.table_scan_cost;

        if structure.join_count > 0 {
            // Capped exponent; beyond ~20 joins the ranking no longer matters
            let joins = structure.join_count.min(20) as u32;
            cost += 2_f64.powi(joins as i32) * self.join_fanout_cost;
        }

        cost += structure.subquery_count as f64 * self.subquery_cost;

        if structure.has_group_by {
            cost += self.group_by_cost;
        }
        if structure.has_order_by {
            cost += self.order_by_cost;
        }
        cost += structure.window_function_count as f64 * self.window_cost;

        (cost * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests;
