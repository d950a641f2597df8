//! Tests for the query advisor

use super::*;
use crate::{PriorExecution, QueryRecord};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn analyze(sql: &str) -> AdvisoryResult {
    QueryAdvisor::new()
        .analyze(&QueryRecord::new(sql))
        .expect("analysis should succeed")
}

mod impact_level_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ordering() {
        assert!(ImpactLevel::Low < ImpactLevel::Medium);
        assert!(ImpactLevel::High < ImpactLevel::Critical);
    }

    #[test]
    fn test_is_critical() {
        assert!(ImpactLevel::Critical.is_critical());
        assert!(!ImpactLevel::High.is_critical());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&ImpactLevel::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}

mod validation_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_input_is_validation_error() {
        let err = QueryAdvisor::new()
            .analyze(&QueryRecord::new(""))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_whitespace_input_is_validation_error() {
        let err = QueryAdvisor::new()
            .analyze(&QueryRecord::new("   \n\t  "))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_malformed_sql_degrades_to_unclassified() {
        let result = analyze("SELEKT broken FORM somewhere");
        assert!(!result.is_classified());
        assert_eq!(result.complexity, None);
        assert_eq!(result.performance_score, None);
        assert_eq!(result.estimated_cost, None);
        assert!(result.suggestions.is_empty());
        assert!(result.summary.contains("Unable to classify"));
    }
}

mod rule_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_star_suggestion() {
        let result = analyze("SELECT * FROM orders WHERE id = 1 LIMIT 5");
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::ColumnSelection)
        );
    }

    #[test]
    fn test_unbounded_statement_suggestion() {
        let result = analyze("SELECT id FROM orders");
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::Filtering)
        );
    }

    #[test]
    fn test_bounded_by_limit_is_not_flagged() {
        let result = analyze("SELECT id FROM orders LIMIT 10");
        assert!(
            result
                .suggestions
                .iter()
                .all(|s| s.category != SuggestionCategory::Filtering)
        );
    }

    #[test]
    fn test_order_by_without_limit_suggestion() {
        let result = analyze("SELECT id FROM orders WHERE id > 5 ORDER BY id");
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::ResultLimiting)
        );
    }

    #[test]
    fn test_join_emits_index_advisory() {
        let result = analyze(
            "SELECT o.id FROM orders o JOIN customers c ON o.customer_id = c.id \
             WHERE c.active = 1 LIMIT 10",
        );
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::Indexing)
        );
    }

    #[test]
    fn test_in_subquery_rewrite_suggestion() {
        let result = analyze(
            "SELECT name FROM customers WHERE id IN (SELECT customer_id FROM orders) LIMIT 10",
        );
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::SubqueryRewrite)
        );
    }

    #[test]
    fn test_deep_nesting_escalates_tier() {
        let result = analyze(
            "SELECT name FROM customers WHERE id IN \
             (SELECT customer_id FROM orders WHERE id IN \
              (SELECT order_id FROM payments WHERE id IN \
               (SELECT payment_id FROM audits)))",
        );
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::Nesting)
        );
        // 3 subqueries x 3 points = Complex, escalated one tier by depth
        assert_eq!(result.complexity, Some(ComplexityTier::VeryComplex));
    }

    #[test]
    fn test_slow_prior_execution_is_critical() {
        let record = QueryRecord::new("SELECT id FROM orders WHERE id = 1 LIMIT 5")
            .with_prior_execution(PriorExecution::new(Duration::from_millis(2500)));
        let result = QueryAdvisor::new().analyze(&record).unwrap();

        assert!(result.has_critical_issues());
        // 2.5s x 10 points/s = 25
        assert_eq!(result.performance_score, Some(75));
    }

    #[test]
    fn test_slow_query_penalty_is_capped() {
        let record = QueryRecord::new("SELECT id FROM orders WHERE id = 1 LIMIT 5")
            .with_prior_execution(PriorExecution::new(Duration::from_secs(60)));
        let result = QueryAdvisor::new().analyze(&record).unwrap();
        assert_eq!(result.performance_score, Some(70));
    }

    #[test]
    fn test_fast_prior_execution_not_flagged() {
        let record = QueryRecord::new("SELECT id FROM orders WHERE id = 1 LIMIT 5")
            .with_prior_execution(PriorExecution::new(Duration::from_millis(120)));
        let result = QueryAdvisor::new().analyze(&record).unwrap();
        assert!(!result.has_critical_issues());
        assert_eq!(result.performance_score, Some(100));
    }
}

mod scoring_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_query_scores_100_with_no_suggestions() {
        let result = analyze("SELECT id FROM orders WHERE id = 1 LIMIT 10");
        assert_eq!(result.performance_score, Some(100));
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_score_below_100_implies_suggestions() {
        let result = analyze("SELECT * FROM orders");
        assert!(result.performance_score.unwrap() < 100);
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_select_star_on_single_table() {
        let result = analyze("SELECT * FROM orders");
        assert_eq!(result.complexity, Some(ComplexityTier::Simple));
        assert!(result.performance_score.unwrap() < 100);
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::ColumnSelection)
        );
    }

    #[test]
    fn test_anti_pattern_superset_scores_no_higher() {
        // A carries every anti-pattern of B plus SELECT *
        let b = analyze("SELECT id FROM orders ORDER BY id");
        let a = analyze("SELECT * FROM orders ORDER BY id");
        assert!(a.performance_score.unwrap() <= b.performance_score.unwrap());
    }

    #[test]
    fn test_score_saturates_at_zero() {
        let config = AdvisorConfig {
            select_star_penalty: 90,
            unbounded_result_penalty: 90,
            ..AdvisorConfig::default()
        };
        let result = QueryAdvisor::with_config(config)
            .analyze(&QueryRecord::new("SELECT * FROM orders"))
            .unwrap();
        assert_eq!(result.performance_score, Some(0));
    }

    #[test]
    fn test_sorted_suggestions_critical_first() {
        let record = QueryRecord::new("SELECT * FROM orders")
            .with_prior_execution(PriorExecution::new(Duration::from_secs(2)));
        let result = QueryAdvisor::new().analyze(&record).unwrap();
        let sorted = result.sorted_suggestions();
        assert!(sorted.len() >= 3);
        assert_eq!(sorted[0].impact, ImpactLevel::Critical);
        for pair in sorted.windows(2) {
            assert!(pair[0].impact >= pair[1].impact);
        }
    }

    #[test]
    fn test_summary_mentions_score() {
        let result = analyze("SELECT * FROM orders");
        assert!(result.summary.contains("/100"));
    }
}

mod config_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.select_star_penalty, 15);
        assert_eq!(config.unbounded_result_penalty, 25);
        assert_eq!(config.join_fanout_threshold, 2);
        assert_eq!(config.slow_query_threshold, Duration::from_secs(1));
    }

    #[test]
    fn test_builders() {
        let config = AdvisorConfig::new()
            .with_join_fanout_threshold(4)
            .with_nesting_depth_threshold(3)
            .with_slow_query_threshold(Duration::from_millis(500));
        assert_eq!(config.join_fanout_threshold, 4);
        assert_eq!(config.nesting_depth_threshold, 3);
        assert_eq!(config.slow_query_threshold, Duration::from_millis(500));
    }

    #[test]
    fn test_join_fanout_penalty_scales() {
        // 4 joins, threshold 2: two excess joins at 5 points each,
        // plus the index advisory (10): other rules silent
        let result = analyze(
            "SELECT a.id FROM a \
             JOIN b ON a.id = b.a_id \
             JOIN c ON b.id = c.b_id \
             JOIN d ON c.id = d.c_id \
             JOIN e ON d.id = e.d_id \
             WHERE a.id = 1 LIMIT 10",
        );
        assert_eq!(result.performance_score, Some(80));
        assert!(
            result
                .suggestions
                .iter()
                .any(|s| s.category == SuggestionCategory::JoinOptimization)
        );
    }
}
