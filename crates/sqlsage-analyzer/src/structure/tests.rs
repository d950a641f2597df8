//! Tests for structural inspection

use super::*;
use pretty_assertions::assert_eq;

fn extract(sql: &str) -> QueryStructure {
    QueryStructure::extract(sql, QueryDialect::Generic).expect("query should parse")
}

mod projection_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select_star_detected() {
        let structure = extract("SELECT * FROM orders");
        assert!(structure.select_star);
    }

    #[test]
    fn test_qualified_wildcard_detected() {
        let structure = extract("SELECT o.* FROM orders o");
        assert!(structure.select_star);
    }

    #[test]
    fn test_explicit_columns_not_flagged() {
        let structure = extract("SELECT id, total FROM orders");
        assert!(!structure.select_star);
    }
}

mod clause_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_where_limit_order_by() {
        let structure = extract("SELECT id FROM orders WHERE total > 10 ORDER BY id LIMIT 5");
        assert!(structure.has_where);
        assert!(structure.has_limit);
        assert!(structure.has_order_by);
    }

    #[test]
    fn test_bare_select_has_none() {
        let structure = extract("SELECT id FROM orders");
        assert!(!structure.has_where);
        assert!(!structure.has_limit);
        assert!(!structure.has_order_by);
    }

    #[test]
    fn test_group_by_detected() {
        let structure = extract("SELECT status, COUNT(*) FROM orders GROUP BY status");
        assert!(structure.has_group_by);
        assert_eq!(structure.aggregate_count, 1);
    }

    #[test]
    fn test_delete_where_counts() {
        let structure = extract("DELETE FROM orders WHERE id = 4");
        assert!(structure.has_where);
    }
}

mod join_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_count() {
        let structure = extract(
            "SELECT o.id FROM orders o \
             JOIN customers c ON o.customer_id = c.id \
             JOIN payments p ON p.order_id = o.id",
        );
        assert_eq!(structure.join_count, 2);
        assert_eq!(structure.unconstrained_join_count, 0);
        assert_eq!(structure.table_count, 3);
    }

    #[test]
    fn test_cross_join_is_unconstrained() {
        let structure = extract("SELECT * FROM a CROSS JOIN b");
        assert_eq!(structure.join_count, 1);
        assert_eq!(structure.unconstrained_join_count, 1);
    }
}

mod subquery_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_subquery() {
        let structure = extract(
            "SELECT name FROM customers WHERE id IN (SELECT customer_id FROM orders)",
        );
        assert!(structure.in_subquery);
        assert_eq!(structure.subquery_count, 1);
        assert_eq!(structure.max_subquery_depth, 1);
    }

    #[test]
    fn test_nested_depth() {
        let structure = extract(
            "SELECT name FROM customers WHERE id IN \
             (SELECT customer_id FROM orders WHERE id IN \
              (SELECT order_id FROM payments))",
        );
        assert_eq!(structure.subquery_count, 2);
        assert_eq!(structure.max_subquery_depth, 2);
    }

    #[test]
    fn test_derived_table_counts() {
        let structure = extract("SELECT t.id FROM (SELECT id FROM orders) t");
        assert_eq!(structure.subquery_count, 1);
    }

    #[test]
    fn test_no_subqueries() {
        let structure = extract("SELECT id FROM orders");
        assert_eq!(structure.subquery_count, 0);
        assert_eq!(structure.max_subquery_depth, 0);
    }
}

mod feature_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cte_count() {
        let structure = extract(
            "WITH recent AS (SELECT id FROM orders WHERE created > '2024-01-01') \
             SELECT * FROM recent",
        );
        assert_eq!(structure.cte_count, 1);
        assert!(structure.has_string_literal);
    }

    #[test]
    fn test_union_count() {
        let structure = extract("SELECT id FROM a UNION SELECT id FROM b");
        assert_eq!(structure.union_count, 1);
        assert_eq!(structure.table_count, 2);
    }

    #[test]
    fn test_window_function() {
        let structure = extract(
            "SELECT id, ROW_NUMBER() OVER (ORDER BY total) FROM orders",
        );
        assert_eq!(structure.window_function_count, 1);
    }

    #[test]
    fn test_cast_detected() {
        let structure = extract("SELECT id FROM orders WHERE created = CAST('2024-01-01' AS DATE)");
        assert!(structure.has_cast);
        assert!(structure.has_string_literal);
    }
}

mod error_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_malformed_sql_is_error_not_panic() {
        let result = QueryStructure::extract("SELEKT broken FORM", QueryDialect::Generic);
        assert!(result.is_err());
    }

    #[test]
    fn test_dialects_parse() {
        for dialect in [
            QueryDialect::Generic,
            QueryDialect::Sqlite,
            QueryDialect::Postgres,
            QueryDialect::MySql,
        ] {
            let structure = QueryStructure::extract("SELECT 1", dialect).expect("should parse");
            assert_eq!(structure.statement_count, 1);
        }
    }
}
