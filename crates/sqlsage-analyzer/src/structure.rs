//! Structural inspection of SQL statements
//!
//! Walks the sqlparser AST and collects the structural metrics the rest of
//! the analyzer works from: join and subquery counts, nesting depth, clause
//! presence, aggregate and window function usage.

use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    Expr, FunctionArg, FunctionArgExpr, FunctionArguments, GroupByExpr, Join, JoinConstraint,
    JoinOperator, Query, Select, SelectItem, SetExpr, Statement, TableFactor, TableWithJoins,
};
use sqlparser::dialect::{Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};
use sqlparser::parser::Parser;
use sqlsage_core::QueryDialect;

/// Aggregate function names recognized when counting aggregations
const AGGREGATE_FUNCTIONS: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX", "GROUP_CONCAT", "TOTAL"];

/// Structural metrics extracted from a parsed SQL statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStructure {
    /// Number of top-level statements in the input
    pub statement_count: usize,
    /// Whether any SELECT list contains `*` or `table.*`
    pub select_star: bool,
    /// Total number of JOIN clauses
    pub join_count: usize,
    /// Number of joins whose constraint carries no ON/USING condition
    pub unconstrained_join_count: usize,
    /// Total number of subqueries (derived tables, scalar subqueries, EXISTS, IN)
    pub subquery_count: usize,
    /// Maximum subquery nesting depth (0 = no subqueries)
    pub max_subquery_depth: usize,
    /// Whether any `IN (SELECT ...)` predicate is present
    pub in_subquery: bool,
    /// Whether any level carries a WHERE clause
    pub has_where: bool,
    /// Whether any level carries a LIMIT clause
    pub has_limit: bool,
    /// Whether any level carries an ORDER BY clause
    pub has_order_by: bool,
    /// Whether any level carries a GROUP BY clause
    pub has_group_by: bool,
    /// Number of aggregate function calls (COUNT, SUM, AVG, MIN, MAX, ...)
    pub aggregate_count: usize,
    /// Number of window function calls (`... OVER (...)`)
    pub window_function_count: usize,
    /// Number of common table expressions
    pub cte_count: usize,
    /// Number of set operations (UNION/INTERSECT/EXCEPT)
    pub union_count: usize,
    /// Number of base table references
    pub table_count: usize,
    /// Whether any quoted string literal appears
    pub has_string_literal: bool,
    /// Whether any explicit CAST appears
    pub has_cast: bool,
}

impl QueryStructure {
    /// Extracts structural metrics from SQL text.
    ///
    /// Returns `Err` with the parser's message when the statement cannot be
    /// parsed; callers degrade to an unclassified advisory result rather
    /// than failing the analysis.
    pub fn extract(sql: &str, dialect: QueryDialect) -> Result<Self, String> {
        let statements = parse(sql, dialect).map_err(|e| e.to_string())?;

        let mut walker = StructureWalker::default();
        for statement in &statements {
            walker.walk_statement(statement);
        }

        let mut structure = walker.structure;
        structure.statement_count = statements.len();
        tracing::trace!(
            joins = structure.join_count,
            subqueries = structure.subquery_count,
            depth = structure.max_subquery_depth,
            "query structure extracted"
        );
        Ok(structure)
    }
}

fn parse(sql: &str, dialect: QueryDialect) -> Result<Vec<Statement>, sqlparser::parser::ParserError> {
    let dialect: Box<dyn Dialect> = match dialect {
        QueryDialect::Generic => Box::new(GenericDialect {}),
        QueryDialect::Sqlite => Box::new(SQLiteDialect {}),
        QueryDialect::Postgres => Box::new(PostgreSqlDialect {}),
        QueryDialect::MySql => Box::new(MySqlDialect {}),
    };
    Parser::parse_sql(dialect.as_ref(), sql)
}

/// Depth-tracking AST walker accumulating a `QueryStructure`
#[derive(Default)]
struct StructureWalker {
    structure: QueryStructure,
}

impl StructureWalker {
    fn walk_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.walk_query(query, 0),
            Statement::Insert(insert) => {
                self.structure.table_count += 1;
                if let Some(source) = &insert.source {
                    self.walk_query(source, 0);
                }
            }
            Statement::Update {
                table, selection, ..
            } => {
                self.walk_table_with_joins(table, 0);
                if let Some(expr) = selection {
                    self.structure.has_where = true;
                    self.walk_expr(expr, 0);
                }
            }
            Statement::Delete(delete) => {
                if let Some(expr) = &delete.selection {
                    self.structure.has_where = true;
                    self.walk_expr(expr, 0);
                }
                if delete.limit.is_some() {
                    self.structure.has_limit = true;
                }
            }
            _ => {}
        }
    }

    fn walk_query(&mut self, query: &Query, depth: usize) {
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.structure.cte_count += 1;
                self.enter_subquery(&cte.query, depth);
            }
        }

        self.walk_set_expr(&query.body, depth);

        if let Some(order_by) = &query.order_by {
            if !order_by.exprs.is_empty() {
                self.structure.has_order_by = true;
            }
        }
        if query.limit.is_some() {
            self.structure.has_limit = true;
        }
    }

    fn walk_set_expr(&mut self, set_expr: &SetExpr, depth: usize) {
        match set_expr {
            SetExpr::Select(select) => self.walk_select(select, depth),
            SetExpr::Query(query) => self.walk_query(query, depth),
            SetExpr::SetOperation { left, right, .. } => {
                self.structure.union_count += 1;
                self.walk_set_expr(left, depth);
                self.walk_set_expr(right, depth);
            }
            _ => {}
        }
    }

    fn walk_select(&mut self, select: &Select, depth: usize) {
        for projection in &select.projection {
            match projection {
                SelectItem::Wildcard(_) | SelectItem::QualifiedWildcard(_, _) => {
                    self.structure.select_star = true;
                }
                SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                    self.walk_expr(expr, depth);
                }
            }
        }

        for table_with_joins in &select.from {
            self.walk_table_with_joins(table_with_joins, depth);
        }

        if let Some(selection) = &select.selection {
            self.structure.has_where = true;
            self.walk_expr(selection, depth);
        }

        match &select.group_by {
            GroupByExpr::Expressions(exprs, _) if !exprs.is_empty() => {
                self.structure.has_group_by = true;
                for expr in exprs {
                    self.walk_expr(expr, depth);
                }
            }
            GroupByExpr::All(_) => self.structure.has_group_by = true,
            _ => {}
        }

        if let Some(having) = &select.having {
            self.walk_expr(having, depth);
        }
    }

    fn walk_table_with_joins(&mut self, table_with_joins: &TableWithJoins, depth: usize) {
        self.walk_table_factor(&table_with_joins.relation, depth);
        for join in &table_with_joins.joins {
            self.structure.join_count += 1;
            self.walk_table_factor(&join.relation, depth);
            self.walk_join_constraint(join, depth);
        }
    }

    fn walk_join_constraint(&mut self, join: &Join, depth: usize) {
        let constraint = match &join.join_operator {
            JoinOperator::Inner(c)
            | JoinOperator::LeftOuter(c)
            | JoinOperator::RightOuter(c)
            | JoinOperator::FullOuter(c) => c,
            JoinOperator::CrossJoin => {
                self.structure.unconstrained_join_count += 1;
                return;
            }
            _ => return,
        };

        match constraint {
            JoinConstraint::On(expr) => self.walk_expr(expr, depth),
            JoinConstraint::Using(_) => {}
            JoinConstraint::Natural => {}
            JoinConstraint::None => {
                self.structure.unconstrained_join_count += 1;
            }
        }
    }

    fn walk_table_factor(&mut self, table_factor: &TableFactor, depth: usize) {
        match table_factor {
            TableFactor::Table { .. } => {
                self.structure.table_count += 1;
            }
            TableFactor::Derived { subquery, .. } => {
                self.enter_subquery(subquery, depth);
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => {
                self.walk_table_with_joins(table_with_joins, depth);
            }
            _ => {}
        }
    }

    fn walk_expr(&mut self, expr: &Expr, depth: usize) {
        match expr {
            Expr::Subquery(query) => {
                self.enter_subquery(query, depth);
            }
            Expr::InSubquery { expr, subquery, .. } => {
                self.structure.in_subquery = true;
                self.walk_expr(expr, depth);
                self.enter_subquery(subquery, depth);
            }
            Expr::Exists { subquery, .. } => {
                self.enter_subquery(subquery, depth);
            }
            Expr::BinaryOp { left, right, .. } => {
                self.walk_expr(left, depth);
                self.walk_expr(right, depth);
            }
            Expr::UnaryOp { expr, .. } => self.walk_expr(expr, depth),
            Expr::Nested(expr) => self.walk_expr(expr, depth),
            Expr::IsNull(expr) | Expr::IsNotNull(expr) => self.walk_expr(expr, depth),
            Expr::Cast { expr, .. } => {
                self.structure.has_cast = true;
                self.walk_expr(expr, depth);
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.walk_expr(expr, depth);
                self.walk_expr(low, depth);
                self.walk_expr(high, depth);
            }
            Expr::InList { expr, list, .. } => {
                self.walk_expr(expr, depth);
                for item in list {
                    self.walk_expr(item, depth);
                }
            }
            Expr::Like { expr, pattern, .. } | Expr::ILike { expr, pattern, .. } => {
                self.walk_expr(expr, depth);
                self.walk_expr(pattern, depth);
            }
            Expr::Case {
                operand,
                conditions,
                results,
                else_result,
                ..
            } => {
                if let Some(operand) = operand {
                    self.walk_expr(operand, depth);
                }
                for condition in conditions {
                    self.walk_expr(condition, depth);
                }
                for result in results {
                    self.walk_expr(result, depth);
                }
                if let Some(else_result) = else_result {
                    self.walk_expr(else_result, depth);
                }
            }
            Expr::Function(func) => {
                let name = func.name.to_string().to_uppercase();
                if func.over.is_some() {
                    self.structure.window_function_count += 1;
                } else if AGGREGATE_FUNCTIONS.contains(&name.as_str()) {
                    self.structure.aggregate_count += 1;
                }
                if let FunctionArguments::List(arg_list) = &func.args {
                    for arg in &arg_list.args {
                        if let FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) = arg {
                            self.walk_expr(expr, depth);
                        }
                    }
                }
            }
            Expr::Value(value) => {
                if matches!(
                    value,
                    sqlparser::ast::Value::SingleQuotedString(_)
                        | sqlparser::ast::Value::DoubleQuotedString(_)
                ) {
                    self.structure.has_string_literal = true;
                }
            }
            _ => {}
        }
    }

    fn enter_subquery(&mut self, query: &Query, parent_depth: usize) {
        let depth = parent_depth + 1;
        self.structure.subquery_count += 1;
        if depth > self.structure.max_subquery_depth {
            self.structure.max_subquery_depth = depth;
        }
        self.walk_query(query, depth);
    }
}

#[cfg(test)]
mod tests;
