//! Query advisor - detection rules, scoring, and the advisory result

use crate::{
    ComplexityClassifier, ComplexityThresholds, ComplexityTier, ComplexityWeights, CostModel,
    PriorExecution, QueryRecord, QueryStructure, ReadabilityWeights, readability_score,
};
use serde::{Deserialize, Serialize};
use sqlsage_core::{Result, SqlsageError};
use std::time::Duration;

/// Impact level of a suggestion.
///
/// The level a rule carries matches the penalty it charges against the
/// performance score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    /// Minor optimization opportunity
    Low,
    /// Worth addressing
    Medium,
    /// Likely performance problem
    High,
    /// Observed or near-certain performance problem
    Critical,
}

impl ImpactLevel {
    /// Returns true if this is a critical issue
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }

    /// Returns the impact level as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of optimization suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    /// SELECT list pulls more columns than needed
    ColumnSelection,
    /// Result set is unbounded
    Filtering,
    /// Join shape or join volume concerns
    JoinOptimization,
    /// Missing LIMIT on sorted output
    ResultLimiting,
    /// Missing index on joined or filtered columns
    Indexing,
    /// Subquery that is better expressed as a join
    SubqueryRewrite,
    /// Excessive subquery nesting
    Nesting,
    /// Observed slow execution
    Performance,
    /// Implicit type conversion risk
    DataTypes,
}

impl SuggestionCategory {
    /// Returns a human-readable description of this category
    pub fn description(&self) -> &'static str {
        match self {
            Self::ColumnSelection => "Column selection",
            Self::Filtering => "Filtering",
            Self::JoinOptimization => "Join optimization",
            Self::ResultLimiting => "Result limiting",
            Self::Indexing => "Indexing",
            Self::SubqueryRewrite => "Query structure",
            Self::Nesting => "Nesting",
            Self::Performance => "Performance",
            Self::DataTypes => "Data types",
        }
    }
}

/// A single optimization suggestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Category of the detected issue
    pub category: SuggestionCategory,
    /// Impact level
    pub impact: ImpactLevel,
    /// Human-readable message explaining the issue
    pub message: String,
    /// Suggested action to improve performance
    pub recommendation: String,
    /// Example snippet illustrating the fix, if useful
    pub example: Option<String>,
}

impl Suggestion {
    /// Creates a new suggestion
    pub fn new(
        category: SuggestionCategory,
        impact: ImpactLevel,
        message: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            category,
            impact,
            message: message.into(),
            recommendation: recommendation.into(),
            example: None,
        }
    }

    /// Sets the example snippet
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// Configuration for the query advisor.
///
/// Every detection rule charges a named penalty; the score never moves for
/// a reason that is not listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Penalty for `SELECT *` projections
    pub select_star_penalty: u8,
    /// Penalty for statements with neither WHERE nor LIMIT
    pub unbounded_result_penalty: u8,
    /// Penalty for joins running without any WHERE filter
    pub unfiltered_join_penalty: u8,
    /// Penalty charged once when joins are present (index advisory)
    pub join_index_penalty: u8,
    /// Penalty for joins carrying no ON/USING constraint (cross products)
    pub unconstrained_join_penalty: u8,
    /// Penalty for ORDER BY without LIMIT
    pub order_without_limit_penalty: u8,
    /// Penalty for `IN (SELECT ...)` predicates
    pub in_subquery_penalty: u8,
    /// Penalty per join beyond `join_fanout_threshold`
    pub join_fanout_penalty: u8,
    /// Join count above which fan-out is penalized
    pub join_fanout_threshold: usize,
    /// Penalty for nesting beyond `nesting_depth_threshold`
    pub deep_nesting_penalty: u8,
    /// Subquery depth above which the complexity tier escalates
    pub nesting_depth_threshold: usize,
    /// Penalty for quoted literals compared without an explicit CAST
    pub implicit_cast_penalty: u8,
    /// Prior execution duration above which the slow-query rule fires
    pub slow_query_threshold: Duration,
    /// Penalty per second of prior execution time
    pub slow_query_penalty_per_second: u8,
    /// Upper bound on the slow-query penalty
    pub slow_query_penalty_cap: u8,
    /// Complexity scoring weights
    pub complexity_weights: ComplexityWeights,
    /// Complexity tier thresholds
    pub complexity_thresholds: ComplexityThresholds,
    /// Cost model constants
    pub cost_model: CostModel,
    /// Readability scoring constants
    pub readability_weights: ReadabilityWeights,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            select_star_penalty: 15,
            unbounded_result_penalty: 25,
            unfiltered_join_penalty: 10,
            join_index_penalty: 10,
            unconstrained_join_penalty: 10,
            order_without_limit_penalty: 10,
            in_subquery_penalty: 8,
            join_fanout_penalty: 5,
            join_fanout_threshold: 2,
            deep_nesting_penalty: 10,
            nesting_depth_threshold: 2,
            implicit_cast_penalty: 3,
            slow_query_threshold: Duration::from_secs(1),
            slow_query_penalty_per_second: 10,
            slow_query_penalty_cap: 30,
            complexity_weights: ComplexityWeights::default(),
            complexity_thresholds: ComplexityThresholds::default(),
            cost_model: CostModel::default(),
            readability_weights: ReadabilityWeights::default(),
        }
    }
}

impl AdvisorConfig {
    /// Creates a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the join fan-out threshold
    pub fn with_join_fanout_threshold(mut self, threshold: usize) -> Self {
        self.join_fanout_threshold = threshold;
        self
    }

    /// Sets the nesting depth threshold
    pub fn with_nesting_depth_threshold(mut self, threshold: usize) -> Self {
        self.nesting_depth_threshold = threshold;
        self
    }

    /// Sets the slow-query threshold
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = threshold;
        self
    }
}

/// Result of analyzing one query record.
///
/// Derived purely from the record; nothing is cached or retained between
/// calls. Score fields are `None` when the statement could not be parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResult {
    /// Complexity tier, `None` when unclassifiable
    pub complexity: Option<ComplexityTier>,
    /// Performance score 0-100, higher is better
    pub performance_score: Option<u8>,
    /// Readability score 0-100, higher is better
    pub readability_score: Option<u8>,
    /// Estimated cost in abstract units
    pub estimated_cost: Option<f64>,
    /// Optimization suggestions, in rule order
    pub suggestions: Vec<Suggestion>,
    /// One-line summary of the analysis
    pub summary: String,
    /// Structural metrics the analysis was derived from
    pub structure: Option<QueryStructure>,
    /// Prior execution statistics echoed from the record
    pub prior_execution: Option<PriorExecution>,
}

impl AdvisoryResult {
    /// Creates the degraded result for a statement that did not parse
    fn unclassified(reason: &str) -> Self {
        Self {
            complexity: None,
            performance_score: None,
            readability_score: None,
            estimated_cost: None,
            suggestions: Vec::new(),
            summary: format!("Unable to classify statement: {}", reason),
            structure: None,
            prior_execution: None,
        }
    }

    /// Returns true when the statement parsed and was scored
    pub fn is_classified(&self) -> bool {
        self.performance_score.is_some()
    }

    /// Returns true if any suggestion is critical
    pub fn has_critical_issues(&self) -> bool {
        self.suggestions.iter().any(|s| s.impact.is_critical())
    }

    /// Returns the number of suggestions
    pub fn suggestion_count(&self) -> usize {
        self.suggestions.len()
    }

    /// Returns suggestions sorted by impact (critical first)
    pub fn sorted_suggestions(&self) -> Vec<&Suggestion> {
        let mut sorted: Vec<_> = self.suggestions.iter().collect();
        sorted.sort_by(|a, b| b.impact.cmp(&a.impact));
        sorted
    }
}

/// Query advisor applying the detection rules
#[derive(Debug, Clone, Default)]
pub struct QueryAdvisor {
    config: AdvisorConfig,
}

impl QueryAdvisor {
    /// Creates an advisor with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an advisor with custom config
    pub fn with_config(config: AdvisorConfig) -> Self {
        Self { config }
    }

    /// Returns the advisor config
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Analyzes a query record.
    ///
    /// Empty input is a validation error. Statements that fail to parse
    /// degrade to an unclassified result (tier and scores `None`) instead
    /// of an error.
    pub fn analyze(&self, record: &QueryRecord) -> Result<AdvisoryResult> {
        let sql = record.sql.trim();
        if sql.is_empty() {
            return Err(SqlsageError::InvalidQuery(
                "query text is empty".to_string(),
            ));
        }

        let structure = match QueryStructure::extract(sql, record.dialect_or_default()) {
            Ok(structure) => structure,
            Err(parse_error) => {
                tracing::debug!(error = %parse_error, "statement did not parse");
                return Ok(AdvisoryResult::unclassified(&parse_error));
            }
        };

        let mut findings = Findings::default();
        self.check_projection(&structure, &mut findings);
        self.check_result_bounds(&structure, &mut findings);
        self.check_joins(&structure, &mut findings);
        self.check_subqueries(&structure, &mut findings);
        self.check_data_types(&structure, &mut findings);
        self.check_prior_execution(record.prior_execution.as_ref(), &mut findings);

        let performance_score = 100_u8.saturating_sub(findings.total_penalty.min(100) as u8);

        let classifier = ComplexityClassifier::with_config(
            self.config.complexity_weights.clone(),
            self.config.complexity_thresholds.clone(),
        );
        let mut complexity = classifier.classify(&structure);
        if structure.max_subquery_depth > self.config.nesting_depth_threshold {
            complexity = complexity.escalate();
        }

        let estimated_cost = self.config.cost_model.estimate(&structure);
        let readability = readability_score(sql, &self.config.readability_weights);
        let summary = self.summarize(&findings.suggestions, performance_score, complexity);

        tracing::debug!(
            score = performance_score,
            tier = %complexity,
            suggestions = findings.suggestions.len(),
            "query analyzed"
        );

        Ok(AdvisoryResult {
            complexity: Some(complexity),
            performance_score: Some(performance_score),
            readability_score: Some(readability),
            estimated_cost: Some(estimated_cost),
            suggestions: findings.suggestions,
            summary,
            structure: Some(structure),
            prior_execution: record.prior_execution,
        })
    }

    fn check_projection(&self, structure: &QueryStructure, findings: &mut Findings) {
        if structure.select_star {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::ColumnSelection,
                    ImpactLevel::Medium,
                    "SELECT * retrieves every column, increasing I/O and network overhead",
                    "Specify only the columns the caller actually needs",
                )
                .with_example("SELECT id, name, email FROM users -- instead of SELECT *"),
                self.config.select_star_penalty as u32,
            );
        }
    }

    fn check_result_bounds(&self, structure: &QueryStructure, findings: &mut Findings) {
        if structure.table_count > 0 && !structure.has_where && !structure.has_limit {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::Filtering,
                    ImpactLevel::High,
                    "Statement has neither a WHERE clause nor a LIMIT",
                    "Bound the result set with a filter or an explicit row limit",
                )
                .with_example("SELECT ... FROM orders WHERE order_date >= '2024-01-01'"),
                self.config.unbounded_result_penalty as u32,
            );
        }

        if structure.has_order_by && !structure.has_limit {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::ResultLimiting,
                    ImpactLevel::Medium,
                    "ORDER BY without LIMIT sorts the entire result set",
                    "Add a LIMIT clause when only the first rows are needed",
                )
                .with_example("ORDER BY order_date DESC LIMIT 100"),
                self.config.order_without_limit_penalty as u32,
            );
        }
    }

    fn check_joins(&self, structure: &QueryStructure, findings: &mut Findings) {
        if structure.join_count == 0 {
            return;
        }

        if structure.unconstrained_join_count > 0 {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::JoinOptimization,
                    ImpactLevel::High,
                    format!(
                        "{} join(s) carry no ON/USING constraint and produce a cross product",
                        structure.unconstrained_join_count
                    ),
                    "Add explicit join conditions on the related key columns",
                ),
                self.config.unconstrained_join_penalty as u32,
            );
        }

        if !structure.has_where {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::JoinOptimization,
                    ImpactLevel::High,
                    "Joins run without any WHERE filter",
                    "Filter before joining so less data is carried through the join",
                ),
                self.config.unfiltered_join_penalty as u32,
            );
        }

        findings.add(
            Suggestion::new(
                SuggestionCategory::Indexing,
                ImpactLevel::High,
                "Join predicates depend on indexed columns to avoid full scans",
                "Verify indexes exist on the joined key columns",
            )
            .with_example("CREATE INDEX idx_orders_customer_id ON orders (customer_id)"),
            self.config.join_index_penalty as u32,
        );

        if structure.join_count > self.config.join_fanout_threshold {
            let excess = (structure.join_count - self.config.join_fanout_threshold) as u32;
            findings.add(
                Suggestion::new(
                    SuggestionCategory::JoinOptimization,
                    ImpactLevel::Medium,
                    format!(
                        "Query joins {} times; join fan-out grows multiplicatively",
                        structure.join_count
                    ),
                    "Consider splitting the query or joining pre-aggregated subsets",
                ),
                excess * self.config.join_fanout_penalty as u32,
            );
        }
    }

    fn check_subqueries(&self, structure: &QueryStructure, findings: &mut Findings) {
        if structure.in_subquery {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::SubqueryRewrite,
                    ImpactLevel::Medium,
                    "IN (SELECT ...) predicates are often slower than an equivalent join",
                    "Rewrite the IN subquery as an INNER JOIN",
                )
                .with_example("JOIN orders o ON o.customer_id = c.id -- instead of IN (SELECT ...)"),
                self.config.in_subquery_penalty as u32,
            );
        }

        if structure.max_subquery_depth > self.config.nesting_depth_threshold {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::Nesting,
                    ImpactLevel::High,
                    format!(
                        "Subqueries nest {} levels deep",
                        structure.max_subquery_depth
                    ),
                    "Flatten deep nesting with CTEs or joins",
                ),
                self.config.deep_nesting_penalty as u32,
            );
        }
    }

    fn check_data_types(&self, structure: &QueryStructure, findings: &mut Findings) {
        if structure.has_string_literal && !structure.has_cast {
            findings.add(
                Suggestion::new(
                    SuggestionCategory::DataTypes,
                    ImpactLevel::Low,
                    "Quoted literals compared without an explicit CAST can force implicit conversions",
                    "Cast literals to the column's type so indexes stay usable",
                )
                .with_example("WHERE created_at = CAST('2024-01-01' AS DATE)"),
                self.config.implicit_cast_penalty as u32,
            );
        }
    }

    fn check_prior_execution(&self, prior: Option<&PriorExecution>, findings: &mut Findings) {
        let Some(prior) = prior else { return };
        if prior.duration <= self.config.slow_query_threshold {
            return;
        }

        let seconds = prior.duration.as_secs_f64();
        let raw = (seconds * self.config.slow_query_penalty_per_second as f64).floor();
        let penalty = (raw as u32).min(self.config.slow_query_penalty_cap as u32);

        findings.add(
            Suggestion::new(
                SuggestionCategory::Performance,
                ImpactLevel::Critical,
                format!(
                    "Prior execution took {:.3}s, above the {:.1}s threshold",
                    seconds,
                    self.config.slow_query_threshold.as_secs_f64()
                ),
                "Review indexes, join order, and data volumes for this statement",
            ),
            penalty,
        );
    }

    fn summarize(
        &self,
        suggestions: &[Suggestion],
        score: u8,
        complexity: ComplexityTier,
    ) -> String {
        if suggestions.is_empty() {
            return format!(
                "{} query with no detected issues. Performance score: 100/100",
                complexity
            );
        }

        let critical = suggestions
            .iter()
            .filter(|s| s.impact == ImpactLevel::Critical)
            .count();
        let high = suggestions
            .iter()
            .filter(|s| s.impact == ImpactLevel::High)
            .count();
        let other = suggestions.len() - critical - high;

        if critical > 0 {
            format!(
                "{} query with {} critical issue(s), {} high-impact issue(s), and {} other suggestion(s). Performance score: {}/100",
                complexity, critical, high, other, score
            )
        } else if high > 0 {
            format!(
                "{} query with {} high-impact issue(s) and {} other suggestion(s). Performance score: {}/100",
                complexity, high, other, score
            )
        } else {
            format!(
                "{} query with {} minor suggestion(s). Performance score: {}/100",
                complexity,
                suggestions.len(),
                score
            )
        }
    }
}

/// Accumulates suggestions and the total score penalty during rule checks
#[derive(Default)]
struct Findings {
    suggestions: Vec<Suggestion>,
    total_penalty: u32,
}

impl Findings {
    fn add(&mut self, suggestion: Suggestion, penalty: u32) {
        self.total_penalty += penalty;
        self.suggestions.push(suggestion);
    }
}

#[cfg(test)]
mod tests;
