//! Complexity classification
//!
//! Scores a query's structural intricacy with weighted counts and maps the
//! result onto an ordinal tier.

use crate::QueryStructure;
use serde::{Deserialize, Serialize};

/// Ordinal classification of a query's structural intricacy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    /// Single-table, few clauses
    Simple,
    /// A couple of joins or one subquery
    Moderate,
    /// Several joins, subqueries, or set operations
    Complex,
    /// Deeply nested or heavily joined
    VeryComplex,
}

impl ComplexityTier {
    /// Returns the tier as a display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
            Self::VeryComplex => "Very Complex",
        }
    }

    /// Returns the next tier up, saturating at the top
    pub fn escalate(self) -> Self {
        match self {
            Self::Simple => Self::Moderate,
            Self::Moderate => Self::Complex,
            Self::Complex | Self::VeryComplex => Self::VeryComplex,
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weights applied to structural features when scoring complexity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityWeights {
    /// Points per JOIN clause
    pub join_weight: u32,
    /// Points per subquery
    pub subquery_weight: u32,
    /// Points when any set operation (UNION/INTERSECT/EXCEPT) is present
    pub set_operation_weight: u32,
    /// Points when any window function is present
    pub window_weight: u32,
    /// Points when any CTE is present
    pub cte_weight: u32,
    /// Points per aggregate function call
    pub aggregate_weight: u32,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            join_weight: 2,
            subquery_weight: 3,
            set_operation_weight: 3,
            window_weight: 4,
            cte_weight: 2,
            aggregate_weight: 1,
        }
    }
}

/// Ascending score thresholds separating the four tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityThresholds {
    /// Scores at or below this are Simple
    pub simple_max: u32,
    /// Scores at or below this are Moderate
    pub moderate_max: u32,
    /// Scores at or below this are Complex; anything above is Very Complex
    pub complex_max: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_max: 2,
            moderate_max: 5,
            complex_max: 10,
        }
    }
}

/// Classifies structural complexity into a tier
#[derive(Debug, Clone, Default)]
pub struct ComplexityClassifier {
    weights: ComplexityWeights,
    thresholds: ComplexityThresholds,
}

impl ComplexityClassifier {
    /// Creates a classifier with default weights and thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a classifier with custom weights and thresholds
    pub fn with_config(weights: ComplexityWeights, thresholds: ComplexityThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    /// Computes the weighted structural score
    pub fn score(&self, structure: &QueryStructure) -> u32 {
        let mut score = 0;
        score += structure.join_count as u32 * self.weights.join_weight;
        score += structure.subquery_count as u32 * self.weights.subquery_weight;
        if structure.union_count > 0 {
            score += self.weights.set_operation_weight;
        }
        if structure.window_function_count > 0 {
            score += self.weights.window_weight;
        }
        if structure.cte_count > 0 {
            score += self.weights.cte_weight;
        }
        score += structure.aggregate_count as u32 * self.weights.aggregate_weight;
        score
    }

    /// Maps a structure onto its complexity tier
    pub fn classify(&self, structure: &QueryStructure) -> ComplexityTier {
        let score = self.score(structure);
        if score <= self.thresholds.simple_max {
            ComplexityTier::Simple
        } else if score <= self.thresholds.moderate_max {
            ComplexityTier::Moderate
        } else if score <= self.thresholds.complex_max {
            ComplexityTier::Complex
        } else {
            ComplexityTier::VeryComplex
        }
    }
}
