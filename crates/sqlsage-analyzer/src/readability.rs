//! Readability scoring
//!
//! Formatting heuristics over the raw SQL text: line structure, indentation,
//! keyword casing consistency, comments, and aliasing. Independent of the
//! performance score.

use serde::{Deserialize, Serialize};

/// Named constants of the readability score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadabilityWeights {
    /// Deduction for a single-line statement longer than `long_line_length`
    pub long_single_line_penalty: u8,
    /// Length at which a one-line statement counts as unreadable
    pub long_line_length: usize,
    /// Deduction for multi-line statements with no indentation
    pub missing_indentation_penalty: u8,
    /// Line count above which indentation is expected
    pub indentation_line_threshold: usize,
    /// Deduction for mixing upper- and lower-case keywords
    pub inconsistent_casing_penalty: u8,
    /// Credit for comments in the statement
    pub comment_credit: u8,
    /// Credit for explicit AS aliases
    pub alias_credit: u8,
}

impl Default for ReadabilityWeights {
    fn default() -> Self {
        Self {
            long_single_line_penalty: 20,
            long_line_length: 100,
            missing_indentation_penalty: 15,
            indentation_line_threshold: 3,
            inconsistent_casing_penalty: 10,
            comment_credit: 10,
            alias_credit: 5,
        }
    }
}

/// Keywords sampled when checking casing consistency
const CASING_KEYWORDS: &[&str] = &["SELECT", "FROM", "WHERE", "JOIN", "GROUP BY", "ORDER BY"];

/// Scores how readable a statement's formatting is (0-100, higher is better)
pub fn readability_score(sql: &str, weights: &ReadabilityWeights) -> u8 {
    let mut score: i32 = 100;
    let trimmed = sql.trim();
    let lines: Vec<&str> = trimmed.lines().collect();

    if lines.len() == 1 && trimmed.len() > weights.long_line_length {
        score -= weights.long_single_line_penalty as i32;
    }

    if lines.len() > weights.indentation_line_threshold {
        let has_indentation = lines
            .iter()
            .any(|line| line.starts_with("    ") || line.starts_with('\t'));
        if !has_indentation {
            score -= weights.missing_indentation_penalty as i32;
        }
    }

    if trimmed.contains("--") || trimmed.contains("/*") {
        score += weights.comment_credit as i32;
    }

    if has_inconsistent_casing(trimmed) {
        score -= weights.inconsistent_casing_penalty as i32;
    }

    if trimmed.to_uppercase().contains(" AS ") {
        score += weights.alias_credit as i32;
    }

    score.clamp(0, 100) as u8
}

/// Returns true when some keywords are written uppercase and others are not
fn has_inconsistent_casing(sql: &str) -> bool {
    let upper = sql.to_uppercase();
    let mut saw_upper = false;
    let mut saw_other = false;

    for keyword in CASING_KEYWORDS {
        if !upper.contains(keyword) {
            continue;
        }
        if sql.contains(keyword) {
            saw_upper = true;
        } else {
            saw_other = true;
        }
    }

    saw_upper && saw_other
}
