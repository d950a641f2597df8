//! Markdown report rendering for advisory results

use crate::AdvisoryResult;
use std::fmt::Write;

/// Renders an advisory result as a markdown report.
///
/// Intended for terminals and issue trackers; the structure mirrors the
/// advisory fields: assessment, execution metrics when present, then the
/// suggestions ranked by impact.
pub fn render_report(analysis: &AdvisoryResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Query Analysis Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "## Assessment");
    let _ = writeln!(out);

    match analysis.complexity {
        Some(tier) => {
            let _ = writeln!(out, "- Complexity: {}", tier);
        }
        None => {
            let _ = writeln!(out, "- Complexity: unclassified");
        }
    }
    if let Some(cost) = analysis.estimated_cost {
        let _ = writeln!(out, "- Estimated cost: {:.2}", cost);
    }
    if let Some(score) = analysis.performance_score {
        let _ = writeln!(out, "- Performance score: {}/100", score);
    }
    if let Some(score) = analysis.readability_score {
        let _ = writeln!(out, "- Readability score: {}/100", score);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", analysis.summary);

    if let Some(prior) = &analysis.prior_execution {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Execution Metrics");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "- Execution time: {:.3} seconds",
            prior.duration.as_secs_f64()
        );
        if let Some(rows) = prior.row_count {
            let _ = writeln!(out, "- Rows returned: {}", rows);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Suggestions");
    let _ = writeln!(out);

    if analysis.suggestions.is_empty() {
        if analysis.is_classified() {
            let _ = writeln!(out, "No optimization issues found.");
        } else {
            let _ = writeln!(out, "The statement could not be parsed, so no suggestions were produced.");
        }
        return out;
    }

    for (i, suggestion) in analysis.sorted_suggestions().iter().enumerate() {
        let _ = writeln!(
            out,
            "### {}. {} ({})",
            i + 1,
            suggestion.category.description(),
            suggestion.impact
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", suggestion.message);
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommendation: {}", suggestion.recommendation);
        if let Some(example) = &suggestion.example {
            let _ = writeln!(out, "Example: `{}`", example);
        }
        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests;
