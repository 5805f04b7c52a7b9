use std::cmp::Ordering;

use super::model::{CleanedTable, Dimension};

// ---------------------------------------------------------------------------
// Query interface: one question (+ one segment value) → ranked answers
// ---------------------------------------------------------------------------

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedAnswer {
    pub answer: String,
    pub estimate: Option<f64>,
}

/// Descending by estimate; missing estimates sort last.
pub fn by_estimate_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Answers to `question`, optionally restricted to one segment value, ranked
/// by estimate.
///
/// * The national table has no segment column, so `segment_value` is ignored.
/// * Rows without answer text are never returned.
/// * Ties keep table order (stable sort), so repeated calls agree exactly.
/// * No match is an empty result, not an error.
pub fn filter_and_rank(
    table: &CleanedTable,
    question: &str,
    segment_value: Option<&str>,
) -> Vec<RankedAnswer> {
    let segment_value = match table.dimension {
        Dimension::National => None,
        _ => segment_value,
    };

    let mut ranked: Vec<RankedAnswer> = table
        .rows
        .iter()
        .filter(|row| row.question == question)
        .filter(|row| segment_value.map_or(true, |v| row.segment.value() == Some(v)))
        .filter_map(|row| {
            Some(RankedAnswer {
                answer: row.answer.clone()?,
                estimate: row.estimate,
            })
        })
        .collect();

    ranked.sort_by(|a, b| by_estimate_desc(a.estimate, b.estimate));
    ranked
}
