//! Outcome of evaluating one player decision.

use serde::{Deserialize, Serialize};

/// Scored deltas and commentary for a single round, computed once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub learning_delta: i32,
    pub likability_delta: i32,
    pub students_delta: i32,
    pub commentary: String,
    pub log_headline: String,
    pub decision_image_url: Option<String>,
}
