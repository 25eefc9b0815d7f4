//! HTTP routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use homeroom_domain::{Choice, EvaluationResult, GameContext, Month, Scenario};

use crate::app::App;
use crate::use_cases::EvaluationInput;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/scenario", post(generate_scenario))
        .route("/evaluate", post(evaluate_decision))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Scenario
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioRequest {
    month: Month,
    round: u32,
    stats: ScenarioStats,
    #[serde(default)]
    used_scenario_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioStats {
    learning_score: i32,
    likability_score: i32,
    students_remaining: u32,
    class_size: u32,
}

async fn generate_scenario(
    State(app): State<Arc<App>>,
    Json(req): Json<ScenarioRequest>,
) -> Result<Json<Scenario>, ApiError> {
    let context = GameContext {
        month: req.month,
        round: req.round,
        learning_score: req.stats.learning_score,
        likability_score: req.stats.likability_score,
        students_remaining: req.stats.students_remaining,
        class_size: req.stats.class_size,
    };

    let scenario = app
        .use_cases
        .scenario
        .execute(context, &req.used_scenario_ids)
        .await
        .map_err(|e| ApiError::internal("scenario generation failed", e))?;
    Ok(Json(scenario))
}

// =============================================================================
// Evaluation
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateRequest {
    scenario_id: String,
    month: Month,
    round: u32,
    class_size: u32,
    stats: EvaluateStats,
    choice: Choice,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateStats {
    learning_score: i32,
    likability_score: i32,
    students_remaining: u32,
}

async fn evaluate_decision(
    State(app): State<Arc<App>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, ApiError> {
    let input = EvaluationInput {
        scenario_id: req.scenario_id,
        context: GameContext {
            month: req.month,
            round: req.round,
            learning_score: req.stats.learning_score,
            likability_score: req.stats.likability_score,
            students_remaining: req.stats.students_remaining,
            class_size: req.class_size,
        },
        choice: req.choice,
    };

    let result = app
        .use_cases
        .evaluation
        .execute(input)
        .await
        .map_err(|e| ApiError::internal("decision evaluation failed", e))?;
    Ok(Json(result))
}

// =============================================================================
// Errors
// =============================================================================

/// Caller-facing failure: a generic message in a JSON body.
///
/// The detailed cause is logged server-side at construction; nothing about
/// the upstream services leaks to the client.
#[derive(Debug)]
pub enum ApiError {
    Internal(&'static str),
}

impl ApiError {
    fn internal(operation: &'static str, cause: impl std::fmt::Display) -> Self {
        tracing::error!(error = %cause, operation, "Request failed");
        ApiError::Internal(operation)
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Internal(message) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_request_deserializes_the_documented_shape() {
        let body = r#"{
            "month": "April",
            "round": 3,
            "stats": {
                "learningScore": 55,
                "likabilityScore": 60,
                "studentsRemaining": 24,
                "classSize": 25
            },
            "usedScenarioIds": ["fire-drill"]
        }"#;
        let req: ScenarioRequest = serde_json::from_str(body).expect("deserialize");
        assert_eq!(req.month, Month::April);
        assert_eq!(req.stats.class_size, 25);
        assert_eq!(req.used_scenario_ids, vec!["fire-drill".to_string()]);
    }

    #[test]
    fn scenario_request_defaults_missing_used_ids() {
        let body = r#"{
            "month": "May",
            "round": 1,
            "stats": {
                "learningScore": 50,
                "likabilityScore": 50,
                "studentsRemaining": 20,
                "classSize": 20
            }
        }"#;
        let req: ScenarioRequest = serde_json::from_str(body).expect("deserialize");
        assert!(req.used_scenario_ids.is_empty());
    }

    #[test]
    fn evaluate_request_deserializes_both_choice_shapes() {
        let body = r#"{
            "scenarioId": "fire-drill",
            "month": "October",
            "round": 5,
            "classSize": 20,
            "stats": {
                "learningScore": 50,
                "likabilityScore": 50,
                "studentsRemaining": 19
            },
            "choice": {"type": "option", "optionId": "b"}
        }"#;
        let req: EvaluateRequest = serde_json::from_str(body).expect("deserialize");
        assert_eq!(
            req.choice,
            Choice::Option {
                option_id: "b".to_string()
            }
        );

        let custom = body.replace(
            r#"{"type": "option", "optionId": "b"}"#,
            r#"{"type": "custom", "customText": "sing a song"}"#,
        );
        let req: EvaluateRequest = serde_json::from_str(&custom).expect("deserialize");
        assert_eq!(req.choice.custom_text(), Some("sing a song"));
    }
}
