//! Use cases: the two request pipelines.

pub mod evaluation;
pub mod scenario;

mod payload;

pub use evaluation::{EvaluateDecision, EvaluationError, EvaluationInput, SafetyFilter};
pub use scenario::{GenerateScenario, ScenarioError};
