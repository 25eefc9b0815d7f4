//! Decision evaluation pipeline.
//!
//! A pre-check picks one of two branches: the deterministic catastrophic
//! branch when the safety filter matches the player's free text, or the
//! scored branch that asks the text-generation service for deltas and then
//! applies perturbation and clamping.

mod safety;

pub use safety::SafetyFilter;

use std::sync::Arc;

use serde_json::Value;

use homeroom_domain::scoring::{
    catastrophic_students_delta, clamp_delta, perturb, CATASTROPHIC_LEARNING_DELTA,
    CATASTROPHIC_LIKABILITY_DELTA, DELTA_BOUND, NOISE_BOUND, STUDENTS_DELTA_BOUND,
};
use homeroom_domain::{Choice, EvaluationResult, GameContext};

use crate::infrastructure::ports::{
    ChatMessage, ImageGenPort, ImageRequest, LlmError, LlmPort, LlmRequest, RandomPort,
};
use crate::use_cases::payload::{int_field, parse_json_object, string_field};

const SYSTEM_PROMPT: &str = "You are the judge of a lighthearted classroom simulation game. \
    The player is a homeroom teacher; score the decision they just made. \
    Respond ONLY with a JSON object of the shape \
    {\"learningDelta\": int, \"likabilityDelta\": int, \"studentsDelta\": int, \
    \"commentary\": string, \"logHeadline\": string, \"imagePrompt\": string}. \
    learningDelta and likabilityDelta are between -20 and 20, studentsDelta between -10 and 10. \
    commentary is 1-2 wry sentences addressed to the teacher; logHeadline is a short \
    newspaper-style line; imagePrompt describes a single cartoon panel recapping the moment.";

const DEFAULT_COMMENTARY: &str =
    "The class takes it in stride, more or less, and the day rolls on.";

const CATASTROPHIC_COMMENTARY: &str = "An unthinkable act. Parents pull their children from the \
    class, the school board opens an inquiry, and whatever trust this room had in you is gone.";

const CATASTROPHIC_HEADLINE: &str = "Catastrophic professional failure";

const CATASTROPHIC_IMAGE_PROMPT: &str = "Somber cartoon illustration, muted colors: an empty \
    classroom with overturned chairs and an official notice taped to the door.";

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),
    #[error("evaluation payload was not valid JSON: {0}")]
    Parse(String),
}

/// Everything the evaluator needs for one request.
#[derive(Debug, Clone)]
pub struct EvaluationInput {
    pub scenario_id: String,
    pub context: GameContext,
    pub choice: Choice,
}

/// Evaluates one player decision per call.
pub struct EvaluateDecision {
    llm: Arc<dyn LlmPort>,
    image_gen: Arc<dyn ImageGenPort>,
    random: Arc<dyn RandomPort>,
    safety: SafetyFilter,
    image_size: (u32, u32),
}

impl EvaluateDecision {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        image_gen: Arc<dyn ImageGenPort>,
        random: Arc<dyn RandomPort>,
        safety: SafetyFilter,
        image_size: (u32, u32),
    ) -> Self {
        Self {
            llm,
            image_gen,
            random,
            safety,
            image_size,
        }
    }

    /// Evaluate the choice: catastrophic short-circuit or scored branch.
    pub async fn execute(&self, input: EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        if let Some(text) = input.choice.custom_text() {
            if self.safety.is_catastrophic(text) {
                tracing::warn!(
                    scenario_id = %input.scenario_id,
                    "Safety filter matched, taking the catastrophic branch"
                );
                return Ok(self.catastrophic(&input).await);
            }
        }
        self.scored(&input).await
    }

    /// Fixed outcome; the scoring service is never called on this branch.
    async fn catastrophic(&self, input: &EvaluationInput) -> EvaluationResult {
        let decision_image_url = self.illustrate(CATASTROPHIC_IMAGE_PROMPT.to_string()).await;
        EvaluationResult {
            learning_delta: CATASTROPHIC_LEARNING_DELTA,
            likability_delta: CATASTROPHIC_LIKABILITY_DELTA,
            students_delta: catastrophic_students_delta(input.context.class_size),
            commentary: CATASTROPHIC_COMMENTARY.to_string(),
            log_headline: CATASTROPHIC_HEADLINE.to_string(),
            decision_image_url,
        }
    }

    async fn scored(&self, input: &EvaluationInput) -> Result<EvaluationResult, EvaluationError> {
        let request = LlmRequest::new(vec![ChatMessage::user(build_user_prompt(input))])
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(0.8)
            .with_json_response();

        let response = self.llm.generate(request).await?;
        let payload = parse_json_object(&response.content).map_err(EvaluationError::Parse)?;

        // Missing numeric fields default to 0 before perturbation and clamping.
        let mut rng = |min: i32, max: i32| self.random.gen_range(min, max);
        let learning_delta = clamp_delta(
            perturb(int_field(&payload, "learningDelta").unwrap_or(0), NOISE_BOUND, &mut rng),
            DELTA_BOUND,
        );
        let likability_delta = clamp_delta(
            perturb(int_field(&payload, "likabilityDelta").unwrap_or(0), NOISE_BOUND, &mut rng),
            DELTA_BOUND,
        );
        let students_delta = clamp_delta(
            int_field(&payload, "studentsDelta").unwrap_or(0),
            STUDENTS_DELTA_BOUND,
        );

        let commentary = string_field(&payload, "commentary")
            .unwrap_or_else(|| DEFAULT_COMMENTARY.to_string());
        let log_headline = string_field(&payload, "logHeadline")
            .unwrap_or_else(|| default_headline(learning_delta, likability_delta, students_delta));

        let decision_image_url = match string_field(&payload, "imagePrompt") {
            Some(image_prompt) => {
                self.illustrate(format!(
                    "{} The teacher's choice: {}.",
                    image_prompt,
                    input.choice.summary()
                ))
                .await
            }
            None => None,
        };

        tracing::info!(
            scenario_id = %input.scenario_id,
            learning_delta,
            likability_delta,
            students_delta,
            "Evaluated decision"
        );

        Ok(EvaluationResult {
            learning_delta,
            likability_delta,
            students_delta,
            commentary,
            log_headline,
            decision_image_url,
        })
    }

    async fn illustrate(&self, prompt: String) -> Option<String> {
        let request = ImageRequest {
            prompt,
            width: self.image_size.0,
            height: self.image_size.1,
        };
        match self.image_gen.generate(request).await {
            Ok(image) => Some(image.url),
            Err(e) => {
                tracing::warn!(error = %e, "Decision illustration failed, returning without an image");
                None
            }
        }
    }
}

/// Fallback headline summarizing the deltas with explicit sign prefixes.
fn default_headline(learning: i32, likability: i32, students: i32) -> String {
    format!("Learning {learning:+}, likability {likability:+}, students {students:+}")
}

fn build_user_prompt(input: &EvaluationInput) -> String {
    let decision = match &input.choice {
        Choice::Option { option_id } => format!("Selected option \"{option_id}\""),
        Choice::Custom { custom_text } => format!("Wrote their own response: \"{custom_text}\""),
    };
    let context = &input.context;
    format!(
        "Scenario: {}\n\
         Month: {}\n\
         Round: {}\n\
         Learning score: {}/100\n\
         Likability score: {}/100\n\
         Students remaining: {} of {}\n\n\
         The teacher's decision: {}\n\n\
         Score this decision as strict JSON.",
        input.scenario_id,
        context.month,
        context.round,
        context.learning_score,
        context.likability_score,
        context.students_remaining,
        context.class_size,
        decision
    )
}
