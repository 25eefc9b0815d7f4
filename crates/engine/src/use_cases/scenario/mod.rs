//! Scenario generation pipeline.
//!
//! Builds a prompt from the game state, asks the text-generation service for
//! a strict JSON scenario, applies per-field defaults, and then requests a
//! best-effort illustration.

use std::sync::Arc;

use serde_json::Value;

use homeroom_domain::{normalize_options, GameContext, Scenario, ScenarioOption};

use crate::infrastructure::ports::{
    ChatMessage, ClockPort, ImageGenPort, ImageRequest, LlmError, LlmPort, LlmRequest, RandomPort,
};
use crate::use_cases::payload::{parse_json_object, string_field};

const SYSTEM_PROMPT: &str = "You are the narrator of a lighthearted classroom simulation game. \
    The player is a homeroom teacher steering a class through the school year. \
    Respond ONLY with a JSON object of the shape \
    {\"id\": string, \"title\": string, \"prompt\": string, \"options\": [{\"id\": string, \"text\": string}]} \
    with exactly 4 options. The prompt is the situation the teacher faces this round, \
    2-3 sentences, playful and grounded in everyday school life. \
    Each option is one distinct way the teacher could respond. \
    The id must be a short unique slug for this situation.";

const DEFAULT_PROMPT: &str =
    "The classroom hums with low-grade chaos, and every student is looking at you.";

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),
    #[error("scenario payload was not valid JSON: {0}")]
    Parse(String),
}

/// Generates one fresh scenario per call, never reusing a supplied id.
pub struct GenerateScenario {
    llm: Arc<dyn LlmPort>,
    image_gen: Arc<dyn ImageGenPort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
    image_size: (u32, u32),
}

impl GenerateScenario {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        image_gen: Arc<dyn ImageGenPort>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        image_size: (u32, u32),
    ) -> Self {
        Self {
            llm,
            image_gen,
            clock,
            random,
            image_size,
        }
    }

    /// Run the full pipeline: text generation, defaulting, illustration.
    ///
    /// Fails only when the primary text call fails or returns something that
    /// is not JSON; the illustration step is best-effort.
    pub async fn execute(
        &self,
        context: GameContext,
        used_ids: &[String],
    ) -> Result<Scenario, ScenarioError> {
        let request = LlmRequest::new(vec![ChatMessage::user(build_user_prompt(
            &context, used_ids,
        ))])
        .with_system_prompt(SYSTEM_PROMPT)
        .with_temperature(0.9)
        .with_json_response();

        let response = self.llm.generate(request).await?;
        let payload = parse_json_object(&response.content).map_err(ScenarioError::Parse)?;
        let mut scenario = self.assemble(&payload, &context, used_ids);

        tracing::info!(
            scenario_id = %scenario.id,
            month = %context.month,
            round = context.round,
            "Generated scenario"
        );

        scenario.image_url = self.illustrate(&scenario).await;
        Ok(scenario)
    }

    fn assemble(&self, payload: &Value, context: &GameContext, used_ids: &[String]) -> Scenario {
        let id = match string_field(payload, "id") {
            Some(id) if !used_ids.contains(&id) => id,
            Some(id) => {
                tracing::debug!(scenario_id = %id, "Model echoed a used scenario id, substituting a fresh one");
                self.fresh_id()
            }
            None => self.fresh_id(),
        };
        let title = string_field(payload, "title")
            .unwrap_or_else(|| format!("{} Situation", context.month));
        let prompt =
            string_field(payload, "prompt").unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        let options = normalize_options(raw_options(payload));

        Scenario {
            id,
            title,
            prompt,
            options,
            image_url: None,
        }
    }

    /// Timestamp plus random suffix, used when the model omits or reuses an id.
    fn fresh_id(&self) -> String {
        format!(
            "scenario-{}-{:04x}",
            self.clock.now().timestamp_millis(),
            self.random.gen_range(0, 0xFFFF)
        )
    }

    async fn illustrate(&self, scenario: &Scenario) -> Option<String> {
        let request = ImageRequest {
            prompt: format!(
                "Cheerful cartoon illustration, simple flat style, no text. \
                 A classroom scene: {}",
                scenario.prompt
            ),
            width: self.image_size.0,
            height: self.image_size.1,
        };
        match self.image_gen.generate(request).await {
            Ok(image) => Some(image.url),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    scenario_id = %scenario.id,
                    "Scenario illustration failed, returning without an image"
                );
                None
            }
        }
    }
}

fn raw_options(payload: &Value) -> Vec<ScenarioOption> {
    payload
        .get("options")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| ScenarioOption {
                    id: string_field(item, "id").unwrap_or_default(),
                    text: string_field(item, "text").unwrap_or_default(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn build_user_prompt(context: &GameContext, used_ids: &[String]) -> String {
    let used = if used_ids.is_empty() {
        "none".to_string()
    } else {
        used_ids.join(", ")
    };
    format!(
        "Month: {}\n\
         Round: {}\n\
         Learning score: {}/100\n\
         Likability score: {}/100\n\
         Students remaining: {} of {}\n\n\
         Already used scenario ids (never reuse any of these): {}\n\n\
         Generate the next classroom situation as strict JSON.",
        context.month,
        context.round,
        context.learning_score,
        context.likability_score,
        context.students_remaining,
        context.class_size,
        used
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;

    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{
        FinishReason, ImageGenError, ImageResult, LlmResponse, MockImageGenPort, MockLlmPort,
    };
    use homeroom_domain::{Month, MAX_OPTIONS};

    fn context() -> GameContext {
        GameContext {
            month: Month::April,
            round: 3,
            learning_score: 55,
            likability_score: 60,
            students_remaining: 24,
            class_size: 25,
        }
    }

    fn llm_response(content: &str) -> LlmResponse {
        LlmResponse {
            content: content.to_string(),
            finish_reason: FinishReason::Stop,
            usage: None,
        }
    }

    fn fixed_clock() -> Arc<FixedClock> {
        let now = DateTime::from_timestamp(1_743_500_000, 0).expect("valid timestamp");
        Arc::new(FixedClock(now))
    }

    fn generator(llm: MockLlmPort, image_gen: MockImageGenPort) -> GenerateScenario {
        GenerateScenario::new(
            Arc::new(llm),
            Arc::new(image_gen),
            fixed_clock(),
            Arc::new(FixedRandom(0)),
            (1024, 1024),
        )
    }

    const FULL_PAYLOAD: &str = r#"{
        "id": "fire-drill",
        "title": "Unscheduled Fire Drill",
        "prompt": "The alarm blares mid-quiz and half the class cheers.",
        "options": [
            {"id": "a", "text": "March them out in silence"},
            {"id": "b", "text": "Let the quiz wait"},
            {"id": "c", "text": "Finish the question first"},
            {"id": "d", "text": "Race the class outside"}
        ]
    }"#;

    #[tokio::test]
    async fn well_formed_payload_passes_through_with_image() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(1)
            .returning(|_| Ok(llm_response(FULL_PAYLOAD)));
        let mut image_gen = MockImageGenPort::new();
        image_gen.expect_generate().times(1).returning(|_| {
            Ok(ImageResult {
                url: "https://img.example/drill.png".to_string(),
            })
        });

        let scenario = generator(llm, image_gen)
            .execute(context(), &[])
            .await
            .expect("scenario");

        assert_eq!(scenario.id, "fire-drill");
        assert_eq!(scenario.title, "Unscheduled Fire Drill");
        assert_eq!(scenario.options.len(), MAX_OPTIONS);
        assert_eq!(scenario.image_url.as_deref(), Some("https://img.example/drill.png"));
    }

    #[tokio::test]
    async fn missing_fields_fall_back_to_defaults() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(llm_response(r#"{"options": [{"id": "a", "text": "Wait"}]}"#)));
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .returning(|_| Err(ImageGenError::Unavailable));

        let scenario = generator(llm, image_gen)
            .execute(context(), &[])
            .await
            .expect("scenario");

        assert!(scenario.id.starts_with("scenario-"));
        assert_eq!(scenario.title, "April Situation");
        assert_eq!(scenario.prompt, DEFAULT_PROMPT);
        assert_eq!(scenario.options.len(), MAX_OPTIONS);
        for option in &scenario.options {
            assert!(!option.id.trim().is_empty());
            assert!(!option.text.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn used_id_is_replaced_with_a_fresh_one() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(llm_response(FULL_PAYLOAD)));
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .returning(|_| Err(ImageGenError::Unavailable));

        let used = vec!["fire-drill".to_string()];
        let scenario = generator(llm, image_gen)
            .execute(context(), &used)
            .await
            .expect("scenario");

        assert_ne!(scenario.id, "fire-drill");
        assert_eq!(scenario.id, "scenario-1743500000000-0000");
    }

    #[tokio::test]
    async fn used_ids_are_listed_in_the_prompt() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .withf(|request| request.messages[0].content.contains("fire-drill, quiz-day"))
            .returning(|_| Ok(llm_response(FULL_PAYLOAD)));
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .returning(|_| Err(ImageGenError::Unavailable));

        let used = vec!["fire-drill".to_string(), "quiz-day".to_string()];
        generator(llm, image_gen)
            .execute(context(), &used)
            .await
            .expect("scenario");
    }

    #[tokio::test]
    async fn malformed_payload_fails_without_an_image_call() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(llm_response("The dog ate my JSON.")));
        let mut image_gen = MockImageGenPort::new();
        image_gen.expect_generate().times(0);

        let result = generator(llm, image_gen).execute(context(), &[]).await;
        assert!(matches!(result, Err(ScenarioError::Parse(_))));
    }

    #[tokio::test]
    async fn llm_failure_is_fatal() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("boom".to_string())));
        let mut image_gen = MockImageGenPort::new();
        image_gen.expect_generate().times(0);

        let result = generator(llm, image_gen).execute(context(), &[]).await;
        assert!(matches!(result, Err(ScenarioError::Llm(_))));
    }

    #[tokio::test]
    async fn image_failure_never_fails_the_request() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Ok(llm_response(FULL_PAYLOAD)));
        let mut image_gen = MockImageGenPort::new();
        image_gen
            .expect_generate()
            .returning(|_| Err(ImageGenError::GenerationFailed("outage".to_string())));

        let scenario = generator(llm, image_gen)
            .execute(context(), &[])
            .await
            .expect("scenario");
        assert_eq!(scenario.image_url, None);
        assert_eq!(scenario.id, "fire-drill");
    }
}
