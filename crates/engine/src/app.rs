//! Application state and composition.

use std::sync::Arc;

use crate::config::Config;
use crate::infrastructure::clock::{SystemClock, SystemRandom};
use crate::infrastructure::ports::{ClockPort, ImageGenPort, LlmPort, RandomPort};
use crate::use_cases::{EvaluateDecision, GenerateScenario, SafetyFilter};

/// Main application state.
///
/// Holds the two use cases with their ports wired in.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub scenario: GenerateScenario,
    pub evaluation: EvaluateDecision,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(config: &Config, llm: Arc<dyn LlmPort>, image_gen: Arc<dyn ImageGenPort>) -> Self {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
        let safety = SafetyFilter::from_patterns(&config.safety_patterns);
        let image_size = (config.images.width, config.images.height);

        let scenario = GenerateScenario::new(
            llm.clone(),
            image_gen.clone(),
            clock,
            random.clone(),
            image_size,
        );
        let evaluation = EvaluateDecision::new(llm, image_gen, random, safety, image_size);

        Self {
            use_cases: UseCases {
                scenario,
                evaluation,
            },
        }
    }
}
