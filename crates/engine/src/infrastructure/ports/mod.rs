//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - LLM calls (could swap OpenAI -> Ollama/Claude)
//! - Image generation (could swap providers)
//! - Clock/Random (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatMessage, FinishReason, ImageGenPort, ImageRequest, ImageResult, LlmPort, LlmRequest,
    LlmResponse, MessageRole, TokenUsage,
};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use external::{MockImageGenPort, MockLlmPort};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::{ImageGenError, LlmError};
