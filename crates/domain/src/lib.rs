//! Homeroom domain.
//!
//! Core game types and the pure scoring rules for the classroom simulation:
//! score clamping, bounded perturbation, and the catastrophic-branch formula.
//! No I/O lives here; randomness is injected via closure so every rule stays
//! deterministic under test.

pub mod choice;
pub mod context;
pub mod evaluation;
pub mod scenario;
pub mod scoring;

pub use choice::Choice;
pub use context::{GameContext, Month};
pub use evaluation::EvaluationResult;
pub use scenario::{normalize_options, Scenario, ScenarioOption, MAX_OPTIONS};
