//! Safety denylist for free-text choices.
//!
//! Deterministic and purely local: the scoring service is never consulted
//! when a rule matches. The rule set is configuration data - a compiled-in
//! default list plus whatever patterns the deployment appends.

use regex_lite::Regex;

/// Default denylist, matched against lowercased text.
///
/// Small and knowingly incomplete: it targets phrases of violent intent
/// toward the class (running students over, killing, burning, hitting).
const DEFAULT_PATTERNS: &[&str] = &[
    r"\brun(?:ning)?\s+(?:them|him|her|the\s+(?:kids|students|children|class))\s+over",
    r"\brun\s+over\s+(?:them|the\s+(?:kids|students|children|class))",
    r"\bkill",
    r"\bmurder",
    r"\bstab",
    r"\bshoot",
    r"\bstrangle",
    r"\bpoison",
    r"\bburn(?:ing)?\s+(?:down\s+)?(?:the\s+)?(?:school|classroom|class|students)",
    r"\bset\s+(?:the\s+)?\w*\s*on\s+fire",
    r"\bhit(?:ting)?\s+(?:a|the|my)?\s*(?:kid|child|student|pupil)",
    r"\bbeat(?:ing)?\s+(?:up\s+)?(?:a|the)?\s*(?:kid|child|student)",
    r"\bpunch(?:ing)?\s+(?:a|the)?\s*(?:kid|child|student)",
    r"\bhurt\s+(?:the\s+)?(?:kids|children|students)",
];

/// Compiled denylist applied to the player's free text.
pub struct SafetyFilter {
    rules: Vec<Regex>,
}

impl SafetyFilter {
    /// Compile the default rules plus `extra` configured patterns.
    ///
    /// An invalid configured pattern is logged and skipped; it never takes
    /// the filter down.
    pub fn from_patterns(extra: &[String]) -> Self {
        let rules = DEFAULT_PATTERNS
            .iter()
            .copied()
            .map(str::to_string)
            .chain(extra.iter().cloned())
            .filter_map(|pattern| match Regex::new(&pattern) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "Skipping invalid safety pattern");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// True when the text matches any denylist rule. Case-insensitive.
    pub fn is_catastrophic(&self, text: &str) -> bool {
        let normalized = text.to_lowercase();
        self.rules.iter().any(|rule| rule.is_match(&normalized))
    }
}

impl Default for SafetyFilter {
    fn default() -> Self {
        Self::from_patterns(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_running_students_over() {
        let filter = SafetyFilter::default();
        assert!(filter.is_catastrophic("run them over with my car"));
        assert!(filter.is_catastrophic("I would run over the students"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let filter = SafetyFilter::default();
        assert!(filter.is_catastrophic("RUN THE KIDS OVER"));
        assert!(filter.is_catastrophic("Kill the mood entirely"));
    }

    #[test]
    fn flags_burning_and_hitting() {
        let filter = SafetyFilter::default();
        assert!(filter.is_catastrophic("burn down the school"));
        assert!(filter.is_catastrophic("set the gym on fire"));
        assert!(filter.is_catastrophic("hit a student who talks back"));
    }

    #[test]
    fn ignores_ordinary_classroom_text() {
        let filter = SafetyFilter::default();
        assert!(!filter.is_catastrophic("organize a study group after class"));
        assert!(!filter.is_catastrophic("teach conflict resolution skills"));
        assert!(!filter.is_catastrophic("let the class vote on the field trip"));
    }

    #[test]
    fn is_deterministic_for_the_same_text() {
        let filter = SafetyFilter::default();
        let text = "run them over";
        let first = filter.is_catastrophic(text);
        for _ in 0..10 {
            assert_eq!(filter.is_catastrophic(text), first);
        }
        assert!(first);
    }

    #[test]
    fn configured_patterns_extend_the_denylist() {
        let filter = SafetyFilter::from_patterns(&[r"\bexpel\s+everyone".to_string()]);
        assert!(filter.is_catastrophic("just expel everyone and go home"));
    }

    #[test]
    fn invalid_configured_patterns_are_skipped() {
        let filter = SafetyFilter::from_patterns(&["(unclosed".to_string()]);
        // Defaults still work; the bad pattern is dropped rather than fatal.
        assert!(filter.is_catastrophic("run them over"));
        assert!(!filter.is_catastrophic("(unclosed"));
    }
}
