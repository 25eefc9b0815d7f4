//! Generated classroom scenarios.

use serde::{Deserialize, Serialize};

/// Every scenario carries exactly this many selectable options.
pub const MAX_OPTIONS: usize = 4;

/// One round's generated classroom situation with selectable options.
///
/// Created fresh per request and never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub options: Vec<ScenarioOption>,
    pub image_url: Option<String>,
}

/// A selectable response within a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioOption {
    pub id: String,
    pub text: String,
}

impl ScenarioOption {
    fn placeholder(index: usize) -> Self {
        Self {
            id: format!("option-{}", index + 1),
            text: format!("Option {}", index + 1),
        }
    }

    fn is_blank(&self) -> bool {
        self.id.trim().is_empty() || self.text.trim().is_empty()
    }
}

/// Enforce the option invariants on an upstream-supplied list.
///
/// Truncates to [`MAX_OPTIONS`], pads short lists, and substitutes a
/// placeholder for any entry with a blank id or text, so the result always
/// holds exactly four options with non-empty fields.
pub fn normalize_options(raw: Vec<ScenarioOption>) -> Vec<ScenarioOption> {
    (0..MAX_OPTIONS)
        .map(|i| match raw.get(i) {
            Some(option) if !option.is_blank() => option.clone(),
            _ => ScenarioOption::placeholder(i),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, text: &str) -> ScenarioOption {
        ScenarioOption {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn normalize_keeps_four_well_formed_options() {
        let raw = vec![
            option("a", "Stay calm"),
            option("b", "Call a meeting"),
            option("c", "Assign homework"),
            option("d", "Ignore it"),
        ];
        assert_eq!(normalize_options(raw.clone()), raw);
    }

    #[test]
    fn normalize_truncates_excess_options() {
        let raw = (0..6).map(|i| option(&format!("o{i}"), "text")).collect();
        let normalized = normalize_options(raw);
        assert_eq!(normalized.len(), MAX_OPTIONS);
        assert_eq!(normalized[3].id, "o3");
    }

    #[test]
    fn normalize_pads_short_lists_with_placeholders() {
        let normalized = normalize_options(vec![option("a", "Stay calm")]);
        assert_eq!(normalized.len(), MAX_OPTIONS);
        assert_eq!(normalized[0].id, "a");
        assert_eq!(normalized[1].id, "option-2");
        assert_eq!(normalized[3].text, "Option 4");
    }

    #[test]
    fn normalize_replaces_blank_entries() {
        let raw = vec![
            option("", "Stay calm"),
            option("b", "   "),
            option("c", "Assign homework"),
            option("d", "Ignore it"),
        ];
        let normalized = normalize_options(raw);
        assert_eq!(normalized[0].id, "option-1");
        assert_eq!(normalized[1].text, "Option 2");
        assert_eq!(normalized[2].id, "c");
    }

    #[test]
    fn normalize_never_yields_empty_fields() {
        let normalized = normalize_options(vec![]);
        assert_eq!(normalized.len(), MAX_OPTIONS);
        for opt in &normalized {
            assert!(!opt.id.trim().is_empty());
            assert!(!opt.text.trim().is_empty());
        }
    }

    #[test]
    fn scenario_serializes_image_url_as_camel_case_null() {
        let scenario = Scenario {
            id: "s1".to_string(),
            title: "April Situation".to_string(),
            prompt: "A quiet morning".to_string(),
            options: vec![option("a", "Stay calm")],
            image_url: None,
        };
        let json = serde_json::to_value(&scenario).expect("serialize scenario");
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(json["options"][0]["id"], "a");
    }
}
