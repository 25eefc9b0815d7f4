//! The player's response to a scenario.

use serde::{Deserialize, Serialize};

/// Longest slice of custom text carried into image prompts and summaries.
pub const CUSTOM_TEXT_SUMMARY_LIMIT: usize = 200;

/// Either a selected scenario option or free text typed by the player.
///
/// Wire format is tagged: `{"type": "option", "optionId": ...}` or
/// `{"type": "custom", "customText": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Choice {
    #[serde(rename = "option", rename_all = "camelCase")]
    Option { option_id: String },
    #[serde(rename = "custom", rename_all = "camelCase")]
    Custom { custom_text: String },
}

impl Choice {
    /// Free text of a custom choice, if this is one.
    pub fn custom_text(&self) -> Option<&str> {
        match self {
            Choice::Custom { custom_text } => Some(custom_text),
            Choice::Option { .. } => None,
        }
    }

    /// Short textual summary for logs and image prompts: the option id, or
    /// custom text truncated to [`CUSTOM_TEXT_SUMMARY_LIMIT`] characters.
    pub fn summary(&self) -> String {
        match self {
            Choice::Option { option_id } => option_id.clone(),
            Choice::Custom { custom_text } => {
                custom_text.chars().take(CUSTOM_TEXT_SUMMARY_LIMIT).collect()
            }
        }
    }
}
