//! Per-request game state supplied by the client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar month of the current round, serialized as the capitalized
/// English name (e.g. `"April"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Snapshot of the running game for one request.
///
/// Transient: supplied by the client on every call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameContext {
    pub month: Month,
    /// 1-based round counter within the school year.
    pub round: u32,
    /// Class learning score, 0-100.
    pub learning_score: i32,
    /// Teacher likability score, 0-100.
    pub likability_score: i32,
    pub students_remaining: u32,
    pub class_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_serializes_as_capitalized_name() {
        let json = serde_json::to_string(&Month::April).expect("serialize month");
        assert_eq!(json, "\"April\"");
    }

    #[test]
    fn month_deserializes_from_capitalized_name() {
        let month: Month = serde_json::from_str("\"September\"").expect("deserialize month");
        assert_eq!(month, Month::September);
    }

    #[test]
    fn month_display_matches_name() {
        assert_eq!(Month::December.to_string(), "December");
    }
}
