//! Quick-pick goal labels offered on the first stage.

use tracing::warn;

use crate::error::{SessionError, SessionResult};

pub const DEFAULT_SUGGESTIONS: [&str; 11] = [
    "Exercise",
    "Read",
    "Meditate",
    "Drink Water",
    "Learn a Skill",
    "Sleep Early",
    "Practice Coding",
    "Journal",
    "Healthy Eating",
    "Study",
    "Morning Routine",
];

/// Ordered list of short goal labels
pub trait SuggestionSource: Send + Sync {
    fn suggestions(&self) -> &[String];
}

/// Fixed suggestion list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticSuggestions {
    labels: Vec<String>,
}

impl StaticSuggestions {
    /// Use `labels`, or the default list when `labels` is empty
    pub fn new<I, S>(labels: I) -> SessionResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            warn!("No suggestions configured, using defaults");
            return Ok(Self::default());
        }
        if let Some(index) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(SessionError::BlankSuggestion { index });
        }
        Ok(Self { labels })
    }
}

impl Default for StaticSuggestions {
    fn default() -> Self {
        Self {
            labels: DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SuggestionSource for StaticSuggestions {
    fn suggestions(&self) -> &[String] {
        &self.labels
    }
}

/// Message text submitted when a suggestion is picked
pub fn suggestion_message(label: &str) -> String {
    format!("I want to {}", label.to_lowercase())
}
