use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::{self, EventInput, ScoringVersion};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvent {
    pub name: String,
    pub input: EventInput,
    pub scoring_version: ScoringVersion,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

impl ScoredEvent {
    pub fn from_input(name: &str, input: EventInput, version: ScoringVersion) -> Self {
        let score = scoring::score_event(&input, version);
        tracing::debug!(
            name,
            event_type = %input.event_type,
            version = %version,
            score,
            "scored event"
        );
        Self {
            name: name.trim().to_string(),
            input,
            scoring_version: version,
            score,
            timestamp: Utc::now(),
        }
    }

    /// Name shown in the table and chart; blank names get a positional label.
    pub fn display_name(&self, position: usize) -> String {
        if self.name.is_empty() {
            format!("Event {}", position + 1)
        } else {
            self.name.clone()
        }
    }
}
