use serde::{Deserialize, Serialize};
use crate::models::card::CandidateCard;

/// Outcome of a population pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulateReport {
    pub links: usize,
    pub resolved: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Outcome of a filter replacement; `skipped` counts duplicates and the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    pub profiles: usize,
    pub kept: usize,
    pub skipped: usize,
}

/// Delivery totals for a closed outbox
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxReport {
    pub delivered: usize,
    pub failed: usize,
    pub retries: usize,
}

/// Serializable view of the deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSnapshot {
    #[serde(rename = "viewerId")]
    pub viewer_id: Option<i64>,
    pub cards: Vec<CandidateCard>,
    pub taken_at: chrono::DateTime<chrono::Utc>,
}
