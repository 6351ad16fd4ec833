//! Match Deck - candidate deck synchronization for the driver matching app
//!
//! This library keeps a viewer's list of candidate matches in step with the
//! remote matching service: it populates the deck from match links, tracks
//! per-card verdict and flip state, queues verdict writes through a retrying
//! outbox, and swaps the deck out when a filter is applied.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{DeckError, DeckOptions, MatchDeck, VerdictOutcome};
pub use crate::models::{CandidateCard, CardKey, FaceState, FilterSpec, Interest, MatchLink, UserProfile, VerdictState};
pub use crate::services::{HttpMatchDirectory, InMemoryDirectory, MatchDirectory, SessionStore, UserDirectory};
