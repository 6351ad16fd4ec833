// Core deck exports
pub mod deck;
pub mod face;
pub mod filter;
pub mod synchronizer;
pub mod verdict;

pub use deck::{DeckError, DeckOptions, FetchStage, MatchDeck, DEFAULT_PLACEHOLDER_PHOTO};
pub use verdict::{Transition, VerdictOutcome};
