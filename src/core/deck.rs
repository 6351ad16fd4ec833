use crate::models::{CandidateCard, CardKey, DeckSnapshot, OutboxReport, UserProfile};
use crate::services::{
    DirectoryError, MatchDirectory, Navigator, OutboxError, RetryPolicy, UserDirectory,
    VerdictOutbox,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Photo shown for candidates without one
pub const DEFAULT_PLACEHOLDER_PHOTO: &str = "http://semantic-ui.com/images/avatar/large/chris.jpg";

/// Which directory lookup failed during population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    CurrentUser,
    MatchLinks,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::CurrentUser => write!(f, "fetch current user"),
            FetchStage::MatchLinks => write!(f, "fetch match links"),
        }
    }
}

/// Errors surfaced by deck operations
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("No session stored, redirected to landing")]
    SessionMissing,

    #[error("Failed to {stage}: {source}")]
    DirectoryFetch {
        stage: FetchStage,
        #[source]
        source: DirectoryError,
    },

    #[error("Failed to fetch filtered candidates: {0}")]
    FilterFetch(#[source] DirectoryError),

    #[error("Card index {index} out of bounds (deck has {len} cards)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("No viewer resolved, populate the deck first")]
    NoViewer,

    #[error("Unknown interest code: {0}")]
    UnknownInterest(u8),

    #[error(transparent)]
    Outbox(#[from] OutboxError),
}

/// Deck behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOptions {
    pub placeholder_photo_url: String,
    pub max_concurrent_resolutions: usize,
    pub preserve_link_order: bool,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            placeholder_photo_url: DEFAULT_PLACEHOLDER_PHOTO.to_string(),
            max_concurrent_resolutions: 8,
            preserve_link_order: true,
        }
    }
}

/// The viewer's candidate list and everything that mutates it
///
/// Population lives in `synchronizer`, verdicts in `verdict`, flips in
/// `face` and filtering in `filter`. Cards are addressed by [`CardKey`];
/// keys are unique within the deck.
pub struct MatchDeck {
    pub(crate) cards: Vec<CandidateCard>,
    pub(crate) viewer: Option<UserProfile>,
    pub(crate) users: Arc<dyn UserDirectory>,
    pub(crate) matches: Arc<dyn MatchDirectory>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) outbox: VerdictOutbox,
    pub(crate) options: DeckOptions,
}

impl MatchDeck {
    /// Create an empty deck; starts the outbox worker on the current runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, since the outbox worker is
    /// spawned here.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        matches: Arc<dyn MatchDirectory>,
        navigator: Arc<dyn Navigator>,
        options: DeckOptions,
        retry: RetryPolicy,
    ) -> Self {
        let outbox = VerdictOutbox::spawn(matches.clone(), retry);
        Self {
            cards: Vec::new(),
            viewer: None,
            users,
            matches,
            navigator,
            outbox,
            options,
        }
    }

    /// Same as [`MatchDeck::new`] for a directory serving both traits
    ///
    /// # Panics
    ///
    /// Panics outside a Tokio runtime, like [`MatchDeck::new`].
    pub fn with_directory<D>(
        directory: Arc<D>,
        navigator: Arc<dyn Navigator>,
        options: DeckOptions,
        retry: RetryPolicy,
    ) -> Self
    where
        D: UserDirectory + MatchDirectory + 'static,
    {
        Self::new(directory.clone(), directory, navigator, options, retry)
    }

    pub fn cards(&self) -> &[CandidateCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn viewer(&self) -> Option<&UserProfile> {
        self.viewer.as_ref()
    }

    pub fn viewer_id(&self) -> Option<i64> {
        self.viewer.as_ref().map(|viewer| viewer.id)
    }

    pub fn options(&self) -> &DeckOptions {
        &self.options
    }

    pub fn position(&self, key: CardKey) -> Option<usize> {
        self.cards.iter().position(|card| card.key() == key)
    }

    pub fn get(&self, key: CardKey) -> Option<&CandidateCard> {
        self.cards.iter().find(|card| card.key() == key)
    }

    pub(crate) fn get_mut(&mut self, key: CardKey) -> Option<&mut CandidateCard> {
        self.cards.iter_mut().find(|card| card.key() == key)
    }

    /// Key of the card at `index`
    pub fn key_at(&self, index: usize) -> Result<CardKey, DeckError> {
        self.cards
            .get(index)
            .map(CandidateCard::key)
            .ok_or(DeckError::IndexOutOfBounds {
                index,
                len: self.cards.len(),
            })
    }

    /// Append a fresh card for `profile`; false if its key is already present
    pub(crate) fn push_candidate(&mut self, profile: UserProfile) -> bool {
        let key = CardKey(profile.id);
        if self.position(key).is_some() {
            tracing::debug!("Skipping duplicate candidate {}", key);
            return false;
        }
        self.cards
            .push(CandidateCard::new(profile, &self.options.placeholder_photo_url));
        true
    }

    /// Writes queued or in flight
    pub fn pending_writes(&self) -> usize {
        self.outbox.pending()
    }

    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            viewer_id: self.viewer_id(),
            cards: self.cards.clone(),
            taken_at: chrono::Utc::now(),
        }
    }

    /// Tear the deck down, delivering every queued write first
    pub async fn shutdown(self) -> Result<OutboxReport, DeckError> {
        let report = self.outbox.close().await?;
        tracing::info!(
            "Deck closed: {} writes delivered, {} failed",
            report.delivered,
            report.failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{InMemoryDirectory, LogNavigator};

    fn deck() -> MatchDeck {
        MatchDeck::with_directory(
            Arc::new(InMemoryDirectory::new()),
            Arc::new(LogNavigator),
            DeckOptions::default(),
            RetryPolicy::no_retry(),
        )
    }

    #[tokio::test]
    async fn test_push_candidate_rejects_duplicate_keys() {
        let mut deck = deck();
        assert!(deck.push_candidate(UserProfile::new(5)));
        assert!(!deck.push_candidate(UserProfile::new(5).with_photo("http://cdn.test/5.png")));

        assert_eq!(deck.len(), 1);
        assert_eq!(deck.cards()[0].photo_url(), DEFAULT_PLACEHOLDER_PHOTO);
    }

    #[test]
    #[should_panic]
    fn test_new_outside_runtime_panics() {
        deck();
    }

    #[tokio::test]
    async fn test_key_at_out_of_bounds() {
        let mut deck = deck();
        deck.push_candidate(UserProfile::new(1));

        assert_eq!(deck.key_at(0).unwrap(), CardKey(1));
        let err = deck.key_at(3).unwrap_err();
        assert!(matches!(err, DeckError::IndexOutOfBounds { index: 3, len: 1 }));
    }

    #[tokio::test]
    async fn test_snapshot_serializes_cards() {
        let mut deck = deck();
        deck.push_candidate(UserProfile::new(9));

        let json = serde_json::to_value(deck.snapshot()).unwrap();
        assert_eq!(json["cards"][0]["user"]["id"], 9);
        assert_eq!(json["cards"][0]["verdict"], "none");
        assert_eq!(json["cards"][0]["face"], "front");
        assert!(json["viewerId"].is_null());
    }
}
