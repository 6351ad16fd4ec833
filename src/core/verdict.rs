use crate::core::deck::{DeckError, MatchDeck};
use crate::models::{CardKey, Interest, PendingWrite, VerdictState, VerdictWrite};

/// What a verdict does to one card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: VerdictState,
    pub remove: bool,
    /// Remote writes, in issue order
    pub writes: &'static [VerdictWrite],
}

impl VerdictState {
    pub fn transition(self, interest: Interest) -> Transition {
        match interest {
            Interest::Like => Transition {
                next: VerdictState::Liked,
                remove: false,
                writes: &[VerdictWrite::UnDislike, VerdictWrite::Like],
            },
            Interest::Dislike => Transition {
                next: VerdictState::Disliked,
                remove: false,
                writes: &[VerdictWrite::Unlike, VerdictWrite::Dislike],
            },
            Interest::Clear => Transition {
                next: VerdictState::None,
                remove: false,
                writes: &[VerdictWrite::Unlike, VerdictWrite::UnDislike],
            },
            // only a disliked card can be trashed
            Interest::Trash => Transition {
                next: self,
                remove: self == VerdictState::Disliked,
                writes: &[],
            },
        }
    }
}

/// Result of applying a verdict to the deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictOutcome {
    Applied(VerdictState),
    Removed,
    Unchanged,
    /// The key is not in the deck (anymore)
    Missing,
}

impl MatchDeck {
    /// Apply `interest` to the card keyed `key`
    ///
    /// Local state changes immediately. The remote writes go through the
    /// outbox and are not awaited; a write that ends up failing does not
    /// undo the local change.
    pub fn apply_verdict(
        &mut self,
        key: CardKey,
        interest: Interest,
    ) -> Result<VerdictOutcome, DeckError> {
        let Some(index) = self.position(key) else {
            tracing::debug!("Verdict {:?} for missing card {}, ignoring", interest, key);
            return Ok(VerdictOutcome::Missing);
        };

        let transition = self.cards[index].verdict.transition(interest);

        if transition.remove {
            self.cards.remove(index);
            tracing::debug!("Trashed card {}", key);
            return Ok(VerdictOutcome::Removed);
        }
        if transition.writes.is_empty() {
            return Ok(VerdictOutcome::Unchanged);
        }

        let viewer_id = self.viewer_id().ok_or(DeckError::NoViewer)?;
        self.cards[index].verdict = transition.next;

        for kind in transition.writes {
            self.outbox
                .enqueue(PendingWrite::new(viewer_id, key.0, *kind))?;
        }

        tracing::debug!("Card {} is now {:?}", key, transition.next);
        Ok(VerdictOutcome::Applied(transition.next))
    }

    /// Positional form of [`MatchDeck::apply_verdict`]
    pub fn apply_verdict_at(
        &mut self,
        index: usize,
        interest: Interest,
    ) -> Result<VerdictOutcome, DeckError> {
        let key = self.key_at(index)?;
        self.apply_verdict(key, interest)
    }

    /// Apply a verdict given as the web client's numeric interest code
    pub fn apply_verdict_code(&mut self, key: CardKey, code: u8) -> Result<VerdictOutcome, DeckError> {
        let interest = Interest::from_code(code).ok_or(DeckError::UnknownInterest(code))?;
        self.apply_verdict(key, interest)
    }
}
