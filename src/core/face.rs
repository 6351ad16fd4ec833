use crate::core::deck::MatchDeck;
use crate::models::{CandidateCard, CardKey, FaceState};

impl FaceState {
    /// First half of a flip, run when the interaction starts
    pub fn start_flip(self) -> Self {
        match self {
            FaceState::Front => FaceState::FrontToBack,
            FaceState::Back => FaceState::BackToFront,
            other => other,
        }
    }

    /// Second half of a flip, run once the visual effect's delay has elapsed
    pub fn complete_flip(self) -> Self {
        match self {
            FaceState::FrontToBack => FaceState::Back,
            FaceState::BackToFront => FaceState::Front,
            other => other,
        }
    }

    pub fn is_flipping(self) -> bool {
        matches!(self, FaceState::FrontToBack | FaceState::BackToFront)
    }
}

impl CandidateCard {
    pub fn start_flip(&mut self) -> FaceState {
        self.face = self.face.start_flip();
        self.face
    }

    pub fn complete_flip(&mut self) -> FaceState {
        self.face = self.face.complete_flip();
        self.face
    }
}

impl MatchDeck {
    /// `None` if the card is gone
    pub fn start_flip(&mut self, key: CardKey) -> Option<FaceState> {
        self.get_mut(key).map(CandidateCard::start_flip)
    }

    pub fn complete_flip(&mut self, key: CardKey) -> Option<FaceState> {
        self.get_mut(key).map(CandidateCard::complete_flip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_round_trip() {
        let mut face = FaceState::Front;

        face = face.start_flip();
        assert_eq!(face, FaceState::FrontToBack);
        assert!(face.is_flipping());
        face = face.complete_flip();
        assert_eq!(face, FaceState::Back);

        face = face.start_flip().complete_flip();
        assert_eq!(face, FaceState::Front);
    }

    #[test]
    fn test_out_of_phase_calls_are_noops() {
        assert_eq!(FaceState::Front.complete_flip(), FaceState::Front);
        assert_eq!(FaceState::Back.complete_flip(), FaceState::Back);
        assert_eq!(FaceState::FrontToBack.start_flip(), FaceState::FrontToBack);
        assert_eq!(FaceState::BackToFront.start_flip(), FaceState::BackToFront);
    }
}
