use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::domain::UserProfile;

/// Stable identity of a card: the candidate's user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardKey(pub i64);

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CardKey {
    fn from(value: i64) -> Self {
        CardKey(value)
    }
}

/// Verdict recorded locally for a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictState {
    #[default]
    None,
    Liked,
    Disliked,
}

/// Orientation of a card, including the two mid-flip states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaceState {
    #[default]
    Front,
    FrontToBack,
    Back,
    BackToFront,
}

/// User judgment on a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Dislike,
    Like,
    Trash,
    Clear,
}

impl Interest {
    /// Decode the numeric codes used by the web client: 0 dislike, 1 like,
    /// 2 trash, 3 clear
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Interest::Dislike),
            1 => Some(Interest::Like),
            2 => Some(Interest::Trash),
            3 => Some(Interest::Clear),
            _ => None,
        }
    }
}

/// One remote write derived from a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictWrite {
    Like,
    Unlike,
    Dislike,
    UnDislike,
}

/// A candidate as presented to the viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateCard {
    pub user: UserProfile,
    pub verdict: VerdictState,
    pub face: FaceState,
}

impl CandidateCard {
    /// Fresh card for `user`, normalizing its photo first
    pub fn new(mut user: UserProfile, placeholder_photo: &str) -> Self {
        user.normalize_photo(placeholder_photo);
        Self {
            user,
            verdict: VerdictState::None,
            face: FaceState::Front,
        }
    }

    pub fn key(&self) -> CardKey {
        CardKey(self.user.id)
    }

    pub fn photo_url(&self) -> &str {
        self.user.photo_url.as_deref().unwrap_or_default()
    }
}
