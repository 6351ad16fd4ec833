use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FilterSpec, MatchLink, PendingWrite, UserProfile, VerdictWrite};

/// Errors that can occur when talking to the user or match directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: missing or rejected session token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// User lookups
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Profile of the authenticated user
    async fn get_current_user(&self) -> Result<UserProfile, DirectoryError>;

    /// Full profile for a single user id
    async fn get_user(&self, user_id: i64) -> Result<UserProfile, DirectoryError>;
}

/// Candidate lookups and verdict writes
#[async_trait]
pub trait MatchDirectory: Send + Sync {
    async fn get_matching_drivers(&self, user_id: i64) -> Result<Vec<MatchLink>, DirectoryError>;

    async fn get_from_link(&self, link: &MatchLink) -> Result<UserProfile, DirectoryError>;

    async fn like_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError>;

    async fn unlike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError>;

    async fn dislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError>;

    async fn undislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError>;

    async fn get_filtered_drivers(
        &self,
        user_id: i64,
        filter: &FilterSpec,
    ) -> Result<Vec<UserProfile>, DirectoryError>;

    /// Dispatch a queued write to the matching call
    async fn send(&self, write: &PendingWrite) -> Result<(), DirectoryError> {
        match write.kind {
            VerdictWrite::Like => self.like_driver(write.user_id, write.other_id).await,
            VerdictWrite::Unlike => self.unlike_driver(write.user_id, write.other_id).await,
            VerdictWrite::Dislike => self.dislike_driver(write.user_id, write.other_id).await,
            VerdictWrite::UnDislike => self.undislike_driver(write.user_id, write.other_id).await,
        }
    }
}
