use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::card::VerdictWrite;

/// A verdict write waiting in the outbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingWrite {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "otherId")]
    pub other_id: i64,
    pub kind: VerdictWrite,
    pub queued_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub attempts: u32,
}

impl PendingWrite {
    pub fn new(user_id: i64, other_id: i64, kind: VerdictWrite) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            other_id,
            kind,
            queued_at: chrono::Utc::now(),
            attempts: 0,
        }
    }
}
