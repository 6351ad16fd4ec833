use crate::models::{FilterSpec, MatchLink, UserProfile, VerdictWrite};
use crate::services::directory::{DirectoryError, MatchDirectory, UserDirectory};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Mutex;

/// Directory operations, used for call accounting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentUser,
    User,
    MatchingDrivers,
    FromLink,
    Write(VerdictWrite),
    Filtered,
}

#[derive(Default)]
struct Recorded {
    calls: Vec<Operation>,
    writes: Vec<(VerdictWrite, i64, i64)>,
    likes: HashSet<(i64, i64)>,
    dislikes: HashSet<(i64, i64)>,
    flaky: HashMap<Operation, usize>,
}

/// In-process directory
///
/// Serves a fixed data set and keeps the like/dislike sets a real matching
/// service would record. Operations and individual links can be made to fail
/// permanently, or a fixed number of times before succeeding.
#[derive(Default)]
pub struct InMemoryDirectory {
    current_user: Option<UserProfile>,
    users: HashMap<i64, UserProfile>,
    links: HashMap<i64, Vec<MatchLink>>,
    by_href: HashMap<String, UserProfile>,
    filtered: HashMap<i64, Vec<UserProfile>>,
    failing: HashSet<Operation>,
    failing_hrefs: HashSet<String>,
    delays: HashMap<String, Duration>,
    recorded: Mutex<Recorded>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current_user(mut self, user: UserProfile) -> Self {
        self.users.insert(user.id, user.clone());
        self.current_user = Some(user);
        self
    }

    /// Register `candidate` as a match for `viewer_id`, reachable at `/users/{id}`
    pub fn with_candidate(mut self, viewer_id: i64, candidate: UserProfile) -> Self {
        let href = format!("/users/{}", candidate.id);
        self.links
            .entry(viewer_id)
            .or_default()
            .push(MatchLink::new(href.clone()));
        self.by_href.insert(href, candidate.clone());
        self.users.insert(candidate.id, candidate);
        self
    }

    /// Add a link that resolves to nothing
    pub fn with_dangling_link(mut self, viewer_id: i64, href: &str) -> Self {
        self.links
            .entry(viewer_id)
            .or_default()
            .push(MatchLink::new(href));
        self
    }

    pub fn with_filtered(mut self, viewer_id: i64, profiles: Vec<UserProfile>) -> Self {
        self.filtered.insert(viewer_id, profiles);
        self
    }

    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    pub fn failing_link(mut self, href: &str) -> Self {
        self.failing_hrefs.insert(href.to_string());
        self
    }

    /// Fail `operation` the next `times` calls, then succeed
    pub fn flaky(mut self, operation: Operation, times: usize) -> Self {
        self.recorded.get_mut().flaky.insert(operation, times);
        self
    }

    pub fn delayed_link(mut self, href: &str, delay: Duration) -> Self {
        self.delays.insert(href.to_string(), delay);
        self
    }

    /// Every call made so far, in order
    pub async fn calls(&self) -> Vec<Operation> {
        self.recorded.lock().await.calls.clone()
    }

    /// Every successful verdict write, in delivery order
    pub async fn writes(&self) -> Vec<(VerdictWrite, i64, i64)> {
        self.recorded.lock().await.writes.clone()
    }

    pub async fn is_liked(&self, user_id: i64, other_id: i64) -> bool {
        self.recorded.lock().await.likes.contains(&(user_id, other_id))
    }

    pub async fn is_disliked(&self, user_id: i64, other_id: i64) -> bool {
        self.recorded.lock().await.dislikes.contains(&(user_id, other_id))
    }

    async fn enter(&self, operation: Operation) -> Result<(), DirectoryError> {
        let mut recorded = self.recorded.lock().await;
        recorded.calls.push(operation);

        if self.failing.contains(&operation) {
            return Err(DirectoryError::Unavailable(format!("{:?} disabled", operation)));
        }
        if let Some(remaining) = recorded.flaky.get_mut(&operation) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(DirectoryError::Unavailable(format!("{:?} flaking", operation)));
            }
        }
        Ok(())
    }

    async fn record_write(
        &self,
        kind: VerdictWrite,
        user_id: i64,
        other_id: i64,
    ) -> Result<(), DirectoryError> {
        self.enter(Operation::Write(kind)).await?;

        let mut recorded = self.recorded.lock().await;
        let pair = (user_id, other_id);
        match kind {
            VerdictWrite::Like => recorded.likes.insert(pair),
            VerdictWrite::Unlike => recorded.likes.remove(&pair),
            VerdictWrite::Dislike => recorded.dislikes.insert(pair),
            VerdictWrite::UnDislike => recorded.dislikes.remove(&pair),
        };
        recorded.writes.push((kind, user_id, other_id));
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn get_current_user(&self) -> Result<UserProfile, DirectoryError> {
        self.enter(Operation::CurrentUser).await?;
        self.current_user
            .clone()
            .ok_or(DirectoryError::Unauthorized)
    }

    async fn get_user(&self, user_id: i64) -> Result<UserProfile, DirectoryError> {
        self.enter(Operation::User).await?;
        self.users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("user {}", user_id)))
    }
}

#[async_trait]
impl MatchDirectory for InMemoryDirectory {
    async fn get_matching_drivers(&self, user_id: i64) -> Result<Vec<MatchLink>, DirectoryError> {
        self.enter(Operation::MatchingDrivers).await?;
        Ok(self.links.get(&user_id).cloned().unwrap_or_default())
    }

    async fn get_from_link(&self, link: &MatchLink) -> Result<UserProfile, DirectoryError> {
        self.enter(Operation::FromLink).await?;

        if let Some(delay) = self.delays.get(&link.href) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_hrefs.contains(&link.href) {
            return Err(DirectoryError::Unavailable(format!("link {} disabled", link.href)));
        }
        self.by_href
            .get(&link.href)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(format!("link {}", link.href)))
    }

    async fn like_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        self.record_write(VerdictWrite::Like, user_id, other_id).await
    }

    async fn unlike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        self.record_write(VerdictWrite::Unlike, user_id, other_id).await
    }

    async fn dislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        self.record_write(VerdictWrite::Dislike, user_id, other_id).await
    }

    async fn undislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        self.record_write(VerdictWrite::UnDislike, user_id, other_id).await
    }

    async fn get_filtered_drivers(
        &self,
        user_id: i64,
        _filter: &FilterSpec,
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        self.enter(Operation::Filtered).await?;
        Ok(self.filtered.get(&user_id).cloned().unwrap_or_default())
    }
}
