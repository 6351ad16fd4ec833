use crate::core::deck::{DeckError, FetchStage, MatchDeck};
use crate::models::{MatchLink, PopulateReport, UserProfile};
use crate::services::{DirectoryError, Route, SessionStore};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;

type Resolution = (usize, MatchLink, Result<UserProfile, DirectoryError>);

impl MatchDeck {
    /// Rebuild the candidate list for the logged-in viewer
    ///
    /// # Steps
    /// 1. An empty session redirects to landing without any directory call
    /// 2. Resolve the viewer
    /// 3. Fetch the viewer's match links
    /// 4. Resolve every link (bounded fan-out), appending one card per success
    ///
    /// A link that fails to resolve is logged and left out; the others carry
    /// on. Failing steps 2 or 3 abandons the pass with an empty list.
    pub async fn populate(&mut self, session: &SessionStore) -> Result<PopulateReport, DeckError> {
        if session.is_empty() {
            tracing::warn!("No session stored, redirecting to {}", Route::Landing.path());
            self.navigator.navigate(Route::Landing);
            return Err(DeckError::SessionMissing);
        }

        self.cards.clear();
        self.viewer = None;

        let viewer = match self.users.get_current_user().await {
            Ok(viewer) => viewer,
            Err(e) => {
                tracing::error!("Error getting current user: {}", e);
                return Err(DeckError::DirectoryFetch {
                    stage: FetchStage::CurrentUser,
                    source: e,
                });
            }
        };
        let viewer_id = viewer.id;
        if session.user_id().is_some_and(|id| id != viewer_id) {
            tracing::warn!(
                "Session user id {:?} differs from current user {}, using current user",
                session.user_id(),
                viewer_id
            );
        }
        self.viewer = Some(viewer);

        let links = match self.matches.get_matching_drivers(viewer_id).await {
            Ok(links) => links,
            Err(e) => {
                tracing::error!("Error getting match links for {}: {}", viewer_id, e);
                return Err(DeckError::DirectoryFetch {
                    stage: FetchStage::MatchLinks,
                    source: e,
                });
            }
        };

        let mut report = PopulateReport {
            links: links.len(),
            ..PopulateReport::default()
        };
        tracing::info!("Resolving {} match links for user {}", links.len(), viewer_id);

        let mut resolutions = self.resolve_links(links);
        while let Some((position, link, result)) = resolutions.next().await {
            match result {
                Ok(profile) if profile.id == viewer_id => {
                    tracing::debug!("Link #{} ({}) points at the viewer, skipping", position, link.href);
                    report.skipped += 1;
                }
                Ok(profile) => {
                    if self.push_candidate(profile) {
                        report.resolved += 1;
                    } else {
                        report.skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!("Error getting match user from link #{} ({}): {}", position, link.href, e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Populated deck for user {}: {} cards ({} failed, {} skipped)",
            viewer_id,
            report.resolved,
            report.failed,
            report.skipped
        );
        Ok(report)
    }

    /// Stream of link resolutions, at most `max_concurrent_resolutions` in flight
    fn resolve_links(&self, links: Vec<MatchLink>) -> BoxStream<'static, Resolution> {
        let matches = Arc::clone(&self.matches);
        let limit = self.options.max_concurrent_resolutions.max(1);

        let requests = stream::iter(links.into_iter().enumerate()).map(move |(position, link)| {
            let matches = Arc::clone(&matches);
            async move {
                let result = matches.get_from_link(&link).await;
                (position, link, result)
            }
        });

        if self.options.preserve_link_order {
            requests.buffered(limit).boxed()
        } else {
            requests.buffer_unordered(limit).boxed()
        }
    }
}
