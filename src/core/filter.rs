use crate::core::deck::{DeckError, MatchDeck};
use crate::models::{FilterReport, FilterSpec};

impl MatchDeck {
    /// Replace the whole deck with the remote filter's result
    ///
    /// Every card comes back fresh (no verdict, front face). Profiles for
    /// `user_id` or the resolved viewer, and repeated ids, are skipped and
    /// counted in the report. If the fetch fails the current deck is left
    /// exactly as it was.
    pub async fn apply_filter(&mut self, user_id: i64, filter: &FilterSpec) -> Result<FilterReport, DeckError> {
        let profiles = match self.matches.get_filtered_drivers(user_id, filter).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::error!("Error getting filtered matches for {}: {}", user_id, e);
                return Err(DeckError::FilterFetch(e));
            }
        };

        let viewer_id = self.viewer_id();
        let mut report = FilterReport {
            profiles: profiles.len(),
            ..FilterReport::default()
        };

        self.cards.clear();
        for profile in profiles {
            if profile.id == user_id || Some(profile.id) == viewer_id {
                tracing::debug!("Filtered profile {} is the viewer, skipping", profile.id);
                report.skipped += 1;
            } else if self.push_candidate(profile) {
                report.kept += 1;
            } else {
                report.skipped += 1;
            }
        }

        if report.skipped > 0 {
            tracing::warn!(
                "Filter for user {} skipped {} of {} profiles",
                user_id,
                report.skipped,
                report.profiles
            );
        }
        tracing::info!("Filter {:?} left {} cards for user {}", filter, report.kept, user_id);
        Ok(report)
    }

    /// [`MatchDeck::apply_filter`] for the resolved viewer
    pub async fn refilter(&mut self, filter: &FilterSpec) -> Result<FilterReport, DeckError> {
        let viewer_id = self.viewer_id().ok_or(DeckError::NoViewer)?;
        self.apply_filter(viewer_id, filter).await
    }
}
