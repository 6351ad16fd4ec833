use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote user record
///
/// Only `id` and `photoUrl` are interpreted here; everything else the
/// matching service sends is kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            photo_url: None,
            extra: Map::new(),
        }
    }

    pub fn with_photo(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// True when the photo must be replaced by the placeholder
    pub fn has_missing_photo(&self) -> bool {
        match self.photo_url.as_deref() {
            None => true,
            Some(url) => url.is_empty() || url == "null",
        }
    }

    /// Replace an absent, empty or `"null"` photo with `placeholder`
    pub fn normalize_photo(&mut self, placeholder: &str) {
        if self.has_missing_photo() {
            self.photo_url = Some(placeholder.to_string());
        }
    }
}

/// Opaque reference to a candidate, resolved by a second remote call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLink {
    pub href: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchLink {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            extra: Map::new(),
        }
    }
}

/// Filter toggles passed through to the remote filter evaluator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(rename = "batchEndChange", default)]
    pub by_batch_end: bool,
    #[serde(rename = "dayStartChange", default)]
    pub by_day_start: bool,
    #[serde(rename = "distanceChange", default)]
    pub by_distance: bool,
}

impl FilterSpec {
    pub fn is_empty(&self) -> bool {
        !(self.by_batch_end || self.by_day_start || self.by_distance)
    }
}
