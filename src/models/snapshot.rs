use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Metric;

/// One account's counters on one calendar date.
///
/// Population: the daily collector writes one row per tracked account.
///
/// Query Patterns:
///   - "Get follower trend for account X"
///   - "Rank all accounts on date D"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    // Identifiers
    pub name: String,
    pub date: NaiveDate,

    // Counters
    pub followers_count: u64,
    pub follows_count: u64,
    pub media_count: u64,
    pub like_count: u64,
    pub comments_count: u64,

    // Passthrough metadata, never aggregated
    #[serde(flatten)]
    pub profile: Profile,
}

impl Snapshot {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        followers_count: u64,
        follows_count: u64,
        media_count: u64,
        like_count: u64,
        comments_count: u64,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            followers_count,
            follows_count,
            media_count,
            like_count,
            comments_count,
            profile: Profile::default(),
        }
    }

    pub fn count(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Followers => self.followers_count,
            Metric::Follows => self.follows_count,
            Metric::Media => self.media_count,
            Metric::Like => self.like_count,
            Metric::Comments => self.comments_count,
        }
    }
}

/// Profile fields copied from the account page at snapshot time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Any other column present in the source table.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single published post, used for the weekly top-posts section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub name: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    pub like_count: u64,
    pub comments_count: u64,
}

impl Post {
    /// Likes plus comments.
    pub fn engagement(&self) -> u64 {
        self.like_count.saturating_add(self.comments_count)
    }
}
