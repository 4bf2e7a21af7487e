//! Data types flowing between the pipeline, the Twitter API and the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Integration name stamped on every persisted post.
pub const INTEGRATION: &str = "chamber_of_deputies";
/// Target name stamped on every persisted post.
pub const TARGET: &str = "twitter";

/// A suspicious reimbursement handed over by the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reimbursement {
    pub document_id: i64,
    pub congressperson_name: String,
    pub state: String,
    #[serde(default)]
    pub twitter_profile: Option<String>,
    pub applicant_id: i64,
    pub year: i32,
}

impl Reimbursement {
    /// The congressperson's primary handle, ignoring blank values.
    pub fn handle(&self) -> Option<&str> {
        self.twitter_profile
            .as_deref()
            .map(str::trim)
            .filter(|profile| !profile.is_empty())
    }
}

/// Author of a status as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUser {
    pub screen_name: String,
}

/// A post as returned by the API after publishing or from a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: u64,
    pub text: String,
    pub user: StatusUser,
    pub created_at_in_seconds: i64,
}

/// Durable record of a published alert, as written to the `posts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedRecord {
    pub integration: String,
    pub target: String,
    pub id: u64,
    pub screen_name: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub document_id: i64,
}

impl PostedRecord {
    /// Builds the record for `status`, attributing it to `document_id`.
    ///
    /// Fails only when the status carries a creation time chrono cannot
    /// represent.
    pub fn from_status(status: &Status, document_id: i64) -> Result<Self> {
        let created_at = DateTime::<Utc>::from_timestamp(status.created_at_in_seconds, 0)
            .ok_or(Error::InvalidTimestamp(status.created_at_in_seconds))?;

        Ok(PostedRecord {
            integration: INTEGRATION.to_string(),
            target: TARGET.to_string(),
            id: status.id,
            screen_name: status.user.screen_name.clone(),
            created_at,
            text: status.text.clone(),
            document_id,
        })
    }
}
