//! Twitter API integration module.
//!
//! This module contains the [`SocialApi`] seam used by the alert publisher and
//! its production implementation, [`TwitterClient`], talking to the REST v1.1
//! endpoints with OAuth 1.0a user context.

mod api;
mod following;
mod parsing;
mod timeline;
mod tweets;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Status;

pub use api::{TwitterClient, API_BASE, UPLOAD_BASE};
pub use parsing::{
    extract_document_id, extract_short_links, parse_twitter_timestamp, TWITTER_DATE_FORMAT,
};
pub use tweets::UPLOAD_MEDIA_OPERATION;

/// Binary attachment for a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Media {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Media {
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Media {
            file_name: file_name.into(),
            content_type: "application/pdf".to_string(),
            bytes,
        }
    }
}

/// The social network operations the publisher relies on.
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Publishes a status, optionally with one attachment, and returns it.
    ///
    /// A rejected attachment fails with an [`crate::Error::Api`] whose
    /// operation is [`UPLOAD_MEDIA_OPERATION`], before the status is sent.
    async fn post_update(&self, text: &str, media: Option<Media>) -> Result<Status>;

    /// Follows `screen_name`. Fails with [`crate::Error::NotFound`] when the
    /// account does not exist.
    async fn create_friendship(&self, screen_name: &str) -> Result<()>;

    /// One page of `screen_name`'s timeline, optionally bounded by `max_id`.
    async fn user_timeline(&self, screen_name: &str, max_id: Option<u64>) -> Result<Vec<Status>>;
}

#[async_trait]
impl SocialApi for TwitterClient {
    async fn post_update(&self, text: &str, media: Option<Media>) -> Result<Status> {
        let media_ids = match media {
            Some(media) => Some(self.upload_media(media).await?),
            None => None,
        };
        self.update_status(text, media_ids.as_deref()).await
    }

    async fn create_friendship(&self, screen_name: &str) -> Result<()> {
        self.follow(screen_name).await
    }

    async fn user_timeline(&self, screen_name: &str, max_id: Option<u64>) -> Result<Vec<Status>> {
        self.fetch_user_timeline(screen_name, max_id).await
    }
}
