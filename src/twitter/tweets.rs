//! Tweet operations for the Twitter API.
//!
//! This module contains the calls behind [`super::SocialApi::post_update`]:
//! uploading an attachment and posting the status that references it.

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Status;

use super::api::{sanitize_for_logging, Payload, TwitterClient};
use super::parsing::RawStatus;
use super::Media;

/// Operation name carried by errors from the media upload endpoint.
pub const UPLOAD_MEDIA_OPERATION: &str = "upload_media";

#[derive(Debug, Deserialize)]
struct MediaUploadResponse {
    media_id_string: String,
}

impl TwitterClient {
    /// Uploads an attachment and returns its media id.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The `media_id_string` to reference from a status update
    /// - `Err(Error)`: If the upload fails or the response cannot be parsed
    pub(crate) async fn upload_media(&self, media: Media) -> Result<String> {
        info!(
            "Uploading media '{}' ({} bytes, {})",
            media.file_name,
            media.bytes.len(),
            media.content_type
        );

        let part = Part::bytes(media.bytes)
            .file_name(media.file_name)
            .mime_str(&media.content_type)?;
        let form = Form::new().part("media", part);

        let url = format!("{}/media/upload.json", self.upload_base);
        let body = self
            .make_signed_request(Method::POST, &url, Payload::Multipart(form), UPLOAD_MEDIA_OPERATION)
            .await?;

        let uploaded: MediaUploadResponse = serde_json::from_str(&body)?;
        info!("Media uploaded with id {}", uploaded.media_id_string);
        Ok(uploaded.media_id_string)
    }

    /// Posts a status update, optionally referencing uploaded media.
    ///
    /// # Parameters
    ///
    /// - `text`: The text content of the status
    /// - `media_ids`: Comma-separated ids returned by [`TwitterClient::upload_media`]
    ///
    /// # Returns
    ///
    /// - `Ok(Status)`: The created status
    /// - `Err(Error)`: If the request fails or the response is not a status
    pub(crate) async fn update_status(&self, text: &str, media_ids: Option<&str>) -> Result<Status> {
        info!(
            "Starting status update for text: '{}'",
            sanitize_for_logging(text, 280)
        );

        let mut params = vec![("status".to_string(), text.to_string())];
        if let Some(media_ids) = media_ids {
            debug!("Attaching media ids: {}", media_ids);
            params.push(("media_ids".to_string(), media_ids.to_string()));
        }

        let url = format!("{}/statuses/update.json", self.api_base);
        let body = self
            .make_signed_request(Method::POST, &url, Payload::Form(params), "update_status")
            .await?;

        let raw: RawStatus = serde_json::from_str(&body).map_err(|e| Error::UnexpectedResponse {
            operation: "update_status".to_string(),
            message: e.to_string(),
        })?;
        let status = raw.into_status("update_status")?;

        info!(
            "Status {} posted by @{}",
            status.id, status.user.screen_name
        );
        Ok(status)
    }
}
