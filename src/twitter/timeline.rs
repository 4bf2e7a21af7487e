//! Timeline fetching for the Twitter API.

use log::{debug, info};
use reqwest::Method;

use crate::error::{Error, Result};
use crate::models::Status;

use super::api::{Payload, TwitterClient};
use super::parsing::RawStatus;

/// Largest page the user timeline endpoint serves.
const PAGE_SIZE: u32 = 200;

impl TwitterClient {
    /// Fetches a single page of `screen_name`'s own posts.
    ///
    /// # Parameters
    ///
    /// - `screen_name`: Account whose timeline is read
    /// - `max_id`: Only return posts with an id at most this value
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Status>)`: Newest first, as the API orders them
    /// - `Err(Error)`: If the request fails or the payload is malformed
    pub(crate) async fn fetch_user_timeline(
        &self,
        screen_name: &str,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>> {
        info!(
            "Fetching timeline for @{} (max_id: {:?})",
            screen_name, max_id
        );

        let mut params = vec![
            ("screen_name".to_string(), screen_name.to_string()),
            ("count".to_string(), PAGE_SIZE.to_string()),
            ("tweet_mode".to_string(), "extended".to_string()),
        ];
        if let Some(max_id) = max_id {
            params.push(("max_id".to_string(), max_id.to_string()));
        }

        let url = format!("{}/statuses/user_timeline.json", self.api_base);
        let body = self
            .make_signed_request(Method::GET, &url, Payload::Query(params), "user_timeline")
            .await?;

        let raw: Vec<RawStatus> =
            serde_json::from_str(&body).map_err(|e| Error::UnexpectedResponse {
                operation: "user_timeline".to_string(),
                message: e.to_string(),
            })?;
        debug!("Timeline page has {} posts", raw.len());

        raw.into_iter()
            .map(|status| status.into_status("user_timeline"))
            .collect()
    }
}
