//! Plain HTTP access outside the Twitter API: resolving shortened links and
//! downloading evidence documents from the Chamber of Deputies.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;

#[async_trait]
pub trait WebClient: Send + Sync {
    /// Issues a `HEAD` request, following redirects, and returns the final URL.
    async fn resolve(&self, url: &str) -> Result<String, FetchError>;

    /// Downloads the body behind `url`. Non-success statuses are errors.
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`WebClient`] on top of a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestWebClient {
    client: Client,
}

impl ReqwestWebClient {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::from_reqwest("<client>", e))?;
        Ok(ReqwestWebClient { client })
    }

    pub fn with_client(client: Client) -> Self {
        ReqwestWebClient { client }
    }
}

#[async_trait]
impl WebClient for ReqwestWebClient {
    async fn resolve(&self, url: &str) -> Result<String, FetchError> {
        debug!("HEAD {}", url);
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let resolved = response.url().to_string();
        info!("Resolved {} to {} ({})", url, resolved, response.status());
        Ok(resolved)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
