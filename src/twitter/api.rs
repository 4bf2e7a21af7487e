//! Core Twitter API utilities.
//!
//! This module contains the low-level helper that signs and sends requests to
//! the Twitter REST API and turns error responses into [`Error::Api`].

use log::{debug, error, info};
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::oauth::{build_oauth1_header, OAuthCredentials};

use super::parsing::parse_api_errors;

pub const API_BASE: &str = "https://api.twitter.com/1.1";
pub const UPLOAD_BASE: &str = "https://upload.twitter.com/1.1";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        format!(
            "{}... [truncated, {} total bytes]",
            sanitized.chars().take(max_len).collect::<String>(),
            text.len()
        )
    } else {
        sanitized
    }
}

/// What travels with a signed request besides the URL.
pub(crate) enum Payload {
    /// Query-string parameters, part of the signature.
    Query(Vec<(String, String)>),
    /// Form-encoded body parameters, part of the signature.
    Form(Vec<(String, String)>),
    /// Multipart body, excluded from the signature.
    Multipart(Form),
}

/// Client for the Twitter REST API v1.1, signing every request with OAuth 1.0a.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    pub(crate) http: Client,
    pub(crate) credentials: OAuthCredentials,
    pub(crate) api_base: String,
    pub(crate) upload_base: String,
}

impl TwitterClient {
    /// Creates a client for the public Twitter endpoints.
    pub fn new(credentials: OAuthCredentials, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(TwitterClient {
            http,
            credentials,
            api_base: API_BASE.to_string(),
            upload_base: UPLOAD_BASE.to_string(),
        })
    }

    /// Points the client at other base URLs, e.g. a local stand-in for the API.
    pub fn with_base_urls(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    /// Signs and sends a request, returning the response body on success.
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `url`: Endpoint URL without query string
    /// - `payload`: Parameters or body of the request
    /// - `operation_name`: Human-readable name for the operation (for logging)
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The API response body on success
    /// - `Err(Error::Api)`: If the API answered with a non-success status
    /// - `Err(Error::Http)`: If the request could not be sent
    pub(crate) async fn make_signed_request(
        &self,
        method: Method,
        url: &str,
        payload: Payload,
        operation_name: &str,
    ) -> Result<String> {
        info!("Making signed request for operation: {}", operation_name);

        let signed_params: Vec<(&str, &str)> = match &payload {
            Payload::Query(params) | Payload::Form(params) => params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect(),
            Payload::Multipart(_) => Vec::new(),
        };
        let auth_header =
            build_oauth1_header(&self.credentials, method.as_str(), url, &signed_params)?;
        debug!("Request: {} {} (Authorization: OAuth [REDACTED])", method, url);

        let request_builder = self
            .http
            .request(method, url)
            .header("Authorization", auth_header);
        let request_builder = match payload {
            Payload::Query(params) => request_builder.query(&params),
            Payload::Form(params) => request_builder.form(&params),
            Payload::Multipart(form) => request_builder.multipart(form),
        };

        let response = request_builder.send().await?;
        let status = response.status();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation_name
        );

        let body = response.text().await?;
        if status.is_success() {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation_name,
                body.len()
            );
            return Ok(body);
        }

        let (codes, message) = parse_api_errors(&body);
        error!(
            "Operation '{}' failed - Status: {}, codes: {:?}",
            operation_name, status, codes
        );
        debug!(
            "Error response for '{}': {}",
            operation_name,
            sanitize_for_logging(&body, 200)
        );
        Err(Error::Api {
            operation: operation_name.to_string(),
            status: status.as_u16(),
            codes,
            message,
        })
    }
}
