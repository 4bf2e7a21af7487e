//! Text parsing and extraction utilities for Twitter content.
//!
//! This module contains functions for parsing API responses and post text:
//! error payloads, timestamps, shortened links and evidence links.

use chrono::DateTime;
use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{Status, StatusUser};

/// Format of `created_at` in v1.1 payloads, e.g. `Sun Jun 04 23:50:11 +0000 2017`.
pub const TWITTER_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A status exactly as the v1.1 endpoints return it.
#[derive(Debug, Deserialize)]
pub(crate) struct RawStatus {
    pub id: u64,
    #[serde(alias = "full_text")]
    pub text: String,
    pub user: StatusUser,
    pub created_at: String,
}

impl RawStatus {
    pub fn into_status(self, operation: &str) -> Result<Status> {
        let created_at_in_seconds = parse_twitter_timestamp(&self.created_at).ok_or_else(|| {
            Error::UnexpectedResponse {
                operation: operation.to_string(),
                message: format!("unparseable created_at '{}'", self.created_at),
            }
        })?;

        Ok(Status {
            id: self.id,
            text: self.text,
            user: self.user,
            created_at_in_seconds,
        })
    }
}

/// Parses a v1.1 `created_at` value into seconds since the epoch.
pub fn parse_twitter_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_str(value, TWITTER_DATE_FORMAT)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Extracts the error codes and messages from a v1.1 error payload.
///
/// The API answers failures with `{"errors": [{"code": 108, "message": "..."}]}`.
/// Bodies that do not follow this shape are returned as the message verbatim.
pub(crate) fn parse_api_errors(body: &str) -> (Vec<i64>, String) {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let errors = parsed
        .as_ref()
        .and_then(|json| json.get("errors"))
        .and_then(|errors| errors.as_array());

    match errors {
        Some(errors) => {
            let codes = errors
                .iter()
                .filter_map(|e| e.get("code").and_then(|c| c.as_i64()))
                .collect();
            let message = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; ");
            (codes, message)
        }
        None => (Vec::new(), body.trim().to_string()),
    }
}

/// Every `t.co` shortened link in a post, in order of appearance.
pub fn extract_short_links(text: &str) -> Vec<String> {
    let re = match regex::Regex::new(r"https?://t\.co/[A-Za-z0-9]+") {
        Ok(re) => re,
        Err(e) => {
            warn!("Short link pattern failed to compile: {}", e);
            return Vec::new();
        }
    };

    re.find_iter(text)
        .map(|mat| mat.as_str())
        .filter(|link| url::Url::parse(link).is_ok())
        .map(str::to_string)
        .collect()
}

/// Extracts the reimbursement id from a Jarbas evidence link.
///
/// Both the current `jarbas.serenata.ai/layers/#/documentId/<id>` and the
/// older `jarbas.serenatadeamor.org/#/documentId/<id>` forms are recognised.
pub fn extract_document_id(text: &str) -> Option<i64> {
    let re = regex::Regex::new(
        r"https?://jarbas\.serenata(?:deamor)?\.(?:ai|org)/(?:layers/)?#/documentId/(\d+)",
    )
    .ok()?;

    re.captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|id| id.as_str().parse().ok())
}
