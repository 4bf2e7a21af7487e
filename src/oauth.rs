//! OAuth authentication module for the Twitter API.
//!
//! The v1.1 endpoints used to post alerts and follow accounts are signed with
//! OAuth 1.0a (HMAC-SHA1) using the app's consumer pair and the bot account's
//! access token pair.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// The four secrets identifying the app and the account it acts for.
#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token_key: String,
    pub access_token_secret: String,
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &crate::config::mask_secret(&self.consumer_key))
            .field("consumer_secret", &"[REDACTED]")
            .field(
                "access_token_key",
                &crate::config::mask_secret(&self.access_token_key),
            )
            .field("access_token_secret", &"[REDACTED]")
            .finish()
    }
}

/// RFC 3986 percent-encoding as required by the OAuth 1.0a signature rules.
fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Builds the signature base string for a request.
///
/// `params` are the query-string or form-encoded body parameters of the
/// request; they are merged with the `oauth_*` protocol parameters, encoded
/// and sorted.
pub(crate) fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(key, value)| (percent_encode(key), percent_encode(value)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&parameter_string)
    )
}

/// The HMAC key: both secrets encoded and joined by `&`.
pub(crate) fn signing_key(credentials: &OAuthCredentials) -> String {
    format!(
        "{}&{}",
        percent_encode(&credentials.consumer_secret),
        percent_encode(&credentials.access_token_secret)
    )
}

/// Builds the `Authorization` header for a request with a fixed nonce and timestamp.
///
/// # Parameters
///
/// - `credentials`: Consumer and access token pairs
/// - `method`: HTTP method, e.g. `POST`
/// - `url`: Base URL without the query string
/// - `params`: Query or form parameters that are part of the signature
/// - `nonce`: Unique value for this request
/// - `timestamp`: Seconds since the epoch
///
/// # Returns
///
/// - `Ok(String)`: The header value, starting with `OAuth `
/// - `Err(Error::Config)`: If the signing key cannot be used
pub(crate) fn build_oauth1_header_with(
    credentials: &OAuthCredentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    nonce: &str,
    timestamp: i64,
) -> Result<String> {
    let timestamp = timestamp.to_string();
    let oauth_params: Vec<(String, String)> = vec![
        ("oauth_consumer_key".into(), credentials.consumer_key.clone()),
        ("oauth_nonce".into(), nonce.to_string()),
        ("oauth_signature_method".into(), "HMAC-SHA1".into()),
        ("oauth_timestamp".into(), timestamp),
        ("oauth_token".into(), credentials.access_token_key.clone()),
        ("oauth_version".into(), "1.0".into()),
    ];

    let mut all_params = oauth_params.clone();
    all_params.extend(
        params
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string())),
    );

    let base_string = signature_base_string(method, url, &all_params);
    let mut mac = HmacSha1::new_from_slice(signing_key(credentials).as_bytes())
        .map_err(|e| Error::Config(format!("invalid OAuth signing key: {}", e)))?;
    mac.update(base_string.as_bytes());
    let signature = STANDARD.encode(mac.finalize().into_bytes());

    let mut header_params = oauth_params;
    header_params.push(("oauth_signature".into(), signature));
    header_params.sort();

    let header = header_params
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!("OAuth {}", header))
}

/// Builds the OAuth 1.0a `Authorization` header for a request, with a fresh
/// nonce and the current time.
pub fn build_oauth1_header(
    credentials: &OAuthCredentials,
    method: &str,
    url: &str,
    params: &[(&str, &str)],
) -> Result<String> {
    build_oauth1_header_with(
        credentials,
        method,
        url,
        params,
        &generate_nonce(),
        Utc::now().timestamp(),
    )
}
