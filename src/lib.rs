//! # Whistleblower
//!
//! Posts alerts about suspicious Chamber of Deputies reimbursements on Twitter
//! and keeps a record of every alert in MongoDB so a reimbursement is never
//! posted twice.
//!
//! ## Features
//!
//! - Queue filtering against already posted `document_id`s
//! - Alert text, evidence PDF attachment and publishing through the Twitter API
//! - Following every congressperson account listed in the profiles CSV
//! - Provisioning the database from the account's own timeline
//! - OAuth 1.0a request signing
//! - Structured logging
//!
//! ## Configuration
//!
//! - `TWITTER_CONSUMER_KEY`, `TWITTER_CONSUMER_SECRET`,
//!   `TWITTER_ACCESS_TOKEN_KEY`, `TWITTER_ACCESS_TOKEN_SECRET`: API credentials
//! - `MONGO_URL`: MongoDB connection string (defaults to `mongodb://mongo:27017/`)
//! - `MONGO_DATABASE`: Database name (defaults to `whistleblower`)
//! - `PROFILES_FILE`: Profiles CSV (defaults to `data/twitter_profiles.csv`)

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod oauth;
pub mod profiles;
pub mod target;
pub mod twitter;
pub mod web;

// Re-export commonly used types and functions
pub use config::Config;
pub use db::{MongoPostStore, PostStore};
pub use error::{Error, FetchError, Result};
pub use models::{PostedRecord, Reimbursement, Status, StatusUser};
pub use oauth::{build_oauth1_header, OAuthCredentials};
pub use profiles::{Profile, ProfileDirectory};
pub use target::{Clients, FollowReport, Post, TwitterTarget};
pub use twitter::{Media, SocialApi, TwitterClient, API_BASE};
pub use web::{ReqwestWebClient, WebClient};
