use futures_util::{stream, Stream, TryStreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{PostedRecord, Reimbursement, Status, TARGET};
use crate::profiles::{Profile, ProfileDirectory};
use crate::twitter::{extract_document_id, extract_short_links};

use super::{Clients, Post};

/// `document_id` recorded for a provisioned post whose evidence link could
/// not be recovered.
pub const UNRESOLVED_DOCUMENT_ID: i64 = 1;

/// Outcome of [`TwitterTarget::follow_congresspeople`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowReport {
    pub followed: Vec<String>,
    pub not_found: Vec<String>,
}

/// Posts suspicious reimbursements on Twitter, one alert per document.
#[derive(Debug)]
pub struct TwitterTarget {
    clients: Clients,
    profiles: ProfileDirectory,
    screen_name: String,
}

impl TwitterTarget {
    /// # Parameters
    ///
    /// - `clients`: API, database and web access
    /// - `profiles`: Congresspeople handles
    /// - `screen_name`: The account alerts are posted from
    pub fn new(clients: Clients, profiles: ProfileDirectory, screen_name: impl Into<String>) -> Self {
        TwitterTarget {
            clients,
            profiles,
            screen_name: screen_name.into(),
        }
    }

    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    pub fn profiles(&self) -> Result<&[Profile]> {
        self.profiles.profiles()
    }

    /// A [`Post`] for `reimbursement` sharing this target's clients.
    pub fn post(&self, reimbursement: Reimbursement) -> Post {
        Post::new(reimbursement, self.clients.clone())
    }

    /// `document_id` of every reimbursement already posted to Twitter.
    pub async fn posted_reimbursements(&self) -> Result<Vec<i64>> {
        self.clients.store.posted_document_ids(TARGET).await
    }

    /// The reimbursements not yet posted, in their original order.
    pub async fn post_queue(&self, reimbursements: Vec<Reimbursement>) -> Result<Vec<Reimbursement>> {
        let posted: HashSet<i64> = self.posted_reimbursements().await?.into_iter().collect();
        let total = reimbursements.len();

        let queue: Vec<Reimbursement> = reimbursements
            .into_iter()
            .filter(|r| !posted.contains(&r.document_id))
            .collect();

        info!(
            "{} of {} reimbursements are waiting to be posted",
            queue.len(),
            total
        );
        Ok(queue)
    }

    /// Follows every handle in the profile table.
    ///
    /// Handles the API reports as nonexistent are logged and skipped; any
    /// other failure stops the loop and is returned.
    pub async fn follow_congresspeople(&self) -> Result<FollowReport> {
        let handles = self.profiles.handles()?;
        info!("Following {} congresspeople accounts", handles.len());

        let mut report = FollowReport::default();
        for handle in handles {
            match self.clients.api.create_friendship(&handle).await {
                Ok(()) => report.followed.push(handle),
                Err(Error::NotFound { screen_name }) => {
                    warn!("{} profile not found", screen_name);
                    report.not_found.push(handle);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "Followed {} accounts, {} not found",
            report.followed.len(),
            report.not_found.len()
        );
        Ok(report)
    }

    /// Batches of this account's own posts, newest first.
    ///
    /// Yields the single page at or below `max_id`; call again with a smaller
    /// `max_id` to continue further back.
    pub fn posts(&self, max_id: Option<u64>) -> impl Stream<Item = Result<Vec<Status>>> + '_ {
        stream::once(async move {
            self.clients
                .api
                .user_timeline(&self.screen_name, max_id)
                .await
        })
    }

    /// Records posts already on the timeline, e.g. after a fresh deploy or to
    /// recover statuses whose database write failed.
    ///
    /// Every shortened link in a post is resolved with a `HEAD` request and the
    /// `document_id` is read from the evidence link it points to. Posts whose
    /// `document_id` is already stored are left out, except for
    /// [`UNRESOLVED_DOCUMENT_ID`] which is recorded every time.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<PostedRecord>)`: The records written to the database
    pub async fn provision_database(&self) -> Result<Vec<PostedRecord>> {
        info!("Provisioning database from @{}'s timeline", self.screen_name);

        let mut batches = Box::pin(self.posts(None));
        let statuses = batches.try_next().await?.unwrap_or_default();
        debug!("Timeline page has {} posts", statuses.len());

        if statuses.is_empty() {
            info!("Timeline is empty, nothing to provision");
            return Ok(Vec::new());
        }

        let mut stored: HashSet<i64> = self.posted_reimbursements().await?.into_iter().collect();
        let mut records = Vec::with_capacity(statuses.len());
        for status in &statuses {
            let document_id = self.recover_document_id(status).await?;
            if document_id != UNRESOLVED_DOCUMENT_ID && !stored.insert(document_id) {
                debug!(
                    "Document {} from status {} is already stored",
                    document_id, status.id
                );
                continue;
            }
            records.push(PostedRecord::from_status(status, document_id)?);
        }

        if records.is_empty() {
            info!("Every post on the timeline is already stored");
            return Ok(records);
        }

        self.clients.store.insert_many(&records).await?;
        info!("Provisioned {} posts", records.len());
        Ok(records)
    }

    async fn recover_document_id(&self, status: &Status) -> Result<i64> {
        let mut document_id = None;
        for link in extract_short_links(&status.text) {
            let resolved = self.clients.web.resolve(&link).await?;
            if document_id.is_none() {
                document_id = extract_document_id(&resolved);
            }
        }

        match document_id.or_else(|| extract_document_id(&status.text)) {
            Some(id) => Ok(id),
            None => {
                warn!(
                    "No evidence link in status {}, recording document {}",
                    status.id, UNRESOLVED_DOCUMENT_ID
                );
                Ok(UNRESOLVED_DOCUMENT_ID)
            }
        }
    }
}
