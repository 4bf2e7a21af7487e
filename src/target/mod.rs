//! The Twitter target: decides what to post, posts it and remembers it.

mod post;
mod publisher;

use std::sync::Arc;

use crate::db::PostStore;
use crate::twitter::SocialApi;
use crate::web::WebClient;

pub use post::{Post, EVIDENCE_URL_BASE, JARBAS_URL_BASE};
pub use publisher::{FollowReport, TwitterTarget, UNRESOLVED_DOCUMENT_ID};

/// External collaborators shared by the target and every post it builds.
#[derive(Clone)]
pub struct Clients {
    pub api: Arc<dyn SocialApi>,
    pub store: Arc<dyn PostStore>,
    pub web: Arc<dyn WebClient>,
}

impl Clients {
    pub fn new(
        api: Arc<dyn SocialApi>,
        store: Arc<dyn PostStore>,
        web: Arc<dyn WebClient>,
    ) -> Self {
        Clients { api, store, web }
    }
}

impl std::fmt::Debug for Clients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clients").finish_non_exhaustive()
    }
}
