use log::{error, info, warn};

use crate::error::{Error, Result};
use crate::models::{PostedRecord, Reimbursement, Status};
use crate::twitter::{Media, UPLOAD_MEDIA_OPERATION};

use super::Clients;

/// Where the Chamber of Deputies serves scanned receipts.
pub const EVIDENCE_URL_BASE: &str = "http://www.camara.gov.br/cota-parlamentar/documentos/publ";
/// Public lookup tool linked from every alert.
pub const JARBAS_URL_BASE: &str = "https://jarbas.serenata.ai/layers/#/documentId";

/// A single reimbursement on its way to, or already on, the timeline.
#[derive(Debug)]
pub struct Post {
    reimbursement: Reimbursement,
    clients: Clients,
    status: Option<Status>,
}

impl Post {
    pub fn new(reimbursement: Reimbursement, clients: Clients) -> Self {
        Post {
            reimbursement,
            clients,
            status: None,
        }
    }

    pub fn reimbursement(&self) -> &Reimbursement {
        &self.reimbursement
    }

    /// The status returned by the API, once published.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// URL of the receipt PDF for this reimbursement.
    pub fn camara_evidence_url(&self) -> String {
        format!(
            "{}/{}/{}/{}.pdf",
            EVIDENCE_URL_BASE,
            self.reimbursement.applicant_id,
            self.reimbursement.year,
            self.reimbursement.document_id
        )
    }

    /// Downloads the receipt PDF.
    ///
    /// Attaching the receipt is best-effort: any fetch failure is logged and
    /// yields `None`.
    pub async fn tweet_image(&self) -> Option<Vec<u8>> {
        let url = self.camara_evidence_url();
        match self.clients.web.download(&url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(
                    "No evidence image for document {}: {}",
                    self.reimbursement.document_id, e
                );
                None
            }
        }
    }

    /// The alert message for this reimbursement.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The message mentioning the congressperson
    /// - `Err(Error::MissingProfile)`: If the congressperson has no handle
    pub fn tweet_text(&self) -> Result<String> {
        let profile = self
            .reimbursement
            .handle()
            .ok_or(Error::MissingProfile {
                document_id: self.reimbursement.document_id,
            })?;

        Ok(format!(
            "🚨Gasto suspeito de Dep. @{} ({}). Você pode me ajudar a verificar? {}/{} #SerenataDeAmor na @CamaraDeputados",
            profile, self.reimbursement.state, JARBAS_URL_BASE, self.reimbursement.document_id
        ))
    }

    /// The persisted representation, available once published.
    pub fn to_record(&self) -> Option<Result<PostedRecord>> {
        self.status
            .as_ref()
            .map(|status| PostedRecord::from_status(status, self.reimbursement.document_id))
    }

    /// Posts the alert and records it in the database.
    ///
    /// The message is validated before anything leaves the process. A receipt
    /// the API refuses to attach is logged and the alert goes out without it.
    /// If the database write fails after the status went out, the failure is
    /// logged with the status id so the next provisioning run can recover the
    /// record, and the error is returned.
    pub async fn publish(&mut self) -> Result<PostedRecord> {
        let document_id = self.reimbursement.document_id;
        let text = self.tweet_text()?;
        info!(
            "Publishing document {} ({})",
            document_id, self.reimbursement.congressperson_name
        );

        let media = self
            .tweet_image()
            .await
            .map(|bytes| Media::pdf(format!("{}.pdf", document_id), bytes));

        let with_media = media.is_some();
        let status = match self.clients.api.post_update(&text, media).await {
            Err(Error::Api {
                operation,
                status,
                message,
                ..
            }) if with_media && operation == UPLOAD_MEDIA_OPERATION => {
                warn!(
                    "Evidence for document {} was rejected ({}: {}), posting without it",
                    document_id, status, message
                );
                self.clients.api.post_update(&text, None).await?
            }
            result => result?,
        };
        info!("Document {} published as status {}", document_id, status.id);

        let record = PostedRecord::from_status(&status, document_id);
        self.status = Some(status);
        let record = record?;

        if let Err(e) = self.clients.store.insert_one(&record).await {
            error!(
                "Status {} for document {} was published but not stored: {}",
                record.id, document_id, e
            );
            return Err(e);
        }

        Ok(record)
    }
}
