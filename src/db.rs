//! Database module for the `posts` collection.
//!
//! Published alerts are stored in MongoDB so the next run can tell which
//! reimbursements were already posted. The [`PostStore`] trait is the seam the
//! Twitter target talks to; [`MongoPostStore`] is the production implementation.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use mongodb::bson::{doc, Bson, DateTime as BsonDateTime, Document};
use mongodb::options::{ClientOptions, FindOptions};
use mongodb::{Client, Collection};

use crate::error::{Error, Result};
use crate::models::PostedRecord;

pub const POSTS_COLLECTION: &str = "posts";

/// Storage for published alerts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// `document_id` of every record whose `target` equals `target`.
    async fn posted_document_ids(&self, target: &str) -> Result<Vec<i64>>;

    /// Writes a single record.
    async fn insert_one(&self, record: &PostedRecord) -> Result<()>;

    /// Writes all records in one bulk call.
    async fn insert_many(&self, records: &[PostedRecord]) -> Result<()>;
}

/// Converts a record into the document shape other tooling reads.
pub fn record_to_document(record: &PostedRecord) -> Result<Document> {
    let id = i64::try_from(record.id).map_err(|_| Error::StatusIdOutOfRange(record.id))?;
    let created_at = BsonDateTime::from_millis(record.created_at.timestamp_millis());

    Ok(doc! {
        "integration": record.integration.as_str(),
        "target": record.target.as_str(),
        "id": id,
        "screen_name": record.screen_name.as_str(),
        "created_at": created_at,
        "text": record.text.as_str(),
        "document_id": record.document_id,
    })
}

/// Reads `document_id` out of a projected document.
///
/// Older records written by other tooling may hold the id as int32 or as a
/// double, so every integral representation is accepted.
pub fn document_id_of(document: &Document) -> Option<i64> {
    match document.get("document_id") {
        Some(Bson::Int32(value)) => Some(i64::from(*value)),
        Some(Bson::Int64(value)) => Some(*value),
        Some(Bson::Double(value)) if value.fract() == 0.0 => Some(*value as i64),
        _ => None,
    }
}

/// [`PostStore`] backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoPostStore {
    collection: Collection<Document>,
}

impl MongoPostStore {
    /// Connects to MongoDB and selects the `posts` collection of `database`.
    ///
    /// # Parameters
    ///
    /// - `url`: MongoDB connection string
    /// - `database`: Name of the database holding the collection
    ///
    /// # Returns
    ///
    /// - `Ok(MongoPostStore)`: A store ready for use
    /// - `Err(Error::Database)`: If the connection string cannot be parsed
    pub async fn connect(url: &str, database: &str) -> Result<Self> {
        info!("Connecting to MongoDB database '{}'", database);
        let options = ClientOptions::parse(url).await?;
        let client = Client::with_options(options)?;
        info!("MongoDB client ready");

        Ok(Self::from_collection(
            client.database(database).collection(POSTS_COLLECTION),
        ))
    }

    pub fn from_collection(collection: Collection<Document>) -> Self {
        MongoPostStore { collection }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn posted_document_ids(&self, target: &str) -> Result<Vec<i64>> {
        info!("Querying posts collection for '{}' document ids", target);

        let options = FindOptions::builder()
            .projection(doc! { "document_id": true })
            .build();
        let mut cursor = self
            .collection
            .find(doc! { "target": target }, options)
            .await?;

        let mut ids = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            match document_id_of(&document) {
                Some(id) => ids.push(id),
                None => warn!("Skipping post without a usable document_id: {}", document),
            }
        }

        info!("Found {} posted document ids", ids.len());
        Ok(ids)
    }

    async fn insert_one(&self, record: &PostedRecord) -> Result<()> {
        info!(
            "Storing post {} for document {} in database",
            record.id, record.document_id
        );
        self.collection
            .insert_one(record_to_document(record)?, None)
            .await?;
        debug!("Post {} stored", record.id);
        Ok(())
    }

    async fn insert_many(&self, records: &[PostedRecord]) -> Result<()> {
        if records.is_empty() {
            info!("No posts to store");
            return Ok(());
        }

        info!("Storing {} posts in database", records.len());
        let documents = records
            .iter()
            .map(record_to_document)
            .collect::<Result<Vec<Document>>>()?;
        let result = self.collection.insert_many(documents, None).await?;
        debug!("Inserted {} documents", result.inserted_ids.len());
        Ok(())
    }
}
