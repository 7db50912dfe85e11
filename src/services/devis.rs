use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Collection,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::devis::format_numero;
use crate::models::{Client, Devis, Prestation, Pricing};
use crate::services::database::MongoDb;

/// Listings return at most this many records; a practical cap, not a
/// business rule.
const LIST_LIMIT: i64 = 1000;

/// Per-day sequence document backing `numero_devis`. One `$inc` per quote
/// creation, so concurrent creations never read the same value.
#[derive(Debug, Serialize, Deserialize)]
pub struct SequenceCounter {
    #[serde(rename = "_id")]
    pub id: String,
    pub seq: i64,
}

#[derive(Clone)]
pub struct DevisRepository {
    devis: Collection<Devis>,
    counters: Collection<SequenceCounter>,
}

impl DevisRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            devis: db.devis(),
            counters: db.counters(),
        }
    }

    /// Atomically take the next sequence number for today and format it as
    /// `DEV-YYYYMMDD-NNNN`. The counter document is created on first use each
    /// day, which also resets the sequence per calendar day.
    async fn next_numero(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let day = now.format("%Y%m%d").to_string();

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": format!("devis-{}", day) },
                doc! { "$inc": { "seq": 1i64 } },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("sequence upsert returned no document"))
            })?;

        Ok(format_numero(&now, counter.seq))
    }

    pub async fn create(
        &self,
        client: Client,
        prestation: Prestation,
        pricing: Pricing,
    ) -> Result<Devis, AppError> {
        let numero_devis = self.next_numero().await?;
        let devis = Devis::new(numero_devis, client, prestation, pricing);

        self.devis.insert_one(&devis, None).await?;

        tracing::info!(
            devis_id = %devis.id,
            numero_devis = %devis.numero_devis,
            prix_ttc = devis.prix_ttc,
            "Devis created"
        );
        Ok(devis)
    }

    pub async fn list(&self) -> Result<Vec<Devis>, AppError> {
        self.find_sorted(None).await
    }

    pub async fn get(&self, id: &str) -> Result<Devis, AppError> {
        self.devis
            .find_one(doc! { "_id": id }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Devis non trouvé")))
    }

    /// Flip `is_facture` to true and return the updated record. Promoting an
    /// already-promoted devis is a no-op success; the flag never reverts.
    pub async fn promote(&self, id: &str) -> Result<Devis, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let devis = self
            .devis
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "is_facture": true } },
                options,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Devis non trouvé")))?;

        tracing::info!(devis_id = %devis.id, numero_devis = %devis.numero_devis, "Devis converted to facture");
        Ok(devis)
    }

    pub async fn list_factures(&self) -> Result<Vec<Devis>, AppError> {
        self.find_sorted(Some(doc! { "is_facture": true })).await
    }

    async fn find_sorted(
        &self,
        filter: Option<mongodb::bson::Document>,
    ) -> Result<Vec<Devis>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(LIST_LIMIT)
            .build();

        let cursor = self.devis.find(filter, options).await?;
        let devis: Vec<Devis> = cursor.try_collect().await?;
        Ok(devis)
    }
}
