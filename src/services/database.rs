use mongodb::{
    bson::doc, options::IndexOptions, Client as MongoClient, Collection, Database, IndexModel,
};

use crate::error::AppError;
use crate::models::{CompanySettings, Devis};
use crate::services::devis::SequenceCounter;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Connected to MongoDB database");
        Ok(Self { client, db })
    }

    /// Indexes backing the newest-first listings.
    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        let facture_index = IndexModel::builder()
            .keys(doc! { "is_facture": 1, "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("facture_created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.devis()
            .create_indexes([created_at_index, facture_index], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on devis collection: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("MongoDB indexes initialized");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn settings(&self) -> Collection<CompanySettings> {
        self.db.collection("company_settings")
    }

    pub fn devis(&self) -> Collection<Devis> {
        self.db.collection("devis")
    }

    pub fn counters(&self) -> Collection<SequenceCounter> {
        self.db.collection("counters")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}
