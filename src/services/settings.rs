use chrono::Utc;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Collection,
};

use crate::dtos::CompanySettingsInput;
use crate::error::AppError;
use crate::models::{CompanySettings, SETTINGS_ID};
use crate::services::database::MongoDb;

/// Owns the singleton company settings record.
#[derive(Clone)]
pub struct SettingsRepository {
    collection: Collection<CompanySettings>,
}

impl SettingsRepository {
    pub fn new(db: &MongoDb) -> Self {
        Self {
            collection: db.settings(),
        }
    }

    /// Create or overwrite the settings in one atomic upsert against the
    /// fixed `_id`. `created_at` is only written on first insert, so it
    /// survives every later update while `updated_at` is refreshed.
    pub async fn upsert(&self, input: CompanySettingsInput) -> Result<CompanySettings, AppError> {
        let now = mongodb::bson::DateTime::from_chrono(Utc::now());

        let update = doc! {
            "$set": {
                "nom_societe": &input.nom_societe,
                "numero_siret": &input.numero_siret,
                "adresse": &input.adresse,
                "telephone": &input.telephone,
                "email": &input.email,
                "tarif_transfert_km": input.tarif_transfert_km,
                "tarif_mise_disposition_h": input.tarif_mise_disposition_h,
                "updated_at": now,
            },
            "$setOnInsert": { "created_at": now },
        };

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let settings = self
            .collection
            .find_one_and_update(doc! { "_id": SETTINGS_ID }, update, options)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "settings upsert returned no document"
                ))
            })?;

        tracing::info!(
            tarif_transfert_km = settings.tarif_transfert_km,
            tarif_mise_disposition_h = settings.tarif_mise_disposition_h,
            "Company settings saved"
        );
        Ok(settings)
    }

    pub async fn get(&self) -> Result<CompanySettings, AppError> {
        self.collection
            .find_one(doc! { "_id": SETTINGS_ID }, None)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Paramètres de société non trouvés"))
            })
    }
}
