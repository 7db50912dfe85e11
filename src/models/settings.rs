use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed `_id` of the singleton settings document. Every upsert targets this
/// key, so concurrent writers converge on one record instead of racing a
/// scan-then-insert.
pub const SETTINGS_ID: &str = "company";

/// Default rate per kilometre for "transfert" quotes.
pub const DEFAULT_TARIF_TRANSFERT_KM: f64 = 2.0;
/// Default rate per hour for "mise à disposition" quotes.
pub const DEFAULT_TARIF_MISE_DISPOSITION_H: f64 = 80.0;

/// Company identity and tariffs. At most one document exists, under
/// [`SETTINGS_ID`]. Quotes snapshot the tariffs at creation time, so editing
/// this record never rewrites existing quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySettings {
    #[serde(rename = "_id")]
    pub id: String,
    pub nom_societe: String,
    pub numero_siret: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
    pub tarif_transfert_km: f64,
    pub tarif_mise_disposition_h: f64,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}
