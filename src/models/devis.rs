use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::settings::CompanySettings;

/// Quotes stay valid for 30 days from creation.
pub const VALIDITY_DAYS: i64 = 30;

/// VAT rate for distance-billed transfers (passenger transport).
pub const TAUX_TVA_TRANSFERT: f64 = 0.10;
/// VAT rate for duration-billed "mise à disposition".
pub const TAUX_TVA_MISE_A_DISPOSITION: f64 = 0.20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub nom: String,
    pub prenom: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
}

/// The billed service. Internally tagged on `type_prestation` so the wire and
/// stored shape stays a flat object, while each variant only carries the
/// fields that are meaningful for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type_prestation", rename_all = "snake_case")]
pub enum Prestation {
    /// Point-to-point transfer, billed per kilometre.
    Transfert {
        #[serde(default)]
        adresse_prise_en_charge: Option<String>,
        #[serde(default)]
        adresse_destination: Option<String>,
        nombre_kilometres: f64,
    },
    /// Chauffeur at disposal, billed per hour.
    MiseADisposition { nombre_heures: f64 },
}

impl Prestation {
    /// Billed quantity: kilometres or hours depending on the variant.
    pub fn quantite(&self) -> f64 {
        match self {
            Prestation::Transfert {
                nombre_kilometres, ..
            } => *nombre_kilometres,
            Prestation::MiseADisposition { nombre_heures } => *nombre_heures,
        }
    }

    /// The wire tag for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Prestation::Transfert { .. } => "transfert",
            Prestation::MiseADisposition { .. } => "mise_a_disposition",
        }
    }

    /// VAT rate is fixed per variant, not configurable.
    pub fn taux_tva(&self) -> f64 {
        match self {
            Prestation::Transfert { .. } => TAUX_TVA_TRANSFERT,
            Prestation::MiseADisposition { .. } => TAUX_TVA_MISE_A_DISPOSITION,
        }
    }

    /// Unit rate drawn from the company tariffs.
    pub fn prix_unitaire(&self, settings: &CompanySettings) -> f64 {
        match self {
            Prestation::Transfert { .. } => settings.tarif_transfert_km,
            Prestation::MiseADisposition { .. } => settings.tarif_mise_disposition_h,
        }
    }
}

/// Price breakdown computed once at quote creation and stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub prix_unitaire: f64,
    pub prix_ht: f64,
    pub taux_tva: f64,
    pub montant_tva: f64,
    pub prix_ttc: f64,
}

impl Pricing {
    /// prix_ht = quantity x unit rate, montant_tva = prix_ht x rate,
    /// prix_ttc = prix_ht + montant_tva.
    pub fn compute(prestation: &Prestation, settings: &CompanySettings) -> Self {
        let prix_unitaire = prestation.prix_unitaire(settings);
        let taux_tva = prestation.taux_tva();
        let prix_ht = prestation.quantite() * prix_unitaire;
        let montant_tva = prix_ht * taux_tva;
        Self {
            prix_unitaire,
            prix_ht,
            taux_tva,
            montant_tva,
            prix_ttc: prix_ht + montant_tva,
        }
    }
}

/// A quote ("devis"). Becomes an invoice ("facture") when `is_facture` flips
/// to true; that flag only ever goes one way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Devis {
    #[serde(rename = "_id")]
    pub id: String,
    pub numero_devis: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date_creation: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date_validite: DateTime<Utc>,
    pub client: Client,
    #[serde(flatten)]
    pub prestation: Prestation,
    pub prix_unitaire: f64,
    pub prix_ht: f64,
    pub taux_tva: f64,
    pub montant_tva: f64,
    pub prix_ttc: f64,
    pub is_facture: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Devis {
    pub fn new(numero_devis: String, client: Client, prestation: Prestation, pricing: Pricing) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            numero_devis,
            date_creation: now,
            date_validite: now + Duration::days(VALIDITY_DAYS),
            client,
            prestation,
            prix_unitaire: pricing.prix_unitaire,
            prix_ht: pricing.prix_ht,
            taux_tva: pricing.taux_tva,
            montant_tva: pricing.montant_tva,
            prix_ttc: pricing.prix_ttc,
            is_facture: false,
            created_at: now,
        }
    }
}

/// `DEV-YYYYMMDD-NNNN`, sequence zero-padded to four digits.
pub fn format_numero(date: &DateTime<Utc>, seq: i64) -> String {
    format!("DEV-{}-{:04}", date.format("%Y%m%d"), seq)
}
