use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::devis::{Client, Devis, Prestation};
use crate::models::settings::{
    CompanySettings, DEFAULT_TARIF_MISE_DISPOSITION_H, DEFAULT_TARIF_TRANSFERT_KM,
};

/// Payload for creating or updating the company settings. Tariffs fall back
/// to the standard rates when omitted.
#[derive(Debug, Deserialize)]
pub struct CompanySettingsInput {
    pub nom_societe: String,
    pub numero_siret: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
    #[serde(default = "default_tarif_transfert_km")]
    pub tarif_transfert_km: f64,
    #[serde(default = "default_tarif_mise_disposition_h")]
    pub tarif_mise_disposition_h: f64,
}

fn default_tarif_transfert_km() -> f64 {
    DEFAULT_TARIF_TRANSFERT_KM
}

fn default_tarif_mise_disposition_h() -> f64 {
    DEFAULT_TARIF_MISE_DISPOSITION_H
}

#[derive(Debug, Serialize)]
pub struct CompanySettingsResponse {
    pub id: String,
    pub nom_societe: String,
    pub numero_siret: String,
    pub adresse: String,
    pub telephone: String,
    pub email: String,
    pub tarif_transfert_km: f64,
    pub tarif_mise_disposition_h: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CompanySettings> for CompanySettingsResponse {
    fn from(settings: CompanySettings) -> Self {
        Self {
            id: settings.id,
            nom_societe: settings.nom_societe,
            numero_siret: settings.numero_siret,
            adresse: settings.adresse,
            telephone: settings.telephone,
            email: settings.email,
            tarif_transfert_km: settings.tarif_transfert_km,
            tarif_mise_disposition_h: settings.tarif_mise_disposition_h,
            created_at: settings.created_at.to_rfc3339(),
            updated_at: settings.updated_at.to_rfc3339(),
        }
    }
}

/// Payload for creating a quote. The wire shape keeps both quantity fields
/// optional; [`DevisInput::into_prestation`] narrows it to the variant the
/// `type_prestation` tag selects.
#[derive(Debug, Deserialize)]
pub struct DevisInput {
    pub client: Client,
    pub type_prestation: String,
    pub adresse_prise_en_charge: Option<String>,
    pub adresse_destination: Option<String>,
    pub nombre_kilometres: Option<f64>,
    pub nombre_heures: Option<f64>,
}

impl DevisInput {
    /// Validate the variant-specific fields. Quantities must be strictly
    /// positive; zero is rejected like a missing value.
    pub fn into_prestation(self) -> Result<(Client, Prestation), AppError> {
        let prestation = match self.type_prestation.as_str() {
            "transfert" => {
                let nombre_kilometres = self
                    .nombre_kilometres
                    .filter(|km| *km > 0.0)
                    .ok_or_else(|| {
                        AppError::BadRequest(anyhow::anyhow!(
                            "Nombre de kilomètres requis pour un transfert"
                        ))
                    })?;
                Prestation::Transfert {
                    adresse_prise_en_charge: self.adresse_prise_en_charge,
                    adresse_destination: self.adresse_destination,
                    nombre_kilometres,
                }
            }
            "mise_a_disposition" => {
                let nombre_heures =
                    self.nombre_heures.filter(|h| *h > 0.0).ok_or_else(|| {
                        AppError::BadRequest(anyhow::anyhow!(
                            "Nombre d'heures requis pour une mise à disposition"
                        ))
                    })?;
                Prestation::MiseADisposition { nombre_heures }
            }
            _ => {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Type de prestation invalide"
                )))
            }
        };

        Ok((self.client, prestation))
    }
}

#[derive(Debug, Serialize)]
pub struct DevisResponse {
    pub id: String,
    pub numero_devis: String,
    pub date_creation: String,
    pub date_validite: String,
    pub client: Client,
    #[serde(flatten)]
    pub prestation: Prestation,
    pub prix_unitaire: f64,
    pub prix_ht: f64,
    pub taux_tva: f64,
    pub montant_tva: f64,
    pub prix_ttc: f64,
    pub is_facture: bool,
    pub created_at: String,
}

impl From<Devis> for DevisResponse {
    fn from(devis: Devis) -> Self {
        Self {
            id: devis.id,
            numero_devis: devis.numero_devis,
            date_creation: devis.date_creation.to_rfc3339(),
            date_validite: devis.date_validite.to_rfc3339(),
            client: devis.client,
            prestation: devis.prestation,
            prix_unitaire: devis.prix_unitaire,
            prix_ht: devis.prix_ht,
            taux_tva: devis.taux_tva,
            montant_tva: devis.montant_tva,
            prix_ttc: devis.prix_ttc,
            is_facture: devis.is_facture,
            created_at: devis.created_at.to_rfc3339(),
        }
    }
}
