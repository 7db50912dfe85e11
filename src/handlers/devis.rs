use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::dtos::{DevisInput, DevisResponse};
use crate::error::AppError;
use crate::models::Pricing;
use crate::services::metrics;
use crate::startup::AppState;

/// Create a quote. Blocked until the company settings exist, since the unit
/// rate is snapshotted from them at creation time.
pub async fn create_devis(
    State(state): State<AppState>,
    Json(input): Json<DevisInput>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get().await.map_err(|e| match e {
        AppError::NotFound(_) => AppError::BadRequest(anyhow::anyhow!(
            "Paramètres de société non configurés. Veuillez configurer vos tarifs d'abord."
        )),
        other => other,
    })?;

    let (client, prestation) = input.into_prestation()?;
    let pricing = Pricing::compute(&prestation, &settings);

    let type_prestation = prestation.type_name();
    let devis = state.devis.create(client, prestation, pricing).await?;
    metrics::record_devis_created(type_prestation);

    Ok(Json(DevisResponse::from(devis)))
}

pub async fn list_devis(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let devis = state.devis.list().await?;
    let responses: Vec<DevisResponse> = devis.into_iter().map(DevisResponse::from).collect();
    Ok(Json(responses))
}

pub async fn get_devis(
    State(state): State<AppState>,
    Path(devis_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let devis = state.devis.get(&devis_id).await?;
    Ok(Json(DevisResponse::from(devis)))
}

pub async fn convert_to_facture(
    State(state): State<AppState>,
    Path(devis_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let devis = state.devis.promote(&devis_id).await?;
    metrics::record_facture_converted();
    Ok(Json(DevisResponse::from(devis)))
}

pub async fn list_factures(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let factures = state.devis.list_factures().await?;
    let responses: Vec<DevisResponse> = factures.into_iter().map(DevisResponse::from).collect();
    Ok(Json(responses))
}
