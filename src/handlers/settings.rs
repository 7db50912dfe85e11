use axum::{extract::State, response::IntoResponse, Json};

use crate::dtos::{CompanySettingsInput, CompanySettingsResponse};
use crate::error::AppError;
use crate::startup::AppState;

pub async fn upsert_settings(
    State(state): State<AppState>,
    Json(input): Json<CompanySettingsInput>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.upsert(input).await?;
    Ok(Json(CompanySettingsResponse::from(settings)))
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings.get().await?;
    Ok(Json(CompanySettingsResponse::from(settings)))
}
