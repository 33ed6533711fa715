//! Split record endpoints under `/api/splits`.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::{SubsecRound, Utc};
use service_core::error::AppError;
use validator::Validate;

use crate::{
    dtos::{CreateSplitRequest, MessageResponse, SplitResponse},
    services::metrics,
    startup::AppState,
};

pub const FETCH_FAILED: &str = "Failed to fetch splits";
pub const SAVE_FAILED: &str = "Failed to save split";
pub const SAVE_SUCCEEDED: &str = "Split saved successfully";
pub const LIVENESS_MESSAGE: &str = "Backend is working! ✅";

/// `GET /api/splits/all`
pub async fn list_splits(
    State(state): State<AppState>,
) -> Result<Json<Vec<SplitResponse>>, AppError> {
    let splits = state.store.list_all().await.map_err(|e| {
        tracing::error!(error = ?e, "Failed to fetch splits");
        metrics::record_store_error("list");
        AppError::Internal(FETCH_FAILED)
    })?;

    tracing::debug!(count = splits.len(), "Fetched splits");
    metrics::record_splits_listed(splits.len());

    Ok(Json(splits.into_iter().map(SplitResponse::from).collect()))
}

/// `POST /api/splits/create`
pub async fn create_split(
    State(state): State<AppState>,
    payload: Result<Json<CreateSplitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    // Millisecond precision, as stored by MongoDB
    let received_at = Utc::now().trunc_subsecs(3);
    let Json(payload) = payload?;
    payload.validate()?;

    let split = payload.into_split(received_at);

    tracing::info!(
        group_name = %split.group_name,
        people = split.people.len(),
        transactions = split.transactions.len(),
        "Creating split"
    );

    state.store.create(split).await.map_err(|e| {
        tracing::error!(error = ?e, "Failed to save split");
        metrics::record_store_error("create");
        AppError::Internal(SAVE_FAILED)
    })?;

    metrics::record_split_created();

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(SAVE_SUCCEEDED)),
    ))
}

/// `GET /api/splits/test`. Never touches the store.
pub async fn liveness() -> Json<MessageResponse> {
    Json(MessageResponse::new(LIVENESS_MESSAGE))
}
