//! Trip CRUD handlers. Every repository call takes the authenticated owner id
//! from the extractor; ids in the path only select within that owner's rows.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use metrics::counter;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::query::{Page, PageEnvelope};
use crate::trips::{CreateTripRequest, ListTripsParams, TripRepository, UpdateTripRequest};
use crate::{metrics as keys, AppState};

pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListTripsParams>,
) -> Result<impl IntoResponse, AppError> {
    let repo = TripRepository::new(state.pool.clone());
    let (items, total) = repo.list(auth.user_id, &params).await?;

    let page = Page::new(params.limit, params.offset);
    Ok(Json(json!({
        "data": PageEnvelope {
            items,
            total,
            limit: page.limit(),
            offset: page.offset(),
        }
    })))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTripRequest>,
) -> Result<impl IntoResponse, AppError> {
    let trip = TripRepository::new(state.pool.clone())
        .create(auth.user_id, req)
        .await?;

    counter!(keys::TRIP_CREATED).increment(1);
    Ok((StatusCode::CREATED, Json(json!({ "data": trip }))))
}

pub async fn get_trip(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let trip = TripRepository::new(state.pool.clone())
        .get(auth.user_id, trip_id)
        .await?;
    Ok(Json(json!({ "data": trip })))
}

pub async fn update_trip(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    Json(req): Json<UpdateTripRequest>,
) -> Result<impl IntoResponse, AppError> {
    let trip = TripRepository::new(state.pool.clone())
        .update(auth.user_id, trip_id, req)
        .await?;
    Ok(Json(json!({ "data": trip })))
}

pub async fn delete_trip(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    TripRepository::new(state.pool.clone())
        .delete(auth.user_id, trip_id)
        .await?;

    counter!(keys::TRIP_DELETED).increment(1);
    Ok(StatusCode::NO_CONTENT)
}
