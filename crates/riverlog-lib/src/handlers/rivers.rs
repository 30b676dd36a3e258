//! Public catalog handlers: rivers and sections.
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::query::{Page, PageEnvelope};
use crate::rivers::{ListRiversParams, ListSectionsParams, RiverRepository};
use crate::AppState;

pub async fn list_rivers(
    State(state): State<AppState>,
    Query(params): Query<ListRiversParams>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RiverRepository::new(state.pool.clone());
    let (items, total) = repo.list_rivers(&params).await?;

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

pub async fn list_sections(
    State(state): State<AppState>,
    Query(params): Query<ListSectionsParams>,
) -> Result<impl IntoResponse, AppError> {
    let repo = RiverRepository::new(state.pool.clone());
    let (items, total) = repo.list_sections(&params).await?;

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

pub async fn get_section(
    State(state): State<AppState>,
    Path(section_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let section = RiverRepository::new(state.pool.clone())
        .get_section(section_id)
        .await?;
    Ok(Json(json!({ "data": section })))
}
