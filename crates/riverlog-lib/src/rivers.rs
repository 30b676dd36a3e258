//! Reference catalog: rivers and sections, read-only filtered listing.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

use crate::error::AppError;
use crate::query::{
    bind_params_as, bind_params_scalar, build_list_query, FilterSet, Page, SortSpec,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct River {
    pub id: i64,
    pub name: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Section read model. `river_name` and `state` are joined from the parent
/// river.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Section {
    pub id: i64,
    pub river_id: i64,
    pub river_name: String,
    pub state: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put_in_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_out_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_unit: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListRiversParams {
    pub state: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSectionsParams {
    pub river_id: Option<i64>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const SELECT_RIVERS: &str = "SELECT id, name, state, created_at, updated_at FROM rivers";
const COUNT_RIVERS: &str = "SELECT COUNT(*) FROM rivers";

const SELECT_SECTIONS: &str = "SELECT s.id, s.river_id, r.name AS river_name, r.state, s.name, \
     s.class_rating, s.gradient, s.mileage, s.put_in_name, s.take_out_name, \
     s.flow_min, s.flow_max, s.flow_unit, s.created_at, s.updated_at \
     FROM sections s JOIN rivers r ON s.river_id = r.id";
const COUNT_SECTIONS: &str = "SELECT COUNT(*) FROM sections s JOIN rivers r ON s.river_id = r.id";

pub const RIVER_SORT: SortSpec = SortSpec {
    allowed: &[("name", "name ASC"), ("state", "state ASC, name ASC")],
    default_order: "name ASC",
};

pub const SECTION_SORT: SortSpec = SortSpec {
    allowed: &[
        ("name", "s.name ASC"),
        ("river", "r.name ASC, s.name ASC"),
    ],
    default_order: "r.name ASC, s.name ASC",
};

pub struct RiverRepository {
    pool: SqlitePool,
}

impl RiverRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_rivers(
        &self,
        params: &ListRiversParams,
    ) -> Result<(Vec<River>, i64), AppError> {
        let mut filters = FilterSet::new();
        if let Some(state) = params.state.as_deref().filter(|s| !s.is_empty()) {
            filters.eq("state", state);
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            filters.contains_nocase("name", search);
        }

        let order = RIVER_SORT.resolve(params.sort.as_deref());
        let page = Page::new(params.limit, params.offset);
        let query = build_list_query(SELECT_RIVERS, COUNT_RIVERS, &filters, order, page);

        let total: i64 = bind_params_scalar(sqlx::query_scalar(&query.count_sql), &query.params)
            .fetch_one(&self.pool)
            .await?;

        let rivers = bind_params_as(sqlx::query_as::<_, River>(&query.page_sql), &query.params)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rivers, total))
    }

    pub async fn list_sections(
        &self,
        params: &ListSectionsParams,
    ) -> Result<(Vec<Section>, i64), AppError> {
        let mut filters = FilterSet::new();
        if let Some(river_id) = params.river_id {
            filters.eq("s.river_id", river_id);
        }
        if let Some(state) = params.state.as_deref().filter(|s| !s.is_empty()) {
            filters.eq("r.state", state);
        }
        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            filters.any_contains_nocase(&["s.name", "r.name"], search);
        }

        let order = SECTION_SORT.resolve(params.sort.as_deref());
        let page = Page::new(params.limit, params.offset);
        let query = build_list_query(SELECT_SECTIONS, COUNT_SECTIONS, &filters, order, page);

        let total: i64 = bind_params_scalar(sqlx::query_scalar(&query.count_sql), &query.params)
            .fetch_one(&self.pool)
            .await?;

        let sections = bind_params_as(sqlx::query_as::<_, Section>(&query.page_sql), &query.params)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((sections, total))
    }

    pub async fn get_section(&self, section_id: i64) -> Result<Section, AppError> {
        let sql = format!("{SELECT_SECTIONS} WHERE s.id = ?");
        sqlx::query_as::<_, Section>(&sql)
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("section not found".to_string()))
    }
}
