//! River trips: models and owner-scoped repository.
//!
//! Trips are normalized: a trip points at a catalog section through
//! `section_id`, and the river/section names in the read model come from a
//! join, not from columns on the trips table.
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

use crate::error::AppError;
use crate::query::{
    bind_params, bind_params_as, bind_params_scalar, build_list_query, FilterSet, Page, SortSpec,
    SqlParam,
};
use crate::update::{double_option, UpdateSet};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub section_id: i64,
    pub river_name: String,
    pub section_name: String,
    pub trip_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub craft_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub section_id: i64,
    pub trip_date: NaiveDate,
    pub difficulty: Option<String>,
    pub flow: Option<i64>,
    pub flow_unit: Option<String>,
    pub craft_type: Option<String>,
    pub duration_minutes: Option<i64>,
    pub mileage: Option<f64>,
    pub notes: Option<String>,
}

/// Sparse update: an absent field is unchanged, an explicit `null` clears
/// the column. `section_id` and `trip_date` are NOT NULL, so they only take
/// the single-`Option` form.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTripRequest {
    pub section_id: Option<i64>,
    pub trip_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub difficulty: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub flow: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub flow_unit: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub craft_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_minutes: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mileage: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListTripsParams {
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const SELECT_TRIPS: &str = "SELECT t.id, t.user_id, t.section_id, r.name AS river_name, \
     s.name AS section_name, t.trip_date, t.difficulty, t.flow, t.flow_unit, t.craft_type, \
     t.duration_minutes, t.mileage, t.notes, t.created_at, t.updated_at \
     FROM trips t \
     JOIN sections s ON t.section_id = s.id \
     JOIN rivers r ON s.river_id = r.id";

const COUNT_TRIPS: &str = "SELECT COUNT(*) FROM trips t \
     JOIN sections s ON t.section_id = s.id \
     JOIN rivers r ON s.river_id = r.id";

pub const TRIP_SORT: SortSpec = SortSpec {
    allowed: &[
        ("date_asc", "t.trip_date ASC, t.id ASC"),
        ("date_desc", "t.trip_date DESC, t.id DESC"),
        ("created_asc", "t.created_at ASC"),
        ("created_desc", "t.created_at DESC"),
    ],
    default_order: "t.trip_date DESC, t.id DESC",
};

pub struct TripRepository {
    pool: SqlitePool,
}

impl TripRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List the owner's trips. The owner predicate is part of the shared
    /// filter set, so count and page agree on it.
    pub async fn list(
        &self,
        owner_id: i64,
        params: &ListTripsParams,
    ) -> Result<(Vec<Trip>, i64), AppError> {
        let mut filters = FilterSet::new();
        filters.eq("t.user_id", owner_id);

        let order = TRIP_SORT.resolve(params.sort.as_deref());
        let page = Page::new(params.limit, params.offset);
        let query = build_list_query(SELECT_TRIPS, COUNT_TRIPS, &filters, order, page);

        let total: i64 = bind_params_scalar(sqlx::query_scalar(&query.count_sql), &query.params)
            .fetch_one(&self.pool)
            .await?;

        let trips = bind_params_as(sqlx::query_as::<_, Trip>(&query.page_sql), &query.params)
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((trips, total))
    }

    /// Fetch one trip, scoped to its owner. A trip belonging to someone else
    /// is indistinguishable from a nonexistent one.
    pub async fn get(&self, owner_id: i64, trip_id: i64) -> Result<Trip, AppError> {
        let sql = format!("{SELECT_TRIPS} WHERE t.id = ? AND t.user_id = ?");
        sqlx::query_as::<_, Trip>(&sql)
            .bind(trip_id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("trip not found".to_string()))
    }

    pub async fn create(
        &self,
        owner_id: i64,
        req: CreateTripRequest,
    ) -> Result<Trip, AppError> {
        self.section_exists(req.section_id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO trips (user_id, section_id, trip_date, difficulty, flow, flow_unit, \
             craft_type, duration_minutes, mileage, notes, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(req.section_id)
        .bind(req.trip_date)
        .bind(req.difficulty)
        .bind(req.flow)
        .bind(req.flow_unit)
        .bind(req.craft_type)
        .bind(req.duration_minutes)
        .bind(req.mileage)
        .bind(req.notes)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        // Reload through the joined read model so derived fields come from
        // storage, not from the request.
        self.get(owner_id, result.last_insert_rowid()).await
    }

    /// Apply a sparse update and return the reloaded trip.
    ///
    /// Two-step protocol: an owner-scoped existence check, then a mutation
    /// whose WHERE repeats both keys. Zero affected rows (concurrent delete,
    /// ownership race) report as NotFound rather than silent success.
    pub async fn update(
        &self,
        owner_id: i64,
        trip_id: i64,
        req: UpdateTripRequest,
    ) -> Result<Trip, AppError> {
        self.get(owner_id, trip_id).await?;

        if let Some(section_id) = req.section_id {
            self.section_exists(section_id).await?;
        }

        let mut set = UpdateSet::new();
        if let Some(section_id) = req.section_id {
            set.set("section_id", section_id);
        }
        if let Some(trip_date) = req.trip_date {
            set.set("trip_date", trip_date);
        }
        if let Some(difficulty) = req.difficulty {
            set.set_nullable("difficulty", difficulty.map(SqlParam::from));
        }
        if let Some(flow) = req.flow {
            set.set_nullable("flow", flow.map(SqlParam::from));
        }
        if let Some(flow_unit) = req.flow_unit {
            set.set_nullable("flow_unit", flow_unit.map(SqlParam::from));
        }
        if let Some(craft_type) = req.craft_type {
            set.set_nullable("craft_type", craft_type.map(SqlParam::from));
        }
        if let Some(duration_minutes) = req.duration_minutes {
            set.set_nullable("duration_minutes", duration_minutes.map(SqlParam::from));
        }
        if let Some(mileage) = req.mileage {
            set.set_nullable("mileage", mileage.map(SqlParam::from));
        }
        if let Some(notes) = req.notes {
            set.set_nullable("notes", notes.map(SqlParam::from));
        }
        set.set("updated_at", Utc::now());

        let (sql, params) = set.build("trips", &[("id", trip_id), ("user_id", owner_id)]);
        let result = bind_params(sqlx::query(&sql), &params)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("trip not found".to_string()));
        }

        self.get(owner_id, trip_id).await
    }

    pub async fn delete(&self, owner_id: i64, trip_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ? AND user_id = ?")
            .bind(trip_id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("trip not found".to_string()));
        }
        Ok(())
    }

    async fn section_exists(&self, section_id: i64) -> Result<(), AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM sections WHERE id = ?")
            .bind(section_id)
            .fetch_optional(&self.pool)
            .await?;

        match found {
            Some(_) => Ok(()),
            None => Err(AppError::Validation("section does not exist".to_string())),
        }
    }
}
