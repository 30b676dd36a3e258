//! Core library for the riverlog trip-logging service.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod query;
pub mod rivers;
pub mod router;
pub mod trips;
pub mod update;
pub mod users;
pub mod validation;

use std::sync::Arc;

use sqlx::sqlite::SqlitePool;

use crate::config::Settings;

/// Application state shared across all handlers.
///
/// Nothing in here is mutated during request handling; the pool manages its
/// own connection checkout.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Settings, including the token signing secret
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(pool: SqlitePool, settings: Settings) -> Self {
        Self {
            pool,
            settings: Arc::new(settings),
        }
    }
}
