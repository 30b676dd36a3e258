use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use riverlog_lib::{config::Settings, db, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing database_url or jwt_secret fails here, before anything starts.
    let settings = Settings::load().context("invalid or incomplete configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = db::connect(&settings.database_url)
        .await
        .context("failed to connect to database")?;
    db::init_schema(&pool)
        .await
        .context("failed to initialise schema")?;

    let bind_addr = settings.bind_addr;
    let state = AppState::new(pool, settings);
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!(%bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
