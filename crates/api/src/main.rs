use anyhow::Context;
use chrono::Utc;

use vendorclub_api::app::{AppState, build_app};
use vendorclub_infra::{Config, Database, seed::seed_sample_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vendorclub_observability::init();

    let config = Config::load()?;
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to open database")?;

    if config.seed_sample_data {
        seed_sample_data(&db, config.bcrypt_cost, Utc::now()).await?;
    }

    let app = build_app(AppState::new(&config, db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
