use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinerec_api::{
    catalog::Catalog,
    config::Config,
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, MovieService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(
        Catalog::load(&config.catalog_path, &config.similarity_path)
            .context("Failed to load the movie catalog")?,
    );

    let service = match config.tmdb_api_key.clone() {
        Some(api_key) => Some(MovieService::new(
            catalog.clone(),
            Arc::new(TmdbProvider::new(&config, api_key)?),
            config.tmdb_image_url.clone(),
        )),
        None => {
            tracing::warn!(
                "TMDB_API_KEY is not set; serving the catalog only. \
                 Details and recommendations will report a missing credential"
            );
            None
        }
    };

    let state = Arc::new(AppState {
        catalog,
        service,
        default_recommendation_count: config.default_recommendation_count,
    });
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
