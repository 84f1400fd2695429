/// TMDB metadata provider
///
/// Fetches `/movie/{id}` with the operator's API key and deserializes into the
/// typed response shape. Connection-level failures (refused, timeout) are
/// retried with exponential backoff; any non-2xx status or malformed payload
/// fails immediately.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MovieMetadata, TmdbMovieResponse},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    /// Total attempts per fetch, first try included
    max_attempts: u32,
    /// Delay before the first retry; doubles after each retry
    base_delay: Duration,
}

impl TmdbProvider {
    /// Builds the provider and its HTTP client. The client carries the
    /// per-request timeout and is released when the provider is dropped.
    pub fn new(config: &Config, api_key: String) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key,
            api_url: config.tmdb_api_url.clone(),
            max_attempts: config.fetch_attempts.max(1),
            base_delay: config.retry_base_delay(),
        })
    }

    async fn request(&self, movie_id: u32) -> AppResult<MovieMetadata> {
        let url = format!("{}/movie/{}", self.api_url, movie_id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        let raw: TmdbMovieResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("failed to parse TMDB response: {}", e)))?;

        Ok(raw.into())
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_movie(&self, movie_id: u32) -> AppResult<MovieMetadata> {
        let mut delay = self.base_delay;
        let mut attempt = 1;

        loop {
            match self.request(movie_id).await {
                Ok(metadata) => {
                    tracing::info!(movie_id, attempt, "Movie metadata fetched");
                    return Ok(metadata);
                }
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    tracing::warn!(
                        movie_id,
                        attempt,
                        retry_in_secs = delay.as_secs(),
                        error = %err,
                        "Transient TMDB failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(movie_id, attempt, error = %err, "TMDB fetch failed");
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn test_provider(api_url: String, attempts: u32, base_delay: Duration) -> TmdbProvider {
        TmdbProvider {
            http_client: HttpClient::new(),
            api_key: "test_key".to_string(),
            api_url,
            max_attempts: attempts,
            base_delay,
        }
    }

    async fn spawn_server(router: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    fn counting_router(hits: Arc<AtomicUsize>, status: StatusCode, body: &'static str) -> Router {
        Router::new().route(
            "/movie/:id",
            get(move |Path(_id): Path<u32>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    (status, body).into_response()
                }
            }),
        )
    }

    #[tokio::test]
    async fn fetch_parses_typed_response() {
        let router = Router::new().route(
            "/movie/:id",
            get(|Path(id): Path<u32>| async move {
                assert_eq!(id, 27205);
                Json(json!({
                    "overview": "A mind-bending heist.",
                    "release_date": "2010-07-16",
                    "vote_average": 8.4,
                    "genres": [{"id": 28, "name": "Action"}],
                    "poster_path": "/poster.jpg"
                }))
            }),
        );
        let addr = spawn_server(router).await;
        let provider = test_provider(format!("http://{}", addr), 3, Duration::from_secs(2));

        let metadata = provider.fetch_movie(27205).await.unwrap();
        assert_eq!(metadata.overview, "A mind-bending heist.");
        assert_eq!(metadata.rating, 8.4);
        assert_eq!(metadata.genres, vec!["Action"]);
        assert_eq!(metadata.poster_path.as_deref(), Some("/poster.jpg"));
    }

    #[tokio::test]
    async fn http_404_fails_immediately_without_retry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = spawn_server(counting_router(hits.clone(), StatusCode::NOT_FOUND, "{}")).await;
        let provider = test_provider(format!("http://{}", addr), 3, Duration::from_secs(2));

        let err = provider.fetch_movie(1).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn http_500_fails_immediately_without_retry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr =
            spawn_server(counting_router(hits.clone(), StatusCode::INTERNAL_SERVER_ERROR, "{}"))
                .await;
        let provider = test_provider(format!("http://{}", addr), 3, Duration::from_secs(2));

        let err = provider.fetch_movie(1).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_permanent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = spawn_server(counting_router(
            hits.clone(),
            StatusCode::OK,
            r#"{"release_date": "2010-07-16"}"#,
        ))
        .await;
        let provider = test_provider(format!("http://{}", addr), 3, Duration::from_secs(2));

        let err = provider.fetch_movie(1).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_service_retries_with_backoff_then_fails() {
        // Bind and drop a listener so the port refuses connections
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = test_provider(format!("http://{}", addr), 3, Duration::from_secs(2));

        let started = tokio::time::Instant::now();
        let err = provider.fetch_movie(1).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, AppError::Transient(_)));
        // Two backoff sleeps: 2s then 4s
        assert!(elapsed >= Duration::from_secs(6), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(14), "elapsed {:?}", elapsed);
    }
}
