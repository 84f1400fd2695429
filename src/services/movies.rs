//! Recommendation orchestrator
//!
//! Composes the catalog, the ranker and a metadata provider. Title lookups
//! that miss the catalog are hard errors; a failed metadata fetch never aborts
//! a batch — the affected movie falls back to the default record and the
//! failure is carried as a warning value for the presentation layer to render.

use std::sync::Arc;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
    models::{CatalogEntry, MovieDetails, MovieMetadata},
    services::{providers::MetadataProvider, ranker},
};

/// Details for one movie, plus a warning when enrichment degraded
#[derive(Debug)]
pub struct EnrichedMovie {
    pub details: MovieDetails,
    pub warning: Option<String>,
}

/// An ordered recommendation batch with any per-item enrichment warnings
#[derive(Debug)]
pub struct RecommendationSet {
    pub movies: Vec<MovieDetails>,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct MovieService {
    catalog: Arc<Catalog>,
    provider: Arc<dyn MetadataProvider>,
    image_base_url: String,
}

impl MovieService {
    pub fn new(
        catalog: Arc<Catalog>,
        provider: Arc<dyn MetadataProvider>,
        image_base_url: String,
    ) -> Self {
        Self {
            catalog,
            provider,
            image_base_url,
        }
    }

    /// Resolves a title to its enriched details
    pub async fn movie_details(&self, title: &str) -> AppResult<EnrichedMovie> {
        let index = self.resolve(title)?;
        let entry = self.entry(index)?;

        let (metadata, warning) = self.fetch_or_fallback(entry).await;
        Ok(EnrichedMovie {
            details: MovieDetails::assemble(entry, metadata, &self.image_base_url),
            warning,
        })
    }

    /// Top-`count` recommendations for a title, enriched in ranker order
    ///
    /// Metadata fetches are strictly sequential: one round-trip completes
    /// before the next is issued.
    pub async fn recommendations(&self, title: &str, count: usize) -> AppResult<RecommendationSet> {
        let index = self.resolve(title)?;
        let neighbors = ranker::rank(self.catalog.similarity(), index, count);

        tracing::info!(
            title,
            requested = count,
            candidates = neighbors.len(),
            "Ranking complete, enriching recommendations"
        );

        let mut movies = Vec::with_capacity(neighbors.len());
        let mut warnings = Vec::new();

        for (neighbor, score) in neighbors {
            let entry = self.entry(neighbor)?;
            let (metadata, warning) = self.fetch_or_fallback(entry).await;
            tracing::debug!(title = %entry.title, score, "Recommendation enriched");
            movies.push(MovieDetails::assemble(entry, metadata, &self.image_base_url));
            warnings.extend(warning);
        }

        Ok(RecommendationSet { movies, warnings })
    }

    /// All catalog titles, for the selector
    pub fn movie_titles(&self) -> Vec<String> {
        self.catalog.titles()
    }

    fn resolve(&self, title: &str) -> AppResult<usize> {
        self.catalog
            .index_of(title)
            .ok_or_else(|| AppError::NotFound(format!("movie '{}' is not in the catalog", title)))
    }

    fn entry(&self, index: usize) -> AppResult<&CatalogEntry> {
        self.catalog
            .entry(index)
            .ok_or_else(|| AppError::Internal(format!("catalog index {} out of range", index)))
    }

    /// Absorbs a fetch failure into the fallback record plus a warning value
    async fn fetch_or_fallback(&self, entry: &CatalogEntry) -> (MovieMetadata, Option<String>) {
        match self.provider.fetch_movie(entry.movie_id).await {
            Ok(metadata) => (metadata, None),
            Err(err) => {
                tracing::warn!(
                    title = %entry.title,
                    movie_id = entry.movie_id,
                    error = %err,
                    "Metadata fetch failed, using fallback record"
                );
                (
                    MovieMetadata::fallback(),
                    Some(format!("Could not fetch data for '{}': {}", entry.title, err)),
                )
            }
        }
    }
}
