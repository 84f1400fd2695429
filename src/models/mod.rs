use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the movie catalog
///
/// Row order in the catalog file defines the index space shared with the
/// similarity matrix, so entries must never be reordered after loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    /// TMDB identifier used for metadata enrichment
    pub movie_id: u32,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw response from TMDB `/movie/{id}`
///
/// `overview`, `release_date` and `vote_average` are required: a payload
/// missing any of them fails deserialization and is treated as malformed,
/// which degrades to the fallback record downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieResponse {
    pub overview: String,
    pub release_date: String,
    pub vote_average: f64,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub name: String,
}

/// Descriptive metadata for one movie, as consumed by the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMetadata {
    pub overview: String,
    pub release_date: String,
    pub rating: f64,
    pub genres: Vec<String>,
    pub poster_path: Option<String>,
}

impl MovieMetadata {
    /// Default record used when enrichment fails permanently
    pub fn fallback() -> Self {
        Self {
            overview: "Movie data unavailable".to_string(),
            release_date: "Unknown".to_string(),
            rating: 0.0,
            genres: Vec::new(),
            poster_path: None,
        }
    }

    /// Full poster URL, or None when TMDB reported no poster
    pub fn poster_url(&self, image_base: &str) -> Option<String> {
        self.poster_path.as_ref().map(|path| {
            format!(
                "{}/{}",
                image_base.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        })
    }
}

impl From<TmdbMovieResponse> for MovieMetadata {
    fn from(raw: TmdbMovieResponse) -> Self {
        Self {
            overview: raw.overview,
            release_date: raw.release_date,
            rating: raw.vote_average,
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            poster_path: raw.poster_path,
        }
    }
}

/// A catalog entry enriched with metadata, returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieDetails {
    pub title: String,
    pub movie_id: u32,
    pub overview: String,
    pub release_date: String,
    /// TMDB vote average on a 0.0-10.0 scale
    pub rating: f64,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl MovieDetails {
    /// Assembles the client-facing record from a catalog row and its metadata
    pub fn assemble(entry: &CatalogEntry, metadata: MovieMetadata, image_base: &str) -> Self {
        let poster_url = metadata.poster_url(image_base);
        Self {
            title: entry.title.clone(),
            movie_id: entry.movie_id,
            overview: metadata.overview,
            release_date: metadata.release_date,
            rating: metadata.rating,
            genres: metadata.genres,
            poster_url,
            fetched_at: Utc::now(),
        }
    }
}
