//! Metadata provider abstraction
//!
//! The orchestrator talks to a trait so its batch semantics can be tested
//! without network access. TMDB is the only production implementation.

use crate::error::AppResult;
use crate::models::MovieMetadata;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// A source of per-movie descriptive metadata
///
/// Implementations own their transport and retry policy; the caller sees only
/// a result. Errors are classified (see `AppError::is_transient`) so callers
/// can tell an exhausted retry loop from a permanent rejection when reporting.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch descriptive metadata for one movie by its external identifier
    async fn fetch_movie(&self, movie_id: u32) -> AppResult<MovieMetadata>;
}
