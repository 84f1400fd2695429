//! Read-only movie catalog and similarity matrix
//!
//! Both files are loaded once at startup and never mutated afterwards. The
//! catalog CSV's row order defines the index space: row `i` of the similarity
//! matrix scores catalog entry `i` against every other entry.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::CatalogEntry;

#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    similarity: Vec<Vec<f64>>,
}

impl Catalog {
    /// Loads the catalog CSV and the JSON similarity matrix, validating that
    /// the matrix is square and aligned row-for-row with the catalog.
    pub fn load(catalog_path: impl AsRef<Path>, similarity_path: impl AsRef<Path>) -> AppResult<Self> {
        let entries = Self::load_entries(catalog_path.as_ref())?;
        let similarity = Self::load_similarity(similarity_path.as_ref())?;

        if similarity.len() != entries.len() {
            return Err(AppError::MissingData(format!(
                "similarity matrix has {} rows but the catalog has {} entries",
                similarity.len(),
                entries.len()
            )));
        }
        if let Some((i, row)) = similarity
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != entries.len())
        {
            return Err(AppError::MissingData(format!(
                "similarity matrix row {} has {} columns, expected {}",
                i,
                row.len(),
                entries.len()
            )));
        }

        tracing::info!(movies = entries.len(), "Catalog loaded");

        Ok(Self { entries, similarity })
    }

    fn load_entries(path: &Path) -> AppResult<Vec<CatalogEntry>> {
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| AppError::MissingData(format!("cannot open {}: {}", path.display(), e)))?;

        let mut entries = Vec::new();
        for record in reader.deserialize() {
            let entry: CatalogEntry = record.map_err(|e| {
                AppError::MissingData(format!("bad catalog row in {}: {}", path.display(), e))
            })?;
            entries.push(entry);
        }

        if entries.is_empty() {
            return Err(AppError::MissingData(format!(
                "catalog {} contains no movies",
                path.display()
            )));
        }

        Ok(entries)
    }

    fn load_similarity(path: &Path) -> AppResult<Vec<Vec<f64>>> {
        let file = File::open(path)
            .map_err(|e| AppError::MissingData(format!("cannot open {}: {}", path.display(), e)))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            AppError::MissingData(format!("bad similarity matrix in {}: {}", path.display(), e))
        })
    }

    /// Number of catalog entries (and matrix dimension)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All titles in catalog order, for the selector
    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.title.clone()).collect()
    }

    /// Index of the first entry with the given title
    ///
    /// Duplicate titles are an ambiguity in the input data; the first match in
    /// catalog order wins.
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.title == title)
    }

    pub fn entry(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// The full similarity matrix
    pub fn similarity(&self) -> &[Vec<f64>] {
        &self.similarity
    }

    #[cfg(test)]
    pub fn from_parts(entries: Vec<CatalogEntry>, similarity: Vec<Vec<f64>>) -> Self {
        Self { entries, similarity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    struct TempFiles {
        catalog: PathBuf,
        similarity: PathBuf,
    }

    impl Drop for TempFiles {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.catalog);
            let _ = std::fs::remove_file(&self.similarity);
        }
    }

    fn write_fixture(tag: &str, catalog_csv: &str, similarity_json: &str) -> TempFiles {
        let dir = std::env::temp_dir();
        let catalog = dir.join(format!("cinerec_catalog_{}_{}.csv", tag, std::process::id()));
        let similarity = dir.join(format!("cinerec_matrix_{}_{}.json", tag, std::process::id()));
        let mut f = File::create(&catalog).unwrap();
        f.write_all(catalog_csv.as_bytes()).unwrap();
        let mut f = File::create(&similarity).unwrap();
        f.write_all(similarity_json.as_bytes()).unwrap();
        TempFiles { catalog, similarity }
    }

    #[test]
    fn loads_aligned_catalog_and_matrix() {
        let files = write_fixture(
            "ok",
            "title,movie_id\nAlpha,1\nBeta,2\nGamma,3\n",
            "[[1.0,0.8,0.3],[0.8,1.0,0.5],[0.3,0.5,1.0]]",
        );

        let catalog = Catalog::load(&files.catalog, &files.similarity).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.titles(), vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(catalog.index_of("Beta"), Some(1));
        assert_eq!(catalog.entry(2).unwrap().movie_id, 3);
        assert_eq!(catalog.similarity()[0], vec![1.0, 0.8, 0.3]);
    }

    #[test]
    fn first_match_wins_on_duplicate_titles() {
        let files = write_fixture(
            "dup",
            "title,movie_id\nTwin,10\nTwin,20\n",
            "[[1.0,0.5],[0.5,1.0]]",
        );

        let catalog = Catalog::load(&files.catalog, &files.similarity).unwrap();
        assert_eq!(catalog.index_of("Twin"), Some(0));
        assert_eq!(catalog.entry(0).unwrap().movie_id, 10);
    }

    #[test]
    fn unknown_title_is_none() {
        let files = write_fixture("miss", "title,movie_id\nAlpha,1\n", "[[1.0]]");
        let catalog = Catalog::load(&files.catalog, &files.similarity).unwrap();
        assert_eq!(catalog.index_of("Omega"), None);
    }

    #[test]
    fn missing_catalog_file_is_missing_data() {
        let err = Catalog::load("/nonexistent/movie_info.csv", "/nonexistent/similarity.json")
            .unwrap_err();
        assert!(matches!(err, AppError::MissingData(_)));
    }

    #[test]
    fn misaligned_matrix_is_rejected() {
        let files = write_fixture(
            "misaligned",
            "title,movie_id\nAlpha,1\nBeta,2\n",
            "[[1.0,0.5,0.1],[0.5,1.0,0.2],[0.1,0.2,1.0]]",
        );
        let err = Catalog::load(&files.catalog, &files.similarity).unwrap_err();
        assert!(matches!(err, AppError::MissingData(_)));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let files = write_fixture(
            "ragged",
            "title,movie_id\nAlpha,1\nBeta,2\n",
            "[[1.0,0.5],[0.5]]",
        );
        let err = Catalog::load(&files.catalog, &files.similarity).unwrap_err();
        assert!(matches!(err, AppError::MissingData(_)));
    }
}
