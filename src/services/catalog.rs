use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::graph::keyword::KeywordGraph;
use crate::models::{Category, Library, Media, MediaEntry};

/// Trait for raw catalog data sources
///
/// Dataset acquisition and cleaning happen upstream; this seam only hands
/// over raw entries. Swapping in a scraper or an API-backed source later
/// means implementing this trait, nothing more.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches every raw entry this source holds
    async fn fetch_entries(&self) -> AppResult<Vec<MediaEntry>>;

    /// Source name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Catalog source backed by a JSON array file on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch_entries(&self) -> AppResult<Vec<MediaEntry>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Dataset(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let entries: Vec<MediaEntry> = serde_json::from_str(&contents).map_err(|e| {
            AppError::Dataset(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(entries)
    }

    fn name(&self) -> &'static str {
        "json_file"
    }
}

/// Result of loading one dataset
#[derive(Debug)]
pub struct CatalogLoad {
    pub records: Vec<Media>,
    pub skipped: usize,
}

/// Everything the engine reads at request time, frozen at startup
///
/// No writer exists once the server is up, so requests share one snapshot
/// through an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Movies the user may cite as references
    pub movies: Library,
    /// Shows the user may cite as references
    pub shows: Library,
    /// Candidate catalog scored for recommendations
    pub candidates: Library,
    /// Keyword relationships shared by every scoring run
    pub keyword_graph: KeywordGraph,
}

impl CatalogSnapshot {
    /// Sorted list of every genre in the candidate catalog
    pub fn candidate_genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .candidates
            .items()
            .flat_map(|media| media.genres.iter().cloned())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        genres.sort();
        genres
    }
}

/// Loads one dataset into coerced records
///
/// Malformed entries are logged and skipped so a single bad row cannot sink
/// a whole catalog. A source that cannot be read or parsed at all still
/// fails the load.
pub async fn load_catalog(source: &dyn CatalogSource, category: Category) -> AppResult<CatalogLoad> {
    let entries = source.fetch_entries().await?;
    let total = entries.len();

    let mut records = Vec::with_capacity(total);
    let mut skipped = 0usize;
    for entry in entries {
        match Media::from_entry(entry, category) {
            Ok(media) => records.push(media),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    source = source.name(),
                    error = %e,
                    "Skipping malformed catalog entry"
                );
            }
        }
    }

    tracing::info!(
        source = source.name(),
        category = ?category,
        loaded = records.len(),
        skipped,
        "Catalog loaded"
    );

    Ok(CatalogLoad { records, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenreField, NumberField, YearField};

    fn create_test_entry(title: &str, rating: NumberField) -> MediaEntry {
        MediaEntry {
            title: title.to_string(),
            genre: GenreField::Delimited("Action".to_string()),
            rating,
            release_date: YearField::Number(2015),
            plot_summary: String::new(),
            keywords: vec![],
        }
    }

    #[test]
    fn test_load_catalog_skips_malformed_entries() {
        let mut source = MockCatalogSource::new();
        source.expect_fetch_entries().returning(|| {
            Ok(vec![
                create_test_entry("Good One", NumberField::Number(8.0)),
                create_test_entry("Bad One", NumberField::Text("not a number".to_string())),
                create_test_entry("Good Two", NumberField::Text("7.25".to_string())),
            ])
        });
        source.expect_name().return_const("mock");

        let load = tokio_test::block_on(load_catalog(&source, Category::Anime)).unwrap();
        assert_eq!(load.records.len(), 2);
        assert_eq!(load.skipped, 1);
        assert_eq!(load.records[0].title, "Good One");
        assert_eq!(load.records[1].rating, 7.25);
        assert!(load
            .records
            .iter()
            .all(|media| media.category == Category::Anime));
    }

    #[test]
    fn test_load_catalog_propagates_source_failure() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch_entries()
            .returning(|| Err(AppError::Dataset("boom".to_string())));
        source.expect_name().return_const("mock");

        let result = tokio_test::block_on(load_catalog(&source, Category::Movie));
        assert!(matches!(result, Err(AppError::Dataset(_))));
    }

    #[tokio::test]
    async fn test_json_file_source_reads_array() {
        let dir = std::env::temp_dir().join("torii-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("animes.json");
        std::fs::write(
            &path,
            r#"[
                {"title": "Monster", "genre": "Drama, Thriller", "rating": "8.88", "release_date": "2004-04-07", "plot_summary": "", "keywords": ["doctor"]},
                {"title": "Hellsing", "genre": ["Action"], "rating": 7.6, "release_date": 2001}
            ]"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        let entries = source.fetch_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Monster");

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_json_file_source_missing_file_fails() {
        let source = JsonFileSource::new("/nonexistent/animes.json");
        let result = source.fetch_entries().await;
        assert!(matches!(result, Err(AppError::Dataset(_))));
    }

    #[tokio::test]
    async fn test_json_file_source_rejects_malformed_document() {
        let dir = std::env::temp_dir().join("torii-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let source = JsonFileSource::new(&path);
        let result = source.fetch_entries().await;
        assert!(matches!(result, Err(AppError::Dataset(_))));

        std::fs::remove_file(&path).ok();
    }
}
