use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::error::{AppError, AppResult};
use crate::models::Media;
use crate::services::catalog::CatalogSnapshot;
use crate::services::scoring::{Comparator, ReferenceSet};

/// Fallback batch count when the host will not say how parallel it is
const DEFAULT_PARALLELISM: usize = 4;

/// Parameters for one ranking run
#[derive(Debug, Clone)]
pub struct RankParams {
    /// Titles of the reference movies and shows
    pub titles: Vec<String>,
    /// Maximum number of recommendations returned
    pub limit: usize,
    /// Candidates rated below this are excluded
    pub min_rating: Option<f64>,
    /// Candidates must carry every one of these genres
    pub required_genres: Vec<String>,
}

/// A candidate together with its composite score
#[derive(Debug, Clone)]
pub struct ScoredMedia {
    pub media: Media,
    pub score: f64,
}

/// Generates ranked recommendations for a set of reference titles
///
/// Resolves the references, filters the candidate catalog, scores what is
/// left in parallel batches, and returns the top of the ranking. Candidate
/// order never affects the result: the final sort is total.
pub async fn get_recommendations(
    snapshot: Arc<CatalogSnapshot>,
    params: RankParams,
) -> AppResult<Vec<ScoredMedia>> {
    let start = Instant::now();

    if params.titles.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one reference title is required".to_string(),
        ));
    }
    let limit = params.limit.max(1);

    let references = resolve_references(&snapshot, &params.titles)?;
    let references = Arc::new(ReferenceSet::new(references)?);

    let candidates = filter_candidates(&snapshot, &params);
    if candidates.is_empty() {
        return Err(AppError::NoViableCandidates(
            "No titles satisfy the requested filters".to_string(),
        ));
    }

    tracing::info!(
        references = references.len(),
        candidates = candidates.len(),
        limit,
        "Starting recommendation ranking"
    );

    let mut scored = score_candidates(snapshot, references, candidates).await?;

    scored.sort_by(compare_scored);
    scored.truncate(limit);

    let elapsed = start.elapsed();
    tracing::info!(
        returned = scored.len(),
        top_score = scored.first().map(|s| s.score),
        processing_time_ms = elapsed.as_millis(),
        "Ranking completed"
    );

    Ok(scored)
}

/// Looks up every reference title in the movie and show libraries
fn resolve_references(snapshot: &CatalogSnapshot, titles: &[String]) -> AppResult<Vec<Media>> {
    let mut references = Vec::with_capacity(titles.len());
    for title in titles {
        let media = snapshot
            .movies
            .get(title)
            .or_else(|| snapshot.shows.get(title))
            .ok_or_else(|| AppError::NotFound(format!("Title not found: {}", title)))?;
        references.push(media.clone());
    }
    Ok(references)
}

/// Applies the rating floor and required-genre whitelist
fn filter_candidates(snapshot: &CatalogSnapshot, params: &RankParams) -> Vec<Media> {
    snapshot
        .candidates
        .items()
        .filter(|media| match params.min_rating {
            Some(min) => media.rating >= min,
            None => true,
        })
        .filter(|media| {
            params
                .required_genres
                .iter()
                .all(|genre| media.genres.contains(genre))
        })
        .cloned()
        .collect()
}

/// Scores candidates in parallel batches
///
/// Scoring is CPU-bound graph traversal, so batches run on blocking
/// threads, at most one per available core.
async fn score_candidates(
    snapshot: Arc<CatalogSnapshot>,
    references: Arc<ReferenceSet>,
    candidates: Vec<Media>,
) -> AppResult<Vec<ScoredMedia>> {
    let candidates = Arc::new(candidates);
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(DEFAULT_PARALLELISM);
    let batch_size = candidates.len().div_ceil(parallelism);

    let mut tasks = Vec::new();
    for batch_start in (0..candidates.len()).step_by(batch_size) {
        let batch_end = (batch_start + batch_size).min(candidates.len());
        let snapshot = Arc::clone(&snapshot);
        let references = Arc::clone(&references);
        let candidates = Arc::clone(&candidates);
        let task = tokio::task::spawn_blocking(move || {
            let comparator = Comparator::new(&references, &snapshot.keyword_graph);
            candidates[batch_start..batch_end]
                .iter()
                .map(|media| ScoredMedia {
                    score: comparator.score(media),
                    media: media.clone(),
                })
                .collect::<Vec<_>>()
        });
        tasks.push(task);
    }

    let mut scored = Vec::with_capacity(candidates.len());
    for task in tasks {
        match task.await {
            Ok(batch) => scored.extend(batch),
            Err(e) => return Err(AppError::Internal(e.to_string())),
        }
    }

    Ok(scored)
}

/// Orders by score, then intrinsic rating, then title
///
/// The secondary keys make equal-scored candidates come back in a stable,
/// documented order.
fn compare_scored(a: &ScoredMedia, b: &ScoredMedia) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            b.media
                .rating
                .partial_cmp(&a.media.rating)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.media.title.cmp(&b.media.title))
}
