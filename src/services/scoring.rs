use thiserror::Error;

use crate::graph::keyword::KeywordGraph;
use crate::models::{Category, Media};
use crate::stats::{summarize, Summary};

// Sub-score weights, weakest signal first. Ratios are policy, not structure.
const DATE_WEIGHT: f64 = 0.07;
const RATING_WEIGHT: f64 = 0.11;
const GENRE_WEIGHT: f64 = 0.28;
const KEYWORD_WEIGHT: f64 = 0.54;

// Zero keyword scores are dropped while at least this many remain
const KEYWORD_ZERO_FLOOR: usize = 5;

// A candidate's own rating nudges its composite by rating/50
const RATING_NUDGE_DIVISOR: f64 = 50.0;

// Per-pair aggregation weight for movie candidates
const MOVIE_PAIR_WEIGHT: f64 = 0.5;

/// Error types for scoring
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Reference set is empty")]
    EmptyReferenceSet,
}

/// The user's reference items with their statistics computed once
///
/// Year and rating summaries are fixed at construction so every candidate is
/// scored against the same distribution.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    items: Vec<Media>,
    year_summary: Summary,
    rating_summary: Summary,
}

impl ReferenceSet {
    /// Builds a reference set, rejecting an empty one up front
    pub fn new(items: Vec<Media>) -> Result<Self, ScoreError> {
        if items.is_empty() {
            return Err(ScoreError::EmptyReferenceSet);
        }
        let years: Vec<f64> = items.iter().map(|m| m.release_year as f64).collect();
        let ratings: Vec<f64> = items.iter().map(|m| m.rating).collect();
        Ok(Self {
            year_summary: summarize(&years),
            rating_summary: summarize(&ratings),
            items,
        })
    }

    /// The reference items in input order
    pub fn items(&self) -> &[Media] {
        &self.items
    }

    /// Number of reference items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the set has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Weighted multi-factor similarity between candidates and a reference set
///
/// Four sub-scores per candidate/reference pair, each in [0, 1]: release
/// year proximity, rating standing, genre overlap, and keyword closeness in
/// the relationship graph. The composite is their weighted mean, nudged by
/// the candidate's own rating and clamped to 1.
pub struct Comparator<'a> {
    references: &'a ReferenceSet,
    keyword_graph: &'a KeywordGraph,
}

impl<'a> Comparator<'a> {
    pub fn new(references: &'a ReferenceSet, keyword_graph: &'a KeywordGraph) -> Self {
        Self {
            references,
            keyword_graph,
        }
    }

    /// Scores a candidate against the whole reference set
    ///
    /// The aggregate is a weighted mean of per-pair composites; movie
    /// candidates carry half weight on both sides of the fraction.
    pub fn score(&self, candidate: &Media) -> f64 {
        let pair_weight = match candidate.category {
            Category::Movie => MOVIE_PAIR_WEIGHT,
            _ => 1.0,
        };

        let mut total = 0.0;
        let mut denominator = 0.0;
        for reference in self.references.items() {
            total += self.pair_score(candidate, reference) * pair_weight;
            denominator += pair_weight;
        }
        let score = total / denominator;

        tracing::debug!(candidate = %candidate.title, score, "Scored candidate");

        score
    }

    /// Composite score of a candidate against a single reference item
    pub fn pair_score(&self, candidate: &Media, reference: &Media) -> f64 {
        let weighted = self.date_score(candidate, reference) * DATE_WEIGHT
            + self.rating_score(candidate, reference) * RATING_WEIGHT
            + self.genre_score(candidate, reference) * GENRE_WEIGHT
            + self.keyword_score(candidate, reference) * KEYWORD_WEIGHT;
        let composite =
            weighted / (DATE_WEIGHT + RATING_WEIGHT + GENRE_WEIGHT + KEYWORD_WEIGHT);

        (composite + candidate.rating / RATING_NUDGE_DIVISOR).min(1.0)
    }

    /// Release year proximity to the reference set
    ///
    /// Inside the quartile band or within one standard deviation of the mean
    /// counts as a full match; outside, the score decays as 1/|z|. When
    /// every reference year is identical the decay falls back to the raw
    /// year gap.
    pub fn date_score(&self, candidate: &Media, reference: &Media) -> f64 {
        let summary = &self.references.year_summary;
        if summary.stddev == 0.0 {
            let gap = (candidate.release_year - reference.release_year).abs();
            return if gap == 0 { 1.0 } else { 1.0 / gap as f64 };
        }

        let year = candidate.release_year as f64;
        let z = summary.z_score(year);
        if summary.in_iqr(year) || z.abs() < 1.0 {
            1.0
        } else {
            1.0 / z.abs()
        }
    }

    /// Rating standing against the reference set
    ///
    /// Deliberately asymmetric: candidates rated below the reference mean
    /// score zero, candidates above it scale up from 0.5. With a degenerate
    /// distribution the candidate just has to meet the reference's rating.
    pub fn rating_score(&self, candidate: &Media, reference: &Media) -> f64 {
        let summary = &self.references.rating_summary;
        if summary.stddev == 0.0 {
            return if candidate.rating >= reference.rating {
                1.0
            } else {
                0.0
            };
        }

        if summary.in_iqr(candidate.rating) {
            return 1.0;
        }
        let z = summary.z_score(candidate.rating);
        if z < 0.0 {
            0.0
        } else if z == 0.0 {
            0.5
        } else {
            (0.5 + z).min(1.0)
        }
    }

    /// Share of the reference's genres the candidate covers
    ///
    /// The denominator is the reference's genre count, so the score is not
    /// symmetric between the two items.
    pub fn genre_score(&self, candidate: &Media, reference: &Media) -> f64 {
        let shared = candidate.genres.intersection(&reference.genres).count();
        shared as f64 / reference.genres.len() as f64
    }

    /// Keyword closeness through the relationship graph
    ///
    /// Each candidate keyword contributes the reciprocal of its shortest
    /// path to the nearest reference keyword, or zero when unreachable. With
    /// any positive contribution, zeros are discarded while at least
    /// `KEYWORD_ZERO_FLOOR` of them remain; the score is the mean of what
    /// survives. A candidate without keywords offers no signal and scores
    /// zero.
    pub fn keyword_score(&self, candidate: &Media, reference: &Media) -> f64 {
        if candidate.keywords.is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut positives = 0usize;
        let mut zeros = 0usize;
        for keyword in &candidate.keywords {
            let closest = reference
                .keywords
                .iter()
                .filter_map(|reference_keyword| {
                    self.keyword_graph.path_length(keyword, reference_keyword)
                })
                .min();
            match closest {
                Some(length) => {
                    total += 1.0 / length as f64;
                    positives += 1;
                }
                None => zeros += 1,
            }
        }

        let mut kept_zeros = zeros;
        if positives > 0 {
            while kept_zeros >= KEYWORD_ZERO_FLOOR {
                kept_zeros -= 1;
            }
        }

        total / (positives + kept_zeros) as f64
    }
}
