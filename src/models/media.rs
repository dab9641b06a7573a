use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for building a catalog record from a raw entry
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Entry has an empty title")]
    EmptyTitle,

    #[error("Entry {0:?} has no genres")]
    NoGenres(String),

    #[error("Entry {0:?} has a non-numeric rating {1:?}")]
    UnparsableRating(String, String),

    #[error("Entry {0:?} has rating {1} outside the 0-10 scale")]
    RatingOutOfRange(String, f64),

    #[error("Entry {0:?} has an unparsable release date {1:?}")]
    UnparsableYear(String, String),
}

/// Broad content category, determined by which dataset an entry came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movie,
    Show,
    Anime,
}

/// Raw dataset entry as it appears on disk
///
/// Field types are loose on purpose: source datasets disagree on whether
/// genres are a delimited string or a list, and whether numbers arrive as
/// numbers or text. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaEntry {
    pub title: String,
    pub genre: GenreField,
    pub rating: NumberField,
    pub release_date: YearField,
    #[serde(default)]
    pub plot_summary: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Genres as either a list or a comma-delimited string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GenreField {
    List(Vec<String>),
    Delimited(String),
}

impl GenreField {
    /// Splits, trims, and drops empty genre names
    fn normalize(self) -> HashSet<String> {
        let parts = match self {
            GenreField::List(list) => list,
            GenreField::Delimited(text) => text.split(',').map(str::to_string).collect(),
        };
        parts
            .iter()
            .map(|genre| genre.trim())
            .filter(|genre| !genre.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A numeric value that may arrive as JSON text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn as_f64(&self) -> Result<f64, String> {
        match self {
            NumberField::Number(n) => Ok(*n),
            NumberField::Text(t) => t.trim().parse::<f64>().map_err(|_| t.clone()),
        }
    }
}

/// A release year, either bare or as the prefix of a longer date string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearField {
    Number(i64),
    Text(String),
}

impl YearField {
    fn as_year(&self) -> Result<i32, String> {
        match self {
            YearField::Number(n) => i32::try_from(*n).map_err(|_| n.to_string()),
            YearField::Text(t) => {
                let t = t.trim();
                let prefix = t.get(0..4).unwrap_or(t);
                prefix.parse::<i32>().map_err(|_| t.to_string())
            }
        }
    }
}

/// A fully-coerced catalog record
///
/// Every field is canonical: numbers are numbers, genres are a trimmed set,
/// keywords are lowercase. Records never change after construction; computed
/// scores live with the ranking results, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Media {
    pub title: String,
    pub category: Category,
    pub genres: HashSet<String>,
    pub rating: f64,
    pub release_year: i32,
    pub synopsis: String,
    pub keywords: HashSet<String>,
}

impl Media {
    /// Builds a record from a raw dataset entry
    ///
    /// All coercion happens here, exactly once. A failed coercion names the
    /// offending entry so batch loaders can log and skip it.
    pub fn from_entry(entry: MediaEntry, category: Category) -> Result<Self, MediaError> {
        let title = entry.title.trim().to_string();
        if title.is_empty() {
            return Err(MediaError::EmptyTitle);
        }

        let genres = entry.genre.normalize();
        if genres.is_empty() {
            return Err(MediaError::NoGenres(title));
        }

        let rating = entry
            .rating
            .as_f64()
            .map_err(|raw| MediaError::UnparsableRating(title.clone(), raw))?;
        if !(0.0..=10.0).contains(&rating) {
            return Err(MediaError::RatingOutOfRange(title, rating));
        }

        let release_year = entry
            .release_date
            .as_year()
            .map_err(|raw| MediaError::UnparsableYear(title.clone(), raw))?;

        let keywords = entry
            .keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .collect();

        Ok(Self {
            title,
            category,
            genres,
            rating,
            release_year,
            synopsis: entry.plot_summary,
            keywords,
        })
    }
}
