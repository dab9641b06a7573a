pub mod library;
pub mod media;

pub use library::Library;
pub use media::{Category, GenreField, Media, MediaEntry, MediaError, NumberField, YearField};
