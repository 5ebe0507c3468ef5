#![deny(unsafe_code)]

//! Mapping of import file columns onto claim target fields.

mod error;
mod mapping;
mod suggest;
mod summary;

pub use error::MappingError;
pub use mapping::ImportMapping;
pub use suggest::{
    DEFAULT_MIN_CONFIDENCE, MappingSuggestion, SuggestionResult, normalize_text, suggest_mapping,
};
pub use summary::{MappingSummary, summarize};
