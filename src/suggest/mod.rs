//! Location suggestion subsystem: a preprocessed in-memory index with scored
//! free-text lookup, a memoizing query cache, and the start/destination
//! selection state fed by accepted suggestions.

pub mod index;
pub mod selection;
pub mod source;

pub use index::{LocationRecord, ScoredSuggestion, SuggestionIndex, SuggestionOutcome};
pub use selection::{Chip, DestinationSelection, StartSelection};
pub use source::{HttpLocationSource, LocationSource, StaticLocationSource};
