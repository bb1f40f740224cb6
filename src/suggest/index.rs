use crate::core::config::SuggestConfig;
use crate::data::geojson::{GeoJson, GeoJsonFeature};
use crate::suggest::source::LocationSource;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// Score tiers for the priority-based suggestion lookup
const SCORE_EXACT_POSTCODE: u32 = 1000;
const SCORE_POSTCODE_PREFIX: u32 = 800;
const SCORE_POSTCODE_CONTAINS: u32 = 600;
const SCORE_TEXT_CONTAINS: u32 = 400;
const SCORE_WORD_BOUNDARY: u32 = 200;

/// One searchable location, preprocessed at load time and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub postcode: String,
    pub city: String,
    pub address: String,
    /// Location category from the source data ("street", "building", ...)
    pub kind: String,
    /// Presentation text: "postcode - street, city"
    pub display_text: String,
    /// Lowercased "postcode city address", precomputed for scoring
    pub search_text: String,
}

impl LocationRecord {
    /// Builds a record from a source feature; features without a postcode
    /// are not searchable and yield `None`.
    pub fn from_feature(feature: &GeoJsonFeature) -> Option<Self> {
        let postcode = feature.property_text("postcode");
        if postcode.is_empty() {
            return None;
        }

        let city = feature.property_text("city");
        let address = {
            let raw = feature.property_text("address");
            if raw.is_empty() {
                "-".to_string()
            } else {
                raw
            }
        };
        let kind = feature.property_text("type");

        let display_text = format_suggestion_text(&postcode, &city, &address);
        let search_text = format!("{} {} {}", postcode, city, address).to_lowercase();

        Some(Self {
            postcode,
            city,
            address,
            kind,
            display_text,
            search_text,
        })
    }

    /// The street portion of the record, empty when the source had none
    pub fn street(&self) -> &str {
        if self.address == "-" {
            ""
        } else {
            &self.address
        }
    }

    /// Display text for a start endpoint: "postcode - address" (falls back
    /// to the city when the record carries no street address)
    pub fn start_text(&self) -> String {
        let full_address = if self.address == "-" {
            &self.city
        } else {
            &self.address
        };
        format!("{} - {}", self.postcode, full_address)
    }

    /// Display text for a destination chip: "postcode - street, city"
    pub fn finish_text(&self) -> String {
        format_suggestion_text(&self.postcode, &self.city, &self.address)
    }
}

/// Formats "postcode - street, city", omitting the street (and the comma)
/// when the record has no street address.
fn format_suggestion_text(postcode: &str, city: &str, address: &str) -> String {
    let street = if address == "-" { "" } else { address };
    let separator = if street.is_empty() { "" } else { ", " };
    format!("{} - {}{}{}", postcode, street, separator, city)
}

/// A location paired with its relevance score for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSuggestion {
    pub record: LocationRecord,
    pub score: u32,
}

/// Outcome of a suggestion lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome {
    /// The record set never loaded; suggestions are disabled
    Disabled,
    /// Query below the minimum length; no lookup performed
    TooShort,
    /// Lookup ran but nothing matched (UI shows a transient notice)
    NoMatches,
    /// Matches, most relevant first
    Matches(Vec<ScoredSuggestion>),
}

/// Counters for observing query cache behavior
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// In-memory suggestion index with priority-based scoring and a memoizing
/// per-query cache. Loaded once; a failed load leaves the index disabled
/// rather than erroring every subsequent query.
pub struct SuggestionIndex {
    config: SuggestConfig,
    records: Vec<LocationRecord>,
    cache: LruCache<String, Vec<ScoredSuggestion>>,
    stats: CacheStats,
    ready: bool,
}

impl SuggestionIndex {
    pub fn new(config: SuggestConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity)
            .unwrap_or_else(|| NonZeroUsize::new(512).unwrap());
        Self {
            config,
            records: Vec::new(),
            cache: LruCache::new(capacity),
            stats: CacheStats::default(),
            ready: false,
        }
    }

    /// One-shot bulk load through the given source. A failure is logged and
    /// leaves suggestions disabled; there is no retry.
    pub async fn load(&mut self, source: &dyn LocationSource) {
        match source.fetch().await {
            Ok(data) => self.load_from_geojson(&data),
            Err(e) => {
                log::warn!("failed to load location data, suggestions disabled: {}", e);
            }
        }
    }

    /// Synchronous variant of [`load`] for callers without a runtime
    ///
    /// [`load`]: SuggestionIndex::load
    pub fn load_blocking(&mut self, source: &dyn LocationSource) {
        futures::executor::block_on(self.load(source));
    }

    /// Preprocesses raw features into searchable records
    pub fn load_from_geojson(&mut self, data: &GeoJson) {
        self.records = data
            .features()
            .iter()
            .filter_map(|f| LocationRecord::from_feature(f))
            .collect();
        self.ready = true;
        log::info!("preprocessed {} searchable location records", self.records.len());
    }

    /// Whether the record set loaded successfully
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of searchable records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cache hit/miss counters
    pub fn cache_stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Looks up suggestions for a free-text query.
    ///
    /// Results for a given lowercased query are memoized; identical queries
    /// return the cached ordering without rescoring the record set.
    pub fn query(&mut self, term: &str) -> SuggestionOutcome {
        if !self.ready {
            return SuggestionOutcome::Disabled;
        }

        let term = term.trim().to_lowercase();
        if term.chars().count() < self.config.min_query_len {
            return SuggestionOutcome::TooShort;
        }

        if let Some(cached) = self.cache.get(&term) {
            self.stats.hits += 1;
            return if cached.is_empty() {
                SuggestionOutcome::NoMatches
            } else {
                SuggestionOutcome::Matches(cached.clone())
            };
        }
        self.stats.misses += 1;

        let suggestions = self.score_all(&term);
        self.cache.put(term, suggestions.clone());

        if suggestions.is_empty() {
            SuggestionOutcome::NoMatches
        } else {
            SuggestionOutcome::Matches(suggestions)
        }
    }

    /// Scores every record against the lowercased term, keeping non-zero
    /// scores ordered best-first.
    fn score_all(&self, term: &str) -> Vec<ScoredSuggestion> {
        let mut suggestions: Vec<ScoredSuggestion> = self
            .records
            .iter()
            .filter_map(|record| {
                let score = score_record(record, term)?;
                Some(ScoredSuggestion {
                    record: record.clone(),
                    score,
                })
            })
            .collect();

        // Ties go to the shorter (more specific) postcode
        suggestions.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.record.postcode.len().cmp(&b.record.postcode.len()))
        });
        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }
}

/// Priority scoring for one record; `None` when the record does not match.
fn score_record(record: &LocationRecord, term: &str) -> Option<u32> {
    let postcode = record.postcode.to_lowercase();

    let base = if postcode == term {
        SCORE_EXACT_POSTCODE
    } else if postcode.starts_with(term) {
        SCORE_POSTCODE_PREFIX
    } else if postcode.contains(term) {
        SCORE_POSTCODE_CONTAINS
    } else if record.search_text.contains(term) {
        SCORE_TEXT_CONTAINS
    } else if has_word_boundary_match(&record.search_text, term) {
        SCORE_WORD_BOUNDARY
    } else {
        return None;
    };

    // Bonus favoring shorter postcodes
    let bonus = 10 - record.postcode.len().min(10) as u32;
    Some(base + bonus)
}

/// Whether `term` occurs in `text` starting at a word boundary
/// (e.g. "cluj" matches "cluj-napoca" at the start of a word).
fn has_word_boundary_match(text: &str, term: &str) -> bool {
    text.match_indices(term).any(|(idx, _)| {
        idx == 0
            || text[..idx]
                .chars()
                .next_back()
                .map(|c| !c.is_alphanumeric())
                .unwrap_or(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geojson::GeoJsonGeometry;

    fn feature(postcode: &str, city: &str, address: &str, kind: &str) -> GeoJsonFeature {
        GeoJsonFeature {
            id: None,
            geometry: Some(GeoJsonGeometry::Point {
                coordinates: [23.6, 46.77],
            }),
            properties: Some(
                [
                    ("postcode".to_string(), serde_json::json!(postcode)),
                    ("city".to_string(), serde_json::json!(city)),
                    ("address".to_string(), serde_json::json!(address)),
                    ("type".to_string(), serde_json::json!(kind)),
                ]
                .into_iter()
                .collect(),
            ),
        }
    }

    fn sample_index() -> SuggestionIndex {
        let data = GeoJson::FeatureCollection {
            features: vec![
                feature("400656", "Cluj-Napoca", "Strada Câmpului", "street"),
                feature("400001", "Cluj-Napoca", "-", "locality"),
                feature("407280", "Florești", "Strada Eroilor", "street"),
                feature("", "Cluj-Napoca", "Strada Fără Cod", "street"),
            ],
        };
        let mut index = SuggestionIndex::new(SuggestConfig::default());
        index.load_from_geojson(&data);
        index
    }

    #[test]
    fn test_records_without_postcode_are_dropped() {
        let index = sample_index();
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_query_too_short() {
        let mut index = sample_index();
        assert_eq!(index.query("40"), SuggestionOutcome::TooShort);
    }

    #[test]
    fn test_disabled_until_loaded() {
        let mut index = SuggestionIndex::new(SuggestConfig::default());
        assert_eq!(index.query("400656"), SuggestionOutcome::Disabled);
    }

    #[test]
    fn test_prefix_match_excludes_non_matching_records() {
        let mut index = sample_index();
        match index.query("4006") {
            SuggestionOutcome::Matches(suggestions) => {
                assert_eq!(suggestions.len(), 1);
                assert_eq!(suggestions[0].record.postcode, "400656");
                assert!(suggestions[0].score >= SCORE_POSTCODE_PREFIX);
            }
            other => panic!("expected matches, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let mut index = sample_index();
        match index.query("400001") {
            SuggestionOutcome::Matches(suggestions) => {
                assert_eq!(suggestions[0].record.postcode, "400001");
                assert!(suggestions[0].score >= SCORE_EXACT_POSTCODE);
                // Scores are non-increasing
                for pair in suggestions.windows(2) {
                    assert!(pair[0].score >= pair[1].score);
                }
            }
            other => panic!("expected matches, got {:?}", other),
        }
    }

    #[test]
    fn test_city_match_scores_below_postcode_match() {
        let mut index = sample_index();
        match index.query("cluj") {
            SuggestionOutcome::Matches(suggestions) => {
                assert_eq!(suggestions.len(), 2);
                for suggestion in &suggestions {
                    assert!(suggestion.score < SCORE_POSTCODE_CONTAINS);
                    assert!(suggestion.score >= SCORE_TEXT_CONTAINS);
                }
            }
            other => panic!("expected matches, got {:?}", other),
        }
    }

    #[test]
    fn test_query_is_memoized() {
        let mut index = sample_index();
        let first = index.query("400656");
        assert_eq!(index.cache_stats().hits, 0);
        assert_eq!(index.cache_stats().misses, 1);

        let second = index.query("400656");
        assert_eq!(index.cache_stats().hits, 1);
        assert_eq!(first, second);

        // Case-insensitive cache key
        let third = index.query("  400656 ");
        assert_eq!(index.cache_stats().hits, 2);
        assert_eq!(first, third);
    }

    #[test]
    fn test_no_matches_is_cached_too() {
        let mut index = sample_index();
        assert_eq!(index.query("zzzzzz"), SuggestionOutcome::NoMatches);
        assert_eq!(index.query("zzzzzz"), SuggestionOutcome::NoMatches);
        assert_eq!(index.cache_stats().hits, 1);
        assert_eq!(index.cache_stats().misses, 1);
    }

    #[test]
    fn test_word_boundary_match() {
        assert!(has_word_boundary_match("cluj-napoca strada", "napoca"));
        assert!(has_word_boundary_match("cluj-napoca", "cluj"));
        assert!(!has_word_boundary_match("abcdef", "cde"));
    }

    #[test]
    fn test_display_text_formats() {
        let with_street = LocationRecord::from_feature(&feature(
            "400656",
            "Cluj-Napoca",
            "Strada Câmpului",
            "street",
        ))
        .unwrap();
        assert_eq!(
            with_street.display_text,
            "400656 - Strada Câmpului, Cluj-Napoca"
        );
        assert_eq!(with_street.start_text(), "400656 - Strada Câmpului");

        let no_street =
            LocationRecord::from_feature(&feature("400001", "Cluj-Napoca", "-", "locality"))
                .unwrap();
        assert_eq!(no_street.display_text, "400001 - Cluj-Napoca");
        assert_eq!(no_street.start_text(), "400001 - Cluj-Napoca");
    }
}
