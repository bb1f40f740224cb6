//! Configuration types for the application core.
//!
//! All tunables live here so the controller can be constructed from a single
//! [`AppConfig`] value; every struct has a `Default` matching the behavior of
//! the production frontend.

use crate::core::geo::LatLng;
use std::time::Duration;

/// Configuration for the location suggestion index
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Maximum number of suggestions returned per query
    pub max_suggestions: usize,
    /// Queries shorter than this are not looked up at all
    pub min_query_len: usize,
    /// How long a "no results" notice stays visible before auto-hiding
    pub no_results_timeout: Duration,
    /// Capacity of the query result cache
    pub cache_capacity: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            min_query_len: 3,
            no_results_timeout: Duration::from_secs(2),
            cache_capacity: 512,
        }
    }
}

/// Configuration for attribute table behavior
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Opening marker wrapped around matched substrings during column search.
    /// The renderer decides what the markers mean; the defaults assume an
    /// HTML consumer.
    pub highlight_open: String,
    /// Closing marker for matched substrings
    pub highlight_close: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
        }
    }
}

/// Configuration for the routing backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the routing backend
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub suggest: SuggestConfig,
    pub table: TableConfig,
    pub client: ClientConfig,
    /// Initial map view center
    pub initial_center: LatLng,
    /// Initial map zoom level
    pub initial_zoom: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            suggest: SuggestConfig::default(),
            table: TableConfig::default(),
            client: ClientConfig::default(),
            // Cluj-Napoca
            initial_center: LatLng::new(46.76328536153317, 23.60311995318753),
            initial_zoom: 13.0,
        }
    }
}
