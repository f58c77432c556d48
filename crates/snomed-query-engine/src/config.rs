//! Configuration types for the query engine.

use std::time::Duration;

use snomed_query_ecl::SctId;

/// `138875005 |SNOMED CT Concept|`, the root of the hierarchy.
pub const SNOMED_ROOT: SctId = 138875005;

/// Configuration for the query engine.
///
/// # Example
///
/// ```rust
/// use snomed_query_engine::{EngineConfig, ParseCacheConfig};
///
/// let config = EngineConfig::builder()
///     .with_root_concept(138875005)
///     .with_parse_cache(ParseCacheConfig::default())
///     .with_parallel(true)
///     .with_max_results(100_000)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Concept the wildcard `*` is anchored on.
    pub root_concept: SctId,
    /// Parse cache configuration (None = every query is parsed afresh).
    pub parse_cache: Option<ParseCacheConfig>,
    /// Filter large candidate sets in parallel (requires `parallel` feature).
    pub parallel: bool,
    /// Fail queries with more results than this (None = unlimited).
    pub max_results: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_concept: SNOMED_ROOT,
            parse_cache: None,
            parallel: false,
            max_results: None,
        }
    }
}

impl EngineConfig {
    /// Creates a new builder for EngineConfig.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    root_concept: Option<SctId>,
    parse_cache: Option<ParseCacheConfig>,
    parallel: bool,
    max_results: Option<usize>,
}

impl EngineConfigBuilder {
    /// Sets the root concept used for `*`.
    pub fn with_root_concept(mut self, root_concept: SctId) -> Self {
        self.root_concept = Some(root_concept);
        self
    }

    /// Enables the parse cache with the given configuration.
    pub fn with_parse_cache(mut self, cache: ParseCacheConfig) -> Self {
        self.parse_cache = Some(cache);
        self
    }

    /// Enables or disables parallel filtering.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the maximum number of results.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Builds the EngineConfig.
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            root_concept: self.root_concept.unwrap_or(SNOMED_ROOT),
            parse_cache: self.parse_cache,
            parallel: self.parallel,
            max_results: self.max_results,
        }
    }
}

/// Configuration for the parse cache.
///
/// Only parsed queries are cached. Results are always computed from the
/// index.
///
/// # Example
///
/// ```rust
/// use snomed_query_engine::ParseCacheConfig;
/// use std::time::Duration;
///
/// let cache = ParseCacheConfig {
///     max_entries: 1_000,
///     ttl: Duration::from_secs(600),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCacheConfig {
    /// Maximum number of cached queries.
    pub max_entries: usize,
    /// Time-to-live for cached entries.
    pub ttl: Duration,
}

impl Default for ParseCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}
