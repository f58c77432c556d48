//! # snomed-query-engine
//!
//! Evaluates SNOMED CT Expression Constraint Language (ECL) queries against
//! a read-only [`ConceptIndex`].
//!
//! The engine bridges the [`snomed_query_ecl`] parser and a
//! [`snomed_query_index`] concept index. A query string is parsed, reduced
//! to a [`StructuredQuery`] (one focus, one hierarchy relation, at most one
//! attribute refinement), evaluated with exact-match lookups on the
//! precomputed ancestor closure, and projected to [`ConceptResult`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use snomed_query_engine::QueryEngine;
//! use snomed_query_index::ConceptIndexBuilder;
//!
//! let mut builder = ConceptIndexBuilder::new();
//! builder
//!     .add_concept(138875005, "SNOMED CT Concept (SNOMED RT+CTV3)")
//!     .add_concept(404684003, "Clinical finding (finding)")
//!     .add_concept(73211009, "Diabetes mellitus (disorder)")
//!     .add_concept(46635009, "Diabetes mellitus type 1 (disorder)")
//!     .add_is_a(404684003, 138875005)
//!     .add_is_a(73211009, 404684003)
//!     .add_is_a(46635009, 73211009)
//!     .add_attribute(73211009, 363698007, "113331007");
//! let index = builder.build().unwrap();
//!
//! let engine = QueryEngine::new(&index);
//!
//! let diabetes = engine.evaluate("<< 73211009 |Diabetes mellitus|").unwrap();
//! assert_eq!(diabetes.len(), 2);
//!
//! let by_site = engine.evaluate("< 404684003 : 363698007 = 113331007").unwrap();
//! assert_eq!(by_site[0].id, 73211009);
//! ```
//!
//! ## With Configuration
//!
//! ```rust
//! use snomed_query_engine::{EngineConfig, ParseCacheConfig, QueryEngine};
//! use snomed_query_index::ConceptIndexBuilder;
//! use std::time::Duration;
//!
//! let config = EngineConfig::builder()
//!     .with_parse_cache(ParseCacheConfig {
//!         max_entries: 10_000,
//!         ttl: Duration::from_secs(300),
//!     })
//!     .with_parallel(true)
//!     .with_max_results(100_000)
//!     .build();
//!
//! let index = ConceptIndexBuilder::new().build().unwrap();
//! let engine = QueryEngine::with_config(&index, config);
//! assert_eq!(engine.count_concepts(), 0);
//! ```
//!
//! ## Supported ECL
//!
//! | Construct | Example | Supported |
//! |-----------|---------|-----------|
//! | Self | `73211009` | Yes |
//! | Descendant of | `< 73211009` | Yes |
//! | Descendant or self | `<< 73211009` | Yes |
//! | Ancestor of | `> 73211009` | Yes |
//! | Ancestor or self | `>> 73211009` | Yes |
//! | Any | `*` | Yes |
//! | Single refinement | `< 404684003 : 363698007 = 39057004` | Yes (`=` and `!=`) |
//! | AND / OR / MINUS | `A AND B` | No |
//! | Member of | `^ 700043003` | No |
//! | Attribute groups, sets, string/numeric values | `{ a = b }` | No |
//!
//! Unsupported constructs fail with [`QueryError::UnsupportedFeature`]
//! naming the construct; they are never silently ignored.
//!
//! ## Feature Flags
//!
//! - `parallel` - filters large candidate sets with rayon
//! - `serde` - `Serialize`/`Deserialize` for [`ConceptResult`] and the query types
//!
//! ## Logging
//!
//! Uses [`tracing`]. Query entry points open `debug` spans; unsupported
//! features and missing concepts are logged at `warn`. Install a subscriber
//! in the host application to see them.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod cache;
mod config;
mod engine;
mod error;
mod evaluator;
mod projection;
mod result;

// Public re-exports
pub use cache::{normalize_cache_key, CacheStats, ParseCache};
pub use config::{EngineConfig, EngineConfigBuilder, ParseCacheConfig, SNOMED_ROOT};
pub use engine::QueryEngine;
pub use error::{EngineResult, QueryError};
pub use evaluator::{Evaluation, Evaluator};
pub use projection::ConceptResult;
pub use result::{ExecutionStats, QueryResult};

// Re-export commonly used types from dependencies for convenience
pub use snomed_query_ecl::{Feature, Relation, SctId, StructuredQuery};
pub use snomed_query_index::{Concept, ConceptIndex};
