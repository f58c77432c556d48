//! # snomed-query-index
//!
//! Read-only SNOMED CT concept index for the query engine.
//!
//! Every [`Concept`] carries its full transitive is-a closure, materialised
//! once when the index is built. Descendant queries are an exact-match
//! lookup on that closure ("every concept whose ancestors contain X"), never
//! a graph walk.
//!
//! ## Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Concept`]
//! - **`persistence`** (default): save/load index snapshots to disk
//!
//! ## Quick Start
//!
//! ```rust
//! use snomed_query_index::{ConceptIndex, ConceptIndexBuilder};
//!
//! let mut builder = ConceptIndexBuilder::new();
//! builder
//!     .add_concept(138875005, "SNOMED CT Concept (SNOMED RT+CTV3)")
//!     .add_concept(404684003, "Clinical finding (finding)")
//!     .add_concept(64572001, "Disease (disorder)")
//!     .add_is_a(404684003, 138875005)
//!     .add_is_a(64572001, 404684003)
//!     .add_attribute(64572001, 363698007, "39057004");
//!
//! let index = builder.build().unwrap();
//!
//! let findings: Vec<_> = index
//!     .concepts_with_ancestor(404684003)
//!     .into_iter()
//!     .map(|c| c.id)
//!     .collect();
//! assert_eq!(findings, vec![64572001]);
//! ```
//!
//! Hosts with their own storage implement [`ConceptIndex`] directly; the
//! engine only needs point lookup, lookup by ancestor and a count.

mod builder;
mod concept;
pub mod error;
pub mod memory;
mod traits;

#[cfg(feature = "persistence")]
pub mod persistence;

// Re-export commonly used types
pub use builder::ConceptIndexBuilder;
pub use concept::Concept;
pub use error::{IndexError, IndexResult};
pub use memory::{IndexStats, MemoryConceptIndex, MAX_CONCEPTS};
pub use traits::ConceptIndex;

#[cfg(feature = "persistence")]
pub use persistence::{Snapshot, SnapshotManifest};

// Re-export from snomed-query-ecl for convenience
pub use snomed_query_ecl::SctId;
